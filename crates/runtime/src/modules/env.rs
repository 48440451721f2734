use indexmap::IndexMap;

use crate::error::RuntimeError;
use crate::value::Value;

/// Read-only view of process environment variables. Writing is deliberately
/// absent; programs receive configuration, they do not mutate it.
pub fn call(name: &str, args: &[Value]) -> Result<Value, RuntimeError> {
    match name {
        "get" => {
            let key = name_arg(args, "env.get")?;
            match std::env::var(key) {
                Ok(val) => Ok(Value::Str(val)),
                Err(_) => Ok(args.get(1).cloned().unwrap_or(Value::Null)),
            }
        }
        "has" => Ok(Value::Bool(
            std::env::var_os(name_arg(args, "env.has")?).is_some(),
        )),
        "all" => {
            let mut out = IndexMap::new();
            for (key, val) in std::env::vars() {
                out.insert(key, Value::Str(val));
            }
            Ok(Value::object(out))
        }
        _ => Err(RuntimeError::runtime(format!(
            "Unknown env function: {}",
            name
        ))),
    }
}

fn name_arg<'a>(args: &'a [Value], func: &str) -> Result<&'a str, RuntimeError> {
    match args.first() {
        Some(Value::Str(key)) => Ok(key),
        _ => Err(RuntimeError::runtime(format!(
            "{} expects a variable name",
            func
        ))),
    }
}
