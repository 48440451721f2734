//! Path functions: pure string algebra over `/` separators, no filesystem
//! access.

use crate::error::RuntimeError;
use crate::value::Value;

pub fn call(name: &str, args: &[Value]) -> Result<Value, RuntimeError> {
    match name {
        "join" => {
            let mut out = String::new();
            for arg in args {
                let part = match arg {
                    Value::Str(s) => s,
                    _ => return Err("path.join expects string parts".into()),
                };
                if part.starts_with('/') {
                    // an absolute part discards everything before it
                    out = part.clone();
                } else if out.is_empty() || out.ends_with('/') {
                    out.push_str(part);
                } else {
                    out.push('/');
                    out.push_str(part);
                }
            }
            Ok(Value::Str(out))
        }
        "dirname" => Ok(Value::Str(dirname(path_arg(args, name)?))),
        "basename" => {
            let base = basename(path_arg(args, name)?);
            let stripped = match args.get(1) {
                Some(Value::Str(ext)) if !ext.is_empty() && base.ends_with(ext.as_str()) => {
                    base[..base.len() - ext.len()].to_string()
                }
                _ => base,
            };
            Ok(Value::Str(stripped))
        }
        "extname" => Ok(Value::Str(extname(path_arg(args, name)?))),
        _ => Err(RuntimeError::runtime(format!(
            "Unknown path function: {}",
            name
        ))),
    }
}

fn path_arg<'a>(args: &'a [Value], func: &str) -> Result<&'a str, RuntimeError> {
    match args.first() {
        Some(Value::Str(p)) => Ok(p),
        _ => Err(RuntimeError::runtime(format!(
            "path.{} expects a path string",
            func
        ))),
    }
}

fn dirname(path: &str) -> String {
    match path.rfind('/') {
        None => String::new(),
        Some(i) => {
            let head = &path[..i + 1];
            if head.chars().all(|c| c == '/') {
                head.to_string()
            } else {
                head.trim_end_matches('/').to_string()
            }
        }
    }
}

fn basename(path: &str) -> String {
    path[path.rfind('/').map_or(0, |i| i + 1)..].to_string()
}

fn extname(path: &str) -> String {
    let base = &path[path.rfind('/').map_or(0, |i| i + 1)..];
    // leading dots belong to the name, not an extension
    let trimmed = base.trim_start_matches('.');
    let lead = base.len() - trimmed.len();
    match trimmed.rfind('.') {
        Some(i) => base[lead + i..].to_string(),
        None => String::new(),
    }
}
