//! Built-in functions for the Mimo runtime.
//! Dispatches bare names directly and dotted `module.function` names to the
//! stdlib modules.

use crate::error::RuntimeError;
use crate::modules;
use crate::runtime::Runtime;
use crate::value::Value;

/// Bare built-in names, used by hosts to resolve identifiers at compile time.
pub const BUILTIN_NAMES: &[&str] = &[
    "show",
    "stringify",
    "type",
    "len",
    "add",
    "get",
    "get_property_safe",
    "update",
    "has_property",
    "push",
    "pop",
    "range",
    "join",
    "slice",
    "eq",
    "neq",
    "and_",
    "and",
    "or_",
    "or",
    "coalesce",
    "if_else",
    "keys",
    "values",
    "entries",
    "get_arguments",
    "get_env",
    "exit_code",
];

/// Stdlib module prefixes accepted in dotted names.
pub const MODULE_NAMES: &[&str] = &[
    "fs", "json", "datetime", "math", "string", "array", "path", "env", "regex", "http",
    "object", "assert",
];

pub fn call_builtin(name: &str, args: &[Value], rt: &mut Runtime) -> Result<Value, RuntimeError> {
    match name {
        // Output and reflection
        "show" => {
            let line = args
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(" ");
            println!("{}", line);
            rt.output.push(line);
            Ok(Value::Null)
        }
        "stringify" => Ok(Value::Str(
            args.first().unwrap_or(&Value::Null).to_string(),
        )),
        "type" => Ok(Value::Str(
            args.first().unwrap_or(&Value::Null).kind().to_string(),
        )),

        // Collections
        "len" => match args.first() {
            Some(Value::Str(s)) => Ok(Value::Int(s.chars().count() as i64)),
            Some(Value::Array(items)) => Ok(Value::Int(items.borrow().len() as i64)),
            Some(Value::Object(map)) => Ok(Value::Int(map.borrow().len() as i64)),
            _ => Ok(Value::Int(0)),
        },
        "add" => add_values(
            args.first().unwrap_or(&Value::Null),
            args.get(1).unwrap_or(&Value::Null),
        ),
        "get" | "get_property_safe" => Ok(get_value(
            args.first().unwrap_or(&Value::Null),
            args.get(1).unwrap_or(&Value::Null),
        )),
        "update" => {
            let value = args.get(2).cloned().unwrap_or(Value::Null);
            match (args.first(), args.get(1)) {
                (Some(Value::Array(items)), Some(Value::Int(i))) => {
                    let mut items = items.borrow_mut();
                    if *i >= 0 && (*i as usize) < items.len() {
                        items[*i as usize] = value.clone();
                    }
                }
                (Some(Value::Object(map)), Some(Value::Str(key))) => {
                    map.borrow_mut().insert(key.clone(), value.clone());
                }
                // non-containers are left alone, the value still comes back
                _ => {}
            }
            Ok(value)
        }
        "has_property" => match (args.first(), args.get(1)) {
            (Some(Value::Object(map)), Some(Value::Str(key))) => {
                Ok(Value::Bool(map.borrow().contains_key(key)))
            }
            _ => Ok(Value::Bool(false)),
        },
        "push" => {
            if let Some(Value::Array(items)) = args.first() {
                items
                    .borrow_mut()
                    .push(args.get(1).cloned().unwrap_or(Value::Null));
            }
            Ok(args.first().cloned().unwrap_or(Value::Null))
        }
        "pop" => match args.first() {
            Some(Value::Array(items)) => Ok(items.borrow_mut().pop().unwrap_or(Value::Null)),
            _ => Ok(Value::Null),
        },
        "range" => {
            let (start, end, step) = match args.len() {
                1 => (0, args[0].as_int()?, 1),
                2 => (args[0].as_int()?, args[1].as_int()?, 1),
                3 => (args[0].as_int()?, args[1].as_int()?, args[2].as_int()?),
                _ => return Ok(Value::array(Vec::new())),
            };
            let mut out = Vec::new();
            let mut i = start;
            if step > 0 {
                while i < end {
                    out.push(Value::Int(i));
                    i += step;
                }
            } else if step < 0 {
                while i > end {
                    out.push(Value::Int(i));
                    i += step;
                }
            }
            Ok(Value::array(out))
        }
        "join" => match args.first() {
            Some(Value::Array(items)) => {
                let sep = args.get(1).map(|v| v.to_string()).unwrap_or_default();
                let joined = items
                    .borrow()
                    .iter()
                    .map(|v| v.to_string())
                    .collect::<Vec<_>>()
                    .join(&sep);
                Ok(Value::Str(joined))
            }
            _ => Ok(Value::Str(String::new())),
        },
        "slice" => {
            let start = match args.get(1) {
                None | Some(Value::Null) => 0,
                Some(v) => v.as_int()?,
            };
            let end = match args.get(2) {
                None | Some(Value::Null) => None,
                Some(v) => Some(v.as_int()?),
            };
            match args.first() {
                Some(Value::Str(s)) => {
                    let chars: Vec<char> = s.chars().collect();
                    let (lo, hi) = resolve_slice(chars.len(), start, end);
                    Ok(Value::Str(chars[lo..hi].iter().collect()))
                }
                Some(Value::Array(items)) => {
                    let items = items.borrow();
                    let (lo, hi) = resolve_slice(items.len(), start, end);
                    Ok(Value::array(items[lo..hi].to_vec()))
                }
                _ => Err(RuntimeError::runtime("slice expects a string or array")),
            }
        }

        // Comparison and logic
        "eq" => Ok(Value::Bool(
            args.first()
                .unwrap_or(&Value::Null)
                .is_equal(args.get(1).unwrap_or(&Value::Null)),
        )),
        "neq" => Ok(Value::Bool(
            !args
                .first()
                .unwrap_or(&Value::Null)
                .is_equal(args.get(1).unwrap_or(&Value::Null)),
        )),
        "and_" | "and" => {
            let a = args.first().unwrap_or(&Value::Null);
            let b = args.get(1).unwrap_or(&Value::Null);
            Ok(if a.is_truthy() { b.clone() } else { a.clone() })
        }
        "or_" | "or" => {
            let a = args.first().unwrap_or(&Value::Null);
            let b = args.get(1).unwrap_or(&Value::Null);
            Ok(if a.is_truthy() { a.clone() } else { b.clone() })
        }
        "coalesce" => Ok(args
            .iter()
            .find(|v| !matches!(v, Value::Null))
            .cloned()
            .unwrap_or(Value::Null)),
        "if_else" => {
            let cond = args.first().unwrap_or(&Value::Null);
            let pick = if cond.is_truthy() { 1 } else { 2 };
            Ok(args.get(pick).cloned().unwrap_or(Value::Null))
        }

        // Object views
        "keys" => match args.first() {
            Some(Value::Object(map)) => Ok(Value::array(
                map.borrow()
                    .keys()
                    .map(|k| Value::Str(k.clone()))
                    .collect(),
            )),
            _ => Ok(Value::array(Vec::new())),
        },
        "values" => match args.first() {
            Some(Value::Object(map)) => Ok(Value::array(map.borrow().values().cloned().collect())),
            _ => Ok(Value::array(Vec::new())),
        },
        "entries" => match args.first() {
            Some(Value::Object(map)) => Ok(Value::array(
                map.borrow()
                    .iter()
                    .map(|(k, v)| Value::array(vec![Value::Str(k.clone()), v.clone()]))
                    .collect(),
            )),
            _ => Ok(Value::array(Vec::new())),
        },

        // Process environment
        "get_arguments" => Ok(Value::array(
            rt.arguments()
                .iter()
                .map(|a| Value::Str(a.clone()))
                .collect(),
        )),
        "get_env" => match args.first() {
            Some(Value::Str(name)) => match std::env::var(name) {
                Ok(val) => Ok(Value::Str(val)),
                Err(_) => Ok(Value::Null),
            },
            _ => Ok(Value::Null),
        },
        "exit_code" => {
            let code = match args.first() {
                Some(v) => v.as_int()?,
                None => 0,
            };
            std::process::exit(code as i32);
        }

        // Stdlib modules
        s if s.starts_with("fs.") => {
            let func = s.strip_prefix("fs.").unwrap();
            modules::fs::call(func, args)
        }
        s if s.starts_with("json.") => {
            let func = s.strip_prefix("json.").unwrap();
            modules::json::call(func, args)
        }
        s if s.starts_with("datetime.") => {
            let func = s.strip_prefix("datetime.").unwrap();
            modules::datetime::call(func, args)
        }
        s if s.starts_with("math.") => {
            let func = s.strip_prefix("math.").unwrap();
            modules::math::call(func, args)
        }
        s if s.starts_with("string.") => {
            let func = s.strip_prefix("string.").unwrap();
            modules::string::call(func, args)
        }
        s if s.starts_with("array.") => {
            let func = s.strip_prefix("array.").unwrap();
            modules::array::call(func, args)
        }
        s if s.starts_with("path.") => {
            let func = s.strip_prefix("path.").unwrap();
            modules::path::call(func, args)
        }
        s if s.starts_with("env.") => {
            let func = s.strip_prefix("env.").unwrap();
            modules::env::call(func, args)
        }
        s if s.starts_with("regex.") => {
            let func = s.strip_prefix("regex.").unwrap();
            modules::regex::call(func, args)
        }
        s if s.starts_with("http.") => {
            let func = s.strip_prefix("http.").unwrap();
            modules::http::call(func, args)
        }
        s if s.starts_with("object.") => {
            let func = s.strip_prefix("object.").unwrap();
            modules::object::call(func, args)
        }
        s if s.starts_with("assert.") => {
            let func = s.strip_prefix("assert.").unwrap();
            modules::assert::call(func, args)
        }

        _ => Err(RuntimeError::runtime(format!(
            "Unknown builtin function: {}",
            name
        ))),
    }
}

fn add_values(a: &Value, b: &Value) -> Result<Value, RuntimeError> {
    if matches!(a, Value::Str(_)) || matches!(b, Value::Str(_)) {
        return Ok(Value::Str(format!("{}{}", a, b)));
    }
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => Ok(match x.checked_add(*y) {
            Some(sum) => Value::Int(sum),
            None => Value::Float(*x as f64 + *y as f64),
        }),
        (Value::Int(x), Value::Float(y)) => Ok(Value::Float(*x as f64 + y)),
        (Value::Float(x), Value::Int(y)) => Ok(Value::Float(x + *y as f64)),
        (Value::Float(x), Value::Float(y)) => Ok(Value::Float(x + y)),
        _ => Err(RuntimeError::runtime(format!(
            "Cannot add {} and {}",
            a.kind(),
            b.kind()
        ))),
    }
}

fn get_value(collection: &Value, key: &Value) -> Value {
    match (collection, key) {
        (Value::Array(items), Value::Int(i)) => {
            let items = items.borrow();
            if *i >= 0 && (*i as usize) < items.len() {
                items[*i as usize].clone()
            } else {
                Value::Null
            }
        }
        (Value::Object(map), Value::Str(key)) => {
            map.borrow().get(key).cloned().unwrap_or(Value::Null)
        }
        _ => Value::Null,
    }
}

/// Python-style slice bounds: negative indices count from the end and the
/// resulting half-open window is clamped to the collection.
pub(crate) fn resolve_slice(len: usize, start: i64, end: Option<i64>) -> (usize, usize) {
    let len_i = len as i64;
    let norm = |idx: i64| -> usize {
        let idx = if idx < 0 { idx + len_i } else { idx };
        idx.clamp(0, len_i) as usize
    };
    let lo = norm(start);
    let hi = norm(end.unwrap_or(len_i));
    (lo, hi.max(lo))
}
