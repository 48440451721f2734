use std::collections::HashSet;

use indexmap::IndexMap;

use crate::error::RuntimeError;
use crate::value::{FuncValue, Value};

pub fn call(name: &str, args: &[Value]) -> Result<Value, RuntimeError> {
    match name {
        "merge" => {
            let mut out: IndexMap<String, Value> = IndexMap::new();
            for arg in args {
                match arg {
                    Value::Object(map) => {
                        // later values win but a key keeps its first position
                        for (key, val) in map.borrow().iter() {
                            out.insert(key.clone(), val.clone());
                        }
                    }
                    _ => return Err("object.merge expects objects".into()),
                }
            }
            Ok(Value::object(out))
        }
        "pick" => {
            let map = map_arg(args, 0, name)?;
            let keys = keys_arg(args, 1, name)?;
            let mut out = IndexMap::new();
            for key in keys {
                if let Some(val) = map.get(&key) {
                    out.insert(key, val.clone());
                }
            }
            Ok(Value::object(out))
        }
        "omit" => {
            let map = map_arg(args, 0, name)?;
            let drop: HashSet<String> = keys_arg(args, 1, name)?.into_iter().collect();
            let mut out = IndexMap::new();
            for (key, val) in map {
                if !drop.contains(&key) {
                    out.insert(key, val);
                }
            }
            Ok(Value::object(out))
        }
        "map_values" => {
            let source = match args.first() {
                Some(source @ Value::Object(_)) => source.clone(),
                _ => return Err("object.map_values expects an object".into()),
            };
            let map = map_arg(args, 0, name)?;
            let cb = fn_arg(args, 1, name)?;
            let mut out = IndexMap::new();
            for (key, val) in map {
                let mapped = cb.call(&[val, Value::Str(key.clone()), source.clone()])?;
                out.insert(key, mapped);
            }
            Ok(Value::object(out))
        }
        "from_entries" => {
            let entries = match args.first() {
                Some(Value::Array(items)) => items.borrow().clone(),
                _ => return Err(malformed_entries()),
            };
            let mut out = IndexMap::new();
            for entry in &entries {
                let pair = match entry {
                    Value::Array(pair) => pair.borrow().clone(),
                    _ => return Err(malformed_entries()),
                };
                if pair.len() < 2 {
                    return Err(malformed_entries());
                }
                out.insert(pair[0].to_string(), pair[1].clone());
            }
            Ok(Value::object(out))
        }
        "is_empty" => Ok(Value::Bool(map_arg(args, 0, name)?.is_empty())),
        "keys" => Ok(Value::array(
            map_arg(args, 0, name)?
                .keys()
                .map(|k| Value::Str(k.clone()))
                .collect(),
        )),
        "values" => Ok(Value::array(
            map_arg(args, 0, name)?.values().cloned().collect(),
        )),
        "entries" => Ok(Value::array(
            map_arg(args, 0, name)?
                .iter()
                .map(|(k, v)| Value::array(vec![Value::Str(k.clone()), v.clone()]))
                .collect(),
        )),
        _ => Err(RuntimeError::runtime(format!(
            "Unknown object function: {}",
            name
        ))),
    }
}

fn malformed_entries() -> RuntimeError {
    RuntimeError::runtime("object.from_entries expects an array of [key, value] pairs")
}

fn map_arg(args: &[Value], i: usize, func: &str) -> Result<IndexMap<String, Value>, RuntimeError> {
    match args.get(i) {
        Some(Value::Object(map)) => Ok(map.borrow().clone()),
        _ => Err(RuntimeError::runtime(format!(
            "object.{} expects an object",
            func
        ))),
    }
}

fn keys_arg(args: &[Value], i: usize, func: &str) -> Result<Vec<String>, RuntimeError> {
    match args.get(i) {
        // non-string entries can never name a key, they are skipped
        Some(Value::Array(keys)) => Ok(keys
            .borrow()
            .iter()
            .filter_map(|k| k.as_str().map(str::to_string))
            .collect()),
        _ => Err(RuntimeError::runtime(format!(
            "object.{} expects an array of keys",
            func
        ))),
    }
}

fn fn_arg<'a>(args: &'a [Value], i: usize, func: &str) -> Result<&'a FuncValue, RuntimeError> {
    match args.get(i) {
        Some(Value::Function(f)) => Ok(f),
        _ => Err(RuntimeError::runtime(format!(
            "object.{} expects a function",
            func
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(text: &str) -> Value {
        Value::Str(text.to_string())
    }

    fn obj(pairs: &[(&str, Value)]) -> Value {
        let mut map = IndexMap::new();
        for (k, v) in pairs {
            map.insert(k.to_string(), v.clone());
        }
        Value::object(map)
    }

    #[test]
    fn merge_later_wins_but_keeps_first_position() {
        let merged = call(
            "merge",
            &[
                obj(&[("a", Value::Int(1)), ("b", Value::Int(2))]),
                obj(&[("b", Value::Int(9)), ("c", Value::Int(3))]),
            ],
        )
        .unwrap();
        assert_eq!(merged.to_string(), "{a: 1, b: 9, c: 3}");
        assert_eq!(call("merge", &[]).unwrap(), obj(&[]));
        assert!(call("merge", &[obj(&[]), Value::Int(1)]).is_err());
    }

    #[test]
    fn pick_follows_the_requested_order() {
        let source = obj(&[
            ("a", Value::Int(1)),
            ("b", Value::Int(2)),
            ("c", Value::Int(3)),
        ]);
        let picked = call(
            "pick",
            &[source, Value::array(vec![s("c"), s("missing"), s("a"), Value::Int(5)])],
        )
        .unwrap();
        assert_eq!(picked.to_string(), "{c: 3, a: 1}");
    }

    #[test]
    fn omit_drops_the_named_keys() {
        let source = obj(&[
            ("a", Value::Int(1)),
            ("b", Value::Int(2)),
            ("c", Value::Int(3)),
        ]);
        let rest = call("omit", &[source, Value::array(vec![s("b"), s("nope")])]).unwrap();
        assert_eq!(rest.to_string(), "{a: 1, c: 3}");
    }

    #[test]
    fn map_values_passes_value_key_and_object() {
        let source = obj(&[("x", Value::Int(1)), ("y", Value::Int(2))]);
        let mapped = call(
            "map_values",
            &[source, Value::function(|cb_args| {
                if cb_args[2].kind() != "object" {
                    return Err("third callback argument must be the object".into());
                }
                Ok(Value::Str(format!("{}={}", cb_args[1], cb_args[0])))
            })],
        )
        .unwrap();
        assert_eq!(mapped.to_string(), "{x: x=1, y: y=2}");
    }

    #[test]
    fn from_entries_stringifies_keys() {
        let entries = Value::array(vec![
            Value::array(vec![Value::Int(1), s("one")]),
            Value::array(vec![Value::Bool(true), Value::Int(2)]),
            Value::array(vec![s("k"), Value::Null, s("ignored extra")]),
        ]);
        let built = call("from_entries", &[entries]).unwrap();
        assert_eq!(built.to_string(), "{1: one, true: 2, k: null}");

        let err = call("from_entries", &[Value::array(vec![Value::Int(5)])]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "object.from_entries expects an array of [key, value] pairs"
        );
        assert!(call(
            "from_entries",
            &[Value::array(vec![Value::array(vec![s("alone")])])]
        )
        .is_err());
    }

    #[test]
    fn views_and_emptiness() {
        let source = obj(&[("b", Value::Int(2)), ("a", Value::Int(1))]);
        assert_eq!(
            call("keys", &[source.clone()]).unwrap(),
            Value::array(vec![s("b"), s("a")])
        );
        assert_eq!(
            call("values", &[source.clone()]).unwrap(),
            Value::array(vec![Value::Int(2), Value::Int(1)])
        );
        assert_eq!(
            call("entries", &[source.clone()]).unwrap(),
            Value::array(vec![
                Value::array(vec![s("b"), Value::Int(2)]),
                Value::array(vec![s("a"), Value::Int(1)]),
            ])
        );
        assert_eq!(call("is_empty", &[source]).unwrap(), Value::Bool(false));
        assert_eq!(call("is_empty", &[obj(&[])]).unwrap(), Value::Bool(true));
        assert!(call("keys", &[Value::Int(1)]).is_err());
    }
}
