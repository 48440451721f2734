use std::io;

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::RuntimeError;
use crate::value::Value;

pub fn call(name: &str, args: &[Value]) -> Result<Value, RuntimeError> {
    match name {
        "parse" => {
            let text = match args.first() {
                Some(Value::Str(s)) => s,
                _ => return Err("json.parse expects a string".into()),
            };
            let parsed: serde_json::Value = serde_json::from_str(text)
                .map_err(|e| RuntimeError::runtime(format!("Failed to parse JSON: {}", e)))?;
            Ok(from_json(parsed))
        }
        "stringify" => {
            let json = to_json(args.first().unwrap_or(&Value::Null))
                .map_err(|e| RuntimeError::runtime(format!("Failed to stringify JSON: {}", e)))?;
            let text = match args.get(1) {
                None | Some(Value::Null) => serialize_with(&json, SpacedFormatter),
                Some(v) => {
                    let width = v.as_int()?.max(0) as usize;
                    let pad = vec![b' '; width];
                    serialize_with(&json, serde_json::ser::PrettyFormatter::with_indent(&pad))
                }
            }
            .map_err(|e| RuntimeError::runtime(format!("Failed to stringify JSON: {}", e)))?;
            Ok(Value::Str(text))
        }
        _ => Err(RuntimeError::runtime(format!(
            "Unknown json function: {}",
            name
        ))),
    }
}

/// JSON rendering used by assertion messages. None when the value holds
/// something JSON cannot carry.
pub(crate) fn json_text(value: &Value) -> Option<String> {
    let json = to_json(value).ok()?;
    serialize_with(&json, SpacedFormatter).ok()
}

// Compact output keeps a space after commas and colons.
struct SpacedFormatter;

impl serde_json::ser::Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }
}

fn serialize_with<F>(json: &serde_json::Value, fmt: F) -> Result<String, String>
where
    F: serde_json::ser::Formatter,
{
    let mut out = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut out, fmt);
    json.serialize(&mut ser).map_err(|e| e.to_string())?;
    String::from_utf8(out).map_err(|e| e.to_string())
}

fn from_json(json: serde_json::Value) -> Value {
    match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(b),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Value::Int(i),
            None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
        },
        serde_json::Value::String(s) => Value::Str(s),
        serde_json::Value::Array(items) => {
            Value::array(items.into_iter().map(from_json).collect())
        }
        serde_json::Value::Object(entries) => {
            let mut map = IndexMap::new();
            for (k, v) in entries {
                map.insert(k, from_json(v));
            }
            Value::object(map)
        }
    }
}

fn to_json(value: &Value) -> Result<serde_json::Value, String> {
    Ok(match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Int(n) => serde_json::Value::Number((*n).into()),
        // JSON has no NaN or infinity, those collapse to null
        Value::Float(f) => serde_json::Number::from_f64(*f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Value::Str(s) => serde_json::Value::String(s.clone()),
        Value::Array(items) => serde_json::Value::Array(
            items.borrow().iter().map(to_json).collect::<Result<_, _>>()?,
        ),
        Value::Object(map) => {
            let mut out = serde_json::Map::new();
            for (k, v) in map.borrow().iter() {
                out.insert(k.clone(), to_json(v)?);
            }
            serde_json::Value::Object(out)
        }
        Value::Function(_) => return Err("function values are not JSON serializable".to_string()),
        Value::Date(_) => return Err("datetime values are not JSON serializable".to_string()),
    })
}
