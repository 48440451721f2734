//! Assertions for Mimo test scripts. Failures raise the assertion error
//! tier; everything else in the runtime keeps flowing.

use crate::error::RuntimeError;
use crate::modules::json;
use crate::value::Value;

pub fn call(name: &str, args: &[Value]) -> Result<Value, RuntimeError> {
    match name {
        "eq" => {
            let actual = args.first().unwrap_or(&Value::Null);
            let expected = args.get(1).unwrap_or(&Value::Null);
            if actual.is_equal(expected) {
                return Ok(Value::Bool(true));
            }
            Err(RuntimeError::assertion(format!(
                "Assertion Failed{}.\n   Expected: {}\n   Actual:   {}",
                suffix(args, 2),
                render(expected),
                render(actual)
            )))
        }
        "neq" => {
            let actual = args.first().unwrap_or(&Value::Null);
            let expected = args.get(1).unwrap_or(&Value::Null);
            if !actual.is_equal(expected) {
                return Ok(Value::Bool(true));
            }
            Err(RuntimeError::assertion(format!(
                "Assertion Failed{}. Expected values to be different.",
                suffix(args, 2)
            )))
        }
        "true" => strict_bool(args, true),
        "false" => strict_bool(args, false),
        "throws" => {
            let f = match args.first() {
                Some(Value::Function(f)) => f,
                _ => return Err("assert.throws expects a function".into()),
            };
            match f.call(&[]) {
                Err(_) => Ok(Value::Bool(true)),
                Ok(_) => Err(RuntimeError::assertion(format!(
                    "Assertion Failed{}. Expected function to throw, but it did not.",
                    suffix(args, 1)
                ))),
            }
        }
        _ => Err(RuntimeError::runtime(format!(
            "Unknown assert function: {}",
            name
        ))),
    }
}

// true/false demand the strict boolean, not mere truthiness
fn strict_bool(args: &[Value], want: bool) -> Result<Value, RuntimeError> {
    let cond = args.first().unwrap_or(&Value::Null);
    if matches!(cond, Value::Bool(b) if *b == want) {
        return Ok(Value::Bool(true));
    }
    Err(RuntimeError::assertion(format!(
        "Assertion Failed{}. Expected {}, got {}",
        suffix(args, 1),
        want,
        cond
    )))
}

fn suffix(args: &[Value], i: usize) -> String {
    match args.get(i) {
        Some(Value::Str(msg)) => format!(": {}", msg),
        _ => String::new(),
    }
}

fn render(value: &Value) -> String {
    json::json_text(value).unwrap_or_else(|| value.to_string())
}
