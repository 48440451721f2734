use crate::error::RuntimeError;
use crate::value::Value;

pub fn call(name: &str, args: &[Value]) -> Result<Value, RuntimeError> {
    let x = |i: usize| -> Result<f64, RuntimeError> {
        match args.get(i) {
            Some(Value::Int(n)) => Ok(*n as f64),
            Some(Value::Float(f)) => Ok(*f),
            _ => Err(RuntimeError::runtime(format!(
                "math.{} expects a number",
                name
            ))),
        }
    };
    match name {
        // constants read like zero-argument functions
        "PI" => Ok(Value::Float(std::f64::consts::PI)),
        "E" => Ok(Value::Float(std::f64::consts::E)),

        "abs" => match args.first() {
            Some(Value::Int(n)) => Ok(n
                .checked_abs()
                .map(Value::Int)
                .unwrap_or(Value::Float(-(*n as f64)))),
            _ => Ok(Value::Float(x(0)?.abs())),
        },
        "floor" => Ok(Value::Int(x(0)?.floor() as i64)),
        "ceil" => Ok(Value::Int(x(0)?.ceil() as i64)),
        "round" => Ok(Value::Int(x(0)?.round() as i64)),
        "trunc" => Ok(Value::Int(x(0)?.trunc() as i64)),

        "sqrt" => Ok(Value::Float(x(0)?.sqrt())),
        "cbrt" => Ok(Value::Float(x(0)?.cbrt())),
        "pow" => Ok(Value::Float(x(0)?.powf(x(1)?))),
        "exp" => Ok(Value::Float(x(0)?.exp())),
        "log" => Ok(Value::Float(x(0)?.ln())),
        "log2" => Ok(Value::Float(x(0)?.log2())),
        "log10" => Ok(Value::Float(x(0)?.log10())),

        "sin" => Ok(Value::Float(x(0)?.sin())),
        "cos" => Ok(Value::Float(x(0)?.cos())),
        "tan" => Ok(Value::Float(x(0)?.tan())),
        "asin" => Ok(Value::Float(x(0)?.asin())),
        "acos" => Ok(Value::Float(x(0)?.acos())),
        "atan" => Ok(Value::Float(x(0)?.atan())),
        "atan2" => Ok(Value::Float(x(0)?.atan2(x(1)?))),
        "sinh" => Ok(Value::Float(x(0)?.sinh())),
        "cosh" => Ok(Value::Float(x(0)?.cosh())),
        "tanh" => Ok(Value::Float(x(0)?.tanh())),

        "hypot" => Ok(Value::Float(x(0)?.hypot(x(1)?))),
        "degrees" => Ok(Value::Float(x(0)?.to_degrees())),
        "radians" => Ok(Value::Float(x(0)?.to_radians())),
        "min" => Ok(Value::Float(x(0)?.min(x(1)?))),
        "max" => Ok(Value::Float(x(0)?.max(x(1)?))),

        _ => Err(RuntimeError::runtime(format!(
            "no such math function: {}",
            name
        ))),
    }
}
