use chrono::{Datelike, Local, TimeZone, Timelike};

use crate::error::RuntimeError;
use crate::value::Value;

pub fn call(name: &str, args: &[Value]) -> Result<Value, RuntimeError> {
    match name {
        "now" => Ok(Value::Date(Local::now())),
        "get_timestamp" => match args.first() {
            Some(Value::Date(d)) => Ok(Value::Int(d.timestamp_millis())),
            _ => Ok(Value::Int(0)),
        },
        "from_timestamp" => {
            let ms = args.first().unwrap_or(&Value::Null).as_int()?;
            let date = Local
                .timestamp_millis_opt(ms)
                .single()
                .ok_or_else(|| RuntimeError::runtime(format!("Invalid timestamp: {}", ms)))?;
            Ok(Value::Date(date))
        }
        "to_iso_string" => match args.first() {
            Some(Value::Date(d)) => Ok(Value::Str(d.to_rfc3339())),
            _ => Ok(Value::Str(String::new())),
        },
        "format" => {
            let date = match args.first() {
                Some(Value::Date(d)) => *d,
                _ => return Ok(Value::Str(String::new())),
            };
            let fmt = match args.get(1) {
                Some(Value::Str(f)) => f,
                _ => return Err("datetime.format expects a format string".into()),
            };
            // literal placeholder substitution, year unpadded, the rest 2-digit
            let out = fmt
                .replace("YYYY", &date.year().to_string())
                .replace("MM", &format!("{:02}", date.month()))
                .replace("DD", &format!("{:02}", date.day()))
                .replace("hh", &format!("{:02}", date.hour()))
                .replace("mm", &format!("{:02}", date.minute()))
                .replace("ss", &format!("{:02}", date.second()));
            Ok(Value::Str(out))
        }
        _ => Err(RuntimeError::runtime(format!(
            "Unknown datetime function: {}",
            name
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn now_is_a_date_value() {
        let got = call("now", &[]).unwrap();
        assert!(matches!(got, Value::Date(_)));
        assert_eq!(got.kind(), "object");
    }

    #[test]
    fn timestamp_round_trip() {
        let ms = 1_700_000_000_123i64;
        let date = call("from_timestamp", &[Value::Int(ms)]).unwrap();
        assert_eq!(call("get_timestamp", &[date]).unwrap(), Value::Int(ms));
    }

    #[test]
    fn format_substitutes_placeholders() {
        let date = Value::Date(Local.with_ymd_and_hms(2024, 3, 7, 9, 5, 2).unwrap());
        assert_eq!(
            call(
                "format",
                &[date.clone(), Value::Str("YYYY-MM-DD hh:mm:ss".to_string())]
            )
            .unwrap(),
            Value::Str("2024-03-07 09:05:02".to_string())
        );
        assert_eq!(
            call("format", &[date.clone(), Value::Str("DD/MM/YYYY".to_string())]).unwrap(),
            Value::Str("07/03/2024".to_string())
        );
        // unknown letters pass through untouched
        assert_eq!(
            call("format", &[date, Value::Str("QQ YYYY".to_string())]).unwrap(),
            Value::Str("QQ 2024".to_string())
        );
    }

    #[test]
    fn iso_string_is_rfc3339() {
        let date = Value::Date(Local.with_ymd_and_hms(2024, 3, 7, 9, 5, 2).unwrap());
        let got = call("to_iso_string", &[date]).unwrap();
        let s = match got {
            Value::Str(s) => s,
            other => panic!("expected string, got {}", other),
        };
        assert!(s.starts_with("2024-03-07T09:05:02"));
    }

    #[test]
    fn non_dates_get_sentinels() {
        assert_eq!(call("get_timestamp", &[Value::Null]).unwrap(), Value::Int(0));
        assert_eq!(call("get_timestamp", &[]).unwrap(), Value::Int(0));
        assert_eq!(
            call("to_iso_string", &[Value::Int(5)]).unwrap(),
            Value::Str(String::new())
        );
        assert_eq!(
            call("format", &[Value::Null, Value::Str("YYYY".to_string())]).unwrap(),
            Value::Str(String::new())
        );
        assert!(call("from_timestamp", &[Value::Str("x".to_string())]).is_err());
    }

    #[test]
    fn dates_with_same_instant_are_equal() {
        let a = call("from_timestamp", &[Value::Int(1_000)]).unwrap();
        let b = call("from_timestamp", &[Value::Int(1_000)]).unwrap();
        assert!(a.is_equal(&b));
        let c = call("from_timestamp", &[Value::Int(2_000)]).unwrap();
        assert!(!a.is_equal(&c));
    }
}
