use std::collections::HashMap;
use std::sync::Mutex;

use lazy_static::lazy_static;
use regex::{Regex, RegexBuilder};

use crate::error::RuntimeError;
use crate::value::Value;

lazy_static! {
    // compiled patterns keyed by (pattern, normalized flags)
    static ref PATTERN_CACHE: Mutex<HashMap<(String, String), Regex>> =
        Mutex::new(HashMap::new());
}

pub fn call(name: &str, args: &[Value]) -> Result<Value, RuntimeError> {
    match name {
        "is_match" => {
            let (pattern, text) = pattern_text(args, name)?;
            let re = compile(pattern, &flags_arg(args, 2))?;
            Ok(Value::Bool(re.is_match(text)))
        }
        "find_matches" => {
            let (pattern, text) = pattern_text(args, name)?;
            let re = compile(pattern, &flags_arg(args, 2))?;
            let found: Vec<Value> = re
                .find_iter(text)
                .map(|m| Value::Str(m.as_str().to_string()))
                .collect();
            // zero matches is null, not an empty array
            if found.is_empty() {
                Ok(Value::Null)
            } else {
                Ok(Value::array(found))
            }
        }
        "extract" => {
            let (pattern, text) = pattern_text(args, name)?;
            let re = compile(pattern, &flags_arg(args, 2))?;
            match re.captures(text) {
                None => Ok(Value::Null),
                Some(caps) => Ok(Value::array(
                    caps.iter()
                        .map(|group| match group {
                            Some(m) => Value::Str(m.as_str().to_string()),
                            None => Value::Null,
                        })
                        .collect(),
                )),
            }
        }
        "replace_all" => {
            // argument order is text, pattern, replacement
            let (text, pattern, replacement) = match (args.first(), args.get(1), args.get(2)) {
                (Some(Value::Str(t)), Some(Value::Str(p)), Some(Value::Str(r))) => (t, p, r),
                _ => {
                    return Err(
                        "regex.replace_all expects text, pattern and replacement strings".into(),
                    );
                }
            };
            let re = compile(pattern, &flags_arg(args, 3))?;
            Ok(Value::Str(
                re.replace_all(text, replacement.as_str()).into_owned(),
            ))
        }
        _ => Err(RuntimeError::runtime(format!(
            "Unknown regex function: {}",
            name
        ))),
    }
}

fn pattern_text<'a>(args: &'a [Value], func: &str) -> Result<(&'a str, &'a str), RuntimeError> {
    match (args.first(), args.get(1)) {
        (Some(Value::Str(pattern)), Some(Value::Str(text))) => Ok((pattern, text)),
        _ => Err(RuntimeError::runtime(format!(
            "regex.{} expects pattern and text strings",
            func
        ))),
    }
}

fn flags_arg(args: &[Value], i: usize) -> String {
    match args.get(i) {
        Some(Value::Str(flags)) => flags.clone(),
        _ => String::new(),
    }
}

/// Compile through the process-wide cache. Only `i`, `m` and `s` select
/// anything; `g` and unknown letters are accepted and ignored since
/// find-all vs find-first is fixed per function here.
fn compile(pattern: &str, flags: &str) -> Result<Regex, RuntimeError> {
    let mut norm: Vec<char> = flags
        .chars()
        .filter(|c| matches!(c, 'i' | 'm' | 's'))
        .collect();
    norm.sort_unstable();
    norm.dedup();
    let key = (pattern.to_string(), norm.into_iter().collect::<String>());

    if let Ok(cache) = PATTERN_CACHE.lock() {
        if let Some(re) = cache.get(&key) {
            return Ok(re.clone());
        }
    }
    let re = RegexBuilder::new(pattern)
        .case_insensitive(key.1.contains('i'))
        .multi_line(key.1.contains('m'))
        .dot_matches_new_line(key.1.contains('s'))
        .build()
        .map_err(|e| {
            RuntimeError::runtime(format!("Invalid regex pattern '{}': {}", pattern, e))
        })?;
    if let Ok(mut cache) = PATTERN_CACHE.lock() {
        cache.insert(key, re.clone());
    }
    Ok(re)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(text: &str) -> Value {
        Value::Str(text.to_string())
    }

    #[test]
    fn is_match_with_flags() {
        assert_eq!(
            call("is_match", &[s("^ab+c$"), s("abbbc")]).unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            call("is_match", &[s("^abc$"), s("ABC")]).unwrap(),
            Value::Bool(false)
        );
        assert_eq!(
            call("is_match", &[s("^abc$"), s("ABC"), s("i")]).unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            call("is_match", &[s("^b"), s("a\nb"), s("m")]).unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            call("is_match", &[s("a.b"), s("a\nb"), s("s")]).unwrap(),
            Value::Bool(true)
        );
    }

    #[test]
    fn g_flag_is_accepted_but_selects_nothing() {
        assert_eq!(
            call("find_matches", &[s(r"\d+"), s("a1 b22"), s("g")]).unwrap(),
            Value::array(vec![s("1"), s("22")])
        );
    }

    #[test]
    fn find_matches_returns_null_on_zero_matches() {
        assert_eq!(
            call("find_matches", &[s(r"\d+"), s("letters only")]).unwrap(),
            Value::Null
        );
    }

    #[test]
    fn find_matches_keeps_whole_matches_despite_groups() {
        assert_eq!(
            call("find_matches", &[s(r"a(b)"), s("ab ab")]).unwrap(),
            Value::array(vec![s("ab"), s("ab")])
        );
    }

    #[test]
    fn extract_returns_full_match_then_groups() {
        assert_eq!(
            call("extract", &[s(r"(\d+)-(\d+)"), s("range 10-20 end")]).unwrap(),
            Value::array(vec![s("10-20"), s("10"), s("20")])
        );
        assert_eq!(
            call("extract", &[s(r"(\d+)"), s("none here")]).unwrap(),
            Value::Null
        );
        // unmatched optional groups come back as null
        assert_eq!(
            call("extract", &[s(r"(a)|(b)"), s("b")]).unwrap(),
            Value::array(vec![s("b"), Value::Null, s("b")])
        );
    }

    #[test]
    fn replace_all_takes_text_first_and_expands_groups() {
        assert_eq!(
            call(
                "replace_all",
                &[s("john smith"), s(r"(\w+)\s(\w+)"), s("$2 $1")]
            )
            .unwrap(),
            s("smith john")
        );
        assert_eq!(
            call("replace_all", &[s("a-b-c"), s("-"), s("+")]).unwrap(),
            s("a+b+c")
        );
    }

    #[test]
    fn invalid_patterns_are_wrapped_errors() {
        let err = call("is_match", &[s("(unclosed"), s("x")]).unwrap_err();
        assert!(err.to_string().starts_with("Invalid regex pattern '(unclosed':"));
    }

    #[test]
    fn cache_serves_repeat_compiles() {
        for _ in 0..3 {
            assert_eq!(
                call("is_match", &[s(r"^cache\d$"), s("cache1"), s("gi")]).unwrap(),
                Value::Bool(true)
            );
        }
    }

    #[test]
    fn missing_arguments_are_named_errors() {
        let err = call("is_match", &[s("x")]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "regex.is_match expects pattern and text strings"
        );
    }
}
