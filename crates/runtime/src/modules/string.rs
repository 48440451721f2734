//! String functions. Every position, width and index counts chars, not
//! bytes, so hosts agree on results regardless of encoding.

use crate::builtins::resolve_slice;
use crate::error::RuntimeError;
use crate::value::Value;

pub fn call(name: &str, args: &[Value]) -> Result<Value, RuntimeError> {
    match name {
        "to_upper" => Ok(Value::Str(str_arg(args, 0, name)?.to_uppercase())),
        "to_lower" => Ok(Value::Str(str_arg(args, 0, name)?.to_lowercase())),
        "to_title_case" => {
            let lowered = str_arg(args, 0, name)?.to_lowercase();
            let words: Vec<String> = lowered.split(' ').map(capitalize_word).collect();
            Ok(Value::Str(words.join(" ")))
        }
        "capitalize" => Ok(Value::Str(capitalize_word(str_arg(args, 0, name)?))),

        "trim" => Ok(Value::Str(str_arg(args, 0, name)?.trim().to_string())),
        "trim_start" => Ok(Value::Str(str_arg(args, 0, name)?.trim_start().to_string())),
        "trim_end" => Ok(Value::Str(str_arg(args, 0, name)?.trim_end().to_string())),

        "pad_start" | "pad_end" => {
            let s = str_arg(args, 0, name)?;
            let width = args.get(1).unwrap_or(&Value::Null).as_int()?.max(0) as usize;
            // only the first char of the pad string is used
            let pad = match args.get(2) {
                Some(Value::Str(p)) => p.chars().next().unwrap_or(' '),
                _ => ' ',
            };
            let len = s.chars().count();
            if len >= width {
                return Ok(Value::Str(s.to_string()));
            }
            let fill = pad.to_string().repeat(width - len);
            Ok(Value::Str(if name == "pad_start" {
                format!("{}{}", fill, s)
            } else {
                format!("{}{}", s, fill)
            }))
        }

        "contains" => {
            let s = str_arg(args, 0, name)?;
            let sub = str_arg(args, 1, name)?;
            let pos = opt_int(args, 2)?.unwrap_or(0);
            Ok(Value::Bool(char_slice(s, pos, None).contains(sub)))
        }
        "starts_with" => {
            let s = str_arg(args, 0, name)?;
            let sub = str_arg(args, 1, name)?;
            let pos = opt_int(args, 2)?.unwrap_or(0);
            Ok(Value::Bool(char_slice(s, pos, None).starts_with(sub)))
        }
        "ends_with" => {
            let s = str_arg(args, 0, name)?;
            let sub = str_arg(args, 1, name)?;
            let end = opt_int(args, 2)?;
            Ok(Value::Bool(char_slice(s, 0, end).ends_with(sub)))
        }
        "index_of" => {
            let s = str_arg(args, 0, name)?;
            let sub = str_arg(args, 1, name)?;
            let chars: Vec<char> = s.chars().collect();
            let (start, _) = resolve_slice(chars.len(), opt_int(args, 2)?.unwrap_or(0), None);
            match find_char_index(&chars, sub, start) {
                Some(i) => Ok(Value::Int(i as i64)),
                None => Ok(Value::Int(-1)),
            }
        }
        "last_index_of" => {
            let s = str_arg(args, 0, name)?;
            let sub = str_arg(args, 1, name)?;
            let chars: Vec<char> = s.chars().collect();
            // the match must lie fully within [0, from]
            let end = match opt_int(args, 2)? {
                Some(from) => resolve_slice(chars.len(), 0, Some(from.saturating_add(1))).1,
                None => chars.len(),
            };
            match rfind_char_index(&chars, sub, end) {
                Some(i) => Ok(Value::Int(i as i64)),
                None => Ok(Value::Int(-1)),
            }
        }

        "substring" | "slice" => {
            let s = str_arg(args, 0, name)?;
            let start = opt_int(args, 1)?.unwrap_or(0);
            let end = opt_int(args, 2)?;
            Ok(Value::Str(char_slice(s, start, end)))
        }
        "split" => {
            let s = str_arg(args, 0, name)?;
            let limit = opt_int(args, 2)?;
            match args.get(1) {
                None | Some(Value::Null) => {
                    let parts = whitespace_split(s, limit);
                    Ok(Value::array(parts.into_iter().map(Value::Str).collect()))
                }
                Some(Value::Str(sep)) => {
                    if sep.is_empty() {
                        return Err("string.split: empty separator".into());
                    }
                    let parts: Vec<String> = match limit {
                        Some(n) if n >= 0 => s
                            .splitn((n as usize).saturating_add(1), sep.as_str())
                            .map(str::to_string)
                            .collect(),
                        _ => s.split(sep.as_str()).map(str::to_string).collect(),
                    };
                    Ok(Value::array(parts.into_iter().map(Value::Str).collect()))
                }
                Some(_) => Err("string.split expects a string separator".into()),
            }
        }

        "replace" => {
            let s = str_arg(args, 0, name)?;
            let find = str_arg(args, 1, name)?;
            let rep = str_arg(args, 2, name)?;
            Ok(Value::Str(s.replacen(find, rep, 1)))
        }
        "replace_all" => {
            let s = str_arg(args, 0, name)?;
            let find = str_arg(args, 1, name)?;
            let rep = str_arg(args, 2, name)?;
            Ok(Value::Str(s.replace(find, rep)))
        }
        "repeat" => {
            let s = str_arg(args, 0, name)?;
            let n = args.get(1).unwrap_or(&Value::Null).as_int()?.max(0) as usize;
            Ok(Value::Str(s.repeat(n)))
        }
        "char_at" => {
            let s = str_arg(args, 0, name)?;
            let i = args.get(1).unwrap_or(&Value::Null).as_int()?;
            let c = if i >= 0 { s.chars().nth(i as usize) } else { None };
            Ok(Value::Str(c.map(String::from).unwrap_or_default()))
        }

        "is_empty" => Ok(Value::Bool(str_arg(args, 0, name)?.is_empty())),
        "is_blank" => Ok(Value::Bool(str_arg(args, 0, name)?.trim().is_empty())),

        _ => Err(RuntimeError::runtime(format!(
            "Unknown string function: {}",
            name
        ))),
    }
}

fn str_arg<'a>(args: &'a [Value], i: usize, func: &str) -> Result<&'a str, RuntimeError> {
    match args.get(i) {
        Some(Value::Str(s)) => Ok(s),
        _ => Err(RuntimeError::runtime(format!(
            "string.{} expects a string argument",
            func
        ))),
    }
}

fn opt_int(args: &[Value], i: usize) -> Result<Option<i64>, RuntimeError> {
    match args.get(i) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => Ok(Some(v.as_int()?)),
    }
}

fn char_slice(s: &str, start: i64, end: Option<i64>) -> String {
    let chars: Vec<char> = s.chars().collect();
    let (lo, hi) = resolve_slice(chars.len(), start, end);
    chars[lo..hi].iter().collect()
}

fn capitalize_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn find_char_index(hay: &[char], needle: &str, start: usize) -> Option<usize> {
    let needle: Vec<char> = needle.chars().collect();
    if needle.is_empty() {
        return Some(start);
    }
    if hay.len() < needle.len() {
        return None;
    }
    (start..=hay.len() - needle.len()).find(|&i| hay[i..i + needle.len()] == needle[..])
}

// `end` is the exclusive bound the whole match must fit under
fn rfind_char_index(hay: &[char], needle: &str, end: usize) -> Option<usize> {
    let needle: Vec<char> = needle.chars().collect();
    if needle.is_empty() {
        return Some(end);
    }
    if end < needle.len() {
        return None;
    }
    (0..=end - needle.len())
        .rev()
        .find(|&i| hay[i..i + needle.len()] == needle[..])
}

// Split on runs of whitespace, dropping empty pieces; with a limit the
// remainder keeps its inner spacing.
fn whitespace_split(s: &str, limit: Option<i64>) -> Vec<String> {
    let max = limit.and_then(|n| if n >= 0 { Some(n as usize) } else { None });
    let mut parts = Vec::new();
    let mut rest = s.trim_start();
    while !rest.is_empty() {
        if let Some(m) = max {
            if parts.len() == m {
                parts.push(rest.to_string());
                return parts;
            }
        }
        match rest.find(char::is_whitespace) {
            Some(i) => {
                parts.push(rest[..i].to_string());
                rest = rest[i..].trim_start();
            }
            None => {
                parts.push(rest.to_string());
                rest = "";
            }
        }
    }
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(text: &str) -> Value {
        Value::Str(text.to_string())
    }

    fn strings(items: &[&str]) -> Value {
        Value::array(items.iter().map(|p| s(p)).collect())
    }

    #[test]
    fn case_functions() {
        assert_eq!(call("to_upper", &[s("héllo")]).unwrap(), s("HÉLLO"));
        assert_eq!(call("to_lower", &[s("MiXeD")]).unwrap(), s("mixed"));
        assert_eq!(
            call("to_title_case", &[s("wORLD wide web")]).unwrap(),
            s("World Wide Web")
        );
        assert_eq!(call("capitalize", &[s("hELLo")]).unwrap(), s("HELLo"));
        assert_eq!(call("capitalize", &[s("")]).unwrap(), s(""));
    }

    #[test]
    fn trim_family() {
        assert_eq!(call("trim", &[s("  x \t")]).unwrap(), s("x"));
        assert_eq!(call("trim_start", &[s("  x ")]).unwrap(), s("x "));
        assert_eq!(call("trim_end", &[s("  x ")]).unwrap(), s("  x"));
    }

    #[test]
    fn padding_counts_chars() {
        assert_eq!(call("pad_start", &[s("7"), Value::Int(3)]).unwrap(), s("  7"));
        assert_eq!(
            call("pad_start", &[s("7"), Value::Int(3), s("0")]).unwrap(),
            s("007")
        );
        assert_eq!(
            call("pad_end", &[s("ab"), Value::Int(4), s("xy")]).unwrap(),
            s("abxx")
        );
        assert_eq!(
            call("pad_start", &[s("é"), Value::Int(3), s("é")]).unwrap(),
            s("ééé")
        );
        assert_eq!(
            call("pad_start", &[s("wide"), Value::Int(2)]).unwrap(),
            s("wide")
        );
    }

    #[test]
    fn searching_with_positions() {
        assert_eq!(
            call("contains", &[s("banana"), s("ana")]).unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            call("contains", &[s("banana"), s("ban"), Value::Int(1)]).unwrap(),
            Value::Bool(false)
        );
        assert_eq!(
            call("starts_with", &[s("banana"), s("nan"), Value::Int(2)]).unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            call("ends_with", &[s("banana"), s("ban"), Value::Int(3)]).unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            call("ends_with", &[s("banana"), s("na")]).unwrap(),
            Value::Bool(true)
        );
    }

    #[test]
    fn index_of_counts_chars_not_bytes() {
        assert_eq!(
            call("index_of", &[s("héllo héllo"), s("llo")]).unwrap(),
            Value::Int(2)
        );
        assert_eq!(
            call("index_of", &[s("héllo héllo"), s("llo"), Value::Int(3)]).unwrap(),
            Value::Int(8)
        );
        assert_eq!(
            call("index_of", &[s("abc"), s("z")]).unwrap(),
            Value::Int(-1)
        );
        assert_eq!(call("index_of", &[s("abc"), s("")]).unwrap(), Value::Int(0));
    }

    #[test]
    fn last_index_of_bounds_the_match() {
        assert_eq!(
            call("last_index_of", &[s("abcabc"), s("bc")]).unwrap(),
            Value::Int(4)
        );
        assert_eq!(
            call("last_index_of", &[s("abcabc"), s("bc"), Value::Int(3)]).unwrap(),
            Value::Int(1)
        );
        assert_eq!(
            call("last_index_of", &[s("abcabc"), s("z")]).unwrap(),
            Value::Int(-1)
        );
        assert_eq!(
            call("last_index_of", &[s("abc"), s("abc"), Value::Int(1)]).unwrap(),
            Value::Int(-1)
        );
    }

    #[test]
    fn slicing_is_python_style() {
        assert_eq!(
            call("substring", &[s("hello"), Value::Int(1), Value::Int(3)]).unwrap(),
            s("el")
        );
        assert_eq!(call("slice", &[s("hello"), Value::Int(-3)]).unwrap(), s("llo"));
        assert_eq!(
            call("slice", &[s("hello"), Value::Int(0), Value::Int(-1)]).unwrap(),
            s("hell")
        );
        assert_eq!(
            call("slice", &[s("héllo"), Value::Int(1), Value::Int(2)]).unwrap(),
            s("é")
        );
    }

    #[test]
    fn split_with_separator_and_limit() {
        assert_eq!(
            call("split", &[s("a,b,,c"), s(",")]).unwrap(),
            strings(&["a", "b", "", "c"])
        );
        assert_eq!(
            call("split", &[s("a,b,c"), s(","), Value::Int(1)]).unwrap(),
            strings(&["a", "b,c"])
        );
        assert_eq!(call("split", &[s(""), s(",")]).unwrap(), strings(&[""]));
        assert!(call("split", &[s("abc"), s("")]).is_err());
    }

    #[test]
    fn split_on_whitespace_drops_empties() {
        assert_eq!(
            call("split", &[s("  a \t b  c  ")]).unwrap(),
            strings(&["a", "b", "c"])
        );
        assert_eq!(
            call("split", &[s("  a  b  c  "), Value::Null, Value::Int(1)]).unwrap(),
            strings(&["a", "b  c  "])
        );
        assert_eq!(call("split", &[s("   ")]).unwrap(), strings(&[]));
    }

    #[test]
    fn replace_first_vs_all() {
        assert_eq!(
            call("replace", &[s("a-b-c"), s("-"), s("+")]).unwrap(),
            s("a+b-c")
        );
        assert_eq!(
            call("replace_all", &[s("a-b-c"), s("-"), s("+")]).unwrap(),
            s("a+b+c")
        );
        assert_eq!(
            call("replace", &[s("abc"), s("z"), s("+")]).unwrap(),
            s("abc")
        );
    }

    #[test]
    fn repeat_and_char_at() {
        assert_eq!(call("repeat", &[s("ab"), Value::Int(3)]).unwrap(), s("ababab"));
        assert_eq!(call("repeat", &[s("ab"), Value::Int(0)]).unwrap(), s(""));
        assert_eq!(call("repeat", &[s("ab"), Value::Int(-2)]).unwrap(), s(""));
        assert_eq!(call("char_at", &[s("héllo"), Value::Int(1)]).unwrap(), s("é"));
        assert_eq!(call("char_at", &[s("abc"), Value::Int(9)]).unwrap(), s(""));
        assert_eq!(call("char_at", &[s("abc"), Value::Int(-1)]).unwrap(), s(""));
    }

    #[test]
    fn emptiness_checks() {
        assert_eq!(call("is_empty", &[s("")]).unwrap(), Value::Bool(true));
        assert_eq!(call("is_empty", &[s(" ")]).unwrap(), Value::Bool(false));
        assert_eq!(call("is_blank", &[s(" \t\n")]).unwrap(), Value::Bool(true));
        assert_eq!(call("is_blank", &[s(" x ")]).unwrap(), Value::Bool(false));
    }

    #[test]
    fn wrong_argument_kinds_are_named_errors() {
        let err = call("to_upper", &[Value::Int(5)]).unwrap_err();
        assert_eq!(err.to_string(), "string.to_upper expects a string argument");
        let err = call("contains", &[s("abc")]).unwrap_err();
        assert_eq!(err.to_string(), "string.contains expects a string argument");
        let err = call("mangle", &[s("abc")]).unwrap_err();
        assert_eq!(err.to_string(), "Unknown string function: mangle");
    }
}
