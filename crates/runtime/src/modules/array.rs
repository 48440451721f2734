//! Array functions. Callbacks are host function values; the input array is
//! snapshotted before iteration so a callback may mutate the array it came
//! from without tripping a borrow.

use std::cmp::Ordering;
use std::slice::from_ref;

use indexmap::IndexMap;
use rand::seq::SliceRandom;

use crate::builtins::resolve_slice;
use crate::error::RuntimeError;
use crate::value::{FuncValue, Value};

pub fn call(name: &str, args: &[Value]) -> Result<Value, RuntimeError> {
    match name {
        "map" => {
            let items = items_arg(args, 0, name)?;
            let cb = fn_arg(args, 1, name)?;
            let mut out = Vec::with_capacity(items.len());
            for item in &items {
                out.push(cb.call(from_ref(item))?);
            }
            Ok(Value::array(out))
        }
        "filter" => {
            let items = items_arg(args, 0, name)?;
            let cb = fn_arg(args, 1, name)?;
            let mut out = Vec::new();
            for item in &items {
                if cb.call(from_ref(item))?.is_truthy() {
                    out.push(item.clone());
                }
            }
            Ok(Value::array(out))
        }
        "reduce" => {
            let items = items_arg(args, 0, name)?;
            let cb = fn_arg(args, 1, name)?;
            // no initial value: seed from the first element, fold the rest
            let (mut acc, skip) = match args.get(2) {
                Some(initial) if !matches!(initial, Value::Null) => (initial.clone(), 0),
                _ => match items.first() {
                    Some(first) => (first.clone(), 1),
                    None => return Ok(Value::Null),
                },
            };
            for item in &items[skip..] {
                acc = cb.call(&[acc, item.clone()])?;
            }
            Ok(acc)
        }
        "flat" => {
            let items = items_arg(args, 0, name)?;
            let depth = opt_int(args, 1)?.unwrap_or(1);
            let mut out = Vec::new();
            flatten(&items, depth, &mut out);
            Ok(Value::array(out))
        }
        "flat_map" => {
            let items = items_arg(args, 0, name)?;
            let cb = fn_arg(args, 1, name)?;
            let mut out = Vec::new();
            for item in &items {
                match cb.call(from_ref(item))? {
                    Value::Array(inner) => out.extend(inner.borrow().iter().cloned()),
                    other => out.push(other),
                }
            }
            Ok(Value::array(out))
        }
        "group_by" => {
            let items = items_arg(args, 0, name)?;
            let cb = fn_arg(args, 1, name)?;
            let mut groups: IndexMap<String, Vec<Value>> = IndexMap::new();
            for item in &items {
                let key = cb.call(from_ref(item))?.to_string();
                groups.entry(key).or_default().push(item.clone());
            }
            let mut out = IndexMap::new();
            for (key, members) in groups {
                out.insert(key, Value::array(members));
            }
            Ok(Value::object(out))
        }
        "zip" => {
            let mut arrays = Vec::with_capacity(args.len());
            for arg in args {
                match arg {
                    Value::Array(items) => arrays.push(items.borrow().clone()),
                    _ => return Err("array.zip expects arrays".into()),
                }
            }
            let len = arrays.iter().map(Vec::len).min().unwrap_or(0);
            let mut out = Vec::with_capacity(len);
            for i in 0..len {
                out.push(Value::array(arrays.iter().map(|a| a[i].clone()).collect()));
            }
            Ok(Value::array(out))
        }
        "chunk" => {
            let items = items_arg(args, 0, name)?;
            let size = args.get(1).unwrap_or(&Value::Null).as_int()?;
            if size <= 0 {
                return Err("array.chunk expects a positive size".into());
            }
            Ok(Value::array(
                items
                    .chunks(size as usize)
                    .map(|c| Value::array(c.to_vec()))
                    .collect(),
            ))
        }
        "count" => {
            let items = items_arg(args, 0, name)?;
            match args.get(1) {
                None | Some(Value::Null) => Ok(Value::Int(items.len() as i64)),
                Some(Value::Function(cb)) => {
                    let mut n = 0;
                    for item in &items {
                        if cb.call(from_ref(item))?.is_truthy() {
                            n += 1;
                        }
                    }
                    Ok(Value::Int(n))
                }
                Some(_) => Err("array.count expects a function".into()),
            }
        }
        "for_each" => {
            let items = items_arg(args, 0, name)?;
            let cb = fn_arg(args, 1, name)?;
            for item in &items {
                cb.call(from_ref(item))?;
            }
            Ok(Value::Null)
        }
        "find" => {
            let items = items_arg(args, 0, name)?;
            let cb = fn_arg(args, 1, name)?;
            for item in &items {
                if cb.call(from_ref(item))?.is_truthy() {
                    return Ok(item.clone());
                }
            }
            Ok(Value::Null)
        }
        "find_index" => {
            let items = items_arg(args, 0, name)?;
            let cb = fn_arg(args, 1, name)?;
            for (i, item) in items.iter().enumerate() {
                if cb.call(from_ref(item))?.is_truthy() {
                    return Ok(Value::Int(i as i64));
                }
            }
            Ok(Value::Int(-1))
        }
        "includes" => {
            let items = items_arg(args, 0, name)?;
            let needle = args.get(1).cloned().unwrap_or(Value::Null);
            Ok(Value::Bool(contains_eq(&items, &needle)))
        }
        "index_of" => {
            let items = items_arg(args, 0, name)?;
            let needle = args.get(1).cloned().unwrap_or(Value::Null);
            let (start, _) = resolve_slice(items.len(), opt_int(args, 2)?.unwrap_or(0), None);
            let found = items[start..]
                .iter()
                .position(|v| v.is_equal(&needle))
                .map(|i| (start + i) as i64);
            Ok(Value::Int(found.unwrap_or(-1)))
        }
        "last_index_of" => {
            let items = items_arg(args, 0, name)?;
            let needle = args.get(1).cloned().unwrap_or(Value::Null);
            let end = match opt_int(args, 2)? {
                Some(from) => resolve_slice(items.len(), 0, Some(from.saturating_add(1))).1,
                None => items.len(),
            };
            let found = items[..end].iter().rposition(|v| v.is_equal(&needle));
            Ok(Value::Int(found.map(|i| i as i64).unwrap_or(-1)))
        }
        "slice" => {
            let items = items_arg(args, 0, name)?;
            let start = opt_int(args, 1)?.unwrap_or(0);
            let end = opt_int(args, 2)?;
            let (lo, hi) = resolve_slice(items.len(), start, end);
            Ok(Value::array(items[lo..hi].to_vec()))
        }
        "first" => Ok(items_arg(args, 0, name)?.first().cloned().unwrap_or(Value::Null)),
        "last" => Ok(items_arg(args, 0, name)?.last().cloned().unwrap_or(Value::Null)),
        "is_empty" => Ok(Value::Bool(items_arg(args, 0, name)?.is_empty())),
        "sort" => {
            let mut items = items_arg(args, 0, name)?;
            match args.get(1) {
                Some(Value::Function(cmp)) => {
                    // comparator returns a number, negative puts a first
                    let mut failed = None;
                    items.sort_by(|a, b| {
                        if failed.is_some() {
                            return Ordering::Equal;
                        }
                        match cmp.call(&[a.clone(), b.clone()]) {
                            Ok(Value::Int(n)) => n.cmp(&0),
                            Ok(Value::Float(f)) => {
                                f.partial_cmp(&0.0).unwrap_or(Ordering::Equal)
                            }
                            Ok(_) => Ordering::Equal,
                            Err(e) => {
                                failed = Some(e);
                                Ordering::Equal
                            }
                        }
                    });
                    match failed {
                        Some(e) => Err(e),
                        None => Ok(Value::array(items)),
                    }
                }
                _ => {
                    items.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
                    Ok(Value::array(items))
                }
            }
        }
        "reverse" => {
            let mut items = items_arg(args, 0, name)?;
            items.reverse();
            Ok(Value::array(items))
        }
        "shuffle" => {
            let mut items = items_arg(args, 0, name)?;
            items.shuffle(&mut rand::thread_rng());
            Ok(Value::array(items))
        }
        "concat" => {
            let mut out = Vec::new();
            for arg in args {
                match arg {
                    Value::Array(items) => out.extend(items.borrow().iter().cloned()),
                    _ => return Err("array.concat expects arrays".into()),
                }
            }
            Ok(Value::array(out))
        }
        "unique" => {
            let items = items_arg(args, 0, name)?;
            let mut out: Vec<Value> = Vec::new();
            for item in &items {
                if !contains_eq(&out, item) {
                    out.push(item.clone());
                }
            }
            Ok(Value::array(out))
        }
        "intersection" => {
            let a = items_arg(args, 0, name)?;
            let b = items_arg(args, 1, name)?;
            Ok(Value::array(
                a.iter().filter(|v| contains_eq(&b, v)).cloned().collect(),
            ))
        }
        "union" => {
            let mut out = items_arg(args, 0, name)?;
            let b = items_arg(args, 1, name)?;
            for item in &b {
                if !contains_eq(&out, item) {
                    out.push(item.clone());
                }
            }
            Ok(Value::array(out))
        }
        "difference" => {
            let a = items_arg(args, 0, name)?;
            let b = items_arg(args, 1, name)?;
            Ok(Value::array(
                a.iter().filter(|v| !contains_eq(&b, v)).cloned().collect(),
            ))
        }
        _ => Err(RuntimeError::runtime(format!(
            "Unknown array function: {}",
            name
        ))),
    }
}

fn items_arg(args: &[Value], i: usize, func: &str) -> Result<Vec<Value>, RuntimeError> {
    match args.get(i) {
        Some(Value::Array(items)) => Ok(items.borrow().clone()),
        _ => Err(RuntimeError::runtime(format!(
            "array.{} expects an array",
            func
        ))),
    }
}

fn fn_arg<'a>(args: &'a [Value], i: usize, func: &str) -> Result<&'a FuncValue, RuntimeError> {
    match args.get(i) {
        Some(Value::Function(f)) => Ok(f),
        _ => Err(RuntimeError::runtime(format!(
            "array.{} expects a function",
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

fn contains_eq(items: &[Value], needle: &Value) -> bool {
    items.iter().any(|v| v.is_equal(needle))
}

fn flatten(items: &[Value], depth: i64, out: &mut Vec<Value>) {
    for item in items {
        match item {
            Value::Array(inner) if depth > 0 => flatten(&inner.borrow(), depth - 1, out),
            _ => out.push(item.clone()),
        }
    }
}
