//! Stdlib modules, one file per dotted namespace. Every module exposes
//! `call(name, args)` and the dispatcher routes `module.function` to it.

pub mod array;
pub mod assert;
pub mod datetime;
pub mod env;
pub mod fs;
pub mod http;
pub mod json;
pub mod math;
pub mod object;
pub mod path;
pub mod regex;
pub mod string;
