//! Mimo Runtime - value model, built-in dispatcher and standard library.
//! Hosts embed a [`Runtime`], hand it values and call built-ins by name.

pub mod builtins;
pub mod error;
pub mod modules;
pub mod runtime;
pub mod value;

pub use error::RuntimeError;
pub use runtime::Runtime;
pub use value::{FuncValue, Value};
