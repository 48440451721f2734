use thiserror::Error;

/// Failure raised by a built-in or stdlib function.
///
/// `Runtime` carries I/O, parse and network failures wrapped with the
/// operation that caused them. `Assertion` is only produced by the assert
/// module and is expected to surface to the top level unmodified.
/// Lookup-style misses (absent key, out-of-range index, unset variable)
/// never construct an error; they return sentinel values instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    #[error("{0}")]
    Runtime(String),
    #[error("{0}")]
    Assertion(String),
}

impl RuntimeError {
    pub fn runtime(msg: impl Into<String>) -> Self {
        RuntimeError::Runtime(msg.into())
    }

    pub fn assertion(msg: impl Into<String>) -> Self {
        RuntimeError::Assertion(msg.into())
    }

    pub fn message(&self) -> &str {
        match self {
            RuntimeError::Runtime(m) | RuntimeError::Assertion(m) => m,
        }
    }

    pub fn is_assertion(&self) -> bool {
        matches!(self, RuntimeError::Assertion(_))
    }
}

impl From<String> for RuntimeError {
    fn from(msg: String) -> Self {
        RuntimeError::Runtime(msg)
    }
}

impl From<&str> for RuntimeError {
    fn from(msg: &str) -> Self {
        RuntimeError::Runtime(msg.to_string())
    }
}
