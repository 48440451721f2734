use crate::builtins;
use crate::error::RuntimeError;
use crate::value::Value;

/// The runtime registry. Hosts construct one explicitly at startup and
/// thread it through every call; there is no global instance. Single
/// threaded by design: values are not Send and built-ins run to completion
/// on the caller's thread.
pub struct Runtime {
    /// Program arguments visible to `get_arguments` (binary name stripped).
    args: Vec<String>,
    /// Everything `show` has printed, one entry per call. Tests read this
    /// instead of capturing stdout.
    pub output: Vec<String>,
}

impl Runtime {
    pub fn new() -> Self {
        Runtime::with_args(std::env::args().skip(1).collect())
    }

    pub fn with_args(args: Vec<String>) -> Self {
        Runtime {
            args,
            output: Vec::new(),
        }
    }

    /// Resolve `name` (a bare built-in or a dotted `module.function`) and
    /// invoke it. Unknown names are an error, not a silent null.
    pub fn call(&mut self, name: &str, args: &[Value]) -> Result<Value, RuntimeError> {
        builtins::call_builtin(name, args, self)
    }

    pub fn arguments(&self) -> &[String] {
        &self.args
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Runtime::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_args_feeds_get_arguments() {
        let mut rt = Runtime::with_args(vec!["in.txt".to_string(), "out.txt".to_string()]);
        let got = rt.call("get_arguments", &[]).unwrap();
        assert_eq!(
            got,
            Value::array(vec![
                Value::Str("in.txt".to_string()),
                Value::Str("out.txt".to_string()),
            ])
        );
    }

    #[test]
    fn show_appends_to_output() {
        let mut rt = Runtime::with_args(vec![]);
        rt.call("show", &[Value::Int(1), Value::Str("two".to_string())])
            .unwrap();
        assert_eq!(rt.output, vec!["1 two".to_string()]);
    }

    #[test]
    fn unknown_name_is_an_error() {
        let mut rt = Runtime::with_args(vec![]);
        let err = rt.call("no_such_builtin", &[]).unwrap_err();
        assert!(err.to_string().contains("no_such_builtin"));
    }
}
