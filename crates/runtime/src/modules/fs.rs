use std::fs;
use std::path::Path;

use crate::error::RuntimeError;
use crate::value::Value;

pub fn call(name: &str, args: &[Value]) -> Result<Value, RuntimeError> {
    match name {
        "read_file" => {
            let path = path_arg(args, "fs.read_file")?;
            log::debug!("fs.read_file {}", path);
            let content = fs::read_to_string(path)
                .map_err(|e| RuntimeError::runtime(format!("Failed to read file {}: {}", path, e)))?;
            Ok(Value::Str(content))
        }
        "write_file" => {
            let path = path_arg(args, "fs.write_file")?;
            let data = match args.get(1) {
                Some(Value::Str(data)) => data,
                _ => return Err("fs.write_file expects string data".into()),
            };
            log::debug!("fs.write_file {} ({} bytes)", path, data.len());
            fs::write(path, data)
                .map_err(|e| RuntimeError::runtime(format!("Failed to write file {}: {}", path, e)))?;
            Ok(Value::Null)
        }
        "exists" => match args.first() {
            Some(Value::Str(path)) => Ok(Value::Bool(Path::new(path).exists())),
            _ => Ok(Value::Bool(false)),
        },
        "list_dir" => {
            let path = path_arg(args, "fs.list_dir")?;
            let entries = fs::read_dir(path).map_err(|e| {
                RuntimeError::runtime(format!("Failed to list directory {}: {}", path, e))
            })?;
            let mut names = Vec::new();
            for entry in entries {
                let entry = entry.map_err(|e| {
                    RuntimeError::runtime(format!("Failed to list directory {}: {}", path, e))
                })?;
                names.push(Value::Str(entry.file_name().to_string_lossy().into_owned()));
            }
            Ok(Value::array(names))
        }
        "make_dir" => {
            let path = path_arg(args, "fs.make_dir")?;
            let recursive = args.get(1).map(|v| v.is_truthy()).unwrap_or(false);
            let result = if recursive {
                fs::create_dir_all(path)
            } else {
                match fs::create_dir(path) {
                    // an existing directory is fine, an existing file is not
                    Err(e)
                        if e.kind() == std::io::ErrorKind::AlreadyExists
                            && Path::new(path).is_dir() =>
                    {
                        Ok(())
                    }
                    other => other,
                }
            };
            result.map_err(|e| {
                RuntimeError::runtime(format!("Failed to create directory {}: {}", path, e))
            })?;
            Ok(Value::Null)
        }
        "remove_file" => {
            let path = path_arg(args, "fs.remove_file")?;
            fs::remove_file(path).map_err(|e| {
                RuntimeError::runtime(format!("Failed to remove file {}: {}", path, e))
            })?;
            Ok(Value::Null)
        }
        "remove_dir" => {
            let path = path_arg(args, "fs.remove_dir")?;
            fs::remove_dir(path).map_err(|e| {
                RuntimeError::runtime(format!("Failed to remove directory {}: {}", path, e))
            })?;
            Ok(Value::Null)
        }
        _ => Err(RuntimeError::runtime(format!(
            "Unknown fs function: {}",
            name
        ))),
    }
}

fn path_arg<'a>(args: &'a [Value], what: &str) -> Result<&'a str, RuntimeError> {
    match args.first() {
        Some(Value::Str(path)) => Ok(path),
        _ => Err(RuntimeError::runtime(format!("{} expects a path string", what))),
    }
}
