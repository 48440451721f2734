use crate::error::RuntimeError;
use crate::value::Value;

/// Blocking HTTP, body in and body out as text. Status and header
/// inspection belong to the host; a non-success status surfaces as the
/// wrapped transport error ureq reports.
pub fn call(name: &str, args: &[Value]) -> Result<Value, RuntimeError> {
    match name {
        "get" => {
            let url = url_arg(args, "http.get")?;
            log::debug!("http.get {}", url);
            let response = ureq::get(url)
                .call()
                .map_err(|e| RuntimeError::runtime(format!("HTTP GET request failed: {}", e)))?;
            let body = response
                .into_string()
                .map_err(|e| RuntimeError::runtime(format!("HTTP GET request failed: {}", e)))?;
            Ok(Value::Str(body))
        }
        "post" => {
            let url = url_arg(args, "http.post")?;
            let body = args.get(1).map(|v| v.to_string()).unwrap_or_default();
            log::debug!("http.post {} ({} bytes)", url, body.len());
            let mut request = ureq::post(url).set("Content-Type", "application/json");
            if let Some(Value::Object(headers)) = args.get(2) {
                // caller headers win, including over the default content type
                for (key, val) in headers.borrow().iter() {
                    request = request.set(key, &val.to_string());
                }
            }
            let response = request
                .send_string(&body)
                .map_err(|e| RuntimeError::runtime(format!("HTTP POST request failed: {}", e)))?;
            let text = response
                .into_string()
                .map_err(|e| RuntimeError::runtime(format!("HTTP POST request failed: {}", e)))?;
            Ok(Value::Str(text))
        }
        _ => Err(RuntimeError::runtime(format!(
            "Unknown http function: {}",
            name
        ))),
    }
}

fn url_arg<'a>(args: &'a [Value], func: &str) -> Result<&'a str, RuntimeError> {
    match args.first() {
        Some(Value::Str(url)) => Ok(url),
        _ => Err(RuntimeError::runtime(format!(
            "{} expects a URL string",
            func
        ))),
    }
}
