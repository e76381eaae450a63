use serde_json::Value;

/// Extracts the human-readable message from an API error body.
///
/// The server reports failures either as `{"detail": "..."}` or, for
/// validation failures, as `{"detail": [{"loc": [...], "msg": "..."}]}`.
/// Field errors render as `"<loc joined with '.'>: <msg>"`, comma-joined.
/// A body that is not JSON, or carries neither shape, falls back to the
/// per-operation default message. This output is user-facing, so the
/// format is load-bearing.
pub fn extract_detail(body: &str, fallback: &str) -> String {
    let parsed: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(_) => return fallback.to_string(),
    };

    match parsed.get("detail") {
        Some(Value::String(detail)) => detail.clone(),
        Some(Value::Array(errors)) => {
            let rendered: Vec<String> = errors
                .iter()
                .map(|err| {
                    let loc = err
                        .get("loc")
                        .and_then(Value::as_array)
                        .map(|parts| {
                            parts
                                .iter()
                                .map(|part| match part {
                                    Value::String(s) => s.clone(),
                                    other => other.to_string(),
                                })
                                .collect::<Vec<_>>()
                                .join(".")
                        })
                        .unwrap_or_default();
                    let msg = err.get("msg").and_then(Value::as_str).unwrap_or_default();
                    format!("{}: {}", loc, msg)
                })
                .collect();
            if rendered.is_empty() {
                fallback.to_string()
            } else {
                rendered.join(", ")
            }
        }
        _ => parsed
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| fallback.to_string()),
    }
}
