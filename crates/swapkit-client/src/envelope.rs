//! Relay envelope unwrapping.
//!
//! Some public relays do not pass the origin body through verbatim; they
//! wrap it as `{"contents": "<json-string>"}`. This transform runs on every
//! routed response so callers always see the origin payload.

/// Unwrap a relay envelope if present, returning the origin payload.
///
/// A body without the envelope shape is returned as-is. An envelope whose
/// inner string is not valid JSON is an error; the router treats that as a
/// failed route and falls through to the next one.
pub fn unwrap_relay_envelope(
    value: serde_json::Value,
) -> Result<serde_json::Value, serde_json::Error> {
    if let Some(contents) = value.get("contents").and_then(|c| c.as_str()) {
        return serde_json::from_str(contents);
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unwraps_string_wrapped_payload() {
        let wrapped = json!({ "contents": r#"{"code":200,"data":{"no":"r1"}}"# });
        let inner = unwrap_relay_envelope(wrapped).unwrap();
        assert_eq!(inner["code"], 200);
        assert_eq!(inner["data"]["no"], "r1");
    }

    #[test]
    fn test_passes_plain_payload_through() {
        let plain = json!({ "code": 200, "data": { "task_no": "t1" } });
        let out = unwrap_relay_envelope(plain.clone()).unwrap();
        assert_eq!(out, plain);
    }

    #[test]
    fn test_non_string_contents_passes_through() {
        let value = json!({ "contents": { "code": 200 } });
        let out = unwrap_relay_envelope(value.clone()).unwrap();
        assert_eq!(out, value);
    }

    #[test]
    fn test_invalid_inner_json_is_error() {
        let wrapped = json!({ "contents": "<html>upstream error</html>" });
        assert!(unwrap_relay_envelope(wrapped).is_err());
    }
}
