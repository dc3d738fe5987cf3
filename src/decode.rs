use reqwest::StatusCode;
use serde_json::Value;

use crate::{GatewayError, LogEntry};

/// Picks the most useful message out of a failed response.
///
/// Prefers a JSON `error` field, then the raw body, then the reason phrase.
pub(crate) fn error_message(status: StatusCode, body: &str) -> String {
    let from_field = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("error")
                .filter(|error| !error.is_null() && error.as_str() != Some(""))
                .map(render_error_value)
        });
    if let Some(message) = from_field {
        return message;
    }

    if !body.is_empty() {
        return body.to_owned();
    }

    status.canonical_reason().unwrap_or("Unknown Status").to_owned()
}

/// Decodes a success body. Invalid UTF-8 is rejected rather than replaced.
pub(crate) fn decode_json(body: &[u8]) -> Result<Value, GatewayError> {
    serde_json::from_slice(body).map_err(|err| {
        GatewayError::Decode(format!(
            "invalid gateway response JSON: {err}; body: {}",
            String::from_utf8_lossy(body)
        ))
    })
}

/// Interprets an `/execute` or `/call_tool` body as `{"result": ..}` or `{"error": ..}`.
pub(crate) fn decode_tool_response(body: Value) -> Result<Value, GatewayError> {
    let mut object = match body {
        Value::Object(object) => object,
        other => {
            return Err(GatewayError::Decode(format!(
                "expected tool response object, got {other}"
            )))
        }
    };

    if let Some(error) = object.get("error") {
        return Err(GatewayError::Tool(render_error_value(error)));
    }

    Ok(object.remove("result").unwrap_or(Value::Null))
}

pub(crate) fn decode_logs(body: Value) -> Result<Vec<LogEntry>, GatewayError> {
    serde_json::from_value(body)
        .map_err(|err| GatewayError::Decode(format!("invalid log entries: {err}")))
}

fn render_error_value(value: &Value) -> String {
    match value {
        Value::String(message) => message.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;
    use serde_json::json;

    use super::{decode_json, decode_logs, decode_tool_response, error_message};
    use crate::GatewayError;

    #[test]
    fn error_message_prefers_json_error_field() {
        let message = error_message(StatusCode::BAD_REQUEST, r#"{"error":"Bad request"}"#);
        assert_eq!(message, "Bad request");
    }

    #[test]
    fn error_message_falls_back_to_raw_body() {
        let message = error_message(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error");
        assert_eq!(message, "Internal Server Error");

        let message = error_message(StatusCode::BAD_REQUEST, r#"{"detail":"nope"}"#);
        assert_eq!(message, r#"{"detail":"nope"}"#);
    }

    #[test]
    fn error_message_falls_back_to_reason_phrase() {
        assert_eq!(error_message(StatusCode::NOT_FOUND, ""), "Not Found");
    }

    #[test]
    fn error_message_keeps_whitespace_body_verbatim() {
        assert_eq!(error_message(StatusCode::BAD_GATEWAY, "  \n"), "  \n");
    }

    #[test]
    fn tool_response_returns_result_field() {
        let result = decode_tool_response(json!({"result": {"status": "success"}}))
            .expect("result must decode");
        assert_eq!(result, json!({"status": "success"}));
    }

    #[test]
    fn tool_response_without_result_is_null() {
        let result = decode_tool_response(json!({})).expect("empty object must decode");
        assert!(result.is_null());
    }

    #[test]
    fn tool_response_error_field_wins_over_result() {
        let err = decode_tool_response(json!({"error": "Tool execution failed", "result": 1}))
            .expect_err("error field must fail");
        match err {
            GatewayError::Tool(message) => assert_eq!(message, "Tool execution failed"),
            other => panic!("expected tool error, got {other:?}"),
        }
    }

    #[test]
    fn tool_response_structured_error_is_rendered_as_json() {
        let err = decode_tool_response(json!({"error": {"code": 7}}))
            .expect_err("error field must fail");
        assert_eq!(err.to_string(), r#"{"code":7}"#);
    }

    #[test]
    fn tool_response_must_be_an_object() {
        let err = decode_tool_response(json!([1, 2])).expect_err("array must be rejected");
        assert!(matches!(err, GatewayError::Decode(_)));
    }

    #[test]
    fn malformed_json_is_decode_error() {
        let err = decode_json(b"<html>oops</html>").expect_err("html must not decode");
        assert!(matches!(err, GatewayError::Decode(_)));
    }

    #[test]
    fn invalid_utf8_is_decode_error() {
        let err =
            decode_json(b"{\"ok\":\"\xff\xfe\"}").expect_err("invalid UTF-8 must not decode");
        assert!(matches!(err, GatewayError::Decode(_)));
    }

    #[test]
    fn logs_decode_into_entries_in_order() {
        let entries = decode_logs(json!([
            {
                "timestamp": "2025-01-14T12:00:00Z",
                "tool": "add",
                "input": {"a": 1, "b": 2},
                "result": 3
            },
            {
                "timestamp": "2025-01-14T12:00:01Z",
                "tool": "sub",
                "input": {"a": 1, "b": 2},
                "result": -1
            }
        ]))
        .expect("logs must decode");

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].tool, "add");
        assert_eq!(entries[0].result, Some(json!(3)));
        assert_eq!(entries[1].tool, "sub");
    }

    #[test]
    fn logs_keep_structured_errors_and_partial_entries() {
        let entries = decode_logs(json!([
            {
                "timestamp": "2025-01-14T12:00:00Z",
                "tool": "divide",
                "input": {"a": 1, "b": 0},
                "error": {"code": 7, "message": "boom"},
                "duration_ms": 12
            },
            {"tool": "ping"}
        ]))
        .expect("every entry must decode");

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].error, Some(json!({"code": 7, "message": "boom"})));
        assert_eq!(entries[0].extra.get("duration_ms"), Some(&json!(12)));
        assert_eq!(entries[1].tool, "ping");
        assert!(entries[1].timestamp.is_empty());
        assert!(entries[1].input.is_null());
    }
}
