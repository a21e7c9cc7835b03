//! Normalization of whatever the chat backend sends back.

use serde_json::Value;

/// Fields probed for reply text, highest priority first
pub const REPLY_FIELDS: [&str; 6] = ["response", "reply", "message", "answer", "text", "content"];

pub const EMPTY_RESPONSE_NOTICE: &str = "Received empty response from server.";

/// Role marking an internal tool-invocation artifact
const TOOL_ROLE: &str = "tool";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotReply {
    /// Show this text as a bot message
    Text(String),
    /// Tool artifact: show nothing
    Suppressed,
}

/// Interpret a response body. Bodies that are not JSON become a string payload.
pub fn parse_reply_body(body: &str) -> Value {
    serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string()))
}

pub fn normalize_reply(payload: &Value) -> BotReply {
    if payload.get("role").and_then(Value::as_str) == Some(TOOL_ROLE) {
        return BotReply::Suppressed;
    }

    if let Some(text) = REPLY_FIELDS
        .iter()
        .find_map(|field| payload.get(*field).and_then(display_text))
    {
        return BotReply::Text(text);
    }

    let text = match payload {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    };

    if text.is_empty() || text == "{}" {
        BotReply::Text(EMPTY_RESPONSE_NOTICE.to_string())
    } else {
        BotReply::Text(text)
    }
}

/// Text for a reply field, or `None` when the field is empty-ish and the next one should be tried.
fn display_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Bool(true) => Some("true".to_string()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        Value::Array(_) | Value::Object(_) => Some(value.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn text(payload: Value) -> String {
        match normalize_reply(&payload) {
            BotReply::Text(t) => t,
            BotReply::Suppressed => panic!("reply was suppressed"),
        }
    }

    #[test]
    fn response_field_is_shown() {
        assert_eq!(text(json!({"response": "hi"})), "hi");
    }

    #[test]
    fn fields_are_tried_in_priority_order() {
        let payload = json!({
            "content": "6", "text": "5", "answer": "4", "message": "3", "reply": "2"
        });
        assert_eq!(text(payload), "2");
        assert_eq!(text(json!({"content": "c", "text": "t"})), "t");
        assert_eq!(text(json!({"content": "only"})), "only");
    }

    #[test]
    fn empty_fields_fall_through() {
        assert_eq!(text(json!({"response": "", "reply": null, "answer": "a"})), "a");
        assert_eq!(text(json!({"message": 0, "text": false, "content": "c"})), "c");
    }

    #[test]
    fn non_string_fields_are_rendered() {
        assert_eq!(text(json!({"answer": 42})), "42");
        assert_eq!(text(json!({"reply": {"a": 1}})), r#"{"a":1}"#);
    }

    #[test]
    fn tool_role_is_suppressed() {
        assert_eq!(
            normalize_reply(&json!({"role": "tool", "text": "x"})),
            BotReply::Suppressed
        );
        assert_eq!(text(json!({"role": "assistant", "text": "x"})), "x");
    }

    #[test]
    fn empty_object_shows_notice() {
        assert_eq!(text(json!({})), EMPTY_RESPONSE_NOTICE);
        assert_eq!(text(Value::Null), EMPTY_RESPONSE_NOTICE);
        assert_eq!(text(json!("")), EMPTY_RESPONSE_NOTICE);
    }

    #[test]
    fn unknown_shape_is_serialized_verbatim() {
        assert_eq!(text(json!({"foo": "bar"})), r#"{"foo":"bar"}"#);
        assert_eq!(
            text(parse_reply_body(r#"{"zeta":1,"alpha":2}"#)),
            r#"{"zeta":1,"alpha":2}"#
        );
    }

    #[test]
    fn string_payload_is_used_directly() {
        assert_eq!(text(json!("plain")), "plain");
        assert_eq!(text(parse_reply_body("\"quoted\"")), "quoted");
    }

    #[test]
    fn non_json_body_is_raw_text() {
        let payload = parse_reply_body("Hello from a text/plain backend");
        assert_eq!(text(payload), "Hello from a text/plain backend");
    }
}
