//! Response builders shared by the API handlers.

use serde_json::{Value, json};

/// Returns a 200 OK response with an empty JSON body.
#[must_use]
pub fn ok_empty() -> Value {
    json!({ "statusCode": 200, "body": "{}" })
}

/// Returns a 200 OK response with an ephemeral Slack message.
#[must_use]
pub fn ok_ephemeral(text: &str) -> Value {
    json!({
        "statusCode": 200,
        "body": json!({ "response_type": "ephemeral", "text": text }).to_string()
    })
}

/// Returns a 200 OK response with a plain-text body.
#[must_use]
pub fn ok_text(text: &str) -> Value {
    json!({
        "statusCode": 200,
        "headers": { "Content-Type": "text/plain" },
        "body": text
    })
}

/// Returns an error response with the given status code and message.
#[must_use]
pub fn err_response(status_code: u16, message: &str) -> Value {
    json!({
        "statusCode": status_code,
        "body": json!({ "error": message }).to_string()
    })
}

/// Short reference shown to users so a failure can be found in the logs.
#[must_use]
pub fn short_ref(correlation_id: &str) -> &str {
    correlation_id.get(..8).unwrap_or(correlation_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ephemeral_body_is_stringified_json() {
        let resp = ok_ephemeral("hi");
        let body: Value = serde_json::from_str(resp["body"].as_str().unwrap()).unwrap();
        assert_eq!(body["response_type"], "ephemeral");
        assert_eq!(body["text"], "hi");
    }

    #[test]
    fn short_ref_handles_short_ids() {
        assert_eq!(short_ref("0123456789"), "01234567");
        assert_eq!(short_ref("abc"), "abc");
    }
}
