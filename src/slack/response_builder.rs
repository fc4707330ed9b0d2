//! Response-related utilities for Slack interactions.
//!
//! This module renders reply payloads into the JSON bodies Slack expects,
//! both for `chat.postMessage` and for an interaction's `response_url`.

use serde_json::{Value, json};

use crate::delivery::{DisplayUnit, ReplyPayload};

/// Create a JSON payload for an ephemeral response
///
/// Ephemeral messages are only visible to the user who triggered the command.
///
/// # Examples
///
/// ```
/// use recap::slack::response_builder::create_ephemeral_payload;
///
/// let payload = create_ephemeral_payload("This message is only visible to you");
/// assert_eq!(payload["response_type"], "ephemeral");
/// ```
#[must_use]
pub fn create_ephemeral_payload(text: &str) -> Value {
    json!({
        "text": text,
        "response_type": "ephemeral"
    })
}

/// Render one display unit as a legacy message attachment.
#[must_use]
pub fn build_attachment(unit: &DisplayUnit) -> Value {
    let mut attachment = json!({
        "color": unit.color(),
        "mrkdwn_in": ["text"],
    });

    let fallback = unit.title().or(unit.body()).unwrap_or_default();
    attachment["fallback"] = Value::String(fallback.chars().take(150).collect());

    if let Some(title) = unit.title() {
        attachment["title"] = Value::String(title.to_string());
    }
    if let Some(body) = unit.body() {
        attachment["text"] = Value::String(body.to_string());
    }
    if let Some(footer) = unit.footer() {
        attachment["footer"] = Value::String(footer.to_string());
    }
    attachment
}

/// Body for a single message: plain `text`, or `attachments` with a short
/// top-level `text` for notifications.
#[must_use]
pub fn build_message_payload(payload: &ReplyPayload) -> Value {
    match payload {
        ReplyPayload::Text(text) => json!({ "text": text }),
        ReplyPayload::Units(units) => {
            let notification = units
                .iter()
                .find_map(DisplayUnit::title)
                .unwrap_or_default();
            json!({
                "text": notification,
                "attachments": units.iter().map(build_attachment).collect::<Vec<_>>(),
            })
        }
    }
}

/// Body for a `response_url` POST, visible to the whole channel.
#[must_use]
pub fn create_response_url_payload(payload: &ReplyPayload, replace_original: bool) -> Value {
    let mut body = build_message_payload(payload);
    body["response_type"] = Value::String("in_channel".to_string());
    body["replace_original"] = Value::Bool(replace_original);
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delivery::SUMMARY_COLOR;

    #[test]
    fn text_payload_is_plain() {
        let body = build_message_payload(&ReplyPayload::Text("hello".into()));
        assert_eq!(body, json!({ "text": "hello" }));
    }

    #[test]
    fn units_become_attachments() {
        let units = vec![
            DisplayUnit::new(SUMMARY_COLOR)
                .with_title("Summary of #general")
                .with_body("part one"),
            DisplayUnit::new(SUMMARY_COLOR)
                .with_body("part two")
                .with_footer("gpt-4o · 50 messages"),
        ];
        let body = build_message_payload(&ReplyPayload::Units(units));

        assert_eq!(body["text"], "Summary of #general");
        let attachments = body["attachments"].as_array().unwrap();
        assert_eq!(attachments.len(), 2);
        assert_eq!(attachments[0]["title"], "Summary of #general");
        assert_eq!(attachments[0]["color"], SUMMARY_COLOR);
        assert!(attachments[0].get("footer").is_none());
        assert!(attachments[1].get("title").is_none());
        assert_eq!(attachments[1]["text"], "part two");
        assert_eq!(attachments[1]["footer"], "gpt-4o · 50 messages");
        assert_eq!(attachments[1]["fallback"], "part two");
    }

    #[test]
    fn response_url_payload_sets_replace_flag() {
        let body = create_response_url_payload(&ReplyPayload::Text("done".into()), true);
        assert_eq!(body["response_type"], "in_channel");
        assert_eq!(body["replace_original"], true);
        assert_eq!(body["text"], "done");
    }
}
