use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Fields Slack sends when a user invokes a slash command.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SlackCommandEvent {
    pub team_id: String,
    pub channel_id: String,
    pub channel_name: String,
    pub user_id: String,
    pub user_name: String,
    pub command: String,
    pub text: String,
    pub response_url: String,
    pub trigger_id: String,
}

/// Decodes a URL-encoded form component, treating `+` as a space.
///
/// # Examples
///
/// ```
/// use recap::slack::command_parser::decode_url_component;
///
/// assert_eq!(decode_url_component("hello%20world").unwrap(), "hello world");
/// assert_eq!(decode_url_component("hello+world").unwrap(), "hello world");
/// assert_eq!(decode_url_component("1%2B1").unwrap(), "1+1");
/// ```
///
/// # Errors
///
/// Returns an error if the decoded bytes are not valid UTF-8.
pub fn decode_url_component(input: &str) -> Result<String, String> {
    let spaced = input.replace('+', " ");
    percent_decode_str(&spaced)
        .decode_utf8()
        .map(|s| s.to_string())
        .map_err(|e| format!("Failed to decode URL component: {e}"))
}

/// Parses the URL-encoded body of a slash command request.
///
/// # Examples
///
/// ```
/// use recap::slack::command_parser::parse_form_data;
///
/// let form_data = "team_id=T123&channel_id=C123&channel_name=general&\
///                  user_id=U123&user_name=username&command=%2Frecap&\
///                  text=prompt+what+changed%3F&\
///                  response_url=https%3A%2F%2Fhooks.slack.com%2F&trigger_id=123.456";
///
/// let event = parse_form_data(form_data).unwrap();
/// assert_eq!(event.command, "/recap");
/// assert_eq!(event.text, "prompt what changed?");
/// ```
///
/// # Errors
///
/// Returns an error if a key or value cannot be decoded, or if the body has
/// no `user_id` or `response_url`.
pub fn parse_form_data(form_data: &str) -> Result<SlackCommandEvent, String> {
    let mut map: HashMap<String, String> = HashMap::new();

    for pair in form_data.split('&') {
        if let Some((raw_key, raw_value)) = pair.split_once('=') {
            let key =
                decode_url_component(raw_key).map_err(|e| format!("Failed to decode key: {e}"))?;
            let value = decode_url_component(raw_value)
                .map_err(|e| format!("Failed to decode value: {e}"))?;
            map.insert(key, value);
        }
    }

    let mut field = |name: &str| map.remove(name).unwrap_or_default();

    let event = SlackCommandEvent {
        team_id: field("team_id"),
        channel_id: field("channel_id"),
        channel_name: field("channel_name"),
        user_id: field("user_id"),
        user_name: field("user_name"),
        command: field("command"),
        text: field("text"),
        response_url: field("response_url"),
        trigger_id: field("trigger_id"),
    };

    if event.user_id.is_empty() {
        return Err("Missing user_id field".to_string());
    }
    if event.response_url.is_empty() {
        return Err("Missing response_url field".to_string());
    }

    Ok(event)
}
