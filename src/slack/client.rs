//! Slack API client module
//!
//! Encapsulates all Slack API interactions with retry logic and error handling.

use reqwest::Client;
use serde_json::{Value, json};
use slack_morphism::hyper_tokio::{SlackClientHyperConnector, SlackHyperClient};
use slack_morphism::prelude::{
    SlackApiConversationsHistoryRequest, SlackApiConversationsOpenRequest,
    SlackApiUsersInfoRequest,
};
use slack_morphism::{
    SlackApiToken, SlackApiTokenValue, SlackChannelId, SlackHistoryMessage, SlackUserId,
};
use std::time::Duration;
use tokio_retry::strategy::jitter;
use tokio_retry::{Retry, strategy::ExponentialBackoff};
use tracing::{debug, warn};

use crate::core::models::MAX_MESSAGE_COUNT;
use crate::delivery::SentMessage;
use crate::errors::BotError;

const POST_MESSAGE_URL: &str = "https://slack.com/api/chat.postMessage";
const CONVERSATIONS_INFO_URL: &str = "https://slack.com/api/conversations.info";

// Build the Slack client connector without panicking.
// If connector construction fails, store None and surface a BotError at call sites.
static SLACK_CLIENT: std::sync::LazyLock<Option<SlackHyperClient>> =
    std::sync::LazyLock::new(|| match SlackClientHyperConnector::new() {
        Ok(connector) => Some(SlackHyperClient::new(connector)),
        Err(e) => {
            warn!("Failed to create Slack HTTP connector: {}", e);
            None
        }
    });

static HTTP_CLIENT: std::sync::LazyLock<Client> = std::sync::LazyLock::new(|| {
    Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .unwrap_or_else(|_| Client::new())
});

fn slack_client() -> Result<&'static SlackHyperClient, BotError> {
    SLACK_CLIENT
        .as_ref()
        .ok_or_else(|| BotError::GeneralError("Slack HTTP connector not initialized".to_string()))
}

/// Check the `ok` flag of a Web API response body.
fn ensure_ok(method: &str, body: &Value) -> Result<(), BotError> {
    if body.get("ok").and_then(Value::as_bool).unwrap_or(false) {
        return Ok(());
    }
    Err(BotError::ApiError(format!(
        "{method} error: {}",
        body.get("error")
            .and_then(Value::as_str)
            .unwrap_or("unknown")
    )))
}

/// Extract the posted message handle from a `chat.postMessage` response.
fn sent_message_from(body: &Value) -> Result<SentMessage, BotError> {
    let channel_id = body.get("channel").and_then(Value::as_str);
    let ts = body.get("ts").and_then(Value::as_str);
    match (channel_id, ts) {
        (Some(channel_id), Some(ts)) => Ok(SentMessage {
            channel_id: channel_id.to_string(),
            ts: ts.to_string(),
        }),
        _ => Err(BotError::ApiError(
            "chat.postMessage response missing channel or ts".to_string(),
        )),
    }
}

/// Slack API client with retry logic and error handling
pub struct SlackClient {
    token: SlackApiToken,
}

impl SlackClient {
    #[must_use]
    pub fn new(token: String) -> Self {
        Self {
            token: SlackApiToken::new(SlackApiTokenValue::new(token)),
        }
    }

    async fn with_retry<F, Fut, T>(&self, operation: F) -> Result<T, BotError>
    where
        F: FnMut() -> Fut + Send,
        Fut: std::future::Future<Output = Result<T, BotError>> + Send,
        T: Send,
    {
        let strategy = ExponentialBackoff::from_millis(100).map(jitter).take(5);

        Retry::spawn(strategy, operation).await
    }

    /// # Errors
    ///
    /// Returns an error if the Slack API call fails.
    pub async fn get_user_im_channel(&self, user_id: &str) -> Result<String, BotError> {
        self.with_retry(|| async {
            let session = slack_client()?.open_session(&self.token);
            let open_req = SlackApiConversationsOpenRequest::new()
                .with_users(vec![SlackUserId(user_id.to_string())]);

            let result = session.conversations_open(&open_req).await?;
            Ok(result.channel.id.0)
        })
        .await
    }

    /// # Errors
    pub async fn get_bot_user_id(&self) -> Result<String, BotError> {
        self.with_retry(|| async {
            let session = slack_client()?.open_session(&self.token);
            let test_resp = session.auth_test().await?;
            Ok(test_resp.user_id.0)
        })
        .await
    }

    /// Display name for `user_id`, falling back to the raw id when the lookup fails.
    ///
    /// # Errors
    pub async fn get_user_info(&self, user_id: &str) -> Result<String, BotError> {
        self.with_retry(|| async {
            let session = slack_client()?.open_session(&self.token);
            let user_info_req = SlackApiUsersInfoRequest::new(SlackUserId(user_id.to_string()));

            match session.users_info(&user_info_req).await {
                Ok(info) => {
                    let profile = info.user.profile.as_ref();
                    let name = profile
                        .and_then(|p| p.display_name.clone())
                        .filter(|n| !n.is_empty())
                        .or_else(|| profile.and_then(|p| p.real_name.clone()))
                        .unwrap_or_else(|| user_id.to_string());

                    Ok(name)
                }
                Err(e) => {
                    warn!("Failed to fetch user info for {}: {:?}", user_id, e);
                    Ok(user_id.to_string())
                }
            }
        })
        .await
    }

    /// Most recent `count` messages in the channel, newest first.
    ///
    /// # Errors
    pub async fn get_recent_messages(
        &self,
        channel_id: &str,
        count: u32,
    ) -> Result<Vec<SlackHistoryMessage>, BotError> {
        self.with_retry(|| async {
            let session = slack_client()?.open_session(&self.token);

            let request = SlackApiConversationsHistoryRequest::new()
                .with_channel(SlackChannelId(channel_id.to_string()))
                .with_limit(u16::try_from(count.min(MAX_MESSAGE_COUNT)).unwrap_or(1000));

            let result = session.conversations_history(&request).await?;
            Ok(result.messages)
        })
        .await
    }

    /// # Errors
    ///
    /// Returns an error if the Slack API request or response parsing fails.
    pub async fn get_channel_name(&self, channel_id: &str) -> Result<String, BotError> {
        let info_payload = json!({
            "channel": channel_id,
        });

        let info_resp = HTTP_CLIENT
            .post(CONVERSATIONS_INFO_URL)
            .bearer_auth(&self.token.token_value.0)
            .json(&info_payload)
            .send()
            .await
            .map_err(|e| BotError::GeneralError(format!("Failed to get channel info: {e}")))?;

        let info_data: Value = info_resp
            .json()
            .await
            .map_err(|e| BotError::GeneralError(format!("Failed to parse channel info: {e}")))?;

        let channel_name = info_data
            .get("channel")
            .and_then(|c| c.get("name"))
            .and_then(|n| n.as_str())
            .map_or_else(|| channel_id.to_string(), std::string::ToString::to_string);

        Ok(channel_name)
    }

    /// Post a prepared `chat.postMessage` body to `channel_id`, optionally in a thread.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails or Slack returns an error.
    pub async fn post_message(
        &self,
        channel_id: &str,
        thread_ts: Option<&str>,
        message: &Value,
    ) -> Result<SentMessage, BotError> {
        let mut payload = message.clone();
        payload["channel"] = Value::String(channel_id.to_string());
        if let Some(thread_ts) = thread_ts {
            payload["thread_ts"] = Value::String(thread_ts.to_string());
        }

        self.with_retry(|| async {
            let resp = HTTP_CLIENT
                .post(POST_MESSAGE_URL)
                .bearer_auth(&self.token.token_value.0)
                .json(&payload)
                .send()
                .await
                .map_err(|e| BotError::GeneralError(format!("Failed to post message: {e}")))?;

            if !resp.status().is_success() {
                return Err(BotError::ApiError(format!(
                    "chat.postMessage HTTP {}",
                    resp.status()
                )));
            }

            let body: Value = resp.json().await.map_err(|e| {
                BotError::GeneralError(format!("chat.postMessage JSON parse error: {e}"))
            })?;

            ensure_ok("chat.postMessage", &body)?;
            sent_message_from(&body)
        })
        .await
    }

    /// Post a message into the user's direct-message channel.
    ///
    /// # Errors
    pub async fn send_dm(&self, user_id: &str, message: &Value) -> Result<SentMessage, BotError> {
        let im_channel = self.get_user_im_channel(user_id).await?;
        debug!("Resolved DM channel {} for user {}", im_channel, user_id);
        self.post_message(&im_channel, None, message).await
    }

    /// POST a message body to an interaction's `response_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or Slack rejects it.
    pub async fn respond_via_url(&self, response_url: &str, body: &Value) -> Result<(), BotError> {
        let resp = HTTP_CLIENT.post(response_url).json(body).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body_text = resp
                .text()
                .await
                .unwrap_or_else(|_| "<failed to read body>".to_string());
            return Err(BotError::ApiError(format!(
                "response_url POST failed: status={status} body={body_text}"
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_body_passes() {
        assert!(ensure_ok("chat.postMessage", &json!({"ok": true})).is_ok());
    }

    #[test]
    fn error_body_names_method_and_code() {
        let err = ensure_ok("chat.postMessage", &json!({"ok": false, "error": "channel_not_found"}))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to access Slack API: chat.postMessage error: channel_not_found"
        );
    }

    #[test]
    fn sent_message_is_read_from_response() {
        let sent =
            sent_message_from(&json!({"ok": true, "channel": "C1", "ts": "1700.01"})).unwrap();
        assert_eq!(sent.channel_id, "C1");
        assert_eq!(sent.ts, "1700.01");
        assert!(sent_message_from(&json!({"ok": true})).is_err());
    }
}
