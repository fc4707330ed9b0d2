use async_trait::async_trait;

use super::client::SlackClient;
use super::response_builder::{build_message_payload, create_response_url_payload};
use crate::delivery::{ReplyPayload, ReplyTransport, SentMessage};
use crate::errors::BotError;

#[async_trait]
impl ReplyTransport for SlackClient {
    async fn post_message(
        &self,
        channel_id: &str,
        thread_ts: Option<&str>,
        payload: &ReplyPayload,
    ) -> Result<SentMessage, BotError> {
        let body = build_message_payload(payload);
        SlackClient::post_message(self, channel_id, thread_ts, &body).await
    }

    async fn respond(
        &self,
        response_url: &str,
        payload: &ReplyPayload,
        replace_original: bool,
    ) -> Result<(), BotError> {
        let body = create_response_url_payload(payload, replace_original);
        self.respond_via_url(response_url, &body).await
    }

    async fn send_direct(
        &self,
        user_id: &str,
        payload: &ReplyPayload,
    ) -> Result<SentMessage, BotError> {
        let body = build_message_payload(payload);
        self.send_dm(user_id, &body).await
    }
}
