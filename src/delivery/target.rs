//! Where a reply goes, and the platform primitives used to get it there.
//!
//! A reply either answers a live `@mention` (threaded `chat.postMessage`) or
//! fulfils a slash command through its `response_url`. The branch between the
//! two lives only in the capability methods on [`ResponseTarget`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::unit::DisplayUnit;
use crate::errors::BotError;

/// Content of a single platform send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyPayload {
    Text(String),
    Units(Vec<DisplayUnit>),
}

/// Handle of a message posted by the bot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub channel_id: String,
    pub ts: String,
}

/// Raw send operations offered by the messaging platform.
#[async_trait]
pub trait ReplyTransport: Send + Sync {
    /// Post a message to a channel, optionally as a thread reply.
    async fn post_message(
        &self,
        channel_id: &str,
        thread_ts: Option<&str>,
        payload: &ReplyPayload,
    ) -> Result<SentMessage, BotError>;

    /// Answer through an interaction's `response_url`.
    async fn respond(
        &self,
        response_url: &str,
        payload: &ReplyPayload,
        replace_original: bool,
    ) -> Result<(), BotError>;

    /// Post a message to the user's direct-message channel.
    async fn send_direct(
        &self,
        user_id: &str,
        payload: &ReplyPayload,
    ) -> Result<SentMessage, BotError>;
}

/// Completion state of a slash-command interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseState {
    NotResponded,
    /// A placeholder ack was returned and may be replaced.
    Deferred,
    Responded,
}

/// A mention the bot answers in-thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveMessage {
    pub channel_id: String,
    pub ts: String,
    pub thread_ts: Option<String>,
    pub user_id: String,
}

impl LiveMessage {
    /// Thread to reply into: the existing thread, or a new one under the mention.
    #[must_use]
    pub fn reply_thread(&self) -> &str {
        self.thread_ts.as_deref().unwrap_or(&self.ts)
    }
}

/// A slash command fulfilled after the initial ack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeferredInteraction {
    pub response_url: String,
    /// Invoking channel, when known. Needed for follow-up posts.
    pub channel_id: Option<String>,
    pub user_id: String,
    pub state: ResponseState,
}

impl DeferredInteraction {
    async fn send_initial(
        &mut self,
        transport: &dyn ReplyTransport,
        payload: &ReplyPayload,
    ) -> Result<(), BotError> {
        transport.respond(&self.response_url, payload, false).await?;
        self.state = ResponseState::Responded;
        Ok(())
    }

    async fn send_update(
        &mut self,
        transport: &dyn ReplyTransport,
        payload: &ReplyPayload,
    ) -> Result<(), BotError> {
        transport.respond(&self.response_url, payload, true).await?;
        self.state = ResponseState::Responded;
        Ok(())
    }

    async fn send_follow_up(
        &self,
        transport: &dyn ReplyTransport,
        payload: &ReplyPayload,
    ) -> Result<Option<SentMessage>, BotError> {
        match self.channel_id.as_deref() {
            Some(channel_id) => transport
                .post_message(channel_id, None, payload)
                .await
                .map(Some),
            None => Ok(None),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseTarget {
    LiveMessage(LiveMessage),
    DeferredInteraction(DeferredInteraction),
}

impl ResponseTarget {
    #[must_use]
    pub fn user_id(&self) -> &str {
        match self {
            Self::LiveMessage(message) => &message.user_id,
            Self::DeferredInteraction(interaction) => &interaction.user_id,
        }
    }

    #[must_use]
    pub fn is_live_message(&self) -> bool {
        matches!(self, Self::LiveMessage(_))
    }

    /// Current interaction state; live messages have none.
    #[must_use]
    pub fn response_state(&self) -> Option<ResponseState> {
        match self {
            Self::LiveMessage(_) => None,
            Self::DeferredInteraction(interaction) => Some(interaction.state),
        }
    }

    /// Primary in-channel send.
    ///
    /// Live messages get a threaded reply. Interactions use the initial
    /// response, the update primitive when deferred, or a follow-up once
    /// already answered. Returns a handle only for live messages.
    ///
    /// # Errors
    ///
    /// Returns the transport error unchanged.
    pub async fn send_primary(
        &mut self,
        transport: &dyn ReplyTransport,
        payload: &ReplyPayload,
    ) -> Result<Option<SentMessage>, BotError> {
        match self {
            Self::LiveMessage(message) => transport
                .post_message(&message.channel_id, Some(message.reply_thread()), payload)
                .await
                .map(Some),
            Self::DeferredInteraction(interaction) => match interaction.state {
                ResponseState::NotResponded => {
                    interaction.send_initial(transport, payload).await?;
                    Ok(None)
                }
                ResponseState::Deferred => {
                    interaction.send_update(transport, payload).await?;
                    Ok(None)
                }
                ResponseState::Responded => {
                    let sent = interaction.send_follow_up(transport, payload).await?;
                    if sent.is_none() {
                        warn!("Skipping reply: answered interaction has no channel");
                    }
                    Ok(sent)
                }
            },
        }
    }

    /// Secondary in-channel send for everything after the first message.
    ///
    /// Returns `Ok(None)` without sending when an interaction has no known
    /// channel to post into.
    ///
    /// # Errors
    ///
    /// Returns the transport error unchanged.
    pub async fn send_follow_up(
        &self,
        transport: &dyn ReplyTransport,
        payload: &ReplyPayload,
    ) -> Result<Option<SentMessage>, BotError> {
        match self {
            Self::LiveMessage(message) => transport
                .post_message(&message.channel_id, Some(message.reply_thread()), payload)
                .await
                .map(Some),
            Self::DeferredInteraction(interaction) => {
                interaction.send_follow_up(transport, payload).await
            }
        }
    }

    /// Send to the invoking user's direct-message channel.
    ///
    /// # Errors
    ///
    /// Returns the transport error unchanged.
    pub async fn send_direct(
        &self,
        transport: &dyn ReplyTransport,
        payload: &ReplyPayload,
    ) -> Result<SentMessage, BotError> {
        transport.send_direct(self.user_id(), payload).await
    }
}
