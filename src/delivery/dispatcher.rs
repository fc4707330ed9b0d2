//! Safe reply: the single exit point for everything the bot says.
//!
//! The dispatcher decides whether content needs splitting, picks the
//! delivery path (in-channel or direct message) and sends the resulting
//! messages one after another. Failures never reach the caller; the user
//! gets a short error message instead, or nothing if that fails too.

use tracing::{debug, error, info, warn};

use super::batcher::{DeliveryBatch, MESSAGE_SIZE_LIMIT, batch_units};
use super::chunker::{DESCRIPTION_LIMIT, chunk_text};
use super::target::{ReplyPayload, ReplyTransport, ResponseTarget, SentMessage};
use super::unit::DisplayUnit;
use crate::errors::BotError;

/// Confirmation posted in-channel when an interaction's reply went to DMs.
pub const DM_CONFIRMATION: &str = "Summary sent as a DM.";

/// Prefix of the fallback message sent when delivery fails.
pub const ERROR_REPLY_PREFIX: &str = "Error sending reply: ";

/// Size limits the dispatcher splits against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryLimits {
    /// Maximum characters in a single unit body.
    pub description_limit: usize,
    /// Maximum estimated size of all units in one message.
    pub message_limit: usize,
}

impl Default for DeliveryLimits {
    fn default() -> Self {
        Self {
            description_limit: DESCRIPTION_LIMIT,
            message_limit: MESSAGE_SIZE_LIMIT,
        }
    }
}

/// What the caller wants to say.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyContent {
    /// Short status or error text; never split.
    Text(String),
    Units(Vec<DisplayUnit>),
}

impl From<&str> for ReplyContent {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for ReplyContent {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

/// Turn content into the ordered list of messages to send.
#[must_use]
pub fn plan_deliveries(content: ReplyContent, limits: DeliveryLimits) -> Vec<ReplyPayload> {
    let units = match content {
        ReplyContent::Text(text) => return vec![ReplyPayload::Text(text)],
        ReplyContent::Units(units) if units.is_empty() => {
            return vec![ReplyPayload::Units(units)];
        }
        ReplyContent::Units(units) => units,
    };

    let oversized = units
        .first()
        .and_then(DisplayUnit::body)
        .is_some_and(|body| body.chars().count() > limits.description_limit);

    let units = if oversized {
        split_first_unit(units, limits.description_limit)
    } else {
        units
    };

    batch_units(units, limits.message_limit)
        .into_iter()
        .map(|batch: DeliveryBatch| ReplyPayload::Units(batch.into_units()))
        .collect()
}

/// Replace the first unit with one unit per body chunk. The title stays on
/// the first piece, the footer moves to the last, every piece keeps the color.
fn split_first_unit(mut units: Vec<DisplayUnit>, description_limit: usize) -> Vec<DisplayUnit> {
    let original = units.remove(0);
    let body = original.body().unwrap_or_default();
    let chunks: Vec<&str> = chunk_text(body, description_limit).collect();
    let last = chunks.len() - 1;

    debug!(
        "Splitting {}-character body into {} units",
        body.chars().count(),
        chunks.len()
    );

    let mut rebuilt: Vec<DisplayUnit> = chunks
        .iter()
        .enumerate()
        .map(|(idx, chunk)| {
            let mut unit = DisplayUnit::new(original.color()).with_body(*chunk);
            if idx == 0
                && let Some(title) = original.title()
            {
                unit = unit.with_title(title);
            }
            if idx == last
                && let Some(footer) = original.footer()
            {
                unit = unit.with_footer(footer);
            }
            unit
        })
        .collect();

    rebuilt.append(&mut units);
    rebuilt
}

/// Delivers replies over a [`ReplyTransport`].
pub struct Dispatcher<'a> {
    transport: &'a dyn ReplyTransport,
    limits: DeliveryLimits,
}

impl<'a> Dispatcher<'a> {
    #[must_use]
    pub fn new(transport: &'a dyn ReplyTransport, limits: DeliveryLimits) -> Self {
        Self { transport, limits }
    }

    /// Deliver `content` to `target`, splitting as needed.
    ///
    /// Returns the first posted message for live-message targets and `None`
    /// for interactions or when delivery failed. Never returns an error: on
    /// failure one `"Error sending reply: …"` message is attempted in-channel.
    pub async fn safe_reply(
        &self,
        target: &mut ResponseTarget,
        content: impl Into<ReplyContent>,
        via_dm: bool,
    ) -> Option<SentMessage> {
        let payloads = plan_deliveries(content.into(), self.limits);

        let result = if via_dm {
            self.deliver_direct(target, &payloads).await
        } else {
            self.deliver_in_channel(target, &payloads).await
        };

        match result {
            Ok(sent) => sent,
            Err(e) => {
                error!("Failed to deliver reply: {}", e);
                self.send_error_notice(target, &e).await
            }
        }
    }

    async fn deliver_in_channel(
        &self,
        target: &mut ResponseTarget,
        payloads: &[ReplyPayload],
    ) -> Result<Option<SentMessage>, BotError> {
        let Some((first, rest)) = payloads.split_first() else {
            return Ok(None);
        };

        let sent = target.send_primary(self.transport, first).await?;

        for (idx, payload) in rest.iter().enumerate() {
            if target.send_follow_up(self.transport, payload).await?.is_none() {
                warn!(
                    "Skipping reply part {} of {}: no channel for follow-up",
                    idx + 2,
                    payloads.len()
                );
            }
        }

        if payloads.len() > 1 {
            info!("Delivered reply in {} parts", payloads.len());
        }

        Ok(sent.filter(|_| target.is_live_message()))
    }

    async fn deliver_direct(
        &self,
        target: &mut ResponseTarget,
        payloads: &[ReplyPayload],
    ) -> Result<Option<SentMessage>, BotError> {
        let mut first_sent = None;
        for payload in payloads {
            let sent = target.send_direct(self.transport, payload).await?;
            first_sent.get_or_insert(sent);
        }

        info!(
            "Delivered reply to user {} via DM in {} parts",
            target.user_id(),
            payloads.len()
        );

        if target.is_live_message() {
            return Ok(first_sent);
        }

        target
            .send_primary(
                self.transport,
                &ReplyPayload::Text(DM_CONFIRMATION.to_string()),
            )
            .await?;
        Ok(None)
    }

    async fn send_error_notice(
        &self,
        target: &mut ResponseTarget,
        cause: &BotError,
    ) -> Option<SentMessage> {
        let notice = ReplyPayload::Text(format!("{ERROR_REPLY_PREFIX}{cause}"));
        let result = target.send_primary(self.transport, &notice).await;
        match result {
            Ok(sent) => sent.filter(|_| target.is_live_message()),
            Err(e) => {
                error!("Failed to send error notice: {}", e);
                None
            }
        }
    }
}
