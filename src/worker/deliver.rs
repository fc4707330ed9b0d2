use tracing::{error, info};

use super::CANONICAL_FAILURE_MESSAGE;
use crate::core::models::ProcessingTask;
use crate::delivery::{Dispatcher, DisplayUnit, ReplyContent, SUMMARY_COLOR, SentMessage};
use crate::errors::BotError;

/// Wrap generated text in the display unit the dispatcher sends.
#[must_use]
pub fn build_summary_unit(
    title: &str,
    body: &str,
    model_alias: &str,
    message_count: usize,
) -> DisplayUnit {
    let noun = if message_count == 1 {
        "message"
    } else {
        "messages"
    };
    DisplayUnit::new(SUMMARY_COLOR)
        .with_title(title)
        .with_body(body.trim())
        .with_footer(format!("{model_alias} · {message_count} {noun}"))
}

/// Short text shown to the user for a failed command.
#[must_use]
pub fn user_error_message(error: &BotError) -> String {
    match error {
        BotError::Timeout(secs) => {
            format!("The model took longer than {secs}s to answer. Try fewer messages.")
        }
        BotError::UnknownModel(alias) => {
            format!("Unknown model `{alias}`. Use `models` to list the available ones.")
        }
        _ => CANONICAL_FAILURE_MESSAGE.to_string(),
    }
}

/// Send the outcome of a command back to whoever asked.
pub async fn deliver_outcome(
    dispatcher: &Dispatcher<'_>,
    task: &ProcessingTask,
    outcome: Result<ReplyContent, BotError>,
) -> Option<SentMessage> {
    let mut target = task.target();
    let content = match outcome {
        Ok(content) => content,
        Err(e) => {
            error!(
                "Command failed (correlation_id={}): {}",
                task.correlation_id, e
            );
            ReplyContent::Text(user_error_message(&e))
        }
    };

    let sent = dispatcher
        .safe_reply(&mut target, content, task.command.via_dm)
        .await;
    info!(
        "Reply finished (correlation_id={}, state={:?})",
        task.correlation_id,
        target.response_state()
    );
    sent
}
