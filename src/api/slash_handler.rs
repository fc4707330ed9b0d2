//! Handler for Slack slash commands (`/recap`).

use serde_json::Value;
use tracing::{error, info};
use uuid::Uuid;

use super::helpers::{ok_ephemeral, short_ref};
use super::parsing::{parse_command_text, parse_slack_event};
use super::sqs;
use crate::core::config::AppConfig;
use crate::core::models::{ProcessingTask, ReplyRoute};
use crate::delivery::ResponseState;
use crate::errors::BotError;
use crate::slack::SlackCommandEvent;

pub const WORKING_MESSAGE: &str = "Working on it…";

/// Build the queued task for a slash command.
///
/// The ack returned to Slack counts as the deferred placeholder, so the
/// worker's first reply updates it.
#[must_use]
pub fn task_from_command(event: &SlackCommandEvent, correlation_id: String) -> ProcessingTask {
    let channel_id = (!event.channel_id.is_empty()).then(|| event.channel_id.clone());
    ProcessingTask {
        correlation_id,
        user_id: event.user_id.clone(),
        channel_id: event.channel_id.clone(),
        text: event.text.clone(),
        command: parse_command_text(&event.text),
        reply: ReplyRoute::Interaction {
            response_url: event.response_url.clone(),
            channel_id,
            state: ResponseState::Deferred,
        },
    }
}

/// Handle a slash command from Slack.
///
/// # Errors
///
/// Returns an error if the body cannot be parsed.
pub async fn handle_slash_command(config: &AppConfig, body: &str) -> Result<Value, BotError> {
    let slack_event = parse_slack_event(body)?;
    let correlation_id = Uuid::new_v4().to_string();
    info!(
        "Slash command {} from {}, correlation_id={}",
        slack_event.command, slack_event.user_id, correlation_id
    );

    let task = task_from_command(&slack_event, correlation_id);

    if let Err(e) = sqs::send_to_sqs(&task, config).await {
        error!(
            "Failed to enqueue task (correlation_id={}): {}",
            task.correlation_id, e
        );
        return Ok(ok_ephemeral(&format!(
            "Failed to start. Please try again. (ref: {})",
            short_ref(&task.correlation_id)
        )));
    }

    Ok(ok_ephemeral(WORKING_MESSAGE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::CommandAction;

    #[test]
    fn command_becomes_deferred_interaction() {
        let event = SlackCommandEvent {
            channel_id: "C42".into(),
            user_id: "U42".into(),
            command: "/recap".into(),
            text: "summarize 200 model=gpt-4o-mini".into(),
            response_url: "https://hooks.slack.com/commands/1".into(),
            ..SlackCommandEvent::default()
        };
        let task = task_from_command(&event, "corr".into());

        assert_eq!(task.command.action, CommandAction::Summarize);
        assert_eq!(task.command.count, 200);
        assert_eq!(task.command.model.as_deref(), Some("gpt-4o-mini"));
        assert_eq!(
            task.reply,
            ReplyRoute::Interaction {
                response_url: "https://hooks.slack.com/commands/1".into(),
                channel_id: Some("C42".into()),
                state: ResponseState::Deferred,
            }
        );
    }

    #[test]
    fn missing_channel_is_none() {
        let event = SlackCommandEvent {
            user_id: "U1".into(),
            response_url: "https://example.com".into(),
            ..SlackCommandEvent::default()
        };
        let task = task_from_command(&event, "corr".into());
        assert!(matches!(task.reply, ReplyRoute::Interaction { channel_id: None, .. }));
    }
}
