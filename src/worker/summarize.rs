use std::time::Duration;

use tracing::info;

use super::collect::{Transcript, collect_transcript};
use super::deliver::build_summary_unit;
use crate::ai::{ModelEntry, ModelRegistry, Prompt, question_prompt, summary_prompt};
use crate::core::models::{CommandAction, ProcessingTask};
use crate::delivery::ReplyContent;
use crate::errors::BotError;
use crate::slack::SlackClient;

pub const NO_MESSAGES_MESSAGE: &str = "No messages found to summarize.";

pub const HELP_TEXT: &str = "*Recap* reads recent channel messages and summarizes them.\n\
• `summarize [N]`: summarize the last N messages (default 50, max 1000)\n\
• `prompt <question>` or `ask <question>`: answer a question about recent messages\n\
• `models`: list the available models\n\
Options: `count=N`, `model=<name>` or `--model <name>`, `--dm` to receive the reply privately.";

/// Run `prompt` on `entry`, giving up after `timeout`.
///
/// # Errors
///
/// Returns `BotError::Timeout` when the deadline passes, or the provider's error.
pub async fn generate_with_timeout(
    entry: &ModelEntry,
    prompt: &Prompt,
    timeout: Duration,
) -> Result<String, BotError> {
    tokio::time::timeout(timeout, entry.provider.generate(&entry.model_id, prompt))
        .await
        .map_err(|_| BotError::Timeout(timeout.as_secs()))?
}

/// Execute the task's command and return what should be said.
///
/// # Errors
///
/// Returns an error if the model is unknown, history cannot be read or
/// generation fails.
pub async fn run_command(
    slack: &SlackClient,
    registry: &ModelRegistry,
    timeout: Duration,
    task: &ProcessingTask,
) -> Result<ReplyContent, BotError> {
    let command = &task.command;
    let question = match &command.action {
        CommandAction::Help => return Ok(HELP_TEXT.into()),
        CommandAction::Models => return Ok(registry.describe().into()),
        CommandAction::Summarize => None,
        CommandAction::Prompt(question) => Some(question.as_str()),
    };

    let entry = registry.resolve(command.model.as_deref())?;

    let Some(transcript) = collect_transcript(slack, &task.channel_id, command.count).await?
    else {
        return Ok(NO_MESSAGES_MESSAGE.into());
    };

    let Transcript {
        channel_name,
        message_count,
        text,
    } = transcript;

    let (title, prompt) = match question {
        None => (
            format!("Summary of #{channel_name}"),
            summary_prompt(&channel_name, &text),
        ),
        Some(question) => (
            format!("Answer from #{channel_name}"),
            question_prompt(&channel_name, &text, question),
        ),
    };

    info!(
        "Generating with {} over {} messages (correlation_id={})",
        entry.alias, message_count, task.correlation_id
    );

    let body = generate_with_timeout(entry, &prompt, timeout).await?;
    let unit = build_summary_unit(&title, &body, &entry.alias, message_count);
    Ok(ReplyContent::Units(vec![unit]))
}
