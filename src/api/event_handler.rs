//! Handler for Slack Events API callbacks.
//!
//! Answers the `url_verification` handshake and turns `app_mention` events
//! into queued tasks that reply in the mention's thread.

use serde_json::Value;
use tracing::{error, info};
use uuid::Uuid;

use super::helpers::{ok_empty, ok_text};
use super::parsing::{parse_command_text, strip_mentions, v_str};
use super::sqs;
use crate::core::config::AppConfig;
use crate::core::models::{ProcessingTask, ReplyRoute};

/// Build the task for an `app_mention` event, or `None` when it should be ignored.
#[must_use]
pub fn task_from_mention(event: &Value, correlation_id: String) -> Option<ProcessingTask> {
    // Ignore bot messages and edited/system messages to avoid loops
    if event.get("bot_id").is_some() || event.get("subtype").is_some() {
        return None;
    }

    let channel_id = v_str(event, &["channel"]).filter(|c| !c.is_empty())?;
    let ts = v_str(event, &["ts"]).filter(|t| !t.is_empty())?;
    let user_id = v_str(event, &["user"]).filter(|u| !u.is_empty())?;
    let raw_text = v_str(event, &["text"]).unwrap_or_default();
    let text = strip_mentions(raw_text);

    Some(ProcessingTask {
        correlation_id,
        user_id: user_id.to_string(),
        channel_id: channel_id.to_string(),
        command: parse_command_text(&text),
        text,
        reply: ReplyRoute::Message {
            channel_id: channel_id.to_string(),
            ts: ts.to_string(),
            thread_ts: v_str(event, &["thread_ts"]).map(ToString::to_string),
        },
    })
}

async fn handle_app_mention(config: &AppConfig, event: &Value) -> Value {
    let correlation_id = Uuid::new_v4().to_string();
    let Some(task) = task_from_mention(event, correlation_id) else {
        return ok_empty();
    };

    info!(
        "Mention from {} in {}, correlation_id={}",
        task.user_id, task.channel_id, task.correlation_id
    );

    if let Err(e) = sqs::send_to_sqs(&task, config).await {
        error!(
            "Failed to enqueue mention task (correlation_id={}): {}",
            task.correlation_id, e
        );
    }

    // Always ack; Slack redelivers unacked events.
    ok_empty()
}

/// Handle a JSON Events API body.
pub async fn handle_event_callback(config: &AppConfig, json_body: &Value) -> Value {
    let body_type = v_str(json_body, &["type"]).unwrap_or_default();

    if body_type == "url_verification" {
        let challenge = v_str(json_body, &["challenge"]).unwrap_or_default();
        return ok_text(challenge);
    }

    if body_type != "event_callback" {
        return ok_empty();
    }

    let Some(event) = json_body.get("event") else {
        return ok_empty();
    };

    let event_type = v_str(event, &["type"]).unwrap_or_default();
    info!(event_type = %event_type, "Processing event callback");

    match event_type {
        "app_mention" => handle_app_mention(config, event).await,
        _ => ok_empty(),
    }
}
