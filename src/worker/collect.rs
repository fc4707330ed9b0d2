//! Channel history collection and transcript formatting.

use std::collections::{HashMap, HashSet};

use chrono::DateTime;
use futures::future::join_all;
use slack_morphism::SlackHistoryMessage;
use tracing::{error, info};

use crate::errors::BotError;
use crate::slack::SlackClient;
use crate::utils::filters::filter_user_messages;

/// One message ready for the prompt.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptLine {
    /// Slack timestamp in seconds since the epoch.
    pub ts: f64,
    pub author: String,
    pub text: String,
}

/// Parse a Slack `ts` like `"1700000000.000100"`.
#[must_use]
pub fn parse_slack_ts(ts: &str) -> Option<f64> {
    ts.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn format_clock(ts: f64) -> String {
    #[allow(clippy::cast_possible_truncation)]
    let secs = ts.trunc() as i64;
    DateTime::from_timestamp(secs, 0)
        .map_or_else(|| "--:--".to_string(), |dt| dt.format("%H:%M").to_string())
}

/// Render lines oldest first as `[HH:MM] author: text` (UTC).
#[must_use]
pub fn format_transcript(mut lines: Vec<TranscriptLine>) -> String {
    lines.sort_by(|a, b| a.ts.total_cmp(&b.ts));
    lines
        .iter()
        .map(|line| format!("[{}] {}: {}", format_clock(line.ts), line.author, line.text))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Fetched and filtered history for one channel.
#[derive(Debug, Clone)]
pub struct Transcript {
    pub channel_name: String,
    pub message_count: usize,
    pub text: String,
}

/// Fetch the last `count` messages of `channel_id` and turn the human ones
/// into a transcript. Returns `None` when nothing is left to summarize.
///
/// # Errors
///
/// Returns an error if the history cannot be read.
pub async fn collect_transcript(
    slack: &SlackClient,
    channel_id: &str,
    count: u32,
) -> Result<Option<Transcript>, BotError> {
    let raw = slack.get_recent_messages(channel_id, count).await?;
    let bot_id = match slack.get_bot_user_id().await {
        Ok(id) => Some(id),
        Err(e) => {
            error!("Failed to resolve bot user id: {}", e);
            None
        }
    };
    let messages = filter_user_messages(raw, bot_id.as_deref());
    info!(
        "Collected {} messages from {} after filtering",
        messages.len(),
        channel_id
    );

    if messages.is_empty() {
        return Ok(None);
    }

    let channel_name = slack.get_channel_name(channel_id).await?;
    let names = resolve_authors(slack, &messages).await;

    let lines: Vec<TranscriptLine> = messages
        .iter()
        .map(|msg| {
            let author = msg.sender.user.as_ref().map_or_else(
                || "Unknown User".to_string(),
                |uid| names.get(&uid.0).cloned().unwrap_or_else(|| uid.0.clone()),
            );
            TranscriptLine {
                ts: parse_slack_ts(&msg.origin.ts.0).unwrap_or_default(),
                author,
                text: msg.content.text.clone().unwrap_or_default(),
            }
        })
        .collect();

    Ok(Some(Transcript {
        channel_name,
        message_count: lines.len(),
        text: format_transcript(lines),
    }))
}

/// Look up display names for every distinct author concurrently.
async fn resolve_authors(
    slack: &SlackClient,
    messages: &[SlackHistoryMessage],
) -> HashMap<String, String> {
    let user_ids: HashSet<String> = messages
        .iter()
        .filter_map(|msg| msg.sender.user.as_ref().map(|u| u.0.clone()))
        .collect();

    let fetches = user_ids
        .iter()
        .map(|uid| async move { (uid.clone(), slack.get_user_info(uid).await) });

    let mut names = HashMap::new();
    for (uid, res) in join_all(fetches).await {
        match res {
            Ok(name) => {
                names.insert(uid, name);
            }
            Err(e) => {
                error!("Failed to get user info for {}: {}", uid, e);
                names.insert(uid.clone(), uid);
            }
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(ts: f64, author: &str, text: &str) -> TranscriptLine {
        TranscriptLine {
            ts,
            author: author.to_string(),
            text: text.to_string(),
        }
    }

    #[test]
    fn transcript_is_chronological() {
        // 2023-11-14 22:13:20 UTC and two minutes later
        let lines = vec![
            line(1_700_000_120.0, "bo", "second"),
            line(1_700_000_000.000_1, "ana", "first"),
        ];
        assert_eq!(
            format_transcript(lines),
            "[22:13] ana: first\n[22:15] bo: second"
        );
    }

    #[test]
    fn parses_slack_timestamps() {
        assert_eq!(parse_slack_ts("1700000000.000100"), Some(1_700_000_000.000_1));
        assert_eq!(parse_slack_ts("not-a-ts"), None);
    }

    #[test]
    fn empty_transcript_is_empty_string() {
        assert_eq!(format_transcript(Vec::new()), "");
    }
}
