use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::BotError;
use crate::core::models::{CommandAction, CommandArgs, DEFAULT_MESSAGE_COUNT, MAX_MESSAGE_COUNT};
use crate::slack::command_parser::{SlackCommandEvent, parse_form_data};

static MENTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<@[A-Z0-9]+(?:\|[^>]*)?>").expect("static regex compile"));

pub fn v_path<'a>(root: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut cur = root;
    for key in path {
        cur = cur.get(*key)?;
    }
    Some(cur)
}

pub fn v_str<'a>(root: &'a Value, path: &[&str]) -> Option<&'a str> {
    v_path(root, path).and_then(|v| v.as_str())
}

/// # Errors
///
/// Returns `BotError::ParseError` if the form body cannot be decoded.
pub fn parse_slack_event(payload: &str) -> Result<SlackCommandEvent, BotError> {
    parse_form_data(payload)
        .map_err(|e| BotError::ParseError(format!("Failed to parse form data: {e}")))
}

/// Remove `<@U123>` user mentions and collapse the remaining whitespace.
#[must_use]
pub fn strip_mentions(text: &str) -> String {
    MENTION_RE
        .replace_all(text, " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn clamp_count(count: u32) -> u32 {
    count.clamp(1, MAX_MESSAGE_COUNT)
}

/// Parse the command text of a slash command or a mention.
///
/// ```
/// use recap::api::parsing::parse_command_text;
/// use recap::core::models::CommandAction;
///
/// let args = parse_command_text("ask what did we decide? model=claude-haiku --dm");
/// assert_eq!(args.action, CommandAction::Prompt("what did we decide?".into()));
/// assert_eq!(args.model.as_deref(), Some("claude-haiku"));
/// assert!(args.via_dm);
/// ```
#[must_use]
pub fn parse_command_text(text: &str) -> CommandArgs {
    let mut tokens = text.split_whitespace().peekable();
    let mut args = CommandArgs::default();

    let verb = tokens.peek().map(|t| t.to_ascii_lowercase());
    let is_prompt = match verb.as_deref() {
        Some("summarize" | "summarise" | "summary") => {
            tokens.next();
            false
        }
        Some("prompt" | "ask") => {
            tokens.next();
            true
        }
        Some("models") => {
            args.action = CommandAction::Models;
            return args;
        }
        Some("help" | "?") => {
            args.action = CommandAction::Help;
            return args;
        }
        _ => false,
    };

    let mut question: Vec<&str> = Vec::new();
    let mut count = None;

    while let Some(token) = tokens.next() {
        let lowered = token.to_ascii_lowercase();
        if lowered == "--dm" {
            args.via_dm = true;
        } else if lowered == "--model" {
            if let Some(alias) = tokens.next() {
                args.model = Some(alias.to_ascii_lowercase());
            }
        } else if let Some(alias) = lowered.strip_prefix("model=") {
            if !alias.is_empty() {
                args.model = Some(alias.to_string());
            }
        } else if let Some(raw) = lowered.strip_prefix("count=") {
            count = raw.parse::<u32>().ok().or(count);
        } else if is_prompt {
            question.push(token);
        } else if lowered == "last" {
            if let Some(n) = tokens.peek().and_then(|n| n.parse::<u32>().ok()) {
                tokens.next();
                count = Some(n);
            }
        } else if let Ok(n) = token.parse::<u32>() {
            count = Some(n);
        }
    }

    args.count = count.map_or(DEFAULT_MESSAGE_COUNT, clamp_count);

    if is_prompt {
        let question = question.join(" ");
        args.action = if question.trim().is_empty() {
            CommandAction::Help
        } else {
            CommandAction::Prompt(question)
        };
    }

    args
}

pub fn get_header_value<'a>(headers: &'a Value, name: &str) -> Option<&'a str> {
    if let Some(v) = headers.get(name).and_then(|s| s.as_str()) {
        return Some(v);
    }
    headers.as_object().and_then(|map| {
        map.iter().find_map(|(k, v)| {
            if k.eq_ignore_ascii_case(name) {
                v.as_str()
            } else {
                None
            }
        })
    })
}
