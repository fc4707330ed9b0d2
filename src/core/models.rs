use serde::{Deserialize, Serialize};

use crate::delivery::{DeferredInteraction, LiveMessage, ResponseState, ResponseTarget};

pub const DEFAULT_MESSAGE_COUNT: u32 = 50;
pub const MAX_MESSAGE_COUNT: u32 = 1000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "question", rename_all = "snake_case")]
pub enum CommandAction {
    Summarize,
    Prompt(String),
    Models,
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandArgs {
    pub action: CommandAction,
    pub count: u32,
    pub model: Option<String>,
    pub via_dm: bool,
}

impl Default for CommandArgs {
    fn default() -> Self {
        Self {
            action: CommandAction::Summarize,
            count: DEFAULT_MESSAGE_COUNT,
            model: None,
            via_dm: false,
        }
    }
}

/// Serialisable form of a [`ResponseTarget`], carried through the queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReplyRoute {
    Message {
        channel_id: String,
        ts: String,
        thread_ts: Option<String>,
    },
    Interaction {
        response_url: String,
        channel_id: Option<String>,
        state: ResponseState,
    },
}

impl ReplyRoute {
    #[must_use]
    pub fn into_target(self, user_id: impl Into<String>) -> ResponseTarget {
        let user_id = user_id.into();
        match self {
            Self::Message {
                channel_id,
                ts,
                thread_ts,
            } => ResponseTarget::LiveMessage(LiveMessage {
                channel_id,
                ts,
                thread_ts,
                user_id,
            }),
            Self::Interaction {
                response_url,
                channel_id,
                state,
            } => ResponseTarget::DeferredInteraction(DeferredInteraction {
                response_url,
                channel_id,
                user_id,
                state,
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingTask {
    pub correlation_id: String,
    pub user_id: String,
    /// Channel whose history is read.
    pub channel_id: String,
    /// Raw command text as typed.
    pub text: String,
    pub command: CommandArgs,
    pub reply: ReplyRoute,
}

impl ProcessingTask {
    #[must_use]
    pub fn target(&self) -> ResponseTarget {
        self.reply.clone().into_target(self.user_id.clone())
    }
}
