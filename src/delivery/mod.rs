//! Reply delivery: splitting long output and sending it back to Slack.

pub mod batcher;
pub mod chunker;
pub mod dispatcher;
pub mod target;
pub mod unit;

pub use batcher::{DeliveryBatch, MESSAGE_SIZE_LIMIT, batch_units};
pub use chunker::{DESCRIPTION_LIMIT, chunk_text};
pub use dispatcher::{
    DM_CONFIRMATION, DeliveryLimits, Dispatcher, ERROR_REPLY_PREFIX, ReplyContent,
    plan_deliveries,
};
pub use target::{
    DeferredInteraction, LiveMessage, ReplyPayload, ReplyTransport, ResponseState,
    ResponseTarget, SentMessage,
};
pub use unit::{DisplayUnit, SUMMARY_COLOR};
