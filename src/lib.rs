/// Recap - a Slack bot that summarizes recent channel history with an LLM.
///
/// The crate is split across two Lambda functions:
/// 1. An API function that receives slash commands and `@mentions`, acks
///    immediately and queues a task
/// 2. A worker function that reads channel history, asks the configured model
///    for a summary or an answer, and delivers the reply
///
/// Replies of any length go through [`delivery::Dispatcher`], which chunks
/// long text, packs attachments into messages within Slack's limits and
/// falls back to a short error notice when a send fails.
///
/// # Example
///
/// ```
/// use recap::delivery::{
///     DeliveryLimits, DisplayUnit, ReplyContent, ReplyPayload, plan_deliveries,
/// };
///
/// let unit = DisplayUnit::new("#4A90D9")
///     .with_title("Summary")
///     .with_body("word ".repeat(1000));
/// let payloads = plan_deliveries(ReplyContent::Units(vec![unit]), DeliveryLimits::default());
///
/// // A 5000-character body becomes two attachments that still fit one message.
/// assert_eq!(payloads.len(), 1);
/// assert!(matches!(&payloads[0], ReplyPayload::Units(units) if units.len() == 2));
/// ```
pub mod ai;
pub mod api;
pub mod core;
pub mod delivery;
pub mod errors;
pub mod slack;
pub mod utils;
pub mod worker;

use std::sync::OnceLock;

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{Registry, reload};

pub use core::config::LogLevel;
pub use errors::BotError;

static LOG_LEVEL_HANDLE: OnceLock<reload::Handle<LevelFilter, Registry>> = OnceLock::new();

/// Configure structured logging with JSON format for AWS Lambda environments.
///
/// Events below `level` are discarded. The subscriber is installed on the
/// first call; later calls only change the level.
///
/// # Example
///
/// ```
/// recap::setup_logging(recap::LogLevel::Info);
/// recap::setup_logging(recap::LogLevel::Debug);
/// assert!(tracing::enabled!(tracing::Level::DEBUG));
/// ```
pub fn setup_logging(level: LogLevel) {
    let filter = LevelFilter::from_level(level.into());
    let handle = LOG_LEVEL_HANDLE.get_or_init(|| {
        let (filter_layer, handle) = reload::Layer::new(filter);
        let fmt_layer = tracing_subscriber::fmt::layer().json().with_target(true);
        let _ = tracing_subscriber::registry()
            .with(filter_layer)
            .with(fmt_layer)
            .try_init();
        handle
    });

    // Errs only when some other global subscriber was already installed.
    let _ = handle.reload(filter);
}
