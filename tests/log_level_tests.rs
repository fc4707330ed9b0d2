//! Kept in its own test binary: it owns the process-wide subscriber.

use recap::core::config::AppConfig;
use recap::{LogLevel, setup_logging};
use tracing::Level;

#[test]
fn test_configured_level_replaces_startup_level() {
    setup_logging(LogLevel::Info);
    assert!(tracing::enabled!(Level::INFO));
    assert!(!tracing::enabled!(Level::DEBUG));

    let config = AppConfig::from_lookup(|key| match key {
        "PROCESSING_QUEUE_URL" => Some("https://sqs.example.com/queue".to_string()),
        "SLACK_BOT_TOKEN" => Some("xoxb-test".to_string()),
        "OPENAI_API_KEY" => Some("sk-test".to_string()),
        "LOG_LEVEL" => Some("debug".to_string()),
        _ => None,
    })
    .unwrap();
    setup_logging(config.log_level);
    assert!(tracing::enabled!(Level::DEBUG));

    setup_logging(LogLevel::Error);
    assert!(!tracing::enabled!(Level::WARN));
    assert!(tracing::enabled!(Level::ERROR));
}
