use lambda_runtime::{Error, LambdaEvent};
use serde_json::Value;
use tracing::{debug, error, info};

use super::{deliver, summarize};
use crate::ai::ModelRegistry;
use crate::core::config::AppConfig;
use crate::core::models::ProcessingTask;
use crate::delivery::Dispatcher;
use crate::slack::SlackClient;

/// Pull the `ProcessingTask` out of an SQS event.
///
/// # Errors
///
/// Returns an error if the record body is missing or not a task.
pub fn parse_task(payload: &Value) -> Result<ProcessingTask, Error> {
    payload
        .get("Records")
        .and_then(|records| records.as_array())
        .and_then(|records| records.first())
        .and_then(|record| record.get("body"))
        .and_then(|body| body.as_str())
        .ok_or_else(|| Error::from("Failed to extract SQS message body"))
        .and_then(|body_str| {
            serde_json::from_str(body_str).map_err(|e| {
                Error::from(format!(
                    "Failed to parse SQS message body into ProcessingTask: {e}"
                ))
            })
        })
}

/// Lambda handler for the Worker entrypoint. Parses the SQS message, runs the
/// command and delivers the reply.
///
/// # Errors
///
/// Returns an error for bad configuration or an unreadable task. Command and
/// delivery failures are reported to the user instead.
pub async fn function_handler(event: LambdaEvent<Value>) -> Result<(), Error> {
    let config = AppConfig::from_env().map_err(|e| {
        error!("Config error: {}", e);
        Error::from(e)
    })?;

    let task = parse_task(&event.payload)?;
    info!(
        "Processing task correlation_id={} action={:?}",
        task.correlation_id, task.command.action
    );
    debug!("Command text: {:?}", task.text);

    let slack = SlackClient::new(config.slack_bot_token.clone());
    let dispatcher = Dispatcher::new(&slack, config.delivery_limits());

    let outcome = match ModelRegistry::from_config(&config) {
        Ok(registry) => {
            summarize::run_command(&slack, &registry, config.llm_timeout(), &task).await
        }
        Err(e) => Err(e),
    };

    deliver::deliver_outcome(&dispatcher, &task, outcome).await;
    Ok(())
}

pub use self::function_handler as handler;
