//! API Lambda handler - thin router that delegates to specialized handlers.
//!
//! JSON bodies go to the Events API handler, form-encoded bodies are slash
//! commands.

use super::{event_handler, helpers, slash_handler};
use crate::core::config::AppConfig;
use lambda_runtime::{Error, LambdaEvent};
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info};

pub use self::function_handler as handler;

/// Lambda handler for the API entrypoint.
///
/// # Errors
///
/// Returns an error only when configuration cannot be loaded; malformed
/// requests produce a 400 response payload instead.
#[tracing::instrument(level = "info", skip(event))]
pub async fn function_handler(event: LambdaEvent<Value>) -> Result<impl Serialize, Error> {
    let config = AppConfig::from_env().map_err(|e| {
        error!("Config error: {}", e);
        Error::from(e)
    })?;
    info!("API Lambda received request");

    Ok(route_request(&config, &event.payload).await)
}

/// Route one HTTP request payload.
pub async fn route_request(config: &AppConfig, payload: &Value) -> Value {
    let body = match extract_body(payload) {
        Ok(b) => b,
        Err(response) => return response,
    };

    // Try parsing as JSON for Events API
    if let Ok(json_body) = serde_json::from_str::<Value>(body)
        && json_body.is_object()
    {
        return event_handler::handle_event_callback(config, &json_body).await;
    }

    // Slash command (form-encoded)
    match slash_handler::handle_slash_command(config, body).await {
        Ok(response) => response,
        Err(e) => {
            error!("Failed to parse Slack event: {}", e);
            helpers::err_response(400, &format!("Parse Error: {e}"))
        }
    }
}

fn extract_body(payload: &Value) -> Result<&str, Value> {
    let Some(body) = payload.get("body") else {
        error!("Request missing body");
        return Err(helpers::err_response(400, "Missing body"));
    };

    let Some(body_str) = body.as_str() else {
        error!("Request body is not a string");
        return Err(helpers::err_response(400, "Invalid body format"));
    };

    Ok(body_str)
}
