use recap::core::config::AppConfig;
use recap::api::handler;

#[tokio::main]
async fn main() -> Result<(), lambda_runtime::Error> {
    // Config errors are reported per request by the handler.
    let level = AppConfig::from_env()
        .map(|config| config.log_level)
        .unwrap_or_default();
    recap::setup_logging(level);
    lambda_runtime::run(lambda_runtime::service_fn(handler)).await
}
