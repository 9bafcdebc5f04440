use crate::config::Config;
use lambda_runtime::{service_fn, LambdaEvent};
use serde_json::Value;

mod app;
mod config;
mod handler;

pub(crate) type Error = lambda_runtime::Error;

/// Boilerplate Lambda runtime code
#[tokio::main]
async fn main() -> Result<(), Error> {
    // the config is read once per cold start and shared by all invocations
    let config_owned = Config::new();
    let config_shared = &config_owned;

    // init the logger with the specified level
    config::init_tracing(config_shared.log_level);
    config_shared.log_summary();

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| async move {
        handler::my_handler(event, config_shared).await
    }))
    .await
}
