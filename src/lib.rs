pub mod cli;
pub mod core;
pub mod pipeline;
pub mod providers;
pub mod store;

use crate::core::{AppConfig, InvocationTimestamp};
use crate::pipeline::InvocationResponse;
use anyhow::Result;
use tracing::{debug, info};

/// Performs one invocation: load configuration, fetch the latest rates and
/// store them.
pub async fn run(config_path: Option<&str>) -> Result<InvocationResponse> {
    let timestamp = InvocationTimestamp::now();
    info!("Starting invocation at {timestamp}");

    let config = AppConfig::load(config_path)?;
    debug!("Loaded config: {config:#?}");

    run_with_config(&config, timestamp).await
}

pub async fn run_with_config(
    config: &AppConfig,
    timestamp: InvocationTimestamp,
) -> Result<InvocationResponse> {
    let provider =
        providers::OpenExchangeRatesProvider::new(&config.exchange_endpoint, &config.app_id);
    let store = store::build_object_store(config).await?;

    pipeline::invoke(config, &provider, store.as_ref(), timestamp).await
}
