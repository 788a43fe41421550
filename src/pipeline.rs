//! One invocation: fetch the latest rates, then publish them to storage.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fmt::{self, Display};
use tracing::info;

use crate::core::config::AppConfig;
use crate::core::rates::{ExchangeRateDocument, RateProvider};
use crate::core::storage::{JSON_CONTENT_TYPE, ObjectStore};
use crate::core::timestamp::InvocationTimestamp;

/// Object name for one invocation: `{base}_exchange_rates_as_of_{timestamp}.json`.
/// Two invocations in the same second share a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKey(String);

impl StorageKey {
    pub fn new(base_rate: &str, timestamp: &InvocationTimestamp) -> Self {
        Self(format!("{base_rate}_exchange_rates_as_of_{timestamp}.json"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationResponse {
    pub status_code: u16,
    pub body: String,
}

impl InvocationResponse {
    pub fn stored(timestamp: &InvocationTimestamp) -> Self {
        Self {
            status_code: 200,
            body: format!("Exchange rates as of {timestamp} stored in storage"),
        }
    }
}

pub async fn fetch_rates(
    provider: &dyn RateProvider,
    config: &AppConfig,
) -> Result<ExchangeRateDocument> {
    provider
        .fetch_rates(&config.base_rate)
        .await
        .with_context(|| {
            format!(
                "Failed to fetch exchange rates for base rate {}",
                config.base_rate
            )
        })
}

/// Writes `document` as UTF-8 JSON under the key derived from `base_rate` and
/// `timestamp`. Always a fresh full write.
pub async fn publish(
    store: &dyn ObjectStore,
    document: &ExchangeRateDocument,
    base_rate: &str,
    timestamp: &InvocationTimestamp,
) -> Result<StorageKey> {
    let key = StorageKey::new(base_rate, timestamp);
    let body = document
        .to_json_bytes()
        .context("Failed to encode exchange rates as JSON")?;

    store
        .put_object(key.as_str(), body, JSON_CONTENT_TYPE)
        .await
        .with_context(|| {
            format!(
                "Failed to store exchange rates at {}",
                store.location(key.as_str())
            )
        })?;

    info!("Stored exchange rates at {}", store.location(key.as_str()));
    Ok(key)
}

/// Runs fetch then publish. Publishing only happens after a successful fetch,
/// and any failure is returned as-is to the caller.
pub async fn invoke(
    config: &AppConfig,
    provider: &dyn RateProvider,
    store: &dyn ObjectStore,
    timestamp: InvocationTimestamp,
) -> Result<InvocationResponse> {
    let document = fetch_rates(provider, config).await?;
    publish(store, &document, &config.base_rate, &timestamp).await?;
    Ok(InvocationResponse::stored(&timestamp))
}
