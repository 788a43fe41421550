use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Url;
use tracing::{debug, info, instrument};

use crate::core::rates::{ExchangeRateDocument, RateProvider};

/// Fetches the latest rates from an openexchangerates-style endpoint, which
/// takes the credential and base currency as query parameters.
pub struct OpenExchangeRatesProvider {
    endpoint: String,
    app_id: String,
}

impl OpenExchangeRatesProvider {
    pub fn new(endpoint: &str, app_id: &str) -> Self {
        OpenExchangeRatesProvider {
            endpoint: endpoint.to_string(),
            app_id: app_id.to_string(),
        }
    }

    fn request_url(&self, base_rate: &str) -> Result<Url> {
        Url::parse_with_params(
            &self.endpoint,
            &[("app_id", self.app_id.as_str()), ("base", base_rate)],
        )
        .with_context(|| format!("Invalid exchange endpoint: {}", self.endpoint))
    }
}

#[async_trait]
impl RateProvider for OpenExchangeRatesProvider {
    #[instrument(name = "RatesFetch", skip(self), fields(base = %base_rate))]
    async fn fetch_rates(&self, base_rate: &str) -> Result<ExchangeRateDocument> {
        let url = self.request_url(base_rate)?;
        debug!("Requesting exchange rates from {}", self.endpoint);

        let client = reqwest::Client::builder().user_agent("fxsnap/1.0").build()?;
        let response = client
            .get(url)
            .send()
            .await
            .map_err(|e| {
                // The URL carries the credential, so it is kept out of the message.
                anyhow!(
                    "Request error: {} for base rate: {}",
                    e.without_url(),
                    base_rate
                )
            })?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for base rate: {}",
                response.status(),
                base_rate
            ));
        }

        let text = response.text().await?;
        let document: ExchangeRateDocument = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse JSON response for {}: {}", base_rate, e))?;

        info!("Fetched exchange rates for base {}", base_rate);
        Ok(document)
    }
}
