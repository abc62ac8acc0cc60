//! Oracle price feed REST adapter.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use tracing::warn;

use crate::domain::{CollateralAsset, PriceQuote};
use crate::error::Result;
use crate::port::PriceOracle;

use super::dto::PriceDto;

const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for the oracle price API.
pub struct HttpOracleClient {
    http: HttpClient,
    base_url: String,
}

impl HttpOracleClient {
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        let http = HttpClient::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .unwrap_or_else(|err| {
                warn!(error = %err, "Failed to build HTTP client, using defaults");
                HttpClient::new()
            });

        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl PriceOracle for HttpOracleClient {
    async fn quote(&self, asset: &CollateralAsset) -> Result<PriceQuote> {
        let url = format!("{}/prices/{}", self.base_url, asset);
        let response = self.http.get(&url).send().await?.error_for_status()?;
        let dto: PriceDto = response.json().await?;
        Ok(dto.into_domain())
    }
}
