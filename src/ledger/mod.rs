//! Ledger and oracle REST adapters.

mod dto;
mod oracle;
mod translate;

pub use oracle::HttpOracleClient;
pub use translate::translate_event;

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client as HttpClient;
use tracing::{debug, warn};

use crate::domain::Position;
use crate::error::Result;
use crate::port::{LedgerEvent, LedgerQuery};

use dto::{EventsResponse, PositionsResponse};

const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Read-only HTTP client for the ledger query API.
pub struct HttpLedgerClient {
    http: HttpClient,
    base_url: String,
}

impl HttpLedgerClient {
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

    async fn get_json<T>(&self, url: &str) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let response = self.http.get(url).send().await?.error_for_status()?;
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl LedgerQuery for HttpLedgerClient {
    async fn open_positions(&self) -> Result<Vec<Position>> {
        let url = format!("{}/positions?status=active", self.base_url);
        let response: PositionsResponse = self.get_json(&url).await?;

        let positions: Vec<Position> = response
            .positions
            .into_iter()
            .map(dto::PositionDto::into_domain)
            .collect();
        debug!(count = positions.len(), "Fetched open positions");
        Ok(positions)
    }

    async fn events_since(&self, cursor: DateTime<Utc>) -> Result<Vec<LedgerEvent>> {
        let url = format!(
            "{}/events?since={}",
            self.base_url,
            cursor.to_rfc3339().replace('+', "%2B")
        );
        let response: EventsResponse = self.get_json(&url).await?;

        let mut events: Vec<LedgerEvent> = response
            .events
            .into_iter()
            .map(dto::EventDto::into_domain)
            .collect();
        events.sort_by_key(|e| e.occurred_at);
        debug!(count = events.len(), "Fetched ledger events");
        Ok(events)
    }
}
