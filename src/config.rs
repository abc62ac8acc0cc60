//! Application configuration loading and validation.
//!
//! Configuration is loaded from a TOML file with environment variable
//! overrides for sensitive values (`DELIVERY_API_KEY`, `TELEGRAM_BOT_TOKEN`).

use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::Path;
use tracing_subscriber::{fmt, EnvFilter};
use url::Url;

use crate::error::{ConfigError, Result};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub network: NetworkConfig,
    pub logging: LoggingConfig,
    #[serde(default)]
    pub scanner: ScannerConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub delivery: DeliveryConfig,
    #[serde(default)]
    pub telegram: TelegramConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NetworkConfig {
    /// Ledger query REST endpoint.
    pub ledger_api_url: String,
    /// Oracle price feed REST endpoint.
    pub oracle_api_url: String,
    /// Push-stream WebSocket endpoint for the live feed.
    pub feed_ws_url: String,
    /// Multi-channel delivery provider REST endpoint.
    pub delivery_api_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

/// Risk scanner tuning.
#[derive(Debug, Clone, Deserialize)]
pub struct ScannerConfig {
    /// Seconds between scan ticks. A tick firing while a scan is still
    /// running is skipped, not queued.
    #[serde(default = "default_scan_interval_secs")]
    pub interval_secs: u64,
    /// Collateral ratio (percent) below which a position enters the scan
    /// result.
    #[serde(default = "default_at_risk_buffer_pct")]
    pub at_risk_buffer_pct: Decimal,
    /// Oracle quotes older than this are skipped.
    #[serde(default = "default_price_staleness_secs")]
    pub price_staleness_secs: i64,
    /// Liquidation penalty percent awarded to the liquidator.
    #[serde(default = "default_liquidation_penalty_pct")]
    pub liquidation_penalty_pct: Decimal,
    /// Flat execution cost estimate in quote units. An approximation, not
    /// live fee data.
    #[serde(default = "default_gas_cost_estimate")]
    pub gas_cost_estimate: Decimal,
    /// Seconds between ledger event ingestion polls.
    #[serde(default = "default_event_poll_secs")]
    pub event_poll_secs: u64,
}

fn default_scan_interval_secs() -> u64 {
    30
}

fn default_at_risk_buffer_pct() -> Decimal {
    Decimal::from(120)
}

fn default_price_staleness_secs() -> i64 {
    300
}

fn default_liquidation_penalty_pct() -> Decimal {
    Decimal::from(5)
}

fn default_gas_cost_estimate() -> Decimal {
    Decimal::from(2)
}

fn default_event_poll_secs() -> u64 {
    15
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_scan_interval_secs(),
            at_risk_buffer_pct: default_at_risk_buffer_pct(),
            price_staleness_secs: default_price_staleness_secs(),
            liquidation_penalty_pct: default_liquidation_penalty_pct(),
            gas_cost_estimate: default_gas_cost_estimate(),
            event_poll_secs: default_event_poll_secs(),
        }
    }
}

/// Notification store settings.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_database_url")]
    pub database_url: String,
    /// Seconds between expiry sweeps.
    #[serde(default = "default_cleanup_interval_secs")]
    pub cleanup_interval_secs: u64,
}

fn default_database_url() -> String {
    "vaultwatch.db".to_string()
}

fn default_cleanup_interval_secs() -> u64 {
    3600
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            cleanup_interval_secs: default_cleanup_interval_secs(),
        }
    }
}

/// Live feed client settings.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    /// No message (heartbeat or data) within this window means the
    /// connection is lost.
    #[serde(default = "default_heartbeat_timeout_secs")]
    pub heartbeat_timeout_secs: u64,
    /// Fixed delay before a reconnect attempt. No backoff or jitter.
    #[serde(default = "default_reconnect_delay_secs")]
    pub reconnect_delay_secs: u64,
}

fn default_heartbeat_timeout_secs() -> u64 {
    45
}

fn default_reconnect_delay_secs() -> u64 {
    5
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            heartbeat_timeout_secs: default_heartbeat_timeout_secs(),
            reconnect_delay_secs: default_reconnect_delay_secs(),
        }
    }
}

/// Multi-channel delivery provider settings.
/// API key is loaded from `DELIVERY_API_KEY` at runtime, never from the file.
#[derive(Debug, Clone, Deserialize)]
pub struct DeliveryConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_key: None,
        }
    }
}

/// Telegram bot channel settings.
/// Bot token is loaded from `TELEGRAM_BOT_TOKEN` at runtime.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TelegramConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub chat_id: i64,
    #[serde(skip)]
    pub bot_token: Option<String>,
}

const fn default_true() -> bool {
    true
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;

        let mut config: Self = toml::from_str(&content).map_err(ConfigError::Parse)?;

        // Secrets come from the environment, never from the config file.
        config.delivery.api_key = std::env::var("DELIVERY_API_KEY").ok();
        config.telegram.bot_token = std::env::var("TELEGRAM_BOT_TOKEN").ok();

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.network.ledger_api_url.is_empty() {
            return Err(ConfigError::MissingField {
                field: "ledger_api_url",
            }
            .into());
        }
        if self.network.oracle_api_url.is_empty() {
            return Err(ConfigError::MissingField {
                field: "oracle_api_url",
            }
            .into());
        }
        if self.network.delivery_api_url.is_empty() {
            return Err(ConfigError::MissingField {
                field: "delivery_api_url",
            }
            .into());
        }
        let feed_url = Url::parse(&self.network.feed_ws_url).map_err(|e| {
            ConfigError::InvalidValue {
                field: "feed_ws_url",
                reason: e.to_string(),
            }
        })?;
        if feed_url.scheme() != "ws" && feed_url.scheme() != "wss" {
            return Err(ConfigError::InvalidValue {
                field: "feed_ws_url",
                reason: format!("expected ws:// or wss:// scheme, got {}", feed_url.scheme()),
            }
            .into());
        }
        if self.scanner.at_risk_buffer_pct <= Decimal::ZERO {
            return Err(ConfigError::InvalidValue {
                field: "at_risk_buffer_pct",
                reason: "must be positive".into(),
            }
            .into());
        }
        Ok(())
    }

    pub fn init_logging(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&self.logging.level));

        match self.logging.format.as_str() {
            "json" => {
                fmt().json().with_env_filter(filter).init();
            }
            _ => {
                fmt().with_env_filter(filter).init();
            }
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            network: NetworkConfig {
                ledger_api_url: "https://ledger.example.org/api".into(),
                oracle_api_url: "https://oracle.example.org/api".into(),
                feed_ws_url: "wss://feed.example.org/ws/notifications".into(),
                delivery_api_url: "https://delivery.example.org/api".into(),
            },
            logging: LoggingConfig {
                level: "info".into(),
                format: "pretty".into(),
            },
            scanner: ScannerConfig::default(),
            store: StoreConfig::default(),
            feed: FeedConfig::default(),
            delivery: DeliveryConfig {
                enabled: true,
                api_key: None,
            },
            telegram: TelegramConfig::default(),
        }
    }
}
