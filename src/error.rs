use thiserror::Error;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Notification store errors.
///
/// `NotFound` doubles as the authorization boundary: a mutate against a
/// notification owned by a different wallet is indistinguishable from a
/// mutate against a missing id.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("notification {id} not found for wallet {wallet}")]
    NotFound { id: String, wallet: String },

    #[error("database error: {0}")]
    Database(String),

    #[error("connection pool error: {0}")]
    Pool(String),
}

/// Risk scanner errors.
///
/// These never cross the scanner boundary; the scan degrades to a smaller
/// valid result and logs instead. They exist so the ledger and oracle
/// adapters have something structured to return.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("ledger read failed: {0}")]
    LedgerUnavailable(String),

    #[error("no price for asset {asset}")]
    MissingPrice { asset: String },

    #[error("price for asset {asset} is stale (age {age_secs}s)")]
    StalePrice { asset: String, age_secs: i64 },
}

/// Delivery channel errors. Always caught and logged by the dispatcher,
/// never propagated to its caller.
#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("channel {channel} rejected delivery: {reason}")]
    Rejected { channel: String, reason: String },

    #[error("channel {channel} unavailable: {reason}")]
    Unavailable { channel: String, reason: String },
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Delivery(#[from] DeliveryError),

    #[error("WebSocket error: {0}")]
    WebSocket(Box<tokio_tungstenite::tungstenite::Error>),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("parse error: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<tokio_tungstenite::tungstenite::Error> for Error {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        Error::WebSocket(Box::new(err))
    }
}
