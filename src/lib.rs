//! Vaultwatch - risk monitoring and notifications for collateralized debt
//! positions.
//!
//! Watches ledger positions against oracle prices, warns wallets before
//! they cross the liquidation threshold, keeps a durable per-wallet
//! notification log, and serves a live notification feed.
//!
//! # Architecture
//!
//! The crate separates a pure domain core from adapters behind port traits:
//!
//! - **`scanner`** - Periodic health scan, at-risk ranking, and
//!   boundary-crossing detection between scans
//! - **`dispatch`** - Store-first notification dispatch with detached
//!   multi-channel fan-out and a single classification table
//! - **`store`** - Diesel/SQLite notification log with expiry sweeps
//! - **`feed`** - WebSocket live feed client: baseline suppression,
//!   seen-id alert dedup, heartbeat timeout, fixed-delay reconnect,
//!   optimistic mutations
//!
//! # Modules
//!
//! - [`config`] - TOML configuration with env-var secrets
//! - [`domain`] - Positions, health math, notifications, price quotes
//! - [`error`] - Error types for the crate
//! - [`port`] - Traits at the seams: store, channels, ledger, oracle, feed
//! - [`ledger`] - REST adapters for the ledger and oracle, plus the event
//!   text translation boundary
//! - [`app`] - Application orchestration
//!
//! # Features
//!
//! - `telegram` - Telegram bot delivery channel (enabled by default)
//! - `testkit` - Scripted fakes for integration tests

pub mod app;
pub mod config;
pub mod dispatch;
pub mod domain;
pub mod error;
pub mod feed;
pub mod ledger;
pub mod port;
pub mod scanner;
pub mod store;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;

pub use error::{Error, Result};
