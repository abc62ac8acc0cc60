//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`ledger`] - `StaticLedger` with fixed positions, events, or failures.
//! - [`oracle`] - `StaticOracle` serving a fixed price table.
//! - [`store`] - `MemoryStore` with full store semantics, `FailingStore`.
//! - [`channel`] - `RecordingChannel` capturing delivery requests.
//! - [`feed`] - `ScriptedFeed` (preloaded events) and `ChannelFeed`
//!   (on-demand event injection).
//! - [`alert`] - `RecordingAlerts` capturing raised alerts.

pub mod alert;
pub mod channel;
pub mod feed;
pub mod ledger;
pub mod oracle;
pub mod store;

pub use alert::RecordingAlerts;
pub use channel::RecordingChannel;
pub use feed::{ChannelFeed, FeedHandle, ScriptedFeed};
pub use ledger::StaticLedger;
pub use oracle::StaticOracle;
pub use store::{FailingStore, MemoryStore};
