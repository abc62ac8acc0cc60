//! Read-only ledger query port.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Position, WalletAddress};
use crate::error::Result;

/// A ledger-emitted event with its human-readable detail text.
///
/// The detail text is opaque here; classification into a notification kind
/// happens behind the single translation boundary in `ledger::translate`.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerEvent {
    pub wallet: WalletAddress,
    pub detail: String,
    pub occurred_at: DateTime<Utc>,
}

/// Read-only access to position records on the external ledger.
///
/// Implementations never mutate ledger state.
#[async_trait]
pub trait LedgerQuery: Send + Sync {
    /// Fetch all currently open positions.
    async fn open_positions(&self) -> Result<Vec<Position>>;

    /// Fetch ledger events that occurred after `cursor`, oldest first.
    async fn events_since(&self, cursor: DateTime<Utc>) -> Result<Vec<LedgerEvent>>;
}
