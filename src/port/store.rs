//! Notification store port.

use async_trait::async_trait;

use crate::domain::{NewNotification, Notification, NotificationId, WalletAddress};
use crate::error::Result;

/// Paging and filtering options for [`NotificationStore::list`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ListQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub unread_only: bool,
}

impl ListQuery {
    /// First `limit` rows, unfiltered.
    #[must_use]
    pub fn first(limit: i64) -> Self {
        Self {
            limit: Some(limit),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn unread_only(mut self) -> Self {
        self.unread_only = true;
        self
    }
}

/// Durable per-wallet append-only notification log.
///
/// Every mutate operation is scoped by `(id, wallet)`; a cross-wallet
/// attempt fails with `StoreError::NotFound` and leaves the row unchanged.
#[async_trait]
pub trait NotificationStore: Send + Sync {
    /// Append a new notification. `read` defaults to false and the id is
    /// freshly generated.
    async fn create(&self, new: NewNotification) -> Result<Notification>;

    /// Mark a notification read. Idempotent: re-marking an already-read row
    /// succeeds and preserves the original `read_at`.
    async fn mark_read(&self, id: &NotificationId, wallet: &WalletAddress)
        -> Result<Notification>;

    /// Mark every unread notification for the wallet as read. Returns the
    /// number of rows updated; a second call is a no-op returning zero.
    async fn mark_all_read(&self, wallet: &WalletAddress) -> Result<usize>;

    /// Remove a notification scoped to its wallet.
    async fn delete(&self, id: &NotificationId, wallet: &WalletAddress) -> Result<()>;

    /// Page through a wallet's notifications, most recent first.
    async fn list(&self, wallet: &WalletAddress, query: ListQuery) -> Result<Vec<Notification>>;

    /// Count of unread, unexpired notifications for the wallet.
    async fn unread_count(&self, wallet: &WalletAddress) -> Result<i64>;

    /// Delete every expired row. Safe to run concurrently and repeatedly.
    async fn cleanup_expired(&self) -> Result<usize>;

    /// Distinct wallets present in the log. Used for broadcasts.
    async fn wallets(&self) -> Result<Vec<WalletAddress>>;
}
