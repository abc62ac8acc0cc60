//! In-memory [`NotificationStore`] with the same observable semantics as
//! the SQLite adapter, plus an always-failing variant for error paths.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;

use crate::domain::{NewNotification, Notification, NotificationId, WalletAddress};
use crate::error::{Result, StoreError};
use crate::port::{ListQuery, NotificationStore};

#[derive(Default)]
pub struct MemoryStore {
    rows: Mutex<Vec<Notification>>,
    rejected: Mutex<Vec<WalletAddress>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every stored row, newest first.
    #[must_use]
    pub fn all(&self) -> Vec<Notification> {
        let mut rows = self.rows.lock().clone();
        rows.reverse();
        rows
    }

    /// Make every `create` for this wallet fail with a database error.
    /// Other wallets are unaffected.
    pub fn reject_creates_for(&self, wallet: WalletAddress) {
        self.rejected.lock().push(wallet);
    }
}

fn not_found(id: &NotificationId, wallet: &WalletAddress) -> crate::error::Error {
    StoreError::NotFound {
        id: id.to_string(),
        wallet: wallet.to_string(),
    }
    .into()
}

#[async_trait]
impl NotificationStore for MemoryStore {
    async fn create(&self, new: NewNotification) -> Result<Notification> {
        if self.rejected.lock().contains(&new.wallet_address) {
            return Err(StoreError::Database("injected failure".into()).into());
        }
        let notification = Notification {
            id: NotificationId::generate(),
            wallet_address: new.wallet_address,
            kind: new.kind,
            title: new.title,
            message: new.message,
            link: new.link,
            metadata: new.metadata,
            read: false,
            read_at: None,
            created_at: Utc::now(),
            expires_at: new.expires_at,
        };
        self.rows.lock().push(notification.clone());
        Ok(notification)
    }

    async fn mark_read(
        &self,
        id: &NotificationId,
        wallet: &WalletAddress,
    ) -> Result<Notification> {
        let mut rows = self.rows.lock();
        let row = rows
            .iter_mut()
            .find(|n| &n.id == id && &n.wallet_address == wallet)
            .ok_or_else(|| not_found(id, wallet))?;
        if !row.read {
            row.read = true;
            row.read_at = Some(Utc::now());
        }
        Ok(row.clone())
    }

    async fn mark_all_read(&self, wallet: &WalletAddress) -> Result<usize> {
        let mut rows = self.rows.lock();
        let now = Utc::now();
        let mut updated = 0;
        for row in rows
            .iter_mut()
            .filter(|n| &n.wallet_address == wallet && !n.read)
        {
            row.read = true;
            row.read_at = Some(now);
            updated += 1;
        }
        Ok(updated)
    }

    async fn delete(&self, id: &NotificationId, wallet: &WalletAddress) -> Result<()> {
        let mut rows = self.rows.lock();
        let before = rows.len();
        rows.retain(|n| !(&n.id == id && &n.wallet_address == wallet));
        if rows.len() == before {
            return Err(not_found(id, wallet));
        }
        Ok(())
    }

    async fn list(&self, wallet: &WalletAddress, query: ListQuery) -> Result<Vec<Notification>> {
        let rows = self.rows.lock();
        let mut matched: Vec<Notification> = rows
            .iter()
            .filter(|n| &n.wallet_address == wallet)
            .filter(|n| !query.unread_only || !n.read)
            .cloned()
            .collect();
        matched.reverse();

        let offset = query.offset.unwrap_or(0).max(0) as usize;
        let matched: Vec<Notification> = matched.into_iter().skip(offset).collect();
        Ok(match query.limit {
            Some(limit) => matched.into_iter().take(limit.max(0) as usize).collect(),
            None => matched,
        })
    }

    async fn unread_count(&self, wallet: &WalletAddress) -> Result<i64> {
        let now = Utc::now();
        let rows = self.rows.lock();
        Ok(rows
            .iter()
            .filter(|n| &n.wallet_address == wallet && n.counts_as_unread(now))
            .count() as i64)
    }

    async fn cleanup_expired(&self) -> Result<usize> {
        let now = Utc::now();
        let mut rows = self.rows.lock();
        let before = rows.len();
        rows.retain(|n| !n.is_expired(now));
        Ok(before - rows.len())
    }

    async fn wallets(&self) -> Result<Vec<WalletAddress>> {
        let rows = self.rows.lock();
        let mut wallets: Vec<WalletAddress> =
            rows.iter().map(|n| n.wallet_address.clone()).collect();
        wallets.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        wallets.dedup();
        Ok(wallets)
    }
}

/// A store whose every operation fails with a database error.
pub struct FailingStore;

fn injected() -> crate::error::Error {
    StoreError::Database("injected failure".into()).into()
}

#[async_trait]
impl NotificationStore for FailingStore {
    async fn create(&self, _new: NewNotification) -> Result<Notification> {
        Err(injected())
    }

    async fn mark_read(
        &self,
        _id: &NotificationId,
        _wallet: &WalletAddress,
    ) -> Result<Notification> {
        Err(injected())
    }

    async fn mark_all_read(&self, _wallet: &WalletAddress) -> Result<usize> {
        Err(injected())
    }

    async fn delete(&self, _id: &NotificationId, _wallet: &WalletAddress) -> Result<()> {
        Err(injected())
    }

    async fn list(&self, _wallet: &WalletAddress, _query: ListQuery) -> Result<Vec<Notification>> {
        Err(injected())
    }

    async fn unread_count(&self, _wallet: &WalletAddress) -> Result<i64> {
        Err(injected())
    }

    async fn cleanup_expired(&self) -> Result<usize> {
        Err(injected())
    }

    async fn wallets(&self) -> Result<Vec<WalletAddress>> {
        Err(injected())
    }
}
