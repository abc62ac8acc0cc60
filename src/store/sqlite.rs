//! SQLite notification store implementation.
//!
//! Implements the [`NotificationStore`] port on top of Diesel/SQLite. All
//! mutating queries are scoped by `(id, wallet_address)` so a cross-wallet
//! mutate is indistinguishable from a missing row.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;

use super::connection::DbPool;
use super::model::NotificationRow;
use super::schema::notifications;
use crate::domain::{NewNotification, Notification, NotificationId, WalletAddress};
use crate::error::{Error, Result, StoreError};
use crate::port::{ListQuery, NotificationStore};

/// Diesel-backed notification store.
pub struct SqliteNotificationStore {
    /// Database connection pool.
    pool: DbPool,
}

impl SqliteNotificationStore {
    /// Create a new store with the given connection pool.
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> Result<diesel::r2d2::PooledConnection<diesel::r2d2::ConnectionManager<SqliteConnection>>> {
        self.pool
            .get()
            .map_err(|e| StoreError::Pool(e.to_string()).into())
    }

    fn not_found(id: &NotificationId, wallet: &WalletAddress) -> Error {
        StoreError::NotFound {
            id: id.to_string(),
            wallet: wallet.to_string(),
        }
        .into()
    }
}

fn db_err(e: diesel::result::Error) -> Error {
    StoreError::Database(e.to_string()).into()
}

#[async_trait]
impl NotificationStore for SqliteNotificationStore {
    async fn create(&self, new: NewNotification) -> Result<Notification> {
        let row = NotificationRow::from_new(&new, Utc::now())?;
        let mut conn = self.conn()?;

        diesel::insert_into(notifications::table)
            .values(&row)
            .execute(&mut conn)
            .map_err(db_err)?;

        row.into_domain()
    }

    async fn mark_read(
        &self,
        id: &NotificationId,
        wallet: &WalletAddress,
    ) -> Result<Notification> {
        let mut conn = self.conn()?;

        // Only unread rows are touched, so a repeated mark keeps the
        // original read_at.
        diesel::update(
            notifications::table
                .filter(notifications::id.eq(id.as_str()))
                .filter(notifications::wallet_address.eq(wallet.as_str()))
                .filter(notifications::read.eq(false)),
        )
        .set((
            notifications::read.eq(true),
            notifications::read_at.eq(Some(Utc::now().to_rfc3339())),
        ))
        .execute(&mut conn)
        .map_err(db_err)?;

        let row: Option<NotificationRow> = notifications::table
            .filter(notifications::id.eq(id.as_str()))
            .filter(notifications::wallet_address.eq(wallet.as_str()))
            .first(&mut conn)
            .optional()
            .map_err(db_err)?;

        row.ok_or_else(|| Self::not_found(id, wallet))?.into_domain()
    }

    async fn mark_all_read(&self, wallet: &WalletAddress) -> Result<usize> {
        let mut conn = self.conn()?;

        diesel::update(
            notifications::table
                .filter(notifications::wallet_address.eq(wallet.as_str()))
                .filter(notifications::read.eq(false)),
        )
        .set((
            notifications::read.eq(true),
            notifications::read_at.eq(Some(Utc::now().to_rfc3339())),
        ))
        .execute(&mut conn)
        .map_err(db_err)
    }

    async fn delete(&self, id: &NotificationId, wallet: &WalletAddress) -> Result<()> {
        let mut conn = self.conn()?;

        let deleted = diesel::delete(
            notifications::table
                .filter(notifications::id.eq(id.as_str()))
                .filter(notifications::wallet_address.eq(wallet.as_str())),
        )
        .execute(&mut conn)
        .map_err(db_err)?;

        if deleted == 0 {
            return Err(Self::not_found(id, wallet));
        }
        Ok(())
    }

    async fn list(&self, wallet: &WalletAddress, query: ListQuery) -> Result<Vec<Notification>> {
        let mut conn = self.conn()?;

        let mut stmt = notifications::table
            .filter(notifications::wallet_address.eq(wallet.as_str()))
            .order((notifications::created_at.desc(), notifications::id.desc()))
            .into_boxed();

        if query.unread_only {
            stmt = stmt.filter(notifications::read.eq(false));
        }
        if let Some(limit) = query.limit {
            stmt = stmt.limit(limit);
        }
        if let Some(offset) = query.offset {
            stmt = stmt.offset(offset);
        }

        let rows: Vec<NotificationRow> = stmt.load(&mut conn).map_err(db_err)?;
        rows.into_iter().map(NotificationRow::into_domain).collect()
    }

    async fn unread_count(&self, wallet: &WalletAddress) -> Result<i64> {
        let mut conn = self.conn()?;
        let now = Utc::now().to_rfc3339();

        notifications::table
            .filter(notifications::wallet_address.eq(wallet.as_str()))
            .filter(notifications::read.eq(false))
            .filter(
                notifications::expires_at
                    .is_null()
                    .or(notifications::expires_at.gt(now)),
            )
            .count()
            .get_result(&mut conn)
            .map_err(db_err)
    }

    async fn cleanup_expired(&self) -> Result<usize> {
        let mut conn = self.conn()?;
        let now = Utc::now().to_rfc3339();

        diesel::delete(
            notifications::table
                .filter(notifications::expires_at.is_not_null())
                .filter(notifications::expires_at.le(now)),
        )
        .execute(&mut conn)
        .map_err(db_err)
    }

    async fn wallets(&self) -> Result<Vec<WalletAddress>> {
        let mut conn = self.conn()?;

        let addresses: Vec<String> = notifications::table
            .select(notifications::wallet_address)
            .distinct()
            .load(&mut conn)
            .map_err(db_err)?;

        Ok(addresses.into_iter().map(WalletAddress::from).collect())
    }
}
