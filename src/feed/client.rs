//! Live feed client: connection ownership, alert dedup, and optimistic
//! mutations against the local snapshot cache.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, info, trace, warn};

use crate::config::FeedConfig;
use crate::domain::{NotificationId, WalletAddress};
use crate::error::Result;
use crate::port::{AlertSink, FeedEvent, FeedSnapshot, ListQuery, NotificationStore, NotificationStream};

use super::state::ConnectionState;

/// One wallet's live notification feed.
///
/// Owns the stream, the connection state machine, the seen-id set used for
/// alert dedup, and a local snapshot cache kept in sync with the server and
/// mutated optimistically.
pub struct FeedClient<S: NotificationStream> {
    stream: S,
    store: Arc<dyn NotificationStore>,
    alerts: Arc<dyn AlertSink>,
    wallet: WalletAddress,
    config: FeedConfig,
    state: ConnectionState,
    /// Ids already alerted on or present in a baseline. Survives reconnects,
    /// cleared only by [`FeedClient::stop`].
    seen: HashSet<NotificationId>,
    /// False until the first snapshot after a (re)connect has been consumed.
    baseline_received: bool,
    cache: FeedSnapshot,
}

impl<S: NotificationStream> FeedClient<S> {
    pub fn new(
        stream: S,
        store: Arc<dyn NotificationStore>,
        alerts: Arc<dyn AlertSink>,
        wallet: WalletAddress,
        config: FeedConfig,
    ) -> Self {
        Self {
            stream,
            store,
            alerts,
            wallet,
            config,
            state: ConnectionState::Disconnected,
            seen: HashSet::new(),
            baseline_received: false,
            cache: FeedSnapshot {
                notifications: Vec::new(),
                unread_count: 0,
            },
        }
    }

    #[must_use]
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// The local snapshot cache, as last synced or optimistically mutated.
    #[must_use]
    pub fn cache(&self) -> &FeedSnapshot {
        &self.cache
    }

    #[must_use]
    pub fn unread_count(&self) -> i64 {
        self.cache.unread_count
    }

    /// Open the stream. The next snapshot is treated as a baseline and
    /// never alerted.
    pub async fn connect(&mut self) -> Result<()> {
        self.state = ConnectionState::Connecting;
        match self.stream.connect(&self.wallet).await {
            Ok(()) => {
                self.state = ConnectionState::Connected;
                self.baseline_received = false;
                info!(wallet = %self.wallet, "Feed connected");
                Ok(())
            }
            Err(e) => {
                self.state = ConnectionState::Disconnected;
                Err(e)
            }
        }
    }

    /// Consume one stream event, bounded by the heartbeat window.
    ///
    /// Returns false when the connection is gone (disconnect frame, stream
    /// end, or heartbeat timeout) and the caller should reconnect.
    pub async fn process_next(&mut self) -> bool {
        let window = Duration::from_secs(self.config.heartbeat_timeout_secs);
        match tokio::time::timeout(window, self.stream.next_event()).await {
            Ok(Some(FeedEvent::Disconnected { reason })) => {
                warn!(reason = %reason, "Feed connection lost");
                false
            }
            Ok(Some(event)) => {
                self.handle_event(event);
                true
            }
            Ok(None) => {
                warn!("Feed stream ended");
                false
            }
            Err(_) => {
                warn!(
                    window_secs = self.config.heartbeat_timeout_secs,
                    "No feed message within heartbeat window"
                );
                false
            }
        }
    }

    /// Run the feed until the task is cancelled: connect, consume events,
    /// reconnect after the fixed delay whenever the connection drops.
    pub async fn run(&mut self) {
        let delay = Duration::from_secs(self.config.reconnect_delay_secs);
        loop {
            if self.state != ConnectionState::Connected {
                if let Err(e) = self.connect().await {
                    warn!(error = %e, delay_secs = self.config.reconnect_delay_secs, "Feed connect failed, retrying");
                    self.state = ConnectionState::Reconnecting;
                    tokio::time::sleep(delay).await;
                    continue;
                }
            }

            if !self.process_next().await {
                self.state = ConnectionState::Reconnecting;
                tokio::time::sleep(delay).await;
            }
        }
    }

    /// Tear the feed down: close the stream, forget seen ids and the
    /// baseline flag, drop the cache.
    pub async fn stop(&mut self) {
        self.stream.close().await;
        self.seen.clear();
        self.baseline_received = false;
        self.cache = FeedSnapshot {
            notifications: Vec::new(),
            unread_count: 0,
        };
        self.state = ConnectionState::Disconnected;
        info!(wallet = %self.wallet, "Feed stopped");
    }

    fn handle_event(&mut self, event: FeedEvent) {
        match event {
            FeedEvent::Connected => {
                debug!("Feed handshake acknowledged");
            }
            FeedEvent::Heartbeat => {
                trace!("Feed heartbeat");
            }
            FeedEvent::ServerError { message } => {
                warn!(message = %message, "Feed server error");
            }
            FeedEvent::Snapshot(snapshot) => self.apply_snapshot(snapshot),
            FeedEvent::Disconnected { .. } => {}
        }
    }

    /// Record a server snapshot. The first one after a (re)connect only
    /// seeds the seen set; later ones alert once per unseen unread item.
    fn apply_snapshot(&mut self, snapshot: FeedSnapshot) {
        let is_baseline = !self.baseline_received;
        self.baseline_received = true;
        let now = Utc::now();

        for notification in &snapshot.notifications {
            let unseen = self.seen.insert(notification.id.clone());
            if unseen && !is_baseline && notification.counts_as_unread(now) {
                self.alerts.raise(notification);
            }
        }

        debug!(
            count = snapshot.notifications.len(),
            unread = snapshot.unread_count,
            baseline = is_baseline,
            "Feed snapshot applied"
        );
        self.cache = snapshot;
    }

    /// Mark one notification read: apply locally, confirm with the store,
    /// refetch authoritative state if the confirm fails.
    pub async fn mark_read(&mut self, id: &NotificationId) -> Result<()> {
        if let Some(n) = self.cache.notifications.iter_mut().find(|n| &n.id == id) {
            if !n.read {
                n.read = true;
                self.cache.unread_count = (self.cache.unread_count - 1).max(0);
            }
        }
        let outcome = self.store.mark_read(id, &self.wallet).await.map(|_| ());
        self.confirm(outcome).await
    }

    /// Mark everything read, optimistically and in the store.
    pub async fn mark_all_read(&mut self) -> Result<()> {
        for n in &mut self.cache.notifications {
            n.read = true;
        }
        self.cache.unread_count = 0;
        let outcome = self.store.mark_all_read(&self.wallet).await.map(|_| ());
        self.confirm(outcome).await
    }

    /// Delete one notification, optimistically and in the store.
    pub async fn delete(&mut self, id: &NotificationId) -> Result<()> {
        let now = Utc::now();
        if let Some(index) = self.cache.notifications.iter().position(|n| &n.id == id) {
            let removed = self.cache.notifications.remove(index);
            if removed.counts_as_unread(now) {
                self.cache.unread_count = (self.cache.unread_count - 1).max(0);
            }
        }
        let outcome = self.store.delete(id, &self.wallet).await;
        self.confirm(outcome).await
    }

    /// Shared confirm step for optimistic mutations. On failure the local
    /// cache is replaced with authoritative store state and the original
    /// error is surfaced.
    async fn confirm(&mut self, outcome: Result<()>) -> Result<()> {
        if let Err(e) = outcome {
            warn!(error = %e, "Optimistic mutation rejected, refetching");
            if let Err(refetch_err) = self.refetch().await {
                warn!(error = %refetch_err, "Refetch after rejected mutation failed");
            }
            return Err(e);
        }
        Ok(())
    }

    /// Replace the cache with the store's view of this wallet.
    pub async fn refetch(&mut self) -> Result<()> {
        let notifications = self.store.list(&self.wallet, ListQuery::default()).await?;
        let unread_count = self.store.unread_count(&self.wallet).await?;
        self.cache = FeedSnapshot {
            notifications,
            unread_count,
        };
        Ok(())
    }
}
