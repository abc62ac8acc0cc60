//! Notification dispatch.
//!
//! Every notification is written to the durable store first; that write is
//! the authoritative outcome of a send. External channel deliveries run on
//! detached tasks afterwards, so a slow or failing provider never blocks
//! the caller and never fails the send.

mod classify;
pub mod channel;

use std::sync::Arc;

use chrono::{Duration, Utc};
use futures_util::future::join_all;
use rust_decimal::Decimal;
use serde_json::json;
use tracing::{debug, warn};

use crate::domain::{
    CollateralAsset, HealthMetrics, NewNotification, Notification, NotificationKind, WalletAddress,
};
use crate::error::Result;
use crate::port::{ChannelKind, DeliveryAction, DeliveryChannel, DeliveryRequest, NotificationStore, Priority};

pub use classify::{classify, Classification};

/// How long broadcast announcements stay in each wallet's log.
const ANNOUNCEMENT_TTL_DAYS: i64 = 30;

/// Message content for one send, independent of routing.
#[derive(Debug, Clone)]
pub struct Payload {
    pub title: String,
    pub body: String,
    pub link: Option<String>,
    pub actions: Vec<DeliveryAction>,
}

impl Payload {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            link: None,
            actions: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    #[must_use]
    pub fn with_action(mut self, label: impl Into<String>, url: impl Into<String>) -> Self {
        self.actions.push(DeliveryAction {
            label: label.into(),
            url: url.into(),
        });
        self
    }
}

/// Routing for one send: who, over which channels, how urgently.
#[derive(Debug, Clone)]
pub struct SendOptions {
    pub wallet: WalletAddress,
    pub channels: Vec<ChannelKind>,
    pub priority: Priority,
    pub metadata: Option<serde_json::Value>,
    pub expires_at: Option<chrono::DateTime<Utc>>,
}

impl SendOptions {
    pub fn new(wallet: WalletAddress, classification: Classification) -> Self {
        Self {
            wallet,
            channels: classification.channels.to_vec(),
            priority: classification.priority,
            metadata: None,
            expires_at: None,
        }
    }
}

/// Outcome of a broadcast: which wallets got a stored notification and
/// which failed, with the failure reason.
#[derive(Debug, Default)]
pub struct BroadcastReport {
    pub sent: Vec<WalletAddress>,
    pub failed: Vec<(WalletAddress, String)>,
}

impl BroadcastReport {
    /// True when every wallet received the announcement.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.sent.len() + self.failed.len()
    }
}

/// Routes notifications to the store and to external channels.
pub struct Dispatcher {
    store: Arc<dyn NotificationStore>,
    channels: Vec<Arc<dyn DeliveryChannel>>,
}

impl Dispatcher {
    pub fn new(store: Arc<dyn NotificationStore>, channels: Vec<Arc<dyn DeliveryChannel>>) -> Self {
        Self { store, channels }
    }

    /// Send one notification: store synchronously, then fan out to the
    /// requested channels on detached tasks.
    ///
    /// Returns the stored record. A store failure fails the send; channel
    /// failures are logged and isolated per channel.
    pub async fn send(
        &self,
        kind: NotificationKind,
        payload: Payload,
        options: SendOptions,
    ) -> Result<Notification> {
        let mut new = NewNotification::new(
            options.wallet.clone(),
            kind,
            payload.title.clone(),
            payload.body.clone(),
        );
        if let Some(link) = payload.link.clone() {
            new = new.with_link(link);
        }
        if let Some(metadata) = options.metadata.clone() {
            new = new.with_metadata(metadata);
        }
        if let Some(expires_at) = options.expires_at {
            new = new.with_expiry(expires_at);
        }

        let notification = self.store.create(new).await?;
        debug!(
            id = %notification.id,
            wallet = %notification.wallet_address,
            kind = %kind,
            "Notification stored"
        );

        for requested in &options.channels {
            for channel in self.channels.iter().filter(|c| c.kind() == *requested) {
                let channel = Arc::clone(channel);
                let request = DeliveryRequest {
                    recipient: options.wallet.clone(),
                    title: payload.title.clone(),
                    body: payload.body.clone(),
                    actions: payload.actions.clone(),
                    priority: options.priority,
                };
                tokio::spawn(async move {
                    if let Err(e) = channel.deliver(&request).await {
                        warn!(channel = %channel.kind(), error = %e, "Channel delivery failed");
                    }
                });
            }
        }

        Ok(notification)
    }

    /// Confirmation after a successful borrow.
    pub async fn notify_borrow_success(
        &self,
        wallet: WalletAddress,
        amount: Decimal,
    ) -> Result<Notification> {
        let kind = NotificationKind::BorrowSuccess;
        let class = classify(kind);
        let payload = Payload::new(class.title, format!("You borrowed {amount} against your collateral"));
        let options = SendOptions::new(wallet, class);
        self.send(kind, payload, options).await
    }

    /// Confirmation after a successful repayment.
    pub async fn notify_repay_success(
        &self,
        wallet: WalletAddress,
        amount: Decimal,
    ) -> Result<Notification> {
        let kind = NotificationKind::RepaySuccess;
        let class = classify(kind);
        let payload = Payload::new(class.title, format!("You repaid {amount} of your debt"));
        let options = SendOptions::new(wallet, class);
        self.send(kind, payload, options).await
    }

    /// Confirmation after collateral was deposited.
    pub async fn notify_collateral_added(
        &self,
        wallet: WalletAddress,
        amount: Decimal,
        asset: &CollateralAsset,
    ) -> Result<Notification> {
        let kind = NotificationKind::CollateralAdded;
        let class = classify(kind);
        let payload = Payload::new(
            class.title,
            format!("You added {amount} {asset} to your position"),
        );
        let options = SendOptions::new(wallet, class);
        self.send(kind, payload, options).await
    }

    /// Confirmation after collateral was withdrawn.
    pub async fn notify_collateral_removed(
        &self,
        wallet: WalletAddress,
        amount: Decimal,
        asset: &CollateralAsset,
    ) -> Result<Notification> {
        let kind = NotificationKind::CollateralRemoved;
        let class = classify(kind);
        let payload = Payload::new(
            class.title,
            format!("You withdrew {amount} {asset} from your position"),
        );
        let options = SendOptions::new(wallet, class);
        self.send(kind, payload, options).await
    }

    /// High-priority warning when a position crosses into the at-risk band.
    pub async fn notify_position_health_warning(
        &self,
        wallet: WalletAddress,
        metrics: &HealthMetrics,
    ) -> Result<Notification> {
        let kind = NotificationKind::HealthWarning;
        let class = classify(kind);
        let payload = Payload::new(
            class.title,
            format!(
                "Your collateral ratio dropped to {}. Add collateral or repay debt to avoid liquidation.",
                metrics.collateral_ratio
            ),
        )
        .with_action("Manage position", "/positions");
        let mut options = SendOptions::new(wallet, class);
        options.metadata = Some(json!({
            "collateralRatio": metrics.collateral_ratio,
            "healthFactor": metrics.health_factor,
            "requiredCollateral": metrics.required_collateral,
        }));
        self.send(kind, payload, options).await
    }

    /// High-priority notice when a position falls below the liquidation
    /// threshold.
    pub async fn notify_liquidation(
        &self,
        wallet: WalletAddress,
        metrics: &HealthMetrics,
    ) -> Result<Notification> {
        let kind = NotificationKind::Liquidated;
        let class = classify(kind);
        let payload = Payload::new(
            class.title,
            format!(
                "Your position fell below the liquidation threshold at {} and is eligible for liquidation.",
                metrics.collateral_ratio
            ),
        )
        .with_action("View details", "/positions");
        let mut options = SendOptions::new(wallet, class);
        options.metadata = Some(json!({
            "collateralRatio": metrics.collateral_ratio,
            "healthFactor": metrics.health_factor,
        }));
        self.send(kind, payload, options).await
    }

    /// Broadcast a protocol announcement to every known wallet.
    ///
    /// Sends run concurrently and independently; one wallet's store failure
    /// never aborts the rest. The report lists both outcomes per wallet.
    pub async fn notify_protocol_update(
        &self,
        title: &str,
        message: &str,
    ) -> Result<BroadcastReport> {
        let kind = NotificationKind::ProtocolUpdate;
        let class = classify(kind);
        let wallets = self.store.wallets().await?;
        let expires_at = Utc::now() + Duration::days(ANNOUNCEMENT_TTL_DAYS);

        let sends = wallets.into_iter().map(|wallet| {
            let payload = Payload::new(title, message);
            let mut options = SendOptions::new(wallet.clone(), class);
            options.expires_at = Some(expires_at);
            async move { (wallet, self.send(kind, payload, options).await) }
        });

        let mut report = BroadcastReport::default();
        for (wallet, outcome) in join_all(sends).await {
            match outcome {
                Ok(_) => report.sent.push(wallet),
                Err(e) => {
                    warn!(wallet = %wallet, error = %e, "Broadcast send failed");
                    report.failed.push((wallet, e.to_string()));
                }
            }
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::{FailingStore, MemoryStore, RecordingChannel};

    fn dispatcher_with(
        store: Arc<dyn NotificationStore>,
        channels: Vec<Arc<dyn DeliveryChannel>>,
    ) -> Dispatcher {
        Dispatcher::new(store, channels)
    }

    #[tokio::test]
    async fn send_stores_before_returning() {
        let store = Arc::new(MemoryStore::new());
        let dispatcher = dispatcher_with(store.clone(), vec![]);

        let stored = dispatcher
            .notify_borrow_success(WalletAddress::from("0xa"), Decimal::from(100))
            .await
            .unwrap();

        assert_eq!(stored.kind, NotificationKind::BorrowSuccess);
        assert!(!stored.read);
        assert_eq!(store.unread_count(&WalletAddress::from("0xa")).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn store_failure_fails_the_send() {
        let dispatcher = dispatcher_with(Arc::new(FailingStore), vec![]);

        let result = dispatcher
            .notify_repay_success(WalletAddress::from("0xa"), Decimal::from(50))
            .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn channel_failure_does_not_fail_the_send() {
        let store = Arc::new(MemoryStore::new());
        let push = Arc::new(RecordingChannel::failing(ChannelKind::Push));
        let dispatcher = dispatcher_with(store.clone(), vec![push.clone() as Arc<dyn DeliveryChannel>]);

        let result = dispatcher
            .notify_borrow_success(WalletAddress::from("0xa"), Decimal::from(10))
            .await;

        assert!(result.is_ok());
        push.wait_for_deliveries(1).await;
        assert_eq!(store.unread_count(&WalletAddress::from("0xa")).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn fan_out_reaches_every_registered_channel_for_the_kind() {
        let store = Arc::new(MemoryStore::new());
        let push = Arc::new(RecordingChannel::new(ChannelKind::Push));
        let email = Arc::new(RecordingChannel::new(ChannelKind::Email));
        let bot = Arc::new(RecordingChannel::new(ChannelKind::Bot));
        let dispatcher = dispatcher_with(
            store,
            vec![
                push.clone() as Arc<dyn DeliveryChannel>,
                email.clone(),
                bot.clone(),
            ],
        );

        let metrics = sample_metrics();
        dispatcher
            .notify_position_health_warning(WalletAddress::from("0xa"), &metrics)
            .await
            .unwrap();

        push.wait_for_deliveries(1).await;
        email.wait_for_deliveries(1).await;
        bot.wait_for_deliveries(1).await;
        assert_eq!(push.deliveries()[0].priority, Priority::High);
    }

    #[tokio::test]
    async fn transactional_sends_skip_email_and_bot() {
        let store = Arc::new(MemoryStore::new());
        let push = Arc::new(RecordingChannel::new(ChannelKind::Push));
        let email = Arc::new(RecordingChannel::new(ChannelKind::Email));
        let dispatcher = dispatcher_with(
            store,
            vec![push.clone() as Arc<dyn DeliveryChannel>, email.clone()],
        );

        dispatcher
            .notify_borrow_success(WalletAddress::from("0xa"), Decimal::from(5))
            .await
            .unwrap();

        push.wait_for_deliveries(1).await;
        assert!(email.deliveries().is_empty());
    }

    #[tokio::test]
    async fn one_failing_channel_does_not_stop_the_others() {
        let store = Arc::new(MemoryStore::new());
        let push = Arc::new(RecordingChannel::failing(ChannelKind::Push));
        let email = Arc::new(RecordingChannel::new(ChannelKind::Email));
        let dispatcher = dispatcher_with(
            store,
            vec![push.clone() as Arc<dyn DeliveryChannel>, email.clone()],
        );

        let metrics = sample_metrics();
        dispatcher
            .notify_liquidation(WalletAddress::from("0xa"), &metrics)
            .await
            .unwrap();

        email.wait_for_deliveries(1).await;
        assert_eq!(email.deliveries().len(), 1);
    }

    #[tokio::test]
    async fn broadcast_reports_per_wallet_outcomes() {
        let store = Arc::new(MemoryStore::new());
        for wallet in ["0xa", "0xb", "0xc"] {
            store
                .create(NewNotification::new(
                    WalletAddress::from(wallet),
                    NotificationKind::BorrowSuccess,
                    "seed",
                    "seed",
                ))
                .await
                .unwrap();
        }
        let dispatcher = dispatcher_with(store.clone(), vec![]);

        let report = dispatcher
            .notify_protocol_update("Maintenance window", "Upgrades on Saturday")
            .await
            .unwrap();

        assert!(report.is_complete());
        assert_eq!(report.total(), 3);
        for wallet in ["0xa", "0xb", "0xc"] {
            let wallet = WalletAddress::from(wallet);
            assert_eq!(store.unread_count(&wallet).await.unwrap(), 2);
        }
    }

    #[tokio::test]
    async fn broadcast_isolates_per_wallet_store_failures() {
        let store = Arc::new(MemoryStore::new());
        for wallet in ["0xa", "0xb", "0xc"] {
            store
                .create(NewNotification::new(
                    WalletAddress::from(wallet),
                    NotificationKind::BorrowSuccess,
                    "seed",
                    "seed",
                ))
                .await
                .unwrap();
        }
        store.reject_creates_for(WalletAddress::from("0xb"));
        let dispatcher = dispatcher_with(store.clone(), vec![]);

        let report = dispatcher
            .notify_protocol_update("Maintenance window", "Upgrades on Saturday")
            .await
            .unwrap();

        assert!(!report.is_complete());
        assert_eq!(report.total(), 3);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, WalletAddress::from("0xb"));

        // The failing wallet never aborts the others
        for wallet in ["0xa", "0xc"] {
            let wallet = WalletAddress::from(wallet);
            assert_eq!(store.unread_count(&wallet).await.unwrap(), 2);
        }
        assert_eq!(
            store
                .unread_count(&WalletAddress::from("0xb"))
                .await
                .unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn broadcast_announcements_carry_an_expiry() {
        let store = Arc::new(MemoryStore::new());
        store
            .create(NewNotification::new(
                WalletAddress::from("0xa"),
                NotificationKind::BorrowSuccess,
                "seed",
                "seed",
            ))
            .await
            .unwrap();
        let dispatcher = dispatcher_with(store.clone(), vec![]);

        dispatcher
            .notify_protocol_update("Fee change", "New fee schedule")
            .await
            .unwrap();

        let list = store
            .list(&WalletAddress::from("0xa"), crate::port::ListQuery::first(10))
            .await
            .unwrap();
        let announcement = list
            .iter()
            .find(|n| n.kind == NotificationKind::ProtocolUpdate)
            .unwrap();
        assert!(announcement.expires_at.is_some());
    }

    fn sample_metrics() -> HealthMetrics {
        use rust_decimal_macros::dec;
        HealthMetrics {
            collateral_ratio: crate::domain::Ratio::Finite(dec!(120)),
            health_factor: crate::domain::Ratio::Finite(dec!(109.09)),
            is_liquidatable: false,
            available_debt: Decimal::ZERO,
            required_collateral: dec!(550),
        }
    }
}
