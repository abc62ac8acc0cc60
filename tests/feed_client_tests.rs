//! Feed client behavior: baseline suppression, alert dedup, reconnects,
//! heartbeat timeout, and optimistic mutations.

use std::sync::Arc;

use chrono::Utc;
use vaultwatch::config::FeedConfig;
use vaultwatch::domain::{
    NewNotification, Notification, NotificationId, NotificationKind, WalletAddress,
};
use vaultwatch::feed::{ConnectionState, FeedClient};
use vaultwatch::port::{FeedEvent, FeedSnapshot, NotificationStore};
use vaultwatch::testkit::{ChannelFeed, MemoryStore, RecordingAlerts, ScriptedFeed};

fn wallet() -> WalletAddress {
    WalletAddress::from("0xwallet")
}

fn config() -> FeedConfig {
    FeedConfig {
        heartbeat_timeout_secs: 5,
        reconnect_delay_secs: 0,
    }
}

fn notification(id: &str, read: bool) -> Notification {
    Notification {
        id: NotificationId::from(id),
        wallet_address: wallet(),
        kind: NotificationKind::BorrowSuccess,
        title: "Borrow confirmed".into(),
        message: "You borrowed 100".into(),
        link: None,
        metadata: None,
        read,
        read_at: None,
        created_at: Utc::now(),
        expires_at: None,
    }
}

fn snapshot(notifications: Vec<Notification>) -> FeedEvent {
    let unread_count = notifications.iter().filter(|n| !n.read).count() as i64;
    FeedEvent::Snapshot(FeedSnapshot {
        notifications,
        unread_count,
    })
}

fn client_with_events(
    events: Vec<FeedEvent>,
    alerts: Arc<RecordingAlerts>,
) -> FeedClient<ScriptedFeed> {
    let stream = ScriptedFeed::new().with_events(events);
    FeedClient::new(
        stream,
        Arc::new(MemoryStore::new()),
        alerts,
        wallet(),
        config(),
    )
}

#[tokio::test]
async fn baseline_snapshot_never_alerts() {
    let alerts = Arc::new(RecordingAlerts::new());
    let mut client = client_with_events(
        vec![
            FeedEvent::Connected,
            snapshot(vec![notification("a", false), notification("b", false)]),
        ],
        alerts.clone(),
    );

    client.connect().await.unwrap();
    assert!(client.process_next().await);
    assert!(client.process_next().await);

    assert_eq!(alerts.count(), 0);
    assert_eq!(client.unread_count(), 2);
}

#[tokio::test]
async fn new_unread_item_alerts_exactly_once() {
    let alerts = Arc::new(RecordingAlerts::new());
    let base = notification("a", false);
    let fresh = notification("b", false);
    let mut client = client_with_events(
        vec![
            snapshot(vec![base.clone()]),
            snapshot(vec![base.clone(), fresh.clone()]),
            snapshot(vec![base, fresh]),
        ],
        alerts.clone(),
    );

    client.connect().await.unwrap();
    for _ in 0..3 {
        assert!(client.process_next().await);
    }

    let raised = alerts.raised();
    assert_eq!(raised.len(), 1);
    assert_eq!(raised[0].id.as_str(), "b");
}

#[tokio::test]
async fn already_read_items_do_not_alert() {
    let alerts = Arc::new(RecordingAlerts::new());
    let base = notification("a", false);
    let mut client = client_with_events(
        vec![
            snapshot(vec![base.clone()]),
            snapshot(vec![base, notification("b", true)]),
        ],
        alerts.clone(),
    );

    client.connect().await.unwrap();
    assert!(client.process_next().await);
    assert!(client.process_next().await);

    assert_eq!(alerts.count(), 0);
}

#[tokio::test]
async fn reconnect_baseline_does_not_duplicate_alerts() {
    let alerts = Arc::new(RecordingAlerts::new());
    let a = notification("a", false);
    let b = notification("b", false);
    let mut client = client_with_events(
        vec![
            snapshot(vec![a.clone()]),
            snapshot(vec![a.clone(), b.clone()]),
            FeedEvent::Disconnected {
                reason: "server restart".into(),
            },
            // Replayed as the baseline after reconnect.
            snapshot(vec![a, b]),
        ],
        alerts.clone(),
    );

    client.connect().await.unwrap();
    assert!(client.process_next().await);
    assert!(client.process_next().await);
    assert_eq!(alerts.count(), 1);

    // Connection drops; the client reconnects and consumes the resent
    // snapshot as a baseline.
    assert!(!client.process_next().await);
    client.connect().await.unwrap();
    assert!(client.process_next().await);

    assert_eq!(alerts.count(), 1);
}

#[tokio::test]
async fn heartbeat_silence_signals_connection_loss() {
    let (stream, _handle) = ChannelFeed::new();
    let counter = stream.connect_counter();
    let alerts = Arc::new(RecordingAlerts::new());
    let mut client = FeedClient::new(
        stream,
        Arc::new(MemoryStore::new()),
        alerts,
        wallet(),
        FeedConfig {
            heartbeat_timeout_secs: 0,
            reconnect_delay_secs: 0,
        },
    );

    client.connect().await.unwrap();
    assert_eq!(counter.load(std::sync::atomic::Ordering::SeqCst), 1);
    assert!(!client.process_next().await);
}

#[tokio::test]
async fn heartbeats_keep_the_connection_alive() {
    let alerts = Arc::new(RecordingAlerts::new());
    let mut client = client_with_events(
        vec![FeedEvent::Heartbeat, FeedEvent::Heartbeat],
        alerts.clone(),
    );

    client.connect().await.unwrap();
    assert!(client.process_next().await);
    assert!(client.process_next().await);
    assert_eq!(client.state(), ConnectionState::Connected);
}

#[tokio::test]
async fn stop_clears_seen_state_and_cache() {
    let alerts = Arc::new(RecordingAlerts::new());
    let a = notification("a", false);
    let mut client = client_with_events(vec![snapshot(vec![a.clone()])], alerts.clone());

    client.connect().await.unwrap();
    assert!(client.process_next().await);
    assert_eq!(client.unread_count(), 1);

    client.stop().await;
    assert_eq!(client.state(), ConnectionState::Disconnected);
    assert_eq!(client.unread_count(), 0);
    assert!(client.cache().notifications.is_empty());
}

#[tokio::test]
async fn optimistic_mark_read_applies_locally_and_confirms() {
    let store = Arc::new(MemoryStore::new());
    let stored = store
        .create(NewNotification::new(
            wallet(),
            NotificationKind::BorrowSuccess,
            "Borrow confirmed",
            "You borrowed 100",
        ))
        .await
        .unwrap();

    let alerts = Arc::new(RecordingAlerts::new());
    let stream = ScriptedFeed::new().with_events(vec![snapshot(vec![stored.clone()])]);
    let mut client = FeedClient::new(stream, store.clone(), alerts, wallet(), config());

    client.connect().await.unwrap();
    assert!(client.process_next().await);
    assert_eq!(client.unread_count(), 1);

    client.mark_read(&stored.id).await.unwrap();

    assert_eq!(client.unread_count(), 0);
    assert!(client.cache().notifications[0].read);
    assert_eq!(store.unread_count(&wallet()).await.unwrap(), 0);
}

#[tokio::test]
async fn rejected_mutation_restores_authoritative_state() {
    let store = Arc::new(MemoryStore::new());
    let stored = store
        .create(NewNotification::new(
            wallet(),
            NotificationKind::BorrowSuccess,
            "Borrow confirmed",
            "You borrowed 100",
        ))
        .await
        .unwrap();

    let alerts = Arc::new(RecordingAlerts::new());
    let stream = ScriptedFeed::new().with_events(vec![snapshot(vec![stored.clone()])]);
    let mut client = FeedClient::new(stream, store.clone(), alerts, wallet(), config());

    client.connect().await.unwrap();
    assert!(client.process_next().await);

    // Deleting an id the store has never seen is rejected; the optimistic
    // removal must be rolled back by the refetch.
    let phantom = NotificationId::from("phantom");
    assert!(client.delete(&phantom).await.is_err());

    assert_eq!(client.cache().notifications.len(), 1);
    assert_eq!(client.unread_count(), 1);
}

#[tokio::test]
async fn mark_all_read_zeroes_the_badge() {
    let store = Arc::new(MemoryStore::new());
    for title in ["one", "two", "three"] {
        store
            .create(NewNotification::new(
                wallet(),
                NotificationKind::BorrowSuccess,
                title,
                title,
            ))
            .await
            .unwrap();
    }

    let alerts = Arc::new(RecordingAlerts::new());
    let listed = store
        .list(&wallet(), vaultwatch::port::ListQuery::default())
        .await
        .unwrap();
    let stream = ScriptedFeed::new().with_events(vec![snapshot(listed)]);
    let mut client = FeedClient::new(stream, store.clone(), alerts, wallet(), config());

    client.connect().await.unwrap();
    assert!(client.process_next().await);
    assert_eq!(client.unread_count(), 3);

    client.mark_all_read().await.unwrap();

    assert_eq!(client.unread_count(), 0);
    assert!(client.cache().notifications.iter().all(|n| n.read));
    assert_eq!(store.unread_count(&wallet()).await.unwrap(), 0);
}

#[tokio::test]
async fn connect_counts_are_observable() {
    let stream = ScriptedFeed::new();
    let counter = stream.connect_counter();
    let alerts = Arc::new(RecordingAlerts::new());
    let mut client = FeedClient::new(
        stream,
        Arc::new(MemoryStore::new()),
        alerts,
        wallet(),
        config(),
    );

    client.connect().await.unwrap();
    client.connect().await.unwrap();
    assert_eq!(counter.load(std::sync::atomic::Ordering::SeqCst), 2);
}
