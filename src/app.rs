//! Application wiring: builds the store, channels, and adapters from
//! config and runs the background loops.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::dispatch::channel::HttpDeliveryProvider;
#[cfg(feature = "telegram")]
use crate::dispatch::channel::TelegramChannel;
use crate::dispatch::{classify, Dispatcher, Payload, SendOptions};
use crate::error::Result;
use crate::ledger::{translate_event, HttpLedgerClient, HttpOracleClient};
use crate::port::{ChannelKind, DeliveryChannel, LedgerQuery, NotificationStore, PriceOracle};
use crate::scanner::{run_scan_loop, RiskScanner, RiskTracker};
use crate::store::{create_pool, run_migrations, SqliteNotificationStore};

pub struct App;

impl App {
    /// Run the service until the surrounding task is cancelled.
    pub async fn run(config: Config) -> Result<()> {
        let pool = create_pool(&config.store.database_url)?;
        run_migrations(&pool)?;
        let store: Arc<dyn NotificationStore> = Arc::new(SqliteNotificationStore::new(pool));

        let channels = build_channels(&config);
        let dispatcher = Arc::new(Dispatcher::new(Arc::clone(&store), channels));

        let ledger: Arc<dyn LedgerQuery> =
            Arc::new(HttpLedgerClient::new(&config.network.ledger_api_url));
        let oracle: Arc<dyn PriceOracle> =
            Arc::new(HttpOracleClient::new(&config.network.oracle_api_url));
        let scanner = Arc::new(RiskScanner::new(
            Arc::clone(&ledger),
            config.scanner.clone(),
        ));
        let tracker = Arc::new(RiskTracker::new());

        let scan = tokio::spawn(run_scan_loop(
            scanner,
            tracker,
            Arc::clone(&ledger),
            oracle,
            Arc::clone(&dispatcher),
            config.scanner.clone(),
        ));
        let sweep = tokio::spawn(run_expiry_sweep(
            Arc::clone(&store),
            config.store.cleanup_interval_secs,
        ));
        let ingest = tokio::spawn(run_event_ingestion(
            ledger,
            dispatcher,
            config.scanner.event_poll_secs,
        ));

        info!("vaultwatch started");

        // The loops never return; the first panic tears the service down.
        let (scan, sweep, ingest) = tokio::join!(scan, sweep, ingest);
        for outcome in [scan, sweep, ingest] {
            if let Err(e) = outcome {
                error!(error = %e, "Background task failed");
            }
        }
        Ok(())
    }
}

fn build_channels(config: &Config) -> Vec<Arc<dyn DeliveryChannel>> {
    let mut channels: Vec<Arc<dyn DeliveryChannel>> = Vec::new();

    if config.delivery.enabled {
        if config.delivery.api_key.is_none() {
            warn!("DELIVERY_API_KEY is not set, provider requests go unauthenticated");
        }
        for kind in [ChannelKind::Push, ChannelKind::Email, ChannelKind::InApp] {
            channels.push(Arc::new(HttpDeliveryProvider::new(
                &config.network.delivery_api_url,
                config.delivery.api_key.clone(),
                kind,
            )));
        }
    }

    #[cfg(feature = "telegram")]
    if config.telegram.enabled {
        match &config.telegram.bot_token {
            Some(token) => {
                channels.push(Arc::new(TelegramChannel::new(token, config.telegram.chat_id)));
            }
            None => warn!("Telegram channel enabled but TELEGRAM_BOT_TOKEN is not set"),
        }
    }

    channels
}

/// Periodically delete expired notifications.
async fn run_expiry_sweep(store: Arc<dyn NotificationStore>, interval_secs: u64) {
    let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;
        match store.cleanup_expired().await {
            Ok(0) => debug!("Expiry sweep found nothing to remove"),
            Ok(removed) => info!(removed, "Expiry sweep removed notifications"),
            Err(e) => warn!(error = %e, "Expiry sweep failed"),
        }
    }
}

/// Poll ledger events and turn recognizable ones into notifications.
///
/// The cursor only advances past events that were fetched, so a failed poll
/// retries the same window on the next tick.
async fn run_event_ingestion(
    ledger: Arc<dyn LedgerQuery>,
    dispatcher: Arc<Dispatcher>,
    poll_secs: u64,
) {
    let mut ticker = tokio::time::interval(Duration::from_secs(poll_secs));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut cursor = Utc::now();

    loop {
        ticker.tick().await;

        let events = match ledger.events_since(cursor).await {
            Ok(events) => events,
            Err(e) => {
                warn!(error = %e, "Ledger event poll failed");
                continue;
            }
        };

        for event in events {
            if event.occurred_at > cursor {
                cursor = event.occurred_at;
            }

            let Some(kind) = translate_event(&event.detail) else {
                debug!(detail = %event.detail, "Unrecognized ledger event, dropped");
                continue;
            };

            let class = classify(kind);
            let payload = Payload::new(class.title, event.detail.clone());
            let options = SendOptions::new(event.wallet.clone(), class);
            if let Err(e) = dispatcher.send(kind, payload, options).await {
                error!(wallet = %event.wallet, kind = %kind, error = %e, "Failed to record ledger event notification");
            }
        }
    }
}
