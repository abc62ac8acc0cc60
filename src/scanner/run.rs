//! The fixed-interval scan loop.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

use crate::config::ScannerConfig;
use crate::dispatch::Dispatcher;
use crate::domain::{PriceMap, Position};
use crate::port::{LedgerQuery, PriceOracle};

use super::{RiskScanner, RiskTracker, RiskTransition};

/// Run the scanner on a fixed interval until the task is aborted.
///
/// Ticks are not allowed to overlap: a tick that fires while the previous
/// scan is still running is skipped, not queued. Bounded staleness is the
/// accepted trade-off.
pub async fn run_scan_loop(
    scanner: Arc<RiskScanner>,
    tracker: Arc<RiskTracker>,
    ledger: Arc<dyn LedgerQuery>,
    oracle: Arc<dyn PriceOracle>,
    dispatcher: Arc<Dispatcher>,
    config: ScannerConfig,
) {
    let mut ticker = tokio::time::interval(Duration::from_secs(config.interval_secs));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!(interval_secs = config.interval_secs, "Risk scanner started");

    loop {
        ticker.tick().await;
        scan_tick(&scanner, &tracker, &ledger, &oracle, &dispatcher).await;
    }
}

async fn scan_tick(
    scanner: &RiskScanner,
    tracker: &RiskTracker,
    ledger: &Arc<dyn LedgerQuery>,
    oracle: &Arc<dyn PriceOracle>,
    dispatcher: &Dispatcher,
) {
    let positions = match ledger.open_positions().await {
        Ok(positions) => positions,
        Err(e) => {
            warn!(error = %e, "Ledger read failed, skipping tick");
            return;
        }
    };

    let prices = fetch_prices(oracle, &positions).await;

    let assessment = scanner.assess_positions(positions, &prices);
    let transitions = tracker.observe(&assessment);

    for transition in transitions {
        let result = match &transition {
            RiskTransition::EnteredAtRisk { wallet, metrics } => {
                dispatcher
                    .notify_position_health_warning(wallet.clone(), metrics)
                    .await
            }
            RiskTransition::BecameLiquidatable { wallet, metrics } => {
                dispatcher.notify_liquidation(wallet.clone(), metrics).await
            }
        };
        if let Err(e) = result {
            error!(wallet = %transition.wallet(), error = %e, "Failed to record risk notification");
        }
    }

    let candidates = scanner.rank(assessment);
    let profitable = candidates.iter().filter(|c| c.profit.is_profitable).count();
    info!(
        candidates = candidates.len(),
        profitable, "Scan tick complete"
    );
}

/// Quote every distinct collateral asset among scannable positions.
/// A failed quote excludes only that asset's positions.
async fn fetch_prices(oracle: &Arc<dyn PriceOracle>, positions: &[Position]) -> PriceMap {
    let assets: HashSet<_> = positions
        .iter()
        .filter(|p| p.is_scannable())
        .map(|p| p.collateral_asset().clone())
        .collect();

    let mut prices = PriceMap::new();
    for asset in assets {
        match oracle.quote(&asset).await {
            Ok(quote) => {
                prices.insert(asset, quote);
            }
            Err(e) => {
                warn!(asset = %asset, error = %e, "Oracle quote failed");
            }
        }
    }
    prices
}
