//! Periodic position risk scanner.
//!
//! Pure read-and-compute: the scanner fetches position snapshots, combines
//! them with oracle prices, and ranks at-risk positions. It never notifies
//! by itself; the scan loop feeds boundary crossings to the dispatcher.

mod run;
mod tracker;

pub use run::run_scan_loop;
pub use tracker::{RiskTracker, RiskTransition};

use std::sync::Arc;

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::warn;

use crate::config::ScannerConfig;
use crate::domain::{
    compute_health, HealthMetrics, LiquidationCandidate, Position, PriceMap, ProfitEstimate,
};
use crate::port::LedgerQuery;

/// One scannable position with its computed metrics and the price used.
#[derive(Debug, Clone)]
pub struct PositionHealth {
    pub position: Position,
    pub metrics: HealthMetrics,
    pub price: Decimal,
}

/// Scans ledger positions against oracle prices.
pub struct RiskScanner {
    ledger: Arc<dyn LedgerQuery>,
    config: ScannerConfig,
}

impl RiskScanner {
    pub fn new(ledger: Arc<dyn LedgerQuery>, config: ScannerConfig) -> Self {
        Self { ledger, config }
    }

    /// Scan all open positions and return at-risk candidates, most urgent
    /// first (ascending health factor).
    ///
    /// Failures degrade rather than propagate: a ledger read failure yields
    /// an empty list for this tick, and a missing, stale, or non-positive
    /// price excludes only the affected position.
    pub async fn scan(&self, prices: &PriceMap) -> Vec<LiquidationCandidate> {
        let positions = match self.ledger.open_positions().await {
            Ok(positions) => positions,
            Err(e) => {
                warn!(error = %e, "Ledger read failed, returning empty scan");
                return Vec::new();
            }
        };

        self.rank(self.assess_positions(positions, prices))
    }

    /// Compute health for every scannable position that has a usable price.
    pub fn assess_positions(
        &self,
        positions: Vec<Position>,
        prices: &PriceMap,
    ) -> Vec<PositionHealth> {
        let now = Utc::now();
        let max_age = Duration::seconds(self.config.price_staleness_secs);

        positions
            .into_iter()
            .filter(Position::is_scannable)
            .filter_map(|position| {
                let asset = position.collateral_asset();
                let Some(quote) = prices.get(asset) else {
                    warn!(asset = %asset, owner = %position.owner(), "No price for asset, skipping position");
                    return None;
                };
                if quote.is_stale(now, max_age) {
                    warn!(
                        asset = %asset,
                        owner = %position.owner(),
                        age_secs = quote.age(now).num_seconds(),
                        "Stale price, skipping position"
                    );
                    return None;
                }
                if quote.price <= Decimal::ZERO {
                    warn!(asset = %asset, price = %quote.price, "Non-positive price, skipping position");
                    return None;
                }

                let metrics = compute_health(&position, quote.price);
                Some(PositionHealth {
                    position,
                    metrics,
                    price: quote.price,
                })
            })
            .collect()
    }

    /// Filter assessed positions to the at-risk buffer, attach profitability
    /// estimates, and sort ascending by health factor.
    pub fn rank(&self, assessed: Vec<PositionHealth>) -> Vec<LiquidationCandidate> {
        let mut candidates: Vec<LiquidationCandidate> = assessed
            .into_iter()
            .filter(|health| {
                health
                    .metrics
                    .collateral_ratio
                    .is_below(self.config.at_risk_buffer_pct)
            })
            .map(|health| {
                let profit = self.estimate_profitability(&health.position, health.price);
                LiquidationCandidate {
                    position: health.position,
                    metrics: health.metrics,
                    profit,
                }
            })
            .collect();

        candidates.sort_by(|a, b| a.health_factor().cmp(&b.health_factor()));
        candidates
    }

    /// Estimate liquidation economics at the current price.
    ///
    /// Collateral received is the debt repaid converted to collateral units
    /// plus the fixed penalty; the cost side is a flat estimate.
    #[must_use]
    pub fn estimate_profitability(&self, position: &Position, price: Decimal) -> ProfitEstimate {
        let hundred = dec!(100);
        let debt_repaid = position.debt_amount();
        let penalty_factor = Decimal::ONE + self.config.liquidation_penalty_pct / hundred;
        let collateral_received = debt_repaid / price * penalty_factor;
        let cost_estimate = self.config.gas_cost_estimate;
        let net_value = collateral_received * price - debt_repaid - cost_estimate;

        ProfitEstimate {
            collateral_received,
            debt_repaid,
            cost_estimate,
            net_value,
            is_profitable: net_value > Decimal::ZERO,
        }
    }
}
