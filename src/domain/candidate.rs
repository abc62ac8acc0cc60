//! Liquidation candidates produced by the risk scanner.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::health::HealthMetrics;
use super::position::Position;

/// Estimated economics of liquidating a position.
///
/// The cost side is a flat estimate, not live fee data; treat `net_value`
/// as an approximation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfitEstimate {
    /// Collateral the liquidator would receive, in asset units
    /// (debt repaid converted at the current price, plus the penalty).
    pub collateral_received: Decimal,
    /// Debt repaid on behalf of the position owner, in quote units.
    pub debt_repaid: Decimal,
    /// Flat execution cost estimate, in quote units.
    pub cost_estimate: Decimal,
    /// Quote value of collateral received minus debt repaid minus cost.
    pub net_value: Decimal,
    pub is_profitable: bool,
}

/// A position at or near the liquidation boundary, with its metrics and
/// estimated liquidation economics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiquidationCandidate {
    pub position: Position,
    pub metrics: HealthMetrics,
    pub profit: ProfitEstimate,
}

impl LiquidationCandidate {
    /// Health factor for ranking. Candidates always carry debt, so the
    /// ratio is finite; a missing value sorts as zero.
    #[must_use]
    pub fn health_factor(&self) -> Decimal {
        self.metrics.health_factor.value().unwrap_or(Decimal::ZERO)
    }
}
