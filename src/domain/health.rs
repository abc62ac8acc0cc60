//! Solvency math for positions.
//!
//! All functions here are pure; the scanner combines them with live prices.
//! Ratios are percentages held as [`Decimal`], with a dedicated variant for
//! the debt-free case instead of a float infinity.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::position::Position;

/// Minimum collateral ratio (percent) below which a position may be
/// liquidated by a third party.
pub const LIQUIDATION_THRESHOLD_PCT: Decimal = dec!(110);

/// Collateral ratio (percent) below which a position is reported at risk.
pub const WARNING_THRESHOLD_PCT: Decimal = dec!(150);

/// A percentage ratio that may be infinite (no debt outstanding).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Ratio {
    Finite(Decimal),
    Infinite,
}

impl Ratio {
    /// The finite value, if any.
    #[must_use]
    pub fn value(self) -> Option<Decimal> {
        match self {
            Self::Finite(v) => Some(v),
            Self::Infinite => None,
        }
    }

    /// True when the ratio is strictly below `threshold`. An infinite ratio
    /// is below nothing.
    #[must_use]
    pub fn is_below(self, threshold: Decimal) -> bool {
        match self {
            Self::Finite(v) => v < threshold,
            Self::Infinite => false,
        }
    }
}

impl std::fmt::Display for Ratio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Finite(v) => write!(f, "{v}%"),
            Self::Infinite => write!(f, "inf"),
        }
    }
}

/// Coarse solvency band used for reporting and boundary-crossing detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// Collateral ratio at or above the warning threshold.
    Healthy,
    /// Below the warning threshold but still above liquidation.
    AtRisk,
    /// Below the liquidation threshold; eligible for forced closure.
    Liquidatable,
}

/// Derived solvency metrics for a single position. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HealthMetrics {
    /// Collateral value over debt, as a percentage.
    pub collateral_ratio: Ratio,
    /// Collateral ratio normalized so the liquidation threshold sits at 100.
    pub health_factor: Ratio,
    pub is_liquidatable: bool,
    /// Additional debt that could be drawn before hitting the threshold,
    /// in quote units. Never negative.
    pub available_debt: Decimal,
    /// Quote value of collateral needed to exactly back the current debt at
    /// the liquidation threshold.
    pub required_collateral: Decimal,
}

impl HealthMetrics {
    /// The band this position falls into.
    #[must_use]
    pub fn status(&self) -> HealthStatus {
        if self.is_liquidatable {
            HealthStatus::Liquidatable
        } else if self.collateral_ratio.is_below(WARNING_THRESHOLD_PCT) {
            HealthStatus::AtRisk
        } else {
            HealthStatus::Healthy
        }
    }
}

/// Compute solvency metrics for a position at the given collateral price.
///
/// A debt-free position has an infinite collateral ratio and is never
/// liquidatable.
#[must_use]
pub fn compute_health(position: &Position, price: Decimal) -> HealthMetrics {
    let hundred = dec!(100);
    let collateral_value = position.collateral_amount() * price;
    let debt = position.debt_amount();

    if debt <= Decimal::ZERO {
        return HealthMetrics {
            collateral_ratio: Ratio::Infinite,
            health_factor: Ratio::Infinite,
            is_liquidatable: false,
            // With no debt, the whole threshold-adjusted collateral value is
            // available to draw.
            available_debt: collateral_value * hundred / LIQUIDATION_THRESHOLD_PCT,
            required_collateral: Decimal::ZERO,
        };
    }

    let collateral_ratio = collateral_value / debt * hundred;
    let health_factor = collateral_ratio / LIQUIDATION_THRESHOLD_PCT * hundred;
    let max_debt = collateral_value * hundred / LIQUIDATION_THRESHOLD_PCT;

    HealthMetrics {
        collateral_ratio: Ratio::Finite(collateral_ratio),
        health_factor: Ratio::Finite(health_factor),
        is_liquidatable: collateral_ratio < LIQUIDATION_THRESHOLD_PCT,
        available_debt: (max_debt - debt).max(Decimal::ZERO),
        required_collateral: debt * LIQUIDATION_THRESHOLD_PCT / hundred,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ids::{CollateralAsset, WalletAddress};
    use crate::domain::position::PositionStatus;

    fn position(collateral: Decimal, debt: Decimal) -> Position {
        Position::new(
            WalletAddress::from("0xowner"),
            collateral,
            CollateralAsset::from("SOL"),
            debt,
            PositionStatus::Active,
        )
    }

    #[test]
    fn healthy_position_at_200_percent() {
        // 10 units at $100 against $500 debt = 200%
        let metrics = compute_health(&position(dec!(10), dec!(500)), dec!(100));
        assert_eq!(metrics.collateral_ratio, Ratio::Finite(dec!(200)));
        assert!(!metrics.is_liquidatable);
        assert_eq!(metrics.status(), HealthStatus::Healthy);
    }

    #[test]
    fn at_risk_position_at_120_percent() {
        // Same position at $60 = 120%: below 150, at or above 110
        let metrics = compute_health(&position(dec!(10), dec!(500)), dec!(60));
        assert_eq!(metrics.collateral_ratio, Ratio::Finite(dec!(120)));
        assert!(!metrics.is_liquidatable);
        assert_eq!(metrics.status(), HealthStatus::AtRisk);
    }

    #[test]
    fn liquidatable_position_at_100_percent() {
        // At $50 = 100%: below the 110 threshold
        let metrics = compute_health(&position(dec!(10), dec!(500)), dec!(50));
        assert_eq!(metrics.collateral_ratio, Ratio::Finite(dec!(100)));
        assert!(metrics.is_liquidatable);
        assert_eq!(metrics.status(), HealthStatus::Liquidatable);
    }

    #[test]
    fn zero_debt_means_infinite_ratio_and_never_liquidatable() {
        let metrics = compute_health(&position(dec!(10), Decimal::ZERO), dec!(1));
        assert_eq!(metrics.collateral_ratio, Ratio::Infinite);
        assert_eq!(metrics.health_factor, Ratio::Infinite);
        assert!(!metrics.is_liquidatable);
        assert_eq!(metrics.required_collateral, Decimal::ZERO);
    }

    #[test]
    fn liquidatable_iff_ratio_below_threshold() {
        // Exactly at 110% is not liquidatable
        let metrics = compute_health(&position(dec!(11), dec!(1000)), dec!(100));
        assert_eq!(metrics.collateral_ratio, Ratio::Finite(dec!(110)));
        assert!(!metrics.is_liquidatable);

        // A hair below is
        let metrics = compute_health(&position(dec!(10.99), dec!(1000)), dec!(100));
        assert!(metrics.is_liquidatable);
    }

    #[test]
    fn available_debt_never_negative() {
        let metrics = compute_health(&position(dec!(10), dec!(500)), dec!(50));
        assert_eq!(metrics.available_debt, Decimal::ZERO);
    }

    #[test]
    fn available_debt_at_threshold_headroom() {
        // $1000 collateral value, $500 debt: max debt = 1000*100/110
        let metrics = compute_health(&position(dec!(10), dec!(500)), dec!(100));
        let expected = dec!(1000) * dec!(100) / dec!(110) - dec!(500);
        assert_eq!(metrics.available_debt, expected);
    }

    #[test]
    fn required_collateral_is_debt_times_threshold() {
        let metrics = compute_health(&position(dec!(10), dec!(500)), dec!(100));
        assert_eq!(metrics.required_collateral, dec!(550));
    }

    #[test]
    fn health_factor_normalizes_threshold_to_100() {
        let metrics = compute_health(&position(dec!(11), dec!(1000)), dec!(100));
        assert_eq!(metrics.health_factor, Ratio::Finite(dec!(100)));
    }
}
