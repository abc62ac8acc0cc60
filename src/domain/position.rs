//! Collateralized debt positions as read from the ledger.
//!
//! Positions are created, mutated, and closed entirely on the ledger; this
//! crate only ever takes snapshots and never writes them back.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ids::{CollateralAsset, WalletAddress};

/// Lifecycle status of a position on the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionStatus {
    Active,
    Closed,
    Liquidated,
}

/// A snapshot of a collateralized debt position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    owner: WalletAddress,
    collateral_amount: Decimal,
    collateral_asset: CollateralAsset,
    debt_amount: Decimal,
    status: PositionStatus,
}

impl Position {
    pub fn new(
        owner: WalletAddress,
        collateral_amount: Decimal,
        collateral_asset: CollateralAsset,
        debt_amount: Decimal,
        status: PositionStatus,
    ) -> Self {
        Self {
            owner,
            collateral_amount,
            collateral_asset,
            debt_amount,
            status,
        }
    }

    pub fn owner(&self) -> &WalletAddress {
        &self.owner
    }

    /// Collateral amount in asset units (not quote value).
    pub fn collateral_amount(&self) -> Decimal {
        self.collateral_amount
    }

    pub fn collateral_asset(&self) -> &CollateralAsset {
        &self.collateral_asset
    }

    /// Outstanding debt in quote units.
    pub fn debt_amount(&self) -> Decimal {
        self.debt_amount
    }

    pub fn status(&self) -> PositionStatus {
        self.status
    }

    /// True for positions the scanner cares about: active with debt drawn.
    #[must_use]
    pub fn is_scannable(&self) -> bool {
        self.status == PositionStatus::Active && self.debt_amount > Decimal::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn position(debt: Decimal, status: PositionStatus) -> Position {
        Position::new(
            WalletAddress::from("0xowner"),
            dec!(10),
            CollateralAsset::from("SOL"),
            debt,
            status,
        )
    }

    #[test]
    fn active_position_with_debt_is_scannable() {
        assert!(position(dec!(500), PositionStatus::Active).is_scannable());
    }

    #[test]
    fn zero_debt_position_is_not_scannable() {
        assert!(!position(Decimal::ZERO, PositionStatus::Active).is_scannable());
    }

    #[test]
    fn closed_and_liquidated_positions_are_not_scannable() {
        assert!(!position(dec!(500), PositionStatus::Closed).is_scannable());
        assert!(!position(dec!(500), PositionStatus::Liquidated).is_scannable());
    }
}
