//! Wire DTOs for the ledger and oracle REST APIs.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::domain::{CollateralAsset, Position, PositionStatus, PriceQuote, WalletAddress};
use crate::port::LedgerEvent;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionsResponse {
    pub positions: Vec<PositionDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionDto {
    pub wallet_address: String,
    pub collateral_amount: Decimal,
    pub collateral_asset: String,
    pub debt_amount: Decimal,
    pub status: PositionStatus,
}

impl PositionDto {
    pub fn into_domain(self) -> Position {
        Position::new(
            WalletAddress::from(self.wallet_address),
            self.collateral_amount,
            CollateralAsset::from(self.collateral_asset),
            self.debt_amount,
            self.status,
        )
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventsResponse {
    pub events: Vec<EventDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDto {
    pub wallet_address: String,
    pub detail: String,
    pub occurred_at: DateTime<Utc>,
}

impl EventDto {
    pub fn into_domain(self) -> LedgerEvent {
        LedgerEvent {
            wallet: WalletAddress::from(self.wallet_address),
            detail: self.detail,
            occurred_at: self.occurred_at,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceDto {
    pub price: Decimal,
    pub updated_at: DateTime<Utc>,
}

impl PriceDto {
    pub fn into_domain(self) -> PriceQuote {
        PriceQuote::new(self.price, self.updated_at)
    }
}
