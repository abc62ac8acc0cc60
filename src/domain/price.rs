//! Oracle price quotes.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ids::CollateralAsset;

/// A price observation from the oracle, in quote units per asset unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub price: Decimal,
    /// When the oracle last refreshed this price.
    pub updated_at: DateTime<Utc>,
}

impl PriceQuote {
    pub fn new(price: Decimal, updated_at: DateTime<Utc>) -> Self {
        Self { price, updated_at }
    }

    /// A quote refreshed just now. Convenient for tests and static feeds.
    pub fn fresh(price: Decimal) -> Self {
        Self::new(price, Utc::now())
    }

    /// Age of the quote relative to `now`.
    #[must_use]
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        now - self.updated_at
    }

    /// True when the quote is too old to be used, given the staleness window.
    #[must_use]
    pub fn is_stale(&self, now: DateTime<Utc>, max_age: Duration) -> bool {
        self.age(now) > max_age
    }
}

/// Current prices keyed by collateral asset.
pub type PriceMap = HashMap<CollateralAsset, PriceQuote>;
