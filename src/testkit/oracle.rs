//! Mock [`PriceOracle`] serving a fixed price table.

use std::collections::HashMap;

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::{CollateralAsset, PriceQuote};
use crate::error::{Result, ScanError};
use crate::port::PriceOracle;

#[derive(Default)]
pub struct StaticOracle {
    quotes: HashMap<CollateralAsset, PriceQuote>,
}

impl StaticOracle {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_price(mut self, asset: &str, price: Decimal) -> Self {
        self.quotes
            .insert(CollateralAsset::from(asset), PriceQuote::fresh(price));
        self
    }

    #[must_use]
    pub fn with_quote(mut self, asset: &str, quote: PriceQuote) -> Self {
        self.quotes.insert(CollateralAsset::from(asset), quote);
        self
    }
}

#[async_trait]
impl PriceOracle for StaticOracle {
    async fn quote(&self, asset: &CollateralAsset) -> Result<PriceQuote> {
        self.quotes.get(asset).cloned().ok_or_else(|| {
            ScanError::MissingPrice {
                asset: asset.to_string(),
            }
            .into()
        })
    }
}
