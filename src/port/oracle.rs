//! Oracle price feed port.

use async_trait::async_trait;

use crate::domain::{CollateralAsset, PriceQuote};
use crate::error::Result;

/// Read access to the external price oracle.
///
/// Only the read contract is used; the oracle's own update mechanics are
/// out of scope. Callers are responsible for rejecting quotes older than
/// their staleness window.
#[async_trait]
pub trait PriceOracle: Send + Sync {
    /// Current price and refresh timestamp for a collateral asset.
    async fn quote(&self, asset: &CollateralAsset) -> Result<PriceQuote>;
}
