//! Ledger-agnostic domain types and solvency math.

mod candidate;
mod health;
mod ids;
mod notification;
mod position;
mod price;

pub use candidate::{LiquidationCandidate, ProfitEstimate};
pub use health::{
    compute_health, HealthMetrics, HealthStatus, Ratio, LIQUIDATION_THRESHOLD_PCT,
    WARNING_THRESHOLD_PCT,
};
pub use ids::{CollateralAsset, NotificationId, WalletAddress};
pub use notification::{NewNotification, Notification, NotificationKind};
pub use position::{Position, PositionStatus};
pub use price::{PriceMap, PriceQuote};
