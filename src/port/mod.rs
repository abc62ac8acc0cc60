//! Port traits at the seams between the core and external collaborators.

mod alert;
mod channel;
mod feed;
mod ledger;
mod oracle;
mod store;

pub use alert::AlertSink;
pub use channel::{ChannelKind, DeliveryAction, DeliveryChannel, DeliveryRequest, Priority};
pub use feed::{FeedEvent, FeedSnapshot, NotificationStream};
pub use ledger::{LedgerEvent, LedgerQuery};
pub use oracle::PriceOracle;
pub use store::{ListQuery, NotificationStore};
