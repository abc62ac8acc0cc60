//! Event classification table.
//!
//! The single source of truth mapping each notification kind to its title,
//! default channel set, and priority. Convenience constructors on the
//! dispatcher are fixed instantiations of this table; no call site carries
//! its own copy.

use crate::domain::NotificationKind;
use crate::port::{ChannelKind, Priority};

/// Delivery classification for one notification kind.
#[derive(Debug, Clone, Copy)]
pub struct Classification {
    pub title: &'static str,
    pub channels: &'static [ChannelKind],
    pub priority: Priority,
}

const TRANSACTIONAL: &[ChannelKind] = &[ChannelKind::Push, ChannelKind::InApp];
const URGENT: &[ChannelKind] = &[
    ChannelKind::Push,
    ChannelKind::Email,
    ChannelKind::Bot,
    ChannelKind::InApp,
];
const ANNOUNCEMENT: &[ChannelKind] = &[ChannelKind::Push, ChannelKind::Bot, ChannelKind::InApp];

/// Look up the fixed classification for a notification kind.
#[must_use]
pub fn classify(kind: NotificationKind) -> Classification {
    match kind {
        NotificationKind::BorrowSuccess => Classification {
            title: "Borrow confirmed",
            channels: TRANSACTIONAL,
            priority: Priority::Normal,
        },
        NotificationKind::RepaySuccess => Classification {
            title: "Repayment confirmed",
            channels: TRANSACTIONAL,
            priority: Priority::Normal,
        },
        NotificationKind::CollateralAdded => Classification {
            title: "Collateral added",
            channels: TRANSACTIONAL,
            priority: Priority::Normal,
        },
        NotificationKind::CollateralRemoved => Classification {
            title: "Collateral removed",
            channels: TRANSACTIONAL,
            priority: Priority::Normal,
        },
        NotificationKind::HealthWarning => Classification {
            title: "Position at risk",
            channels: URGENT,
            priority: Priority::High,
        },
        NotificationKind::Liquidated => Classification {
            title: "Position liquidated",
            channels: URGENT,
            priority: Priority::High,
        },
        NotificationKind::ProtocolUpdate => Classification {
            title: "Protocol update",
            channels: ANNOUNCEMENT,
            priority: Priority::Normal,
        },
    }
}
