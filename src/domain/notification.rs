//! Notification records and the closed set of event kinds.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{NotificationId, WalletAddress};

/// The closed set of events that produce notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NotificationKind {
    BorrowSuccess,
    RepaySuccess,
    CollateralAdded,
    CollateralRemoved,
    HealthWarning,
    Liquidated,
    ProtocolUpdate,
}

impl NotificationKind {
    /// Stable wire/storage name, matching the serde representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BorrowSuccess => "borrow-success",
            Self::RepaySuccess => "repay-success",
            Self::CollateralAdded => "collateral-added",
            Self::CollateralRemoved => "collateral-removed",
            Self::HealthWarning => "health-warning",
            Self::Liquidated => "liquidated",
            Self::ProtocolUpdate => "protocol-update",
        }
    }

    /// Parse the storage name back into a kind.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "borrow-success" => Some(Self::BorrowSuccess),
            "repay-success" => Some(Self::RepaySuccess),
            "collateral-added" => Some(Self::CollateralAdded),
            "collateral-removed" => Some(Self::CollateralRemoved),
            "health-warning" => Some(Self::HealthWarning),
            "liquidated" => Some(Self::Liquidated),
            "protocol-update" => Some(Self::ProtocolUpdate),
            _ => None,
        }
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored notification belonging to one wallet.
///
/// `read` only ever transitions false to true; rows leave the log through
/// explicit delete or the expiry sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub wallet_address: WalletAddress,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    /// Opaque key/value payload attached by the producer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
    pub read: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl Notification {
    /// True when the row has expired as of `now`.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }

    /// Counts toward the wallet's unread badge: unread and not expired.
    #[must_use]
    pub fn counts_as_unread(&self, now: DateTime<Utc>) -> bool {
        !self.read && !self.is_expired(now)
    }
}

/// Input for creating a notification; the store fills in id, timestamps,
/// and the unread default.
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub wallet_address: WalletAddress,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub link: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl NewNotification {
    pub fn new(
        wallet_address: WalletAddress,
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            wallet_address,
            kind,
            title: title.into(),
            message: message.into(),
            link: None,
            metadata: None,
            expires_at: None,
        }
    }

    #[must_use]
    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    #[must_use]
    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    #[must_use]
    pub fn with_expiry(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn notification(read: bool, expires_at: Option<DateTime<Utc>>) -> Notification {
        Notification {
            id: NotificationId::generate(),
            wallet_address: WalletAddress::from("0xw"),
            kind: NotificationKind::BorrowSuccess,
            title: "t".into(),
            message: "m".into(),
            link: None,
            metadata: None,
            read,
            read_at: None,
            created_at: Utc::now(),
            expires_at,
        }
    }

    #[test]
    fn kind_names_roundtrip() {
        for kind in [
            NotificationKind::BorrowSuccess,
            NotificationKind::RepaySuccess,
            NotificationKind::CollateralAdded,
            NotificationKind::CollateralRemoved,
            NotificationKind::HealthWarning,
            NotificationKind::Liquidated,
            NotificationKind::ProtocolUpdate,
        ] {
            assert_eq!(NotificationKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(NotificationKind::parse("unknown"), None);
    }

    #[test]
    fn unread_and_unexpired_counts_as_unread() {
        let now = Utc::now();
        assert!(notification(false, None).counts_as_unread(now));
        assert!(notification(false, Some(now + Duration::hours(1))).counts_as_unread(now));
    }

    #[test]
    fn read_or_expired_does_not_count() {
        let now = Utc::now();
        assert!(!notification(true, None).counts_as_unread(now));
        assert!(!notification(false, Some(now - Duration::hours(1))).counts_as_unread(now));
    }
}
