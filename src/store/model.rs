//! Row models mapping between the database and domain types.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::notifications;
use crate::domain::{NewNotification, Notification, NotificationId, NotificationKind};
use crate::error::{Error, Result, StoreError};

/// Database row for a notification. Timestamps are RFC 3339 UTC strings,
/// which compare lexicographically in chronological order.
#[derive(Debug, Clone, Queryable, Insertable)]
#[diesel(table_name = notifications)]
pub struct NotificationRow {
    pub id: String,
    pub wallet_address: String,
    pub kind: String,
    pub title: String,
    pub message: String,
    pub link: Option<String>,
    pub metadata: Option<String>,
    pub read: bool,
    pub read_at: Option<String>,
    pub created_at: String,
    pub expires_at: Option<String>,
}

impl NotificationRow {
    /// Build a fresh row from creation input: new id, unread, created now.
    pub fn from_new(new: &NewNotification, now: DateTime<Utc>) -> Result<Self> {
        let metadata = new
            .metadata
            .as_ref()
            .map(|m| serde_json::to_string(m).map_err(|e| Error::Parse(e.to_string())))
            .transpose()?;

        Ok(Self {
            id: NotificationId::generate().to_string(),
            wallet_address: new.wallet_address.to_string(),
            kind: new.kind.as_str().to_string(),
            title: new.title.clone(),
            message: new.message.clone(),
            link: new.link.clone(),
            metadata,
            read: false,
            read_at: None,
            created_at: now.to_rfc3339(),
            expires_at: new.expires_at.map(|at| at.to_rfc3339()),
        })
    }

    pub fn into_domain(self) -> Result<Notification> {
        let kind = NotificationKind::parse(&self.kind)
            .ok_or_else(|| StoreError::Database(format!("unknown notification kind {}", self.kind)))?;
        let metadata = self
            .metadata
            .as_deref()
            .map(|m| serde_json::from_str(m).map_err(|e| Error::Parse(e.to_string())))
            .transpose()?;

        Ok(Notification {
            id: NotificationId::from(self.id),
            wallet_address: self.wallet_address.into(),
            kind,
            title: self.title,
            message: self.message,
            link: self.link,
            metadata,
            read: self.read,
            read_at: self.read_at.as_deref().map(parse_ts).transpose()?,
            created_at: parse_ts(&self.created_at)?,
            expires_at: self.expires_at.as_deref().map(parse_ts).transpose()?,
        })
    }
}

fn parse_ts(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::Parse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::WalletAddress;
    use serde_json::json;

    fn new_notification() -> NewNotification {
        NewNotification::new(
            WalletAddress::from("0xw"),
            NotificationKind::HealthWarning,
            "Position at risk",
            "Collateral ratio dropped below 150%",
        )
        .with_metadata(json!({"ratio": "120"}))
    }

    #[test]
    fn row_roundtrips_through_domain() {
        let now = Utc::now();
        let row = NotificationRow::from_new(&new_notification(), now).unwrap();
        let domain = row.clone().into_domain().unwrap();

        assert_eq!(domain.id.as_str(), row.id);
        assert_eq!(domain.kind, NotificationKind::HealthWarning);
        assert!(!domain.read);
        assert!(domain.read_at.is_none());
        assert_eq!(domain.metadata, Some(json!({"ratio": "120"})));
        assert!((domain.created_at - now).num_milliseconds().abs() < 1);
    }

    #[test]
    fn unknown_kind_fails_conversion() {
        let now = Utc::now();
        let mut row = NotificationRow::from_new(&new_notification(), now).unwrap();
        row.kind = "bogus".into();
        assert!(row.into_domain().is_err());
    }

    #[test]
    fn fresh_rows_get_distinct_ids() {
        let now = Utc::now();
        let a = NotificationRow::from_new(&new_notification(), now).unwrap();
        let b = NotificationRow::from_new(&new_notification(), now).unwrap();
        assert_ne!(a.id, b.id);
    }
}
