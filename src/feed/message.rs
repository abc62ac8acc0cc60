//! Wire messages for the notification push stream.
//!
//! The server sends JSON frames tagged by `type`, with payloads under
//! `data`. Unknown frame types fail to parse and are dropped by the stream
//! with a warning.

use serde::Deserialize;

use crate::domain::{Notification, NotificationId, NotificationKind, WalletAddress};
use crate::error::Result;
use crate::port::FeedSnapshot;

#[derive(Debug, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum FeedMessage {
    Connected,
    Notifications(SnapshotData),
    Heartbeat,
    Error(ErrorData),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotData {
    pub notifications: Vec<NotificationDto>,
    pub unread_count: i64,
}

impl SnapshotData {
    pub fn into_snapshot(self) -> FeedSnapshot {
        FeedSnapshot {
            notifications: self
                .notifications
                .into_iter()
                .map(NotificationDto::into_domain)
                .collect(),
            unread_count: self.unread_count,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorData {
    pub message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationDto {
    pub id: String,
    pub wallet_address: String,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
    pub read: bool,
    #[serde(default)]
    pub read_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(default)]
    pub expires_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl NotificationDto {
    pub fn into_domain(self) -> Notification {
        Notification {
            id: NotificationId::from(self.id),
            wallet_address: WalletAddress::from(self.wallet_address),
            kind: self.kind,
            title: self.title,
            message: self.message,
            link: self.link,
            metadata: self.metadata,
            read: self.read,
            read_at: self.read_at,
            created_at: self.created_at,
            expires_at: self.expires_at,
        }
    }
}

/// Parse one text frame.
pub fn parse_message(text: &str) -> Result<FeedMessage> {
    Ok(serde_json::from_str(text)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_connected_frame() {
        let message = parse_message(r#"{"type": "connected"}"#).unwrap();
        assert!(matches!(message, FeedMessage::Connected));
    }

    #[test]
    fn parses_heartbeat_frame() {
        let message = parse_message(r#"{"type": "heartbeat"}"#).unwrap();
        assert!(matches!(message, FeedMessage::Heartbeat));
    }

    #[test]
    fn parses_error_frame() {
        let message = parse_message(r#"{"type": "error", "data": {"message": "oops"}}"#).unwrap();
        match message {
            FeedMessage::Error(data) => assert_eq!(data.message, "oops"),
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn parses_notifications_frame() {
        let json = r#"{
            "type": "notifications",
            "data": {
                "notifications": [{
                    "id": "n1",
                    "walletAddress": "0xabc",
                    "kind": "borrow-success",
                    "title": "Borrow confirmed",
                    "message": "You borrowed 100",
                    "read": false,
                    "createdAt": "2025-05-01T12:00:00Z"
                }],
                "unreadCount": 1
            }
        }"#;
        let message = parse_message(json).unwrap();
        match message {
            FeedMessage::Notifications(data) => {
                let snapshot = data.into_snapshot();
                assert_eq!(snapshot.unread_count, 1);
                assert_eq!(snapshot.notifications.len(), 1);
                assert_eq!(snapshot.notifications[0].id.as_str(), "n1");
                assert_eq!(
                    snapshot.notifications[0].kind,
                    NotificationKind::BorrowSuccess
                );
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn unknown_frame_type_fails_to_parse() {
        assert!(parse_message(r#"{"type": "mystery"}"#).is_err());
    }
}
