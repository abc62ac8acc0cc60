//! Push-stream port consumed by the live feed client.

use async_trait::async_trait;

use crate::domain::{Notification, WalletAddress};
use crate::error::Result;

/// A full notification snapshot pushed by the server.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedSnapshot {
    pub notifications: Vec<Notification>,
    pub unread_count: i64,
}

/// Events produced by a notification push stream.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedEvent {
    /// Server acknowledged the connection.
    Connected,
    /// Current full snapshot (list + unread count). The server resends one
    /// after every (re)connect.
    Snapshot(FeedSnapshot),
    /// Keepalive.
    Heartbeat,
    /// Server-side error message; informational, the stream stays up.
    ServerError { message: String },
    /// The connection was lost or closed.
    Disconnected { reason: String },
}

/// One long-lived, server-initiated notification stream per wallet.
///
/// Implementations do not reconnect on their own; the feed client owns the
/// reconnect policy.
#[async_trait]
pub trait NotificationStream: Send {
    /// Open the stream for the given wallet.
    async fn connect(&mut self, wallet: &WalletAddress) -> Result<()>;

    /// Next event from the stream. `None` means the stream ended without a
    /// close frame.
    async fn next_event(&mut self) -> Option<FeedEvent>;

    /// Deterministically close the stream. Idempotent.
    async fn close(&mut self);
}
