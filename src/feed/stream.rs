//! WebSocket adapter for the notification push stream.

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, trace, warn};

use crate::domain::WalletAddress;
use crate::error::Result;
use crate::port::{FeedEvent, NotificationStream};

use super::message::{parse_message, FeedMessage};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// One WebSocket connection to the notification feed.
///
/// The adapter owns only the socket lifecycle and frame translation;
/// reconnect policy, baseline handling, and dedup live in the client.
pub struct WsNotificationStream {
    url: String,
    ws: Option<WsStream>,
}

impl WsNotificationStream {
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ws: None,
        }
    }

    fn translate(message: FeedMessage) -> FeedEvent {
        match message {
            FeedMessage::Connected => FeedEvent::Connected,
            FeedMessage::Notifications(data) => FeedEvent::Snapshot(data.into_snapshot()),
            FeedMessage::Heartbeat => FeedEvent::Heartbeat,
            FeedMessage::Error(data) => FeedEvent::ServerError {
                message: data.message,
            },
        }
    }
}

#[async_trait]
impl NotificationStream for WsNotificationStream {
    async fn connect(&mut self, wallet: &WalletAddress) -> Result<()> {
        let url = format!("{}?wallet={}", self.url, wallet);
        info!(url = %self.url, wallet = %wallet, "Connecting to notification feed");

        let (ws, response) = connect_async(&url).await?;
        debug!(status = %response.status(), "Feed WebSocket connected");

        self.ws = Some(ws);
        Ok(())
    }

    async fn next_event(&mut self) -> Option<FeedEvent> {
        let ws = self.ws.as_mut()?;

        loop {
            match ws.next().await? {
                Ok(Message::Text(text)) => match parse_message(&text) {
                    Ok(message) => return Some(Self::translate(message)),
                    Err(e) => {
                        warn!(error = %e, "Unparseable feed frame, skipping");
                    }
                },
                Ok(Message::Ping(payload)) => {
                    trace!("Feed ping, answering with pong");
                    if let Err(e) = ws.send(Message::Pong(payload)).await {
                        return Some(FeedEvent::Disconnected {
                            reason: e.to_string(),
                        });
                    }
                }
                Ok(Message::Close(frame)) => {
                    let reason = frame
                        .map(|f| f.reason.to_string())
                        .unwrap_or_else(|| "closed by server".to_string());
                    self.ws = None;
                    return Some(FeedEvent::Disconnected { reason });
                }
                Ok(_) => {}
                Err(e) => {
                    self.ws = None;
                    return Some(FeedEvent::Disconnected {
                        reason: e.to_string(),
                    });
                }
            }
        }
    }

    async fn close(&mut self) {
        if let Some(mut ws) = self.ws.take() {
            if let Err(e) = ws.close(None).await {
                debug!(error = %e, "Error closing feed WebSocket");
            }
        }
    }
}
