//! Telegram bot channel.
//!
//! Delivers notifications to a configured chat through a background worker
//! so a slow Bot API call never blocks dispatch. Requires the `telegram`
//! feature.

use teloxide::prelude::*;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::error::DeliveryError;
use crate::port::{ChannelKind, DeliveryChannel, DeliveryRequest, Priority};

/// Outbound Telegram channel backed by an mpsc-fed worker task.
pub struct TelegramChannel {
    sender: mpsc::UnboundedSender<String>,
}

impl TelegramChannel {
    /// Create the channel and spawn its delivery worker.
    #[must_use]
    pub fn new(bot_token: &str, chat_id: i64) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let bot = Bot::new(bot_token);
        tokio::spawn(telegram_worker(bot, ChatId(chat_id), receiver));
        Self { sender }
    }
}

#[async_trait::async_trait]
impl DeliveryChannel for TelegramChannel {
    fn kind(&self) -> ChannelKind {
        ChannelKind::Bot
    }

    async fn deliver(&self, request: &DeliveryRequest) -> Result<(), DeliveryError> {
        let text = format_message(request);
        self.sender
            .send(text)
            .map_err(|_| DeliveryError::Unavailable {
                channel: ChannelKind::Bot.as_str().to_string(),
                reason: "worker channel closed".to_string(),
            })
    }
}

fn format_message(request: &DeliveryRequest) -> String {
    let mut text = match request.priority {
        Priority::High => format!("🚨 {}\n{}", request.title, request.body),
        Priority::Normal => format!("{}\n{}", request.title, request.body),
    };
    for action in &request.actions {
        text.push_str(&format!("\n{}: {}", action.label, action.url));
    }
    text
}

/// Background worker that drains queued messages to the Bot API.
async fn telegram_worker(bot: Bot, chat_id: ChatId, mut receiver: mpsc::UnboundedReceiver<String>) {
    info!(chat_id = chat_id.0, "Telegram channel worker started");

    while let Some(text) = receiver.recv().await {
        if let Err(e) = bot.send_message(chat_id, &text).await {
            error!(error = %e, "Failed to send Telegram message");
        }
    }

    warn!("Telegram channel worker shutting down");
}
