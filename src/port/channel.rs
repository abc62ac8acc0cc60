//! Delivery channel port for external notification providers.

use async_trait::async_trait;

use crate::domain::WalletAddress;
use crate::error::DeliveryError;

/// A delivery medium for a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelKind {
    Push,
    Email,
    Bot,
    InApp,
}

impl ChannelKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Push => "push",
            Self::Email => "email",
            Self::Bot => "bot",
            Self::InApp => "in-app",
        }
    }
}

impl std::fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Delivery urgency. `High` attaches an expedited hint for channels that
/// support one; others ignore it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Priority {
    #[default]
    Normal,
    High,
}

/// An action button attached to a delivered message.
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryAction {
    pub label: String,
    pub url: String,
}

/// One message bound for one channel.
#[derive(Debug, Clone)]
pub struct DeliveryRequest {
    pub recipient: WalletAddress,
    pub title: String,
    pub body: String,
    pub actions: Vec<DeliveryAction>,
    pub priority: Priority,
}

/// A single external delivery medium.
///
/// Delivery is best-effort: the dispatcher catches and logs failures, so
/// implementations should return structured errors rather than retrying
/// internally for long periods.
#[async_trait]
pub trait DeliveryChannel: Send + Sync {
    /// Which medium this channel delivers to.
    fn kind(&self) -> ChannelKind;

    /// Deliver one message. Failures are isolated per channel.
    async fn deliver(&self, request: &DeliveryRequest) -> Result<(), DeliveryError>;
}
