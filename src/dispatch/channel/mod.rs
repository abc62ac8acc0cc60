//! Outbound delivery channel adapters.

mod provider;
#[cfg(feature = "telegram")]
mod telegram;

pub use provider::HttpDeliveryProvider;
#[cfg(feature = "telegram")]
pub use telegram::TelegramChannel;
