//! Live notification feed: WebSocket stream adapter and the client that
//! owns connection state, alert dedup, and the local snapshot cache.

mod client;
mod message;
mod state;
mod stream;

pub use client::FeedClient;
pub use state::ConnectionState;
pub use stream::WsNotificationStream;
