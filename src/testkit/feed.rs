//! Mock [`NotificationStream`] implementations.
//!
//! - [`ScriptedFeed`] - preloaded connect results and event queue. Best for
//!   reconnect and suppression logic.
//! - [`ChannelFeed`] - channel-backed stream with an external [`FeedHandle`]
//!   for on-demand event delivery. Best for timing tests such as the
//!   heartbeat timeout.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::domain::WalletAddress;
use crate::error::Result;
use crate::port::{FeedEvent, NotificationStream};

/// A stream with scripted connect results and a fixed event queue.
///
/// Each `connect()` pops the next result (defaults to `Ok(())` when
/// exhausted); `next_event()` pops the next event and yields `None` once
/// the queue is drained.
pub struct ScriptedFeed {
    connect_results: VecDeque<Result<()>>,
    events: VecDeque<FeedEvent>,
    connect_count: Arc<AtomicU32>,
    closed: bool,
}

impl ScriptedFeed {
    #[must_use]
    pub fn new() -> Self {
        Self {
            connect_results: VecDeque::new(),
            events: VecDeque::new(),
            connect_count: Arc::new(AtomicU32::new(0)),
            closed: false,
        }
    }

    #[must_use]
    pub fn with_connect_results(mut self, results: Vec<Result<()>>) -> Self {
        self.connect_results = results.into();
        self
    }

    #[must_use]
    pub fn with_events(mut self, events: Vec<FeedEvent>) -> Self {
        self.events = events.into();
        self
    }

    /// Shared connect counter, usable after the stream is moved into the
    /// client.
    #[must_use]
    pub fn connect_counter(&self) -> Arc<AtomicU32> {
        Arc::clone(&self.connect_count)
    }
}

impl Default for ScriptedFeed {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotificationStream for ScriptedFeed {
    async fn connect(&mut self, _wallet: &WalletAddress) -> Result<()> {
        self.connect_count.fetch_add(1, Ordering::SeqCst);
        self.closed = false;
        self.connect_results.pop_front().unwrap_or(Ok(()))
    }

    async fn next_event(&mut self) -> Option<FeedEvent> {
        if self.closed {
            return None;
        }
        self.events.pop_front()
    }

    async fn close(&mut self) {
        self.closed = true;
    }
}

/// External control handle for a [`ChannelFeed`].
#[derive(Clone)]
pub struct FeedHandle {
    sender: mpsc::UnboundedSender<FeedEvent>,
}

impl FeedHandle {
    /// Push one event into the stream. Ignored after the stream is dropped.
    pub fn push(&self, event: FeedEvent) {
        let _ = self.sender.send(event);
    }
}

/// A stream fed on demand through a [`FeedHandle`].
pub struct ChannelFeed {
    receiver: mpsc::UnboundedReceiver<FeedEvent>,
    connect_count: Arc<AtomicU32>,
}

impl ChannelFeed {
    #[must_use]
    pub fn new() -> (Self, FeedHandle) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (
            Self {
                receiver,
                connect_count: Arc::new(AtomicU32::new(0)),
            },
            FeedHandle { sender },
        )
    }

    #[must_use]
    pub fn connect_counter(&self) -> Arc<AtomicU32> {
        Arc::clone(&self.connect_count)
    }
}

#[async_trait]
impl NotificationStream for ChannelFeed {
    async fn connect(&mut self, _wallet: &WalletAddress) -> Result<()> {
        self.connect_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn next_event(&mut self) -> Option<FeedEvent> {
        self.receiver.recv().await
    }

    async fn close(&mut self) {
        self.receiver.close();
    }
}
