//! Mock [`LedgerQuery`] implementations.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::Position;
use crate::error::{Result, ScanError};
use crate::port::{LedgerEvent, LedgerQuery};

/// A ledger serving a fixed set of positions and events, or failing every
/// read when built with [`StaticLedger::failing`].
pub struct StaticLedger {
    positions: Vec<Position>,
    events: Vec<LedgerEvent>,
    fail: bool,
    scan_delay: Option<Duration>,
    scans: Arc<AtomicU32>,
}

impl StaticLedger {
    #[must_use]
    pub fn with_positions(positions: Vec<Position>) -> Self {
        Self {
            positions,
            events: Vec::new(),
            fail: false,
            scan_delay: None,
            scans: Arc::new(AtomicU32::new(0)),
        }
    }

    #[must_use]
    pub fn with_events(mut self, events: Vec<LedgerEvent>) -> Self {
        self.events = events;
        self
    }

    /// Make every `open_positions` call take this long. For tests that need
    /// a scan to outlast its tick interval.
    #[must_use]
    pub fn with_scan_delay(mut self, delay: Duration) -> Self {
        self.scan_delay = Some(delay);
        self
    }

    /// Shared counter of `open_positions` calls, usable after the ledger is
    /// moved behind the port.
    #[must_use]
    pub fn scan_counter(&self) -> Arc<AtomicU32> {
        Arc::clone(&self.scans)
    }

    /// A ledger whose every read fails.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            positions: Vec::new(),
            events: Vec::new(),
            fail: true,
            scan_delay: None,
            scans: Arc::new(AtomicU32::new(0)),
        }
    }
}

#[async_trait]
impl LedgerQuery for StaticLedger {
    async fn open_positions(&self) -> Result<Vec<Position>> {
        self.scans.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.scan_delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            return Err(ScanError::LedgerUnavailable("scripted failure".into()).into());
        }
        Ok(self.positions.clone())
    }

    async fn events_since(&self, cursor: DateTime<Utc>) -> Result<Vec<LedgerEvent>> {
        if self.fail {
            return Err(ScanError::LedgerUnavailable("scripted failure".into()).into());
        }
        Ok(self
            .events
            .iter()
            .filter(|e| e.occurred_at > cursor)
            .cloned()
            .collect())
    }
}
