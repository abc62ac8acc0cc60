//! Recording [`DeliveryChannel`] for dispatcher tests.

use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::DeliveryError;
use crate::port::{ChannelKind, DeliveryChannel, DeliveryRequest};

/// Captures every delivery request it receives. Built with
/// [`RecordingChannel::failing`], it still records but returns an error for
/// each delivery.
pub struct RecordingChannel {
    kind: ChannelKind,
    fail: bool,
    deliveries: Mutex<Vec<DeliveryRequest>>,
}

impl RecordingChannel {
    #[must_use]
    pub fn new(kind: ChannelKind) -> Self {
        Self {
            kind,
            fail: false,
            deliveries: Mutex::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn failing(kind: ChannelKind) -> Self {
        Self {
            kind,
            fail: true,
            deliveries: Mutex::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn deliveries(&self) -> Vec<DeliveryRequest> {
        self.deliveries.lock().clone()
    }

    /// Block until at least `n` deliveries arrived. Deliveries run on
    /// detached tasks, so assertions need this rendezvous.
    ///
    /// # Panics
    /// Panics after one second without reaching `n`.
    pub async fn wait_for_deliveries(&self, n: usize) {
        let waited = tokio::time::timeout(Duration::from_secs(1), async {
            while self.deliveries.lock().len() < n {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await;
        assert!(
            waited.is_ok(),
            "timed out waiting for {n} deliveries on {}",
            self.kind
        );
    }
}

#[async_trait]
impl DeliveryChannel for RecordingChannel {
    fn kind(&self) -> ChannelKind {
        self.kind
    }

    async fn deliver(&self, request: &DeliveryRequest) -> Result<(), DeliveryError> {
        self.deliveries.lock().push(request.clone());
        if self.fail {
            return Err(DeliveryError::Rejected {
                channel: self.kind.as_str().to_string(),
                reason: "scripted failure".to_string(),
            });
        }
        Ok(())
    }
}
