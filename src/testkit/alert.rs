//! Recording [`AlertSink`] for feed client tests.

use parking_lot::Mutex;

use crate::domain::Notification;
use crate::port::AlertSink;

/// Captures every raised alert for later assertion.
#[derive(Default)]
pub struct RecordingAlerts {
    raised: Mutex<Vec<Notification>>,
}

impl RecordingAlerts {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn raised(&self) -> Vec<Notification> {
        self.raised.lock().clone()
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.raised.lock().len()
    }
}

impl AlertSink for RecordingAlerts {
    fn raise(&self, notification: &Notification) {
        self.raised.lock().push(notification.clone());
    }
}
