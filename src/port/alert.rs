//! Local alert sink for the live feed client.

use crate::domain::Notification;

/// Raises user-facing alerts for genuinely new notifications.
///
/// Alerts are fire-and-forget and never retried. Implementations must be
/// thread-safe and must not block; slow work belongs in a spawned task.
pub trait AlertSink: Send + Sync {
    /// Raise the transient banner and, where platform permission was
    /// previously granted, an OS-level notification.
    fn raise(&self, notification: &Notification);
}
