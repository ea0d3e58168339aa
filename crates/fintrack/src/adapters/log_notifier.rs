// Rust guideline compliant 2026-10-15

//! Demo adapter for the `Notifier` port.
//!
//! Logs each freshly raised alert via `tracing` and always returns `Ok(())`.
//! `NotifyError::DeliveryFailed` is unreachable in this demo adapter.

use domain::{Alert, AlertKind, Notifier, NotifyError};

/// `Notifier` adapter that emits one log event per alert.
///
/// Danger alerts log at `warn`, everything else at `info`.
#[derive(Debug)]
pub struct LogNotifier;

impl LogNotifier {
    /// Create a new log notifier adapter.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for LogNotifier {
    async fn notify(&self, fresh: &[Alert], unread_count: usize) -> Result<(), NotifyError> {
        for alert in fresh {
            match alert.kind {
                AlertKind::Danger => tracing::warn!(
                    alert_id = %alert.id,
                    title = %alert.title,
                    message = %alert.message,
                    "log_notifier.alert"
                ),
                AlertKind::Warning | AlertKind::Info => tracing::info!(
                    alert_id = %alert.id,
                    title = %alert.title,
                    message = %alert.message,
                    "log_notifier.alert"
                ),
            }
        }
        tracing::info!(fresh = fresh.len(), unread_count, "log_notifier.badge");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
