// Rust guideline compliant 2026-10-13

//! Bounded, newest-first alert collection with read/unread state.

use domain::Alert;

/// Maximum number of alerts retained; older entries are evicted.
pub const ALERT_CAPACITY: usize = 50;

/// Ordered alert list, newest first, never longer than its capacity.
///
/// Operations on unknown ids are no-ops.
#[derive(Debug)]
pub struct AlertStore {
    alerts: Vec<Alert>,
    capacity: usize,
}

impl AlertStore {
    /// Create an empty store holding at most [`ALERT_CAPACITY`] alerts.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(ALERT_CAPACITY)
    }

    /// Create an empty store with a custom bound.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self { alerts: Vec::new(), capacity }
    }

    /// Prepend `fresh` (kept in the given order) and drop whatever falls past the bound.
    pub fn add(&mut self, fresh: Vec<Alert>) {
        if fresh.is_empty() {
            return;
        }
        let older = std::mem::replace(&mut self.alerts, fresh);
        self.alerts.extend(older);
        self.alerts.truncate(self.capacity);
    }

    /// Mark one alert read. Idempotent.
    pub fn mark_read(&mut self, id: uuid::Uuid) {
        if let Some(alert) = self.alerts.iter_mut().find(|a| a.id == id) {
            alert.is_read = true;
        }
    }

    /// Mark every alert read. Idempotent.
    pub fn mark_all_read(&mut self) {
        for alert in &mut self.alerts {
            alert.is_read = true;
        }
    }

    /// Remove one alert regardless of its read state.
    pub fn dismiss(&mut self, id: uuid::Uuid) {
        self.alerts.retain(|a| a.id != id);
    }

    /// Number of alerts not yet read.
    #[must_use]
    pub fn unread_count(&self) -> usize {
        self.alerts.iter().filter(|a| !a.is_read).count()
    }

    /// All alerts, newest first.
    #[must_use]
    pub fn alerts(&self) -> &[Alert] {
        &self.alerts
    }

    /// Look up one alert.
    #[must_use]
    pub fn get(&self, id: uuid::Uuid) -> Option<&Alert> {
        self.alerts.iter().find(|a| a.id == id)
    }

    /// Number of stored alerts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.alerts.len()
    }

    /// `true` when no alert is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }
}

impl Default for AlertStore {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
