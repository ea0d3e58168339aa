// Rust guideline compliant 2026-10-13

//! Session-scoped alert state for the FinTrack engine.
//!
//! [`AlertCenter`] owns the [`AlertStore`] and the [`ThresholdPolicy`] for one
//! application session. It is created once, passed by reference to the
//! evaluator and to whatever consumes alerts, and dropped at session end.
//! There is no global instance.

pub mod policy;
pub mod store;

pub use policy::ThresholdPolicy;
pub use store::{ALERT_CAPACITY, AlertStore};

use domain::{Alert, AlertThresholds, PartialAlertThresholds};
use std::cell::RefCell;
use tokio::sync::Notify;

/// Alert list plus thresholds, shared within a single-threaded session.
///
/// All methods take `&self`; interior mutability is sound because the
/// session runs on one thread and no borrow is held across an `.await`.
#[derive(Debug, Default)]
pub struct AlertCenter {
    store: RefCell<AlertStore>,
    policy: RefCell<ThresholdPolicy>,
    thresholds_changed: Notify,
}

impl AlertCenter {
    /// Create an empty center starting from `thresholds`.
    #[must_use]
    pub fn new(thresholds: AlertThresholds) -> Self {
        Self {
            store: RefCell::new(AlertStore::new()),
            policy: RefCell::new(ThresholdPolicy::new(thresholds)),
            thresholds_changed: Notify::new(),
        }
    }

    // -- thresholds ---------------------------------------------------------

    /// Thresholds in effect.
    #[must_use]
    pub fn thresholds(&self) -> AlertThresholds {
        self.policy.borrow().current()
    }

    /// Merge `partial` over the current thresholds.
    ///
    /// Does not evaluate anything by itself; listeners waiting on
    /// [`thresholds_changed`](Self::thresholds_changed) are woken.
    pub fn update_thresholds(&self, partial: PartialAlertThresholds) {
        self.policy.borrow_mut().update(partial);
        let current = self.thresholds();
        tracing::info!(
            burn_rate = current.burn_rate,
            cash_runway = current.cash_runway,
            expense_growth = current.expense_growth,
            "alerts.thresholds.updated"
        );
        self.thresholds_changed.notify_one();
    }

    /// Resolve after the next threshold update (or immediately if one is pending).
    pub async fn thresholds_changed(&self) {
        self.thresholds_changed.notified().await;
    }

    // -- alerts -------------------------------------------------------------

    /// Prepend freshly raised alerts, evicting the oldest beyond the bound.
    pub fn add(&self, fresh: Vec<Alert>) {
        if fresh.is_empty() {
            return;
        }
        let count = fresh.len();
        let mut store = self.store.borrow_mut();
        store.add(fresh);
        tracing::debug!(added = count, stored = store.len(), "alerts.store.added");
    }

    /// Copy of all alerts, newest first.
    #[must_use]
    pub fn alerts(&self) -> Vec<Alert> {
        self.store.borrow().alerts().to_vec()
    }

    /// Number of unread alerts.
    #[must_use]
    pub fn unread_count(&self) -> usize {
        self.store.borrow().unread_count()
    }

    /// Mark one alert read; unknown ids are ignored.
    pub fn mark_read(&self, id: uuid::Uuid) {
        self.store.borrow_mut().mark_read(id);
    }

    /// Mark every alert read.
    pub fn mark_all_read(&self) {
        self.store.borrow_mut().mark_all_read();
    }

    /// Remove one alert; unknown ids are ignored.
    pub fn dismiss(&self, id: uuid::Uuid) {
        self.store.borrow_mut().dismiss(id);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
