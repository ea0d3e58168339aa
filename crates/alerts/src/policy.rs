// Rust guideline compliant 2026-10-13

//! Current alert thresholds, updated by partial merge.

use domain::{AlertThresholds, PartialAlertThresholds};

/// Holds the thresholds the evaluator compares metrics against.
///
/// Values are not validated: zero or negative limits are accepted and simply
/// make a rule always or never fire.
#[derive(Debug, Default)]
pub struct ThresholdPolicy {
    current: AlertThresholds,
}

impl ThresholdPolicy {
    /// Start from `initial` thresholds.
    #[must_use]
    pub fn new(initial: AlertThresholds) -> Self {
        Self { current: initial }
    }

    /// Thresholds in effect.
    #[must_use]
    pub fn current(&self) -> AlertThresholds {
        self.current
    }

    /// Overwrite the supplied fields; leave the rest untouched.
    pub fn update(&mut self, partial: PartialAlertThresholds) {
        self.current = self.current.merged(partial);
    }
}
