//! Budget reconciliation configuration.

use serde::{Deserialize, Serialize};

use super::reconcile::BudgetStatus;

/// Thresholds and rates used when reconciling a campaign budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcileConfig {
    /// Warning threshold as a share of the total budget (0.0 - 1.0)
    /// When spend reaches this share, the budget is flagged as warning
    pub warning_threshold: f64,

    /// Critical threshold as a share of the total budget (0.0 - 1.0)
    pub critical_threshold: f64,

    /// Platform fee charged on top of the prize budget (0.0 - 1.0)
    pub platform_fee_rate: f64,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            warning_threshold: 0.7,  // Warn at 70%
            critical_threshold: 0.9, // Critical at 90%
            platform_fee_rate: 0.15, // 15% on top
        }
    }
}

impl ReconcileConfig {
    /// Create a new config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a config that only ever flags an exceeded budget.
    pub fn exceeded_only() -> Self {
        Self {
            warning_threshold: 1.0,
            critical_threshold: 1.0,
            ..Self::default()
        }
    }

    /// Set the warning threshold.
    pub fn with_warning_threshold(mut self, threshold: f64) -> Self {
        self.warning_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    /// Set the critical threshold.
    pub fn with_critical_threshold(mut self, threshold: f64) -> Self {
        self.critical_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    /// Set the platform fee rate.
    pub fn with_platform_fee_rate(mut self, rate: f64) -> Self {
        self.platform_fee_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Classify spend against the budget.
    ///
    /// `over_budget` wins over the ratio, so spending exactly the budget is
    /// critical rather than exceeded.
    pub fn status_for(&self, ratio: f64, over_budget: bool) -> BudgetStatus {
        if over_budget {
            BudgetStatus::Exceeded
        } else if ratio >= self.critical_threshold {
            BudgetStatus::Critical
        } else if ratio >= self.warning_threshold {
            BudgetStatus::Warning
        } else {
            BudgetStatus::Ok
        }
    }

    /// Fee owed on top of a prize budget, rounded to whole units.
    pub fn platform_fee(&self, total_budget: u64) -> u64 {
        (total_budget as f64 * self.platform_fee_rate).round() as u64
    }
}
