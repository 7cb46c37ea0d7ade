//! Budget utilization and alert levels
//!
//! Thresholds are compared by cross-multiplying in cents
//! (`actual × 100 ≥ threshold × limit`), so a budget at exactly 80.0% is
//! `warning` and one at 79.999% is still `ok`.

use serde::Serialize;
use std::fmt;

use crate::config::AnalyticsSettings;
use crate::error::{FintrackError, FintrackResult};
use crate::models::{Budget, BudgetId, CategoryId, Money, PeriodKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Ok,
    Warning,
    Exceeded,
}

impl fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok => write!(f, "ok"),
            Self::Warning => write!(f, "warning"),
            Self::Exceeded => write!(f, "exceeded"),
        }
    }
}

/// Utilization percentages at which alerts start
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlertThresholds {
    pub warning_pct: f64,
    pub exceeded_pct: f64,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            warning_pct: 80.0,
            exceeded_pct: 100.0,
        }
    }
}

impl AlertThresholds {
    pub fn from_settings(settings: &AnalyticsSettings) -> Self {
        Self {
            warning_pct: settings.warning_threshold_pct,
            exceeded_pct: settings.exceeded_threshold_pct,
        }
    }

    pub fn classify(&self, actual: Money, limit: Money) -> AlertLevel {
        if reaches(actual, limit, self.exceeded_pct) {
            AlertLevel::Exceeded
        } else if reaches(actual, limit, self.warning_pct) {
            AlertLevel::Warning
        } else {
            AlertLevel::Ok
        }
    }
}

/// `actual / limit × 100 ≥ threshold_pct` without dividing
fn reaches(actual: Money, limit: Money, threshold_pct: f64) -> bool {
    actual.as_f64() * 100.0 >= threshold_pct * limit.as_f64()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetEvaluation {
    pub budget_id: BudgetId,
    pub category_id: CategoryId,
    pub period: PeriodKey,
    pub limit: Money,
    pub actual: Money,
    pub utilization_pct: f64,
    /// `limit - actual`; negative once overspent
    pub remaining: Money,
    pub alert_level: AlertLevel,
}

impl BudgetEvaluation {
    pub fn is_over(&self) -> bool {
        self.remaining.is_negative()
    }
}

#[derive(Debug, Clone, Default)]
pub struct BudgetEvaluator {
    thresholds: AlertThresholds,
}

impl BudgetEvaluator {
    pub fn new(thresholds: AlertThresholds) -> Self {
        Self { thresholds }
    }

    pub fn from_settings(settings: &AnalyticsSettings) -> Self {
        Self::new(AlertThresholds::from_settings(settings))
    }

    pub fn thresholds(&self) -> AlertThresholds {
        self.thresholds
    }

    /// Compare actual spending against the budget's limit
    ///
    /// # Errors
    ///
    /// `NoLimit` when the limit is zero, `Validation` when it is negative.
    pub fn evaluate(&self, budget: &Budget, actual: Money) -> FintrackResult<BudgetEvaluation> {
        if budget.limit.is_negative() {
            return Err(FintrackError::Validation(format!(
                "Budget limit cannot be negative (got {})",
                budget.limit
            )));
        }
        if budget.limit.is_zero() {
            return Err(FintrackError::NoLimit {
                category: budget.category_id.to_string(),
                period: budget.period.to_string(),
            });
        }

        Ok(BudgetEvaluation {
            budget_id: budget.id,
            category_id: budget.category_id,
            period: budget.period,
            limit: budget.limit,
            actual,
            utilization_pct: actual.as_f64() * 100.0 / budget.limit.as_f64(),
            remaining: budget.limit - actual,
            alert_level: self.thresholds.classify(actual, budget.limit),
        })
    }

    /// Evaluate as if `additional` had also been spent
    pub fn project(
        &self,
        budget: &Budget,
        actual: Money,
        additional: Money,
    ) -> FintrackResult<BudgetEvaluation> {
        self.evaluate(budget, actual + additional)
    }
}

/// Evaluations at or above `threshold_pct`, highest utilization first
pub fn at_risk(evaluations: &[BudgetEvaluation], threshold_pct: f64) -> Vec<BudgetEvaluation> {
    let mut flagged: Vec<BudgetEvaluation> = evaluations
        .iter()
        .filter(|evaluation| reaches(evaluation.actual, evaluation.limit, threshold_pct))
        .cloned()
        .collect();
    flagged.sort_by(|a, b| b.utilization_pct.total_cmp(&a.utilization_pct));
    flagged
}
