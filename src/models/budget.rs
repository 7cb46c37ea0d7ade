//! Budget model
//!
//! A spending limit for one expense category over one period. There is at
//! most one budget per (category, period); the storage layer enforces that.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{BudgetId, CategoryId};
use super::money::Money;
use super::period::PeriodKey;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    pub id: BudgetId,

    pub category_id: CategoryId,

    /// Usually a month; week and day keys are accepted
    pub period: PeriodKey,

    /// Spending limit. Zero means "no limit configured".
    pub limit: Money,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Budget {
    pub fn new(category_id: CategoryId, period: PeriodKey, limit: Money) -> Self {
        let now = Utc::now();
        Self {
            id: BudgetId::new(),
            category_id,
            period,
            limit,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the limit, keeping identity
    pub fn set_limit(&mut self, limit: Money) {
        self.limit = limit;
        self.updated_at = Utc::now();
    }

    pub fn has_limit(&self) -> bool {
        !self.limit.is_zero()
    }

    pub fn validate(&self) -> Result<(), BudgetValidationError> {
        if self.limit.is_negative() {
            return Err(BudgetValidationError::NegativeLimit(self.limit));
        }
        Ok(())
    }
}

impl fmt::Display for Budget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} limit {}", self.period, self.limit)
    }
}

/// Validation errors for budgets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BudgetValidationError {
    NegativeLimit(Money),
}

impl fmt::Display for BudgetValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativeLimit(limit) => {
                write!(f, "Budget limit cannot be negative (got {})", limit)
            }
        }
    }
}

impl std::error::Error for BudgetValidationError {}
