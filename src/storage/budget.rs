//! Budget repository backed by budgets.json
//!
//! Budgets are keyed by (category, period); setting a limit for an existing
//! pair replaces it in place.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::FintrackError;
use crate::models::{Budget, CategoryId, Money, PeriodKey};

use super::file_io::{read_json, write_json_atomic};
use super::{read_lock, write_lock};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct BudgetData {
    #[serde(default)]
    budgets: Vec<Budget>,
}

/// Composite key: one budget per category per period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BudgetKey {
    pub category_id: CategoryId,
    pub period: PeriodKey,
}

impl BudgetKey {
    pub fn new(category_id: CategoryId, period: PeriodKey) -> Self {
        Self {
            category_id,
            period,
        }
    }
}

pub struct BudgetRepository {
    path: PathBuf,
    budgets: RwLock<HashMap<BudgetKey, Budget>>,
}

impl BudgetRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            budgets: RwLock::new(HashMap::new()),
        }
    }

    pub fn load(&self) -> Result<(), FintrackError> {
        let file_data: BudgetData = read_json(&self.path)?;
        let mut budgets = write_lock(&self.budgets)?;

        budgets.clear();
        for budget in file_data.budgets {
            budgets.insert(BudgetKey::new(budget.category_id, budget.period), budget);
        }
        Ok(())
    }

    pub fn save(&self) -> Result<(), FintrackError> {
        let budgets = self.get_all()?;
        write_json_atomic(&self.path, &BudgetData { budgets })
    }

    pub fn get(
        &self,
        category_id: CategoryId,
        period: PeriodKey,
    ) -> Result<Option<Budget>, FintrackError> {
        let budgets = read_lock(&self.budgets)?;
        Ok(budgets.get(&BudgetKey::new(category_id, period)).cloned())
    }

    /// All budgets ordered by period
    pub fn get_all(&self) -> Result<Vec<Budget>, FintrackError> {
        let budgets = read_lock(&self.budgets)?;
        let mut list: Vec<_> = budgets.values().cloned().collect();
        list.sort_by(|a, b| a.period.cmp(&b.period).then(a.category_id.cmp(&b.category_id)));
        Ok(list)
    }

    pub fn get_for_period(&self, period: PeriodKey) -> Result<Vec<Budget>, FintrackError> {
        Ok(self
            .get_all()?
            .into_iter()
            .filter(|b| b.period == period)
            .collect())
    }

    /// Create the budget or replace its limit, returning the stored budget
    pub fn set_limit(
        &self,
        category_id: CategoryId,
        period: PeriodKey,
        limit: Money,
    ) -> Result<Budget, FintrackError> {
        let mut budgets = write_lock(&self.budgets)?;
        let budget = budgets
            .entry(BudgetKey::new(category_id, period))
            .and_modify(|existing| existing.set_limit(limit))
            .or_insert_with(|| Budget::new(category_id, period, limit));
        Ok(budget.clone())
    }

    pub fn delete(
        &self,
        category_id: CategoryId,
        period: PeriodKey,
    ) -> Result<Option<Budget>, FintrackError> {
        let mut budgets = write_lock(&self.budgets)?;
        Ok(budgets.remove(&BudgetKey::new(category_id, period)))
    }
}
