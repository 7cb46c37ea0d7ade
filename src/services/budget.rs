//! Budget service
//!
//! Joins stored budgets with actual spending fetched through the ledger and
//! hands both to the evaluator. A budget without a limit is reported as
//! such, never dropped.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::analytics::{
    self, BudgetEvaluation, BudgetEvaluator, Confidence, ForecastMethod, ForecastResult, Forecaster,
};
use crate::config::AnalyticsSettings;
use crate::error::{FintrackError, FintrackResult};
use crate::ledger::{LedgerFilter, LedgerQuery};
use crate::models::{Budget, BudgetId, Category, CategoryId, Money, PeriodKey, TransactionKind};
use crate::storage::BudgetRepository;

use super::history_for;

/// Evaluation of one stored budget
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum BudgetState {
    Evaluated(BudgetEvaluation),
    NoLimit {
        budget_id: BudgetId,
        category_id: CategoryId,
        period: PeriodKey,
        actual: Money,
    },
}

impl BudgetState {
    pub fn category_id(&self) -> CategoryId {
        match self {
            Self::Evaluated(evaluation) => evaluation.category_id,
            Self::NoLimit { category_id, .. } => *category_id,
        }
    }

    pub fn evaluation(&self) -> Option<&BudgetEvaluation> {
        match self {
            Self::Evaluated(evaluation) => Some(evaluation),
            Self::NoLimit { .. } => None,
        }
    }
}

/// Daily spending advice for the rest of a period
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpendingRecommendation {
    pub category_id: CategoryId,
    pub period: PeriodKey,
    pub days_remaining: u32,
    pub current_daily: Money,
    /// What can still be spent per day without passing the limit
    pub recommended_daily: Money,
    /// `current_daily - recommended_daily`; positive means cut back
    pub adjustment: Money,
    pub will_exceed: bool,
    pub message: String,
}

/// Predicted end-of-period usage of one budget
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetOutlook {
    pub budget_id: BudgetId,
    pub category_id: CategoryId,
    pub limit: Money,
    pub spent_so_far: Money,
    pub forecast: ForecastResult,
    pub predicted_usage_pct: f64,
    pub will_exceed: bool,
}

/// Service for budget limits and their evaluation
pub struct BudgetService<'a, L> {
    budgets: &'a BudgetRepository,
    ledger: L,
    evaluator: BudgetEvaluator,
    forecaster: Forecaster,
    lookback_periods: u32,
}

impl<'a, L: LedgerQuery> BudgetService<'a, L> {
    pub fn new(budgets: &'a BudgetRepository, ledger: L, settings: &AnalyticsSettings) -> Self {
        Self {
            budgets,
            ledger,
            evaluator: BudgetEvaluator::from_settings(settings),
            forecaster: Forecaster::from_settings(settings),
            lookback_periods: settings.lookback_periods,
        }
    }

    /// Set (or replace) the limit for an expense category in a period
    pub fn set_limit(
        &self,
        category: &Category,
        period: PeriodKey,
        limit: Money,
    ) -> FintrackResult<Budget> {
        if !category.kind.is_expense() {
            return Err(FintrackError::Validation(format!(
                "Budgets apply to expense categories only; '{}' is {}",
                category.name, category.kind
            )));
        }
        if limit.is_negative() {
            return Err(FintrackError::Validation(format!(
                "Budget limit cannot be negative (got {})",
                limit
            )));
        }

        let budget = self.budgets.set_limit(category.id, period, limit)?;
        self.budgets.save()?;

        info!(category = %category.name, period = %period, limit = %limit, "set budget limit");
        Ok(budget)
    }

    /// Remove the budget for a category in a period
    pub fn delete(&self, category: &Category, period: PeriodKey) -> FintrackResult<Budget> {
        let budget = self.budgets.delete(category.id, period)?.ok_or_else(|| {
            FintrackError::budget_not_found(format!("{} in {}", category.name, period))
        })?;
        self.budgets.save()?;

        info!(category = %category.name, period = %period, "deleted budget");
        Ok(budget)
    }

    /// Expense total for a category within a period
    pub fn actual_spent(&self, category_id: CategoryId, period: PeriodKey) -> FintrackResult<Money> {
        let filter = LedgerFilter::for_period(period)
            .category(category_id)
            .expenses();
        Ok(self.ledger.fetch(&filter)?.iter().map(|r| r.amount).sum())
    }

    pub fn evaluate(&self, budget: &Budget) -> FintrackResult<BudgetState> {
        let actual = self.actual_spent(budget.category_id, budget.period)?;
        self.state(budget, actual)
    }

    /// Every budget of `period`, in storage order
    pub fn status(&self, period: PeriodKey) -> FintrackResult<Vec<BudgetState>> {
        info!(period = %period, "budget status");
        self.budgets
            .get_for_period(period)?
            .iter()
            .map(|budget| self.evaluate(budget))
            .collect()
    }

    /// Evaluated budgets at or above `threshold_pct`, highest first
    pub fn at_risk(
        &self,
        period: PeriodKey,
        threshold_pct: f64,
    ) -> FintrackResult<Vec<BudgetEvaluation>> {
        let evaluations: Vec<BudgetEvaluation> = self
            .status(period)?
            .into_iter()
            .filter_map(|state| match state {
                BudgetState::Evaluated(evaluation) => Some(evaluation),
                BudgetState::NoLimit { .. } => None,
            })
            .collect();
        Ok(analytics::at_risk(&evaluations, threshold_pct))
    }

    /// Evaluate as if `additional` were spent now
    pub fn check(
        &self,
        category_id: CategoryId,
        period: PeriodKey,
        additional: Money,
    ) -> FintrackResult<BudgetState> {
        let budget = self.require(category_id, period)?;
        let actual = self.actual_spent(category_id, period)?;
        self.state(&budget, actual + additional)
    }

    /// Daily spending advice for the rest of the budget's period
    ///
    /// # Errors
    ///
    /// `NotFound` without a budget, `NoLimit` when its limit is zero.
    pub fn spending_recommendation(
        &self,
        category_id: CategoryId,
        period: PeriodKey,
        today: NaiveDate,
    ) -> FintrackResult<SpendingRecommendation> {
        let budget = self.require(category_id, period)?;
        let spent = self.actual_spent(category_id, period)?;
        // A zero limit has no daily allowance to recommend
        let evaluation = self.evaluator.evaluate(&budget, spent)?;
        let elapsed = period.days_elapsed(today);
        let days_remaining = period.days() - elapsed;

        let current_daily = if elapsed > 0 {
            spent.as_f64() / f64::from(elapsed)
        } else {
            0.0
        };
        let recommended_daily = if days_remaining > 0 {
            (evaluation.remaining.as_f64() / f64::from(days_remaining)).max(0.0)
        } else {
            0.0
        };

        let outlook = self.outlook_for(&budget, spent, today)?;
        let current = Money::from_cents_f64(current_daily);
        let recommended = Money::from_cents_f64(recommended_daily);
        let adjustment = current - recommended;

        let message = if outlook.will_exceed {
            if adjustment.is_positive() {
                format!(
                    "Reduce spending to {}/day (currently {}/day) to stay within budget.",
                    recommended, current
                )
            } else {
                "You may exceed this budget. Monitor spending carefully.".to_string()
            }
        } else {
            format!("On track. Keep spending at or below {}/day.", recommended)
        };

        Ok(SpendingRecommendation {
            category_id,
            period,
            days_remaining,
            current_daily: current,
            recommended_daily: recommended,
            adjustment,
            will_exceed: outlook.will_exceed,
            message,
        })
    }

    /// Predicted usage of every limited budget in `period`, highest first
    pub fn outlook(&self, period: PeriodKey, today: NaiveDate) -> FintrackResult<Vec<BudgetOutlook>> {
        info!(period = %period, "budget outlook");
        let mut outlooks = Vec::new();
        for budget in self.budgets.get_for_period(period)? {
            if !budget.has_limit() {
                warn!(category = %budget.category_id, period = %period, "no limit configured, skipping outlook");
                continue;
            }
            let spent = self.actual_spent(budget.category_id, period)?;
            outlooks.push(self.outlook_for(&budget, spent, today)?);
        }
        outlooks.sort_by(|a, b| b.predicted_usage_pct.total_cmp(&a.predicted_usage_pct));
        Ok(outlooks)
    }

    fn outlook_for(
        &self,
        budget: &Budget,
        spent: Money,
        today: NaiveDate,
    ) -> FintrackResult<BudgetOutlook> {
        let period = budget.period;
        let history = history_for(
            &self.ledger,
            budget.category_id,
            TransactionKind::Expense,
            period,
            self.lookback_periods,
        )?;
        let elapsed = period.days_elapsed(today);

        let forecast = if history.is_empty() && elapsed == 0 {
            // Nothing to go on yet; the spending so far is the estimate
            ForecastResult {
                category_id: budget.category_id,
                predicted: spent,
                method: ForecastMethod::CurrentPace,
                confidence: Confidence::Low,
                confidence_note: "no history and the period has not started".to_string(),
                periods_used: 0,
            }
        } else {
            self.forecaster.forecast_period_end(
                budget.category_id,
                &history,
                spent,
                elapsed,
                period.days(),
            )?
        };
        debug!(category = %budget.category_id, method = %forecast.method, "outlook forecast");

        let predicted_usage_pct = if budget.has_limit() {
            forecast.predicted.as_f64() * 100.0 / budget.limit.as_f64()
        } else {
            0.0
        };

        Ok(BudgetOutlook {
            budget_id: budget.id,
            category_id: budget.category_id,
            limit: budget.limit,
            spent_so_far: spent,
            will_exceed: budget.has_limit() && forecast.predicted > budget.limit,
            predicted_usage_pct,
            forecast,
        })
    }

    fn require(&self, category_id: CategoryId, period: PeriodKey) -> FintrackResult<Budget> {
        self.budgets
            .get(category_id, period)?
            .ok_or_else(|| FintrackError::budget_not_found(format!("{} in {}", category_id, period)))
    }

    fn state(&self, budget: &Budget, actual: Money) -> FintrackResult<BudgetState> {
        match self.evaluator.evaluate(budget, actual) {
            Ok(evaluation) => Ok(BudgetState::Evaluated(evaluation)),
            Err(e) if e.is_no_limit() => {
                warn!(category = %budget.category_id, period = %budget.period, "no limit configured");
                Ok(BudgetState::NoLimit {
                    budget_id: budget.id,
                    category_id: budget.category_id,
                    period: budget.period,
                    actual,
                })
            }
            Err(e) => Err(e),
        }
    }
}
