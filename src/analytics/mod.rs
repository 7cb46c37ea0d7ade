//! The analytics engine
//!
//! Pure functions over records and entities supplied by the caller. Nothing
//! in here reads storage, logs or looks at the clock; `today` is always an
//! argument.

pub mod aggregator;
pub mod budget_evaluator;
pub mod forecaster;
pub mod goal_tracker;

pub use aggregator::{aggregate, CategoryTotal, PeriodAggregate, PeriodAggregates, PeriodTotals};
pub use budget_evaluator::{at_risk, AlertLevel, AlertThresholds, BudgetEvaluation, BudgetEvaluator};
pub use forecaster::{Confidence, ForecastMethod, ForecastResult, Forecaster};
pub use goal_tracker::{savings_plan, GoalEvaluation, GoalTracker, SavingsPlan};
