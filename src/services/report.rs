//! Report service
//!
//! Period aggregation, summaries and per-category forecasts over the ledger.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info};

use crate::analytics::{aggregate, CategoryTotal, ForecastResult, Forecaster, PeriodAggregates};
use crate::config::AnalyticsSettings;
use crate::error::FintrackResult;
use crate::ledger::{DateRange, LedgerFilter, LedgerQuery};
use crate::models::{Category, CategoryId, Granularity, Money, PeriodKey, TransactionKind};

use super::history_for;

/// Which estimate `forecast` produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ForecastMode {
    /// The whole period, from past periods only
    #[default]
    Next,
    /// Spending so far extrapolated over the period
    Pace,
    /// History and current pace weighted by elapsed days
    Blended,
}

impl fmt::Display for ForecastMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Next => write!(f, "next"),
            Self::Pace => write!(f, "pace"),
            Self::Blended => write!(f, "blended"),
        }
    }
}

impl FromStr for ForecastMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "next" => Ok(Self::Next),
            "pace" => Ok(Self::Pace),
            "blended" => Ok(Self::Blended),
            other => Err(format!(
                "Unknown forecast mode '{}' (expected next, pace or blended)",
                other
            )),
        }
    }
}

/// Income and expense for one period
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodSummary {
    pub period: PeriodKey,
    pub income: Money,
    pub expense: Money,
    pub net: Money,
    pub transaction_count: usize,
    pub expenses_by_category: Vec<CategoryTotal>,
    pub income_by_category: Vec<CategoryTotal>,
}

pub struct ReportService<L> {
    ledger: L,
    forecaster: Forecaster,
    lookback_periods: u32,
}

impl<L: LedgerQuery> ReportService<L> {
    pub fn new(ledger: L, settings: &AnalyticsSettings) -> Self {
        Self {
            ledger,
            forecaster: Forecaster::from_settings(settings),
            lookback_periods: settings.lookback_periods,
        }
    }

    /// Bucket everything in `range`
    pub fn aggregate(
        &self,
        range: DateRange,
        granularity: Granularity,
    ) -> FintrackResult<PeriodAggregates> {
        info!(start = %range.start(), end = %range.end(), %granularity, "aggregate report");
        let records = self.ledger.fetch(&LedgerFilter::new(range))?;
        debug!(records = records.len(), "aggregating");
        Ok(aggregate(&records, granularity))
    }

    pub fn summary(&self, period: PeriodKey) -> FintrackResult<PeriodSummary> {
        info!(period = %period, "period summary");
        let records = self.ledger.fetch(&LedgerFilter::for_period(period))?;
        let aggregates = aggregate(&records, period.granularity());

        let income = aggregates.total(TransactionKind::Income);
        let expense = aggregates.total(TransactionKind::Expense);
        Ok(PeriodSummary {
            period,
            income,
            expense,
            net: income - expense,
            transaction_count: records.len(),
            expenses_by_category: aggregates.category_totals(TransactionKind::Expense),
            income_by_category: aggregates.category_totals(TransactionKind::Income),
        })
    }

    /// Per-category totals of one type in `range`, largest first
    pub fn categories(
        &self,
        range: DateRange,
        kind: TransactionKind,
    ) -> FintrackResult<Vec<CategoryTotal>> {
        info!(start = %range.start(), end = %range.end(), %kind, "category report");
        let records = self.ledger.fetch(&LedgerFilter::new(range).kind(kind))?;
        // Bucket size does not matter once totals are summed across periods
        Ok(aggregate(&records, Granularity::Month).category_totals(kind))
    }

    /// Forecast one category for `period`
    ///
    /// `Next` uses only the periods before `period`; `Pace` and `Blended`
    /// also use what was recorded in `period` up to `today`.
    ///
    /// Engine errors are reported against the category's name and `period`.
    pub fn forecast(
        &self,
        category: &Category,
        period: PeriodKey,
        mode: ForecastMode,
        today: NaiveDate,
    ) -> FintrackResult<ForecastResult> {
        info!(category = %category.name, period = %period, %mode, "forecast");
        self.forecast_by_id(category.id, category.kind, period, mode, today)
            .map_err(|e| e.for_category(&category.name, period))
    }

    fn forecast_by_id(
        &self,
        category_id: CategoryId,
        kind: TransactionKind,
        period: PeriodKey,
        mode: ForecastMode,
        today: NaiveDate,
    ) -> FintrackResult<ForecastResult> {

        let result = match mode {
            ForecastMode::Next => {
                let history = self.history(category_id, kind, period)?;
                self.forecaster.forecast(category_id, &history)?
            }
            ForecastMode::Pace => {
                let so_far = self.so_far(category_id, kind, period, today)?;
                self.forecaster.forecast_current_pace(
                    category_id,
                    so_far,
                    period.days_elapsed(today),
                    period.days(),
                )?
            }
            ForecastMode::Blended => {
                let history = self.history(category_id, kind, period)?;
                let so_far = self.so_far(category_id, kind, period, today)?;
                self.forecaster.forecast_period_end(
                    category_id,
                    &history,
                    so_far,
                    period.days_elapsed(today),
                    period.days(),
                )?
            }
        };

        debug!(method = %result.method, predicted = %result.predicted, "forecast result");
        Ok(result)
    }

    fn history(
        &self,
        category_id: CategoryId,
        kind: TransactionKind,
        period: PeriodKey,
    ) -> FintrackResult<Vec<Money>> {
        history_for(&self.ledger, category_id, kind, period, self.lookback_periods)
    }

    /// Recorded in `period` up to and including `today`
    fn so_far(
        &self,
        category_id: CategoryId,
        kind: TransactionKind,
        period: PeriodKey,
        today: NaiveDate,
    ) -> FintrackResult<Money> {
        if today < period.start_date() {
            return Ok(Money::zero());
        }
        let end = today.min(period.end_date());
        let range = DateRange::new(period.start_date(), end)?;
        let filter = LedgerFilter::new(range).category(category_id).kind(kind);
        Ok(self.ledger.fetch(&filter)?.iter().map(|r| r.amount).sum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::ForecastMethod;
    use crate::ledger::InMemoryLedger;
    use crate::models::{AccountId, TransactionRecord};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn month(m: u32) -> PeriodKey {
        PeriodKey::month(2025, m).unwrap()
    }

    fn sample() -> (InMemoryLedger, Category, CategoryId) {
        let food = Category::expense("Food");
        let salary = CategoryId::new();
        let account = AccountId::new();
        let expense = |on, dollars| {
            TransactionRecord::expense(on, Money::from_dollars(dollars), food.id, account)
        };
        let ledger = vec![
            expense(date(2025, 1, 5), 100),
            expense(date(2025, 2, 5), 150),
            expense(date(2025, 3, 5), 125),
            expense(date(2025, 4, 3), 40),
            TransactionRecord::income(date(2025, 3, 31), Money::from_dollars(2000), salary, account),
        ]
        .into_iter()
        .collect();
        (ledger, food, salary)
    }

    fn lookback(periods: u32) -> AnalyticsSettings {
        AnalyticsSettings {
            lookback_periods: periods,
            ..AnalyticsSettings::default()
        }
    }

    #[test]
    fn test_next_forecast_smooths_history() {
        let (ledger, food, _) = sample();
        let service = ReportService::new(&ledger, &lookback(3));

        let result = service
            .forecast(&food, month(4), ForecastMode::Next, date(2025, 4, 10))
            .unwrap();
        assert_eq!(result.method, ForecastMethod::ExponentialSmoothing);
        assert_eq!(result.predicted, Money::from_dollars(118));
        assert_eq!(result.periods_used, 3);
    }

    #[test]
    fn test_quiet_months_before_first_spend_count() {
        let (ledger, food, _) = sample();
        let service = ReportService::new(&ledger, &AnalyticsSettings::default());

        // Oct..Mar is [0, 0, 0, 100, 150, 125]
        let result = service
            .forecast(&food, month(4), ForecastMode::Next, date(2025, 4, 10))
            .unwrap();
        assert_eq!(result.method, ForecastMethod::ExponentialSmoothing);
        assert_eq!(result.predicted, Money::from_cents(8370));
        assert_eq!(result.periods_used, 6);
    }

    #[test]
    fn test_pace_forecast_counts_only_up_to_today() {
        let (ledger, food, _) = sample();
        let service = ReportService::new(&ledger, &AnalyticsSettings::default());

        let result = service
            .forecast(&food, month(4), ForecastMode::Pace, date(2025, 4, 10))
            .unwrap();
        assert_eq!(result.method, ForecastMethod::CurrentPace);
        // $40 over 10 of 30 days
        assert_eq!(result.predicted, Money::from_dollars(120));
    }

    #[test]
    fn test_blended_forecast() {
        let (ledger, food, _) = sample();
        let service = ReportService::new(&ledger, &AnalyticsSettings::default());

        let result = service
            .forecast(&food, month(4), ForecastMode::Blended, date(2025, 4, 10))
            .unwrap();
        assert_eq!(result.method, ForecastMethod::Blended);
        assert!(result.predicted > Money::from_dollars(40));
    }

    #[test]
    fn test_no_history_names_category_and_period() {
        let (ledger, _, _) = sample();
        let service = ReportService::new(&ledger, &AnalyticsSettings::default());
        let travel = Category::expense("Travel");

        let err = service
            .forecast(&travel, month(4), ForecastMode::Next, date(2025, 4, 10))
            .unwrap_err();
        assert!(err.is_insufficient_data());
        assert_eq!(err.to_string(), "Not enough history to forecast Travel in 2025-04");
    }

    #[test]
    fn test_summary_and_categories() {
        let (ledger, food, salary) = sample();
        let service = ReportService::new(&ledger, &AnalyticsSettings::default());

        let march = service.summary(month(3)).unwrap();
        assert_eq!(march.income, Money::from_dollars(2000));
        assert_eq!(march.expense, Money::from_dollars(125));
        assert_eq!(march.net, Money::from_dollars(1875));
        assert_eq!(march.transaction_count, 2);
        assert_eq!(march.income_by_category[0].category_id, salary);

        let q1 = DateRange::new(date(2025, 1, 1), date(2025, 3, 31)).unwrap();
        let totals = service.categories(q1, TransactionKind::Expense).unwrap();
        assert_eq!(totals.len(), 1);
        assert_eq!(totals[0].category_id, food.id);
        assert_eq!(totals[0].total, Money::from_dollars(375));
    }

    #[test]
    fn test_aggregate_by_week() {
        let (ledger, _, _) = sample();
        let service = ReportService::new(&ledger, &AnalyticsSettings::default());
        let range = DateRange::new(date(2025, 1, 1), date(2025, 4, 30)).unwrap();

        let aggregates = service.aggregate(range, Granularity::Week).unwrap();
        assert_eq!(aggregates.granularity(), Granularity::Week);
        assert_eq!(aggregates.total(TransactionKind::Expense), Money::from_dollars(415));
        assert_eq!(aggregates.len(), 5);
    }

    #[test]
    fn test_forecast_mode_parsing() {
        assert_eq!("Blended".parse::<ForecastMode>().unwrap(), ForecastMode::Blended);
        assert!("weekly".parse::<ForecastMode>().is_err());
    }
}
