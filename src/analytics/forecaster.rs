//! Spending forecasts for one category
//!
//! History is an ordered list of per-period totals, oldest first. Periods
//! with no spending are zero and count as data.
//!
//! Method selection:
//! 1. exponential smoothing, once there are enough non-zero periods and the
//!    values are not all identical
//! 2. simple average otherwise
//! 3. current pace, only when an in-progress estimate is asked for
//!
//! [`Forecaster::forecast_period_end`] blends the historical rate with the
//! current pace, weighting the current pace by how much of the period has
//! passed.

use serde::Serialize;
use std::fmt;

use crate::config::AnalyticsSettings;
use crate::error::{FintrackError, FintrackResult};
use crate::models::{CategoryId, Money};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastMethod {
    ExponentialSmoothing,
    SimpleAverage,
    CurrentPace,
    Blended,
}

impl fmt::Display for ForecastMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExponentialSmoothing => write!(f, "exponential_smoothing"),
            Self::SimpleAverage => write!(f, "simple_average"),
            Self::CurrentPace => write!(f, "current_pace"),
            Self::Blended => write!(f, "blended"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    /// Bucket a score in [0, 1]
    pub fn from_score(score: f64) -> Self {
        if score >= 0.7 {
            Self::High
        } else if score >= 0.4 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastResult {
    pub category_id: CategoryId,
    pub predicted: Money,
    #[serde(rename = "method_used")]
    pub method: ForecastMethod,
    pub confidence: Confidence,
    pub confidence_note: String,
    /// Historical periods that fed the estimate
    pub periods_used: usize,
}

/// Stateless forecasting with fixed tunables
#[derive(Debug, Clone, PartialEq)]
pub struct Forecaster {
    alpha: f64,
    min_active_periods: usize,
    lookback_periods: u32,
}

impl Default for Forecaster {
    fn default() -> Self {
        Self::new(0.3, 3, 6)
    }
}

impl Forecaster {
    pub fn new(alpha: f64, min_active_periods: usize, lookback_periods: u32) -> Self {
        Self {
            alpha,
            min_active_periods,
            lookback_periods: lookback_periods.max(1),
        }
    }

    pub fn from_settings(settings: &AnalyticsSettings) -> Self {
        Self::new(
            settings.smoothing_alpha,
            settings.min_active_periods,
            settings.lookback_periods,
        )
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn lookback_periods(&self) -> u32 {
        self.lookback_periods
    }

    /// Predict next-period spending from history
    ///
    /// # Errors
    ///
    /// `InsufficientData` when `history` is empty.
    pub fn forecast(
        &self,
        category_id: CategoryId,
        history: &[Money],
    ) -> FintrackResult<ForecastResult> {
        let (predicted, method) = self
            .predict(history)
            .ok_or_else(|| insufficient(category_id))?;
        let score = self.history_score(history.len());

        Ok(ForecastResult {
            category_id,
            predicted: Money::from_cents_f64(predicted),
            method,
            confidence: Confidence::from_score(score),
            confidence_note: self.history_note(history.len()),
            periods_used: history.len(),
        })
    }

    /// Extrapolate the spending so far across the whole period
    ///
    /// `days_elapsed` is capped at `days_in_period`.
    ///
    /// # Errors
    ///
    /// `Validation` for an empty period, `InsufficientData` when no day of
    /// the period has passed yet.
    pub fn forecast_current_pace(
        &self,
        category_id: CategoryId,
        so_far: Money,
        days_elapsed: u32,
        days_in_period: u32,
    ) -> FintrackResult<ForecastResult> {
        if days_in_period == 0 {
            return Err(FintrackError::Validation(
                "Cannot estimate pace for a period with no days".into(),
            ));
        }
        if days_elapsed == 0 {
            return Err(insufficient(category_id));
        }
        let elapsed = days_elapsed.min(days_in_period);

        let predicted = current_pace(so_far.as_f64(), elapsed, days_in_period);
        let score = day_score(elapsed);

        Ok(ForecastResult {
            category_id,
            predicted: Money::from_cents_f64(predicted),
            method: ForecastMethod::CurrentPace,
            confidence: Confidence::from_score(score),
            confidence_note: day_note(elapsed, days_in_period),
            periods_used: 0,
        })
    }

    /// Estimate the total for an in-progress period
    ///
    /// Falls back to the current pace without history, and to the history
    /// forecast before the first day of the period.
    pub fn forecast_period_end(
        &self,
        category_id: CategoryId,
        history: &[Money],
        so_far: Money,
        days_elapsed: u32,
        days_in_period: u32,
    ) -> FintrackResult<ForecastResult> {
        if days_in_period == 0 {
            return Err(FintrackError::Validation(
                "Cannot estimate spending for a period with no days".into(),
            ));
        }
        if history.is_empty() {
            return self.forecast_current_pace(category_id, so_far, days_elapsed, days_in_period);
        }
        if days_elapsed == 0 {
            return self.forecast(category_id, history);
        }

        let (historical_total, _) = self
            .predict(history)
            .ok_or_else(|| insufficient(category_id))?;
        let elapsed = days_elapsed.min(days_in_period);
        let days = f64::from(days_in_period);

        let historical_rate = historical_total / days;
        let current_rate = so_far.as_f64() / f64::from(elapsed);
        let weight = f64::from(elapsed) / days;
        let rate = weight * current_rate + (1.0 - weight) * historical_rate;
        let predicted = so_far.as_f64() + rate * f64::from(days_in_period - elapsed);

        let score = (self.history_score(history.len()) + day_score(elapsed)) / 2.0;

        Ok(ForecastResult {
            category_id,
            predicted: Money::from_cents_f64(predicted),
            method: ForecastMethod::Blended,
            confidence: Confidence::from_score(score),
            confidence_note: format!(
                "{}, {}",
                self.history_note(history.len()),
                day_note(elapsed, days_in_period)
            ),
            periods_used: history.len(),
        })
    }

    /// Unrounded prediction in cents and the method that produced it
    fn predict(&self, history: &[Money]) -> Option<(f64, ForecastMethod)> {
        let values: Vec<f64> = history.iter().map(Money::as_f64).collect();
        let first = *values.first()?;

        let active = values.iter().filter(|v| **v != 0.0).count();
        let varies = values.iter().any(|v| *v != first);

        if active >= self.min_active_periods && varies {
            exponential_smoothing(&values, self.alpha)
                .map(|value| (value, ForecastMethod::ExponentialSmoothing))
        } else {
            simple_average(&values).map(|value| (value, ForecastMethod::SimpleAverage))
        }
    }

    fn history_score(&self, periods: usize) -> f64 {
        (periods as f64 / f64::from(self.lookback_periods)).min(1.0)
    }

    fn history_note(&self, periods: usize) -> String {
        format!(
            "{} of {} periods of history",
            periods.min(self.lookback_periods as usize),
            self.lookback_periods
        )
    }
}

fn insufficient(category_id: CategoryId) -> FintrackError {
    FintrackError::InsufficientData {
        category: category_id.to_string(),
        period: None,
    }
}

fn day_score(days_elapsed: u32) -> f64 {
    (f64::from(days_elapsed) / 7.0).min(1.0)
}

fn day_note(days_elapsed: u32, days_in_period: u32) -> String {
    format!("{} of {} days elapsed", days_elapsed, days_in_period)
}

/// `S_1 = X_1`, `S_t = α·X_t + (1-α)·S_{t-1}`; returns `S_last`
pub fn exponential_smoothing(values: &[f64], alpha: f64) -> Option<f64> {
    let (first, rest) = values.split_first()?;
    Some(
        rest.iter()
            .fold(*first, |smoothed, x| alpha * x + (1.0 - alpha) * smoothed),
    )
}

pub fn simple_average(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// `(so_far / days_elapsed) × days_in_period`
pub fn current_pace(so_far: f64, days_elapsed: u32, days_in_period: u32) -> f64 {
    so_far / f64::from(days_elapsed) * f64::from(days_in_period)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dollars(values: &[i64]) -> Vec<Money> {
        values.iter().map(|v| Money::from_dollars(*v)).collect()
    }

    #[test]
    fn test_smoothing_follows_recurrence() {
        let result = Forecaster::default()
            .forecast(CategoryId::new(), &dollars(&[100, 150, 125]))
            .unwrap();
        // S2 = 0.3*150 + 0.7*100 = 115, S3 = 0.3*125 + 0.7*115 = 118
        assert_eq!(result.predicted, Money::from_dollars(118));
        assert_eq!(result.method, ForecastMethod::ExponentialSmoothing);
        assert_eq!(result.periods_used, 3);
    }

    #[test]
    fn test_single_period_forecasts_itself() {
        let result = Forecaster::default()
            .forecast(CategoryId::new(), &dollars(&[240]))
            .unwrap();
        assert_eq!(result.predicted, Money::from_dollars(240));
        assert_eq!(result.method, ForecastMethod::SimpleAverage);
    }

    #[test]
    fn test_two_periods_average() {
        let result = Forecaster::default()
            .forecast(CategoryId::new(), &dollars(&[100, 151]))
            .unwrap();
        assert_eq!(result.predicted.cents(), 12550);
        assert_eq!(result.method, ForecastMethod::SimpleAverage);
    }

    #[test]
    fn test_identical_values_average() {
        let result = Forecaster::default()
            .forecast(CategoryId::new(), &dollars(&[80, 80, 80, 80]))
            .unwrap();
        assert_eq!(result.predicted, Money::from_dollars(80));
        assert_eq!(result.method, ForecastMethod::SimpleAverage);
    }

    #[test]
    fn test_zero_periods_count_as_data() {
        // Only two active periods: average over all four, zeros included
        let result = Forecaster::default()
            .forecast(CategoryId::new(), &dollars(&[0, 100, 0, 300]))
            .unwrap();
        assert_eq!(result.method, ForecastMethod::SimpleAverage);
        assert_eq!(result.predicted, Money::from_dollars(100));

        // Three active periods: smoothing, with the zero still in the recurrence
        let smoothed = Forecaster::default()
            .forecast(CategoryId::new(), &dollars(&[100, 0, 100, 100]))
            .unwrap();
        assert_eq!(smoothed.method, ForecastMethod::ExponentialSmoothing);
        // 100 -> 70 -> 79 -> 85.3
        assert_eq!(smoothed.predicted.cents(), 8530);
    }

    #[test]
    fn test_empty_history_is_insufficient() {
        let err = Forecaster::default()
            .forecast(CategoryId::new(), &[])
            .unwrap_err();
        assert!(err.is_insufficient_data());
    }

    #[test]
    fn test_higher_alpha_tracks_recent_values() {
        let history = dollars(&[100, 100, 100, 200]);
        let slow = Forecaster::new(0.2, 3, 6)
            .forecast(CategoryId::new(), &history)
            .unwrap();
        let fast = Forecaster::new(0.8, 3, 6)
            .forecast(CategoryId::new(), &history)
            .unwrap();
        assert!(fast.predicted > slow.predicted);
    }

    #[test]
    fn test_confidence_from_history_length() {
        let forecaster = Forecaster::default();
        let short = forecaster.forecast(CategoryId::new(), &dollars(&[10])).unwrap();
        assert_eq!(short.confidence, Confidence::Low);

        let medium = forecaster
            .forecast(CategoryId::new(), &dollars(&[10, 20, 30]))
            .unwrap();
        assert_eq!(medium.confidence, Confidence::Medium);

        let full = forecaster
            .forecast(CategoryId::new(), &dollars(&[10, 20, 30, 40, 50, 60]))
            .unwrap();
        assert_eq!(full.confidence, Confidence::High);
        assert_eq!(full.confidence_note, "6 of 6 periods of history");
    }

    #[test]
    fn test_current_pace() {
        let result = Forecaster::default()
            .forecast_current_pace(CategoryId::new(), Money::from_dollars(100), 10, 30)
            .unwrap();
        assert_eq!(result.predicted, Money::from_dollars(300));
        assert_eq!(result.method, ForecastMethod::CurrentPace);
        assert_eq!(result.confidence, Confidence::High);
    }

    #[test]
    fn test_current_pace_edge_cases() {
        let forecaster = Forecaster::default();
        let id = CategoryId::new();

        assert!(forecaster
            .forecast_current_pace(id, Money::from_dollars(5), 0, 30)
            .unwrap_err()
            .is_insufficient_data());
        assert!(forecaster
            .forecast_current_pace(id, Money::from_dollars(5), 3, 0)
            .unwrap_err()
            .is_validation());

        let capped = forecaster
            .forecast_current_pace(id, Money::from_dollars(310), 45, 31)
            .unwrap();
        assert_eq!(capped.predicted, Money::from_dollars(310));
    }

    #[test]
    fn test_period_end_blends_rates() {
        // History forecasts $300 for a 30 day month: $10/day.
        // 10 days in, $200 spent: $20/day. Weight 1/3 -> 13.33/day.
        let result = Forecaster::default()
            .forecast_period_end(
                CategoryId::new(),
                &dollars(&[300, 300]),
                Money::from_dollars(200),
                10,
                30,
            )
            .unwrap();
        assert_eq!(result.method, ForecastMethod::Blended);
        // 200 + 13.333.. * 20 = 466.67
        assert_eq!(result.predicted.cents(), 46667);
    }

    #[test]
    fn test_period_end_fallbacks() {
        let forecaster = Forecaster::default();
        let id = CategoryId::new();

        let no_history = forecaster
            .forecast_period_end(id, &[], Money::from_dollars(50), 5, 30)
            .unwrap();
        assert_eq!(no_history.method, ForecastMethod::CurrentPace);
        assert_eq!(no_history.predicted, Money::from_dollars(300));

        let not_started = forecaster
            .forecast_period_end(id, &dollars(&[120]), Money::zero(), 0, 30)
            .unwrap();
        assert_eq!(not_started.method, ForecastMethod::SimpleAverage);
        assert_eq!(not_started.predicted, Money::from_dollars(120));

        let finished = forecaster
            .forecast_period_end(id, &dollars(&[120]), Money::from_dollars(90), 30, 30)
            .unwrap();
        assert_eq!(finished.predicted, Money::from_dollars(90));
    }

    #[test]
    fn test_method_serializes_snake_case() {
        let result = Forecaster::default()
            .forecast(CategoryId::new(), &dollars(&[1]))
            .unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["method_used"], "simple_average");
        assert_eq!(json["confidence"], "low");
    }
}
