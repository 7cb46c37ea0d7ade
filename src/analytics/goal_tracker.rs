//! Savings goal status and recommendations
//!
//! Status is recomputed on every call from the goal, its current progress
//! and `today`. The first matching rule wins:
//!
//! | status      | rule                                                   |
//! |-------------|--------------------------------------------------------|
//! | `completed` | the user marked the goal done                          |
//! | `achieved`  | progress ≥ target and today ≤ deadline                 |
//! | `overdue`   | today > deadline and progress < target                 |
//! | `behind`    | today ≤ deadline and required pace > actual pace × (1 + tolerance) |
//! | `on_track`  | otherwise                                              |
//!
//! Pace is money per day. The actual pace is progress divided by days since
//! creation; the required pace is what is left divided by days to the
//! deadline.

use chrono::NaiveDate;
use serde::Serialize;

use crate::config::AnalyticsSettings;
use crate::models::{Goal, GoalId, GoalStatus, Money};

/// Recommended contributions to reach a goal on time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SavingsPlan {
    pub daily: Money,
    pub weekly: Money,
    pub monthly: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalEvaluation {
    pub goal_id: GoalId,
    pub name: String,
    pub status: GoalStatus,
    pub target: Money,
    pub progress: Money,
    /// `target - progress`; negative once the goal is overfunded
    pub remaining: Money,
    pub progress_pct: f64,
    /// Where linear progress from creation to deadline would be today
    pub expected_progress_pct: f64,
    pub deadline: NaiveDate,
    pub days_elapsed: i64,
    /// Signed; negative after the deadline
    pub days_remaining: i64,
    pub actual_daily_pace: Money,
    pub required_daily_pace: Money,
    /// Absent for completed and overdue goals
    pub recommendation: Option<SavingsPlan>,
}

#[derive(Debug, Clone)]
pub struct GoalTracker {
    behind_tolerance: f64,
}

impl Default for GoalTracker {
    fn default() -> Self {
        Self::new(0.10)
    }
}

impl GoalTracker {
    pub fn new(behind_tolerance: f64) -> Self {
        Self { behind_tolerance }
    }

    pub fn from_settings(settings: &AnalyticsSettings) -> Self {
        Self::new(settings.behind_tolerance)
    }

    pub fn behind_tolerance(&self) -> f64 {
        self.behind_tolerance
    }

    pub fn evaluate(&self, goal: &Goal, progress: Money, today: NaiveDate) -> GoalEvaluation {
        let remaining = goal.target_amount - progress;
        let days_elapsed = (today - goal.created).num_days();
        let days_remaining = (goal.deadline - today).num_days();

        let actual_pace = actual_daily_pace(progress, days_elapsed);
        let required_pace = required_daily_pace(remaining, days_remaining);
        let status = self.status(goal, progress, today, actual_pace, required_pace);

        let recommendation = if status.is_terminal() {
            None
        } else {
            Some(savings_plan(remaining, goal.deadline, today))
        };

        GoalEvaluation {
            goal_id: goal.id,
            name: goal.name.clone(),
            status,
            target: goal.target_amount,
            progress,
            remaining,
            progress_pct: progress_pct(progress, goal.target_amount),
            expected_progress_pct: expected_progress_pct(goal, days_elapsed),
            deadline: goal.deadline,
            days_elapsed,
            days_remaining,
            actual_daily_pace: Money::from_cents_f64(actual_pace.unwrap_or(0.0)),
            required_daily_pace: Money::from_cents_f64(required_pace),
            recommendation,
        }
    }

    fn status(
        &self,
        goal: &Goal,
        progress: Money,
        today: NaiveDate,
        actual_pace: Option<f64>,
        required_pace: f64,
    ) -> GoalStatus {
        if goal.completed {
            return GoalStatus::Completed;
        }

        let funded = progress >= goal.target_amount;
        let past_deadline = today > goal.deadline;

        if funded && !past_deadline {
            return GoalStatus::Achieved;
        }
        if past_deadline && !funded {
            return GoalStatus::Overdue;
        }
        if !past_deadline {
            // No pace exists on the creation day
            if let Some(actual) = actual_pace {
                if required_pace > actual * (1.0 + self.behind_tolerance) {
                    return GoalStatus::Behind;
                }
            }
        }
        GoalStatus::OnTrack
    }
}

/// Recommended daily, weekly and monthly contributions
///
/// `days_left = max(deadline - today, 1)`; weekly and monthly are seven and
/// thirty times the unrounded daily figure. Zero when nothing is left.
pub fn savings_plan(remaining: Money, deadline: NaiveDate, today: NaiveDate) -> SavingsPlan {
    if !remaining.is_positive() {
        return SavingsPlan::default();
    }

    let daily = required_daily_pace(remaining, (deadline - today).num_days());
    SavingsPlan {
        daily: Money::from_cents_f64(daily),
        weekly: Money::from_cents_f64(daily * 7.0),
        monthly: Money::from_cents_f64(daily * 30.0),
    }
}

fn actual_daily_pace(progress: Money, days_elapsed: i64) -> Option<f64> {
    (days_elapsed >= 1).then(|| progress.as_f64() / days_elapsed as f64)
}

fn required_daily_pace(remaining: Money, days_remaining: i64) -> f64 {
    if !remaining.is_positive() {
        return 0.0;
    }
    remaining.as_f64() / days_remaining.max(1) as f64
}

fn progress_pct(progress: Money, target: Money) -> f64 {
    if target.is_zero() {
        return 100.0;
    }
    progress.as_f64() * 100.0 / target.as_f64()
}

fn expected_progress_pct(goal: &Goal, days_elapsed: i64) -> f64 {
    let total_days = (goal.deadline - goal.created).num_days();
    if total_days <= 0 {
        return 100.0;
    }
    (days_elapsed as f64 * 100.0 / total_days as f64).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn goal(target_dollars: i64, created: NaiveDate, deadline: NaiveDate) -> Goal {
        Goal::new("Emergency fund", Money::from_dollars(target_dollars), deadline, created)
    }

    #[test]
    fn test_recommendation_for_thirty_days() {
        let today = date(2025, 3, 1);
        let g = goal(1000, today - Duration::days(10), today + Duration::days(30));
        let evaluation = GoalTracker::default().evaluate(&g, Money::from_dollars(200), today);

        assert_eq!(evaluation.remaining, Money::from_dollars(800));
        let plan = evaluation.recommendation.unwrap();
        assert_eq!(plan.daily.cents(), 2667);
        assert_eq!(plan.weekly.cents(), 18667);
        assert_eq!(plan.monthly.cents(), 80000);
    }

    #[test]
    fn test_funded_before_deadline_is_achieved_with_zero_plan() {
        let today = date(2025, 3, 1);
        let g = goal(1000, date(2025, 1, 1), date(2025, 6, 1));
        let evaluation = GoalTracker::default().evaluate(&g, Money::from_dollars(1000), today);

        assert_eq!(evaluation.status, GoalStatus::Achieved);
        assert_eq!(evaluation.recommendation, Some(SavingsPlan::default()));
        assert_eq!(evaluation.progress_pct, 100.0);
    }

    #[test]
    fn test_completed_overrides_everything() {
        let mut g = goal(1000, date(2025, 1, 1), date(2025, 2, 1));
        g.mark_completed();
        let evaluation = GoalTracker::default().evaluate(&g, Money::zero(), date(2025, 5, 1));

        assert_eq!(evaluation.status, GoalStatus::Completed);
        assert!(evaluation.recommendation.is_none());
    }

    #[test]
    fn test_overdue_has_no_recommendation() {
        let g = goal(1000, date(2025, 1, 1), date(2025, 2, 1));
        let evaluation = GoalTracker::default().evaluate(&g, Money::from_dollars(400), date(2025, 2, 2));

        assert_eq!(evaluation.status, GoalStatus::Overdue);
        assert!(evaluation.recommendation.is_none());
        assert_eq!(evaluation.days_remaining, -1);
    }

    #[test]
    fn test_deadline_day_is_not_overdue() {
        let g = goal(1000, date(2025, 1, 1), date(2025, 2, 1));
        let evaluation = GoalTracker::default().evaluate(&g, Money::from_dollars(400), date(2025, 2, 1));

        assert_ne!(evaluation.status, GoalStatus::Overdue);
        // days_left is clamped to one day
        assert_eq!(evaluation.recommendation.unwrap().daily, Money::from_dollars(600));
    }

    #[test]
    fn test_funded_after_deadline_is_on_track() {
        let g = goal(1000, date(2025, 1, 1), date(2025, 2, 1));
        let evaluation = GoalTracker::default().evaluate(&g, Money::from_dollars(1200), date(2025, 3, 1));

        assert_eq!(evaluation.status, GoalStatus::OnTrack);
        assert_eq!(evaluation.recommendation, Some(SavingsPlan::default()));
    }

    #[test]
    fn test_behind_when_required_pace_outruns_actual() {
        // 100 days total, 50 elapsed, $100 saved: $2/day so far.
        // $900 left over 50 days needs $18/day.
        let g = goal(1000, date(2025, 1, 1), date(2025, 4, 11));
        let evaluation = GoalTracker::default().evaluate(&g, Money::from_dollars(100), date(2025, 2, 20));

        assert_eq!(evaluation.days_elapsed, 50);
        assert_eq!(evaluation.status, GoalStatus::Behind);
        assert_eq!(evaluation.actual_daily_pace, Money::from_dollars(2));
        assert_eq!(evaluation.required_daily_pace, Money::from_dollars(18));
        assert_eq!(evaluation.expected_progress_pct, 50.0);
    }

    #[test]
    fn test_tolerance_absorbs_small_shortfall() {
        // 20 days elapsed with $210 saved ($10.50/day).
        // $1090 left over 100 days needs $10.90/day, within 10%.
        let created = date(2025, 1, 1);
        let today = created + Duration::days(20);
        let g = Goal::new("Trip", Money::from_dollars(1300), today + Duration::days(100), created);

        let lenient = GoalTracker::default().evaluate(&g, Money::from_dollars(210), today);
        assert_eq!(lenient.status, GoalStatus::OnTrack);

        let strict = GoalTracker::new(0.0).evaluate(&g, Money::from_dollars(210), today);
        assert_eq!(strict.status, GoalStatus::Behind);
    }

    #[test]
    fn test_creation_day_is_on_track() {
        let today = date(2025, 1, 1);
        let g = goal(1000, today, date(2025, 12, 31));
        let evaluation = GoalTracker::default().evaluate(&g, Money::zero(), today);

        assert_eq!(evaluation.status, GoalStatus::OnTrack);
        assert_eq!(evaluation.days_elapsed, 0);
        assert_eq!(evaluation.expected_progress_pct, 0.0);
    }

    #[test]
    fn test_savings_plan_without_remaining() {
        let plan = savings_plan(Money::from_cents(-500), date(2025, 2, 1), date(2025, 1, 1));
        assert_eq!(plan, SavingsPlan::default());
    }

    #[test]
    fn test_evaluation_serializes_status() {
        let g = goal(1000, date(2025, 1, 1), date(2025, 6, 1));
        let evaluation = GoalTracker::default().evaluate(&g, Money::from_dollars(10), date(2025, 1, 1));
        let json = serde_json::to_value(&evaluation).unwrap();
        assert_eq!(json["status"], "on_track");
        // $990 over 151 days
        assert_eq!(json["recommendation"]["daily"], 656);
    }
}
