//! Goal status views

use super::{format_bar, format_percentage};
use crate::analytics::GoalEvaluation;
use crate::services::GoalSummary;

pub fn format_goal_evaluations(evaluations: &[GoalEvaluation]) -> String {
    if evaluations.is_empty() {
        return "No goals found.".to_string();
    }

    let mut output = String::new();
    for e in evaluations {
        output.push_str(&format_goal(e));
        output.push('\n');
    }
    output
}

fn format_goal(e: &GoalEvaluation) -> String {
    let mut output = format!("{} [{}]\n", e.name, e.status);
    output.push_str(&format!(
        "  {} {} of {} ({}, expected {})\n",
        format_bar(e.progress_pct, 20),
        e.progress,
        e.target,
        format_percentage(e.progress_pct),
        format_percentage(e.expected_progress_pct)
    ));

    let deadline = if e.days_remaining >= 0 {
        format!("{} day(s) left", e.days_remaining)
    } else {
        format!("{} day(s) past", -e.days_remaining)
    };
    output.push_str(&format!("  Deadline {} ({})\n", e.deadline, deadline));

    if let Some(plan) = &e.recommendation {
        if plan.daily.is_positive() {
            output.push_str(&format!(
                "  Save {}/day, {}/week or {}/month\n",
                plan.daily, plan.weekly, plan.monthly
            ));
        }
    }
    output
}

pub fn format_goal_summary(summary: &GoalSummary) -> String {
    let mut output = format!(
        "Goals: {} total, {} active, {} completed\n",
        summary.total_goals, summary.active_goals, summary.completed_goals
    );
    output.push_str(&format!(
        "Active progress: {} of {} (average {})\n",
        summary.total_progress,
        summary.total_target,
        format_percentage(summary.average_progress_pct)
    ));

    if !summary.nearest.is_empty() {
        output.push_str("\nNearest deadlines:\n");
        for e in &summary.nearest {
            output.push_str(&format!(
                "  {:<20} {}  {} [{}]\n",
                e.name,
                e.deadline,
                format_percentage(e.progress_pct),
                e.status
            ));
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::GoalTracker;
    use crate::models::{Goal, Money};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_goal_shows_plan() {
        let goal = Goal::new("Laptop", Money::from_dollars(1000), date(2025, 1, 31), date(2024, 12, 1));
        let evaluation = GoalTracker::default().evaluate(&goal, Money::from_dollars(200), date(2025, 1, 1));

        let output = format_goal_evaluations(&[evaluation]);
        assert!(output.starts_with("Laptop ["));
        assert!(output.contains("$200.00 of $1000.00"));
        assert!(output.contains("30 day(s) left"));
        assert!(output.contains("$26.67/day"));
    }

    #[test]
    fn test_overdue_goal_has_no_plan() {
        let goal = Goal::new("Trip", Money::from_dollars(500), date(2025, 1, 31), date(2024, 12, 1));
        let evaluation = GoalTracker::default().evaluate(&goal, Money::from_dollars(100), date(2025, 2, 3));

        let output = format_goal_evaluations(&[evaluation]);
        assert!(output.contains("[overdue]"));
        assert!(output.contains("3 day(s) past"));
        assert!(!output.contains("/day"));
    }
}
