//! Budget status, risk and outlook views

use super::{category_name, column_width, format_bar, format_percentage, CategoryNames};
use crate::analytics::{AlertLevel, BudgetEvaluation};
use crate::models::PeriodKey;
use crate::services::{BudgetOutlook, BudgetState, SpendingRecommendation};

fn alert_marker(level: AlertLevel) -> &'static str {
    match level {
        AlertLevel::Ok => "ok",
        AlertLevel::Warning => "WARNING",
        AlertLevel::Exceeded => "EXCEEDED",
    }
}

pub fn format_budget_states(period: PeriodKey, states: &[BudgetState], names: &CategoryNames) -> String {
    if states.is_empty() {
        return format!("No budgets set for {}.", period);
    }

    let labels: Vec<String> = states
        .iter()
        .map(|s| category_name(names, s.category_id()))
        .collect();
    let width = column_width(labels.iter().map(String::as_str), 8);

    let mut output = format!("Budgets for {}\n\n", period);
    output.push_str(&format!(
        "{:<width$}  {:>12}  {:>12}  {:>12}  {:>6}  {:<10}  Status\n",
        "Category", "Limit", "Spent", "Remaining", "Used", ""
    ));
    output.push_str(&format!(
        "{:-<width$}  {:->12}  {:->12}  {:->12}  {:->6}  {:-<10}  {:-<8}\n",
        "", "", "", "", "", "", ""
    ));

    for (state, label) in states.iter().zip(&labels) {
        match state {
            BudgetState::Evaluated(e) => output.push_str(&format!(
                "{:<width$}  {:>12}  {:>12}  {:>12}  {:>6}  {}  {}\n",
                label,
                e.limit.to_string(),
                e.actual.to_string(),
                e.remaining.to_string(),
                format_percentage(e.utilization_pct),
                format_bar(e.utilization_pct, 10),
                alert_marker(e.alert_level)
            )),
            BudgetState::NoLimit { actual, .. } => output.push_str(&format!(
                "{:<width$}  {:>12}  {:>12}  {:>12}  {:>6}  {:<10}  no limit configured\n",
                label,
                "-",
                actual.to_string(),
                "-",
                "-",
                ""
            )),
        }
    }
    output
}

pub fn format_at_risk(evaluations: &[BudgetEvaluation], threshold_pct: f64, names: &CategoryNames) -> String {
    if evaluations.is_empty() {
        return format!("No budgets at or above {}.", format_percentage(threshold_pct));
    }

    let mut output = format!("Budgets at or above {}\n", format_percentage(threshold_pct));
    for e in evaluations {
        output.push_str(&format!(
            "  {:<20} {:>6} of {} ({})\n",
            category_name(names, e.category_id),
            format_percentage(e.utilization_pct),
            e.limit,
            alert_marker(e.alert_level)
        ));
    }
    output
}

pub fn format_outlook(period: PeriodKey, outlooks: &[BudgetOutlook], names: &CategoryNames) -> String {
    if outlooks.is_empty() {
        return format!("No budgets with a limit for {}.", period);
    }

    let labels: Vec<String> = outlooks
        .iter()
        .map(|o| category_name(names, o.category_id))
        .collect();
    let width = column_width(labels.iter().map(String::as_str), 8);

    let mut output = format!("Outlook for {}\n\n", period);
    output.push_str(&format!(
        "{:<width$}  {:>12}  {:>12}  {:>12}  {:>6}  {:<10}  Method\n",
        "Category", "Limit", "So far", "Predicted", "Usage", "Confidence"
    ));
    for (outlook, label) in outlooks.iter().zip(&labels) {
        let flag = if outlook.will_exceed { "  !" } else { "" };
        output.push_str(&format!(
            "{:<width$}  {:>12}  {:>12}  {:>12}  {:>6}  {:<10}  {}{}\n",
            label,
            outlook.limit.to_string(),
            outlook.spent_so_far.to_string(),
            outlook.forecast.predicted.to_string(),
            format_percentage(outlook.predicted_usage_pct),
            outlook.forecast.confidence.to_string(),
            outlook.forecast.method,
            flag
        ));
    }
    output
}

pub fn format_recommendation(recommendation: &SpendingRecommendation, category: &str) -> String {
    format!(
        "{} ({}): {}\n  current {}/day, recommended {}/day, {} day(s) left\n",
        category,
        recommendation.period,
        recommendation.message,
        recommendation.current_daily,
        recommendation.recommended_daily,
        recommendation.days_remaining
    )
}
