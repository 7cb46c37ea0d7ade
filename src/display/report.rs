//! Aggregation, summary and forecast views

use super::{category_name, column_width, separator, CategoryNames};
use crate::analytics::{CategoryTotal, ForecastResult, PeriodAggregates};
use crate::models::Money;
use crate::services::PeriodSummary;

/// Income, expense and net per period, then the bucket detail
pub fn format_aggregates(aggregates: &PeriodAggregates, names: &CategoryNames) -> String {
    if aggregates.is_empty() {
        return "No transactions in range.".to_string();
    }

    let mut output = format!("By {}\n\n", aggregates.granularity());
    output.push_str(&format!(
        "{:<10}  {:>12}  {:>12}  {:>12}\n",
        "Period", "Income", "Expense", "Net"
    ));
    output.push_str(&format!("{}\n", separator(52)));
    for totals in aggregates.period_totals() {
        output.push_str(&format!(
            "{:<10}  {:>12}  {:>12}  {:>12}\n",
            totals.period.to_string(),
            totals.income.to_string(),
            totals.expense.to_string(),
            totals.net.to_string()
        ));
    }

    output.push_str("\nDetail\n");
    for row in aggregates.rows() {
        output.push_str(&format!(
            "  {:<10}  {:<7}  {:<20}  {:>12}\n",
            row.period.to_string(),
            row.kind.to_string(),
            category_name(names, row.category_id),
            row.total.to_string()
        ));
    }
    output
}

pub fn format_period_summary(summary: &PeriodSummary, names: &CategoryNames) -> String {
    let mut output = format!("Summary for {}\n", summary.period);
    output.push_str(&format!("{}\n", separator(32)));
    output.push_str(&format!("{:<12}{:>20}\n", "Income", summary.income.to_string()));
    output.push_str(&format!("{:<12}{:>20}\n", "Expense", summary.expense.to_string()));
    output.push_str(&format!("{:<12}{:>20}\n", "Net", summary.net.to_string()));
    output.push_str(&format!("{} transaction(s)\n", summary.transaction_count));

    if !summary.expenses_by_category.is_empty() {
        output.push_str("\nExpenses by category\n");
        output.push_str(&format_category_totals(&summary.expenses_by_category, names));
    }
    if !summary.income_by_category.is_empty() {
        output.push_str("\nIncome by category\n");
        output.push_str(&format_category_totals(&summary.income_by_category, names));
    }
    output
}

/// Totals with each category's share
pub fn format_category_totals(totals: &[CategoryTotal], names: &CategoryNames) -> String {
    if totals.is_empty() {
        return "No transactions in range.\n".to_string();
    }

    let labels: Vec<String> = totals
        .iter()
        .map(|t| category_name(names, t.category_id))
        .collect();
    let width = column_width(labels.iter().map(String::as_str), 8);
    let grand_total: Money = totals.iter().map(|t| t.total).sum();

    let mut output = String::new();
    for (total, label) in totals.iter().zip(&labels) {
        let share = if grand_total.is_zero() {
            0.0
        } else {
            total.total.as_f64() * 100.0 / grand_total.as_f64()
        };
        output.push_str(&format!(
            "  {:<width$}  {:>12}  {:>5.1}%\n",
            label,
            total.total.to_string(),
            share
        ));
    }
    output.push_str(&format!("  {:<width$}  {:>12}\n", "Total", grand_total.to_string()));
    output
}

pub fn format_forecast(result: &ForecastResult, category: &str) -> String {
    format!(
        "{}: {} ({}, {} confidence)\n  {}\n",
        category, result.predicted, result.method, result.confidence, result.confidence_note
    )
}
