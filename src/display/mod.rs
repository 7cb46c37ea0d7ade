//! Plain-text rendering for terminal output
//!
//! Column widths are computed from the data; money is right-aligned.

pub mod budget;
pub mod goal;
pub mod ledger;
pub mod report;

use std::collections::HashMap;

use crate::models::CategoryId;

pub use budget::{format_at_risk, format_budget_states, format_outlook, format_recommendation};
pub use goal::{format_goal_evaluations, format_goal_summary};
pub use ledger::{format_account_list, format_category_list, format_transaction_list};
pub use report::{format_aggregates, format_category_totals, format_forecast, format_period_summary};

/// Category names by id
pub type CategoryNames = HashMap<CategoryId, String>;

/// Name for display, falling back to the short id
pub fn category_name(names: &CategoryNames, id: CategoryId) -> String {
    names.get(&id).cloned().unwrap_or_else(|| id.to_string())
}

/// Format a percentage with appropriate precision
pub fn format_percentage(pct: f64) -> String {
    if pct.abs() < 10.0 {
        format!("{:.1}%", pct)
    } else {
        format!("{:.0}%", pct)
    }
}

/// A simple bar, full at 100%
pub fn format_bar(pct: f64, width: usize) -> String {
    if pct <= 0.0 {
        return "░".repeat(width);
    }
    let filled = ((pct / 100.0) * width as f64).round() as usize;
    let filled = filled.min(width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

pub fn separator(width: usize) -> String {
    "─".repeat(width)
}

/// Width of the widest value, at least `min`
pub(crate) fn column_width<'a>(values: impl Iterator<Item = &'a str>, min: usize) -> usize {
    values.map(|v| v.chars().count()).max().unwrap_or(min).max(min)
}
