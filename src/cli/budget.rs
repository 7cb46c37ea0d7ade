//! Budget CLI commands

use clap::Subcommand;

use super::output::emit;
use super::Context;
use crate::display::{
    category_name, format_at_risk, format_budget_states, format_outlook, format_recommendation,
};
use crate::error::FintrackResult;
use crate::models::{Money, PeriodKey};
use crate::services::{BudgetService, BudgetState, CategoryService};

#[derive(Subcommand)]
pub enum BudgetCommands {
    /// Set the spending limit for a category
    Set {
        category: String,
        /// Limit (e.g., "500" or "500.00")
        limit: String,
        /// Period key: 2025-03, 2025-W10 or 2025-03-15 (defaults to current)
        #[arg(short, long)]
        period: Option<PeriodKey>,
    },
    /// Remove the limit for a category
    Delete {
        category: String,
        #[arg(short, long)]
        period: Option<PeriodKey>,
    },
    /// Utilization and alert level of every budget in a period
    Status {
        #[arg(short, long)]
        period: Option<PeriodKey>,
    },
    /// Budgets at or above a utilization threshold
    AtRisk {
        /// Threshold in percent (defaults to the warning threshold)
        #[arg(short, long)]
        threshold: Option<f64>,
        #[arg(short, long)]
        period: Option<PeriodKey>,
    },
    /// What a further expense would do to a budget
    Check {
        category: String,
        amount: String,
        #[arg(short, long)]
        period: Option<PeriodKey>,
    },
    /// Daily spending advice for the rest of the period
    Advise {
        category: String,
        #[arg(short, long)]
        period: Option<PeriodKey>,
    },
    /// Predicted end-of-period usage of every budget
    Outlook {
        #[arg(short, long)]
        period: Option<PeriodKey>,
    },
}

pub fn handle_budget_command(ctx: &Context, cmd: BudgetCommands) -> FintrackResult<()> {
    let service = BudgetService::new(
        &ctx.storage.budgets,
        &ctx.storage.transactions,
        &ctx.settings.analytics,
    );
    let categories = CategoryService::new(ctx.storage);

    match cmd {
        BudgetCommands::Set {
            category,
            limit,
            period,
        } => {
            let category = categories.require(&category)?;
            let period = ctx.period_or_current(period);
            let budget = service.set_limit(&category, period, Money::parse(&limit)?)?;
            emit(ctx.format, &budget, || {
                format!("Budget for {} in {}: {}", category.name, budget.period, budget.limit)
            })
        }
        BudgetCommands::Delete { category, period } => {
            let category = categories.require(&category)?;
            let period = ctx.period_or_current(period);
            let budget = service.delete(&category, period)?;
            emit(ctx.format, &budget, || {
                format!("Deleted budget for {} in {}", category.name, budget.period)
            })
        }
        BudgetCommands::Status { period } => {
            let period = ctx.period_or_current(period);
            let states = service.status(period)?;
            let names = ctx.category_names()?;
            emit(ctx.format, &states, || format_budget_states(period, &states, &names))
        }
        BudgetCommands::AtRisk { threshold, period } => {
            let period = ctx.period_or_current(period);
            let threshold = threshold.unwrap_or(ctx.settings.analytics.warning_threshold_pct);
            let flagged = service.at_risk(period, threshold)?;
            let names = ctx.category_names()?;
            emit(ctx.format, &flagged, || format_at_risk(&flagged, threshold, &names))
        }
        BudgetCommands::Check {
            category,
            amount,
            period,
        } => {
            let category = categories.require(&category)?;
            let period = ctx.period_or_current(period);
            let state = service.check(category.id, period, Money::parse(&amount)?)?;
            emit(ctx.format, &state, || match &state {
                BudgetState::Evaluated(e) => format!(
                    "{} in {}: {} of {} ({:.1}%), {}",
                    category.name, period, e.actual, e.limit, e.utilization_pct, e.alert_level
                ),
                BudgetState::NoLimit { .. } => {
                    format!("{} in {}: no limit configured", category.name, period)
                }
            })
        }
        BudgetCommands::Advise { category, period } => {
            let category = categories.require(&category)?;
            let period = ctx.period_or_current(period);
            let advice = service
                .spending_recommendation(category.id, period, ctx.today)
                .map_err(|e| e.for_category(&category.name, period))?;
            emit(ctx.format, &advice, || format_recommendation(&advice, &category.name))
        }
        BudgetCommands::Outlook { period } => {
            let period = ctx.period_or_current(period);
            let outlooks = service.outlook(period, ctx.today)?;
            let names = ctx.category_names()?;
            emit(ctx.format, &outlooks, || {
                let mut text = format_outlook(period, &outlooks, &names);
                if let Some(top) = outlooks.first().filter(|o| o.will_exceed) {
                    text.push_str(&format!(
                        "\n{} is on course to exceed its limit.\n",
                        category_name(&names, top.category_id)
                    ));
                }
                text
            })
        }
    }
}
