//! Report CLI commands

use chrono::{Datelike, NaiveDate};
use clap::Subcommand;

use super::output::emit;
use super::Context;
use crate::display::{
    format_aggregates, format_category_totals, format_forecast, format_period_summary,
};
use crate::error::FintrackResult;
use crate::ledger::DateRange;
use crate::models::{Granularity, PeriodKey, TransactionKind};
use crate::services::{CategoryService, ForecastMode, ReportService};

#[derive(Subcommand)]
pub enum ReportCommands {
    /// Totals per period, category and type
    Aggregate {
        /// First day (defaults to the start of the current month)
        #[arg(long)]
        start: Option<NaiveDate>,
        /// Last day (defaults to today)
        #[arg(long)]
        end: Option<NaiveDate>,
        /// day, week or month (defaults to the configured granularity)
        #[arg(short, long)]
        granularity: Option<Granularity>,
    },
    /// Income, spending and net for one period
    Summary {
        #[arg(short, long)]
        period: Option<PeriodKey>,
    },
    /// Per-category totals, largest first
    Categories {
        #[arg(long)]
        start: Option<NaiveDate>,
        #[arg(long)]
        end: Option<NaiveDate>,
        /// Report income categories instead of spending
        #[arg(long)]
        income: bool,
    },
    /// Forecast a category's total for a period
    Forecast {
        category: String,
        #[arg(short, long)]
        period: Option<PeriodKey>,
        /// next, pace or blended
        #[arg(short, long, default_value = "next")]
        mode: ForecastMode,
    },
}

pub fn handle_report_command(ctx: &Context, cmd: ReportCommands) -> FintrackResult<()> {
    let service = ReportService::new(&ctx.storage.transactions, &ctx.settings.analytics);

    match cmd {
        ReportCommands::Aggregate {
            start,
            end,
            granularity,
        } => {
            let range = range_or_month(ctx, start, end)?;
            let granularity = granularity.unwrap_or(ctx.settings.analytics.default_granularity);
            let aggregates = service.aggregate(range, granularity)?;
            let names = ctx.category_names()?;
            emit(ctx.format, &aggregates.rows(), || format_aggregates(&aggregates, &names))
        }
        ReportCommands::Summary { period } => {
            let summary = service.summary(ctx.period_or_current(period))?;
            let names = ctx.category_names()?;
            emit(ctx.format, &summary, || format_period_summary(&summary, &names))
        }
        ReportCommands::Categories { start, end, income } => {
            let range = range_or_month(ctx, start, end)?;
            let kind = if income {
                TransactionKind::Income
            } else {
                TransactionKind::Expense
            };
            let totals = service.categories(range, kind)?;
            let names = ctx.category_names()?;
            emit(ctx.format, &totals, || format_category_totals(&totals, &names))
        }
        ReportCommands::Forecast {
            category,
            period,
            mode,
        } => {
            let category = CategoryService::new(ctx.storage).require(&category)?;
            let period = ctx.period_or_current(period);
            let result = service.forecast(&category, period, mode, ctx.today)?;
            emit(ctx.format, &result, || format_forecast(&result, &category.name))
        }
    }
}

/// `start..=end`, defaulting to the current month up to today
fn range_or_month(
    ctx: &Context,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> FintrackResult<DateRange> {
    let end = end.unwrap_or(ctx.today);
    let start = start.unwrap_or_else(|| end.with_day(1).unwrap_or(end));
    DateRange::new(start, end)
}
