//! CLI command handlers
//!
//! Each submodule defines a clap subcommand enum and a handler that calls
//! the service layer and prints through [`output`].

pub mod account;
pub mod budget;
pub mod category;
pub mod goal;
pub mod output;
pub mod report;
pub mod transaction;

use chrono::NaiveDate;

pub use account::{handle_account_command, AccountCommands};
pub use budget::{handle_budget_command, BudgetCommands};
pub use category::{handle_category_command, CategoryCommands};
pub use goal::{handle_goal_command, GoalCommands};
pub use output::OutputFormat;
pub use report::{handle_report_command, ReportCommands};
pub use transaction::{handle_transaction_command, TransactionCommands};

use crate::config::Settings;
use crate::display::CategoryNames;
use crate::error::FintrackResult;
use crate::models::PeriodKey;
use crate::storage::Storage;

/// Everything a command handler needs
pub struct Context<'a> {
    pub storage: &'a Storage,
    pub settings: &'a Settings,
    /// The clock; overridable with `--today`
    pub today: NaiveDate,
    pub format: OutputFormat,
}

impl<'a> Context<'a> {
    /// `period`, or the one containing today at the default granularity
    pub fn period_or_current(&self, period: Option<PeriodKey>) -> PeriodKey {
        period.unwrap_or_else(|| {
            PeriodKey::for_date(self.settings.analytics.default_granularity, self.today)
        })
    }

    pub fn category_names(&self) -> FintrackResult<CategoryNames> {
        self.storage.categories.names()
    }
}
