//! Transaction CLI commands

use std::collections::HashMap;
use std::path::PathBuf;

use chrono::{Datelike, NaiveDate};
use clap::Subcommand;

use super::output::emit;
use super::Context;
use crate::display::format_transaction_list;
use crate::error::FintrackResult;
use crate::ledger::{DateRange, LedgerFilter};
use crate::models::{Money, TransactionKind, TransactionRecord};
use crate::services::{AccountService, CategoryService, TransactionService};
use crate::storage::csv_import;

#[derive(Subcommand)]
pub enum TransactionCommands {
    /// Record a transaction (an expense unless --income)
    Add {
        /// Account name or ID
        account: String,
        /// Category name or ID
        category: String,
        /// Amount, always positive (e.g., "42.10")
        amount: String,
        #[arg(long)]
        income: bool,
        /// Transaction date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<NaiveDate>,
        #[arg(short = 'm', long)]
        description: Option<String>,
    },
    /// List transactions, newest first
    List {
        /// First day (defaults to the start of the current month)
        #[arg(long)]
        start: Option<NaiveDate>,
        /// Last day (defaults to today)
        #[arg(long)]
        end: Option<NaiveDate>,
        /// Only this account (name or ID)
        #[arg(short, long)]
        account: Option<String>,
        /// Only this category (name or ID)
        #[arg(short, long)]
        category: Option<String>,
        /// Only income
        #[arg(long, conflicts_with = "expense")]
        income: bool,
        /// Only expenses
        #[arg(long)]
        expense: bool,
    },
    /// Delete a transaction and reverse its effect on the account balance
    Delete {
        /// Transaction ID, full or as shown by `transaction list`
        id: String,
    },
    /// Import transactions from a CSV file
    ///
    /// Columns: date,type,amount,category,account,description
    Import {
        file: PathBuf,
    },
}

pub fn handle_transaction_command(ctx: &Context, cmd: TransactionCommands) -> FintrackResult<()> {
    let service = TransactionService::new(ctx.storage);

    match cmd {
        TransactionCommands::Add {
            account,
            category,
            amount,
            income,
            date,
            description,
        } => {
            let account = AccountService::new(ctx.storage).require(&account)?;
            let category = CategoryService::new(ctx.storage).require(&category)?;
            let kind = if income {
                TransactionKind::Income
            } else {
                TransactionKind::Expense
            };

            let record = TransactionRecord::new(
                date.unwrap_or(ctx.today),
                Money::parse(&amount)?,
                kind,
                category.id,
                account.id,
            )
            .with_description(description.unwrap_or_default());
            let record = service.record(record)?;

            emit(ctx.format, &record, || format!("Recorded: {}", record))
        }
        TransactionCommands::List {
            start,
            end,
            account,
            category,
            income,
            expense,
        } => {
            let end = end.unwrap_or(ctx.today);
            let start = start.unwrap_or_else(|| end.with_day(1).unwrap_or(end));
            let mut filter = LedgerFilter::new(DateRange::new(start, end)?);
            if let Some(account) = account {
                filter = filter.accounts([AccountService::new(ctx.storage).require(&account)?.id]);
            }
            if let Some(category) = category {
                filter = filter.category(CategoryService::new(ctx.storage).require(&category)?.id);
            }
            if income {
                filter = filter.kind(TransactionKind::Income);
            } else if expense {
                filter = filter.expenses();
            }
            let records = service.list(&filter)?;

            let accounts: HashMap<_, _> = ctx
                .storage
                .accounts
                .get_all()?
                .into_iter()
                .map(|a| (a.id, a.name))
                .collect();
            let categories = ctx.category_names()?;
            emit(ctx.format, &records, || {
                format_transaction_list(&records, &categories, &accounts)
            })
        }
        TransactionCommands::Delete { id } => {
            let record = service.find(&id)?;
            let record = service.delete(record.id)?;
            emit(ctx.format, &record, || format!("Deleted: {}", record))
        }
        TransactionCommands::Import { file } => {
            let rows = csv_import::read_file(&file)?;
            let summary = service.import(rows)?;
            emit(ctx.format, &summary, || {
                format!(
                    "Imported {} transaction(s): {} income, {} expense",
                    summary.imported, summary.income_total, summary.expense_total
                )
            })
        }
    }
}
