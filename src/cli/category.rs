//! Category CLI commands

use clap::Subcommand;

use super::output::emit;
use super::Context;
use crate::display::format_category_list;
use crate::error::FintrackResult;
use crate::models::TransactionKind;
use crate::services::CategoryService;

#[derive(Subcommand)]
pub enum CategoryCommands {
    /// Create a new category (expense unless --income)
    Add {
        name: String,
        /// Category for income rather than spending
        #[arg(long)]
        income: bool,
    },
    /// List all categories
    List,
}

pub fn handle_category_command(ctx: &Context, cmd: CategoryCommands) -> FintrackResult<()> {
    let service = CategoryService::new(ctx.storage);

    match cmd {
        CategoryCommands::Add { name, income } => {
            let kind = if income {
                TransactionKind::Income
            } else {
                TransactionKind::Expense
            };
            let category = service.create(&name, kind)?;
            emit(ctx.format, &category, || {
                format!("Created {} category: {}", category.kind, category.name)
            })
        }
        CategoryCommands::List => {
            let categories = service.list()?;
            emit(ctx.format, &categories, || format_category_list(&categories))
        }
    }
}
