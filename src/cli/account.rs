//! Account CLI commands

use clap::Subcommand;

use super::output::emit;
use super::Context;
use crate::display::format_account_list;
use crate::error::FintrackResult;
use crate::models::Money;
use crate::services::AccountService;

#[derive(Subcommand)]
pub enum AccountCommands {
    /// Create a new account
    Add {
        /// Account name
        name: String,
        /// Opening balance (e.g., "1000.00" or "1000")
        #[arg(short, long, default_value = "0")]
        balance: String,
    },
    /// List all accounts
    List,
}

pub fn handle_account_command(ctx: &Context, cmd: AccountCommands) -> FintrackResult<()> {
    let service = AccountService::new(ctx.storage);

    match cmd {
        AccountCommands::Add { name, balance } => {
            let balance = Money::parse(&balance)?;
            let account = service.create(&name, balance)?;
            emit(ctx.format, &account, || {
                format!("Created account: {} (balance {})", account.name, account.balance)
            })
        }
        AccountCommands::List => {
            let accounts = service.list()?;
            emit(ctx.format, &accounts, || format_account_list(&accounts))
        }
    }
}
