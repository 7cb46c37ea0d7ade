//! Savings goal CLI commands

use chrono::NaiveDate;
use clap::Subcommand;

use super::output::emit;
use super::Context;
use crate::display::{format_goal_evaluations, format_goal_summary};
use crate::error::FintrackResult;
use crate::models::Money;
use crate::services::{AccountService, GoalService, NewGoal};

#[derive(Subcommand)]
pub enum GoalCommands {
    /// Create a savings goal
    Add {
        name: String,
        /// Target amount (e.g., "5000")
        target: String,
        /// Date the target should be reached (YYYY-MM-DD)
        #[arg(short, long)]
        deadline: NaiveDate,
        /// Track progress as the growth of this account's balance
        #[arg(short, long)]
        account: Option<String>,
        /// Baseline balance for a linked account (defaults to its current balance)
        #[arg(long)]
        initial: Option<String>,
        #[arg(short = 'm', long)]
        description: Option<String>,
    },
    /// Status of one goal, or every goal
    Status {
        name: Option<String>,
    },
    /// Mark a goal as completed
    Complete {
        name: String,
    },
    /// Remove a goal
    Delete {
        name: String,
    },
    /// Totals across active goals
    Summary,
}

pub fn handle_goal_command(ctx: &Context, cmd: GoalCommands) -> FintrackResult<()> {
    let service = GoalService::new(
        &ctx.storage.goals,
        &ctx.storage.accounts,
        &ctx.storage.transactions,
        &ctx.settings.analytics,
    );

    match cmd {
        GoalCommands::Add {
            name,
            target,
            deadline,
            account,
            initial,
            description,
        } => {
            let account = account
                .map(|a| AccountService::new(ctx.storage).require(&a))
                .transpose()?;
            let initial_balance = initial.map(|s| Money::parse(&s)).transpose()?;

            let goal = service.create(
                NewGoal {
                    name,
                    description: description.unwrap_or_default(),
                    target: Money::parse(&target)?,
                    deadline,
                    account,
                    initial_balance,
                },
                ctx.today,
            )?;
            emit(ctx.format, &goal, || {
                format!("Created goal: {} ({} by {})", goal.name, goal.target_amount, goal.deadline)
            })
        }
        GoalCommands::Status { name } => {
            let evaluations = match name {
                Some(name) => {
                    let goal = service.require(&name)?;
                    vec![service.evaluate(&goal, ctx.today)?]
                }
                None => service.evaluate_all(ctx.today)?,
            };
            emit(ctx.format, &evaluations, || format_goal_evaluations(&evaluations))
        }
        GoalCommands::Complete { name } => {
            let goal = service.complete(&name)?;
            emit(ctx.format, &goal, || format!("Completed goal: {}", goal.name))
        }
        GoalCommands::Delete { name } => {
            let goal = service.delete(&name)?;
            emit(ctx.format, &goal, || format!("Deleted goal: {}", goal.name))
        }
        GoalCommands::Summary => {
            let summary = service.summary(ctx.today)?;
            emit(ctx.format, &summary, || format_goal_summary(&summary))
        }
    }
}
