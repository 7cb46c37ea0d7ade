//! Core data models for fintrack
//!
//! Ledger records and the entities the analytics engine reads: accounts,
//! categories, budgets and savings goals, plus the money and period value
//! types they share.

pub mod account;
pub mod budget;
pub mod category;
pub mod goal;
pub mod ids;
pub mod money;
pub mod period;
pub mod transaction;

pub use account::Account;
pub use budget::Budget;
pub use category::Category;
pub use goal::{Goal, GoalStatus};
pub use ids::{AccountId, BudgetId, CategoryId, GoalId, TransactionId};
pub use money::Money;
pub use period::{Granularity, PeriodKey};
pub use transaction::{TransactionKind, TransactionRecord};
