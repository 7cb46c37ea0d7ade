//! Storage layer for fintrack
//!
//! JSON files under the data directory, written atomically, one repository
//! per entity. The transaction repository doubles as the ledger adapter.

pub mod accounts;
pub mod budget;
pub mod categories;
pub mod csv_import;
pub mod file_io;
pub mod goals;
pub mod transactions;

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

pub use accounts::AccountRepository;
pub use budget::BudgetRepository;
pub use categories::CategoryRepository;
pub use csv_import::ImportRow;
pub use file_io::{read_json, write_json_atomic};
pub use goals::GoalRepository;
pub use transactions::TransactionRepository;

use crate::config::paths::FintrackPaths;
use crate::error::FintrackError;

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: FintrackPaths,
    pub accounts: AccountRepository,
    pub transactions: TransactionRepository,
    pub categories: CategoryRepository,
    pub budgets: BudgetRepository,
    pub goals: GoalRepository,
}

impl Storage {
    pub fn new(paths: FintrackPaths) -> Result<Self, FintrackError> {
        paths.ensure_directories()?;

        Ok(Self {
            accounts: AccountRepository::new(paths.accounts_file()),
            transactions: TransactionRepository::new(paths.transactions_file()),
            categories: CategoryRepository::new(paths.categories_file()),
            budgets: BudgetRepository::new(paths.budgets_file()),
            goals: GoalRepository::new(paths.goals_file()),
            paths,
        })
    }

    pub fn paths(&self) -> &FintrackPaths {
        &self.paths
    }

    /// Load all data from disk
    pub fn load_all(&self) -> Result<(), FintrackError> {
        self.accounts.load()?;
        self.transactions.load()?;
        self.categories.load()?;
        self.budgets.load()?;
        self.goals.load()?;
        Ok(())
    }

    /// Save all data to disk
    pub fn save_all(&self) -> Result<(), FintrackError> {
        self.accounts.save()?;
        self.transactions.save()?;
        self.categories.save()?;
        self.budgets.save()?;
        self.goals.save()?;
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }
}

pub(crate) fn read_lock<T>(lock: &RwLock<T>) -> Result<RwLockReadGuard<'_, T>, FintrackError> {
    lock.read()
        .map_err(|e| FintrackError::Storage(format!("Failed to acquire lock: {}", e)))
}

pub(crate) fn write_lock<T>(lock: &RwLock<T>) -> Result<RwLockWriteGuard<'_, T>, FintrackError> {
    lock.write()
        .map_err(|e| FintrackError::Storage(format!("Failed to acquire lock: {}", e)))
}
