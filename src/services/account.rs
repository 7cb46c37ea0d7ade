//! Account service
//!
//! Creation with duplicate checks, and lookup by name or id.

use tracing::info;

use crate::error::{FintrackError, FintrackResult};
use crate::models::{Account, AccountId, Money};
use crate::storage::Storage;

/// Service for account management
pub struct AccountService<'a> {
    storage: &'a Storage,
}

impl<'a> AccountService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a new account with an opening balance
    pub fn create(&self, name: &str, balance: Money) -> FintrackResult<Account> {
        let name = name.trim();
        if name.is_empty() {
            return Err(FintrackError::Validation(
                "Account name cannot be empty".into(),
            ));
        }

        if self.storage.accounts.name_exists(name)? {
            return Err(FintrackError::Duplicate {
                entity_type: "Account",
                identifier: name.to_string(),
            });
        }

        let account = Account::with_balance(name, balance);
        account
            .validate()
            .map_err(|e| FintrackError::Validation(e.to_string()))?;

        self.storage.accounts.upsert(account.clone())?;
        self.storage.accounts.save()?;

        info!(account = %account.name, balance = %account.balance, "created account");
        Ok(account)
    }

    /// Find an account by name or id string
    pub fn find(&self, identifier: &str) -> FintrackResult<Option<Account>> {
        if let Some(account) = self.storage.accounts.get_by_name(identifier)? {
            return Ok(Some(account));
        }

        if let Ok(id) = identifier.parse::<AccountId>() {
            return self.storage.accounts.get(id);
        }

        Ok(None)
    }

    /// Like [`find`](Self::find) but a miss is an error
    pub fn require(&self, identifier: &str) -> FintrackResult<Account> {
        self.find(identifier)?
            .ok_or_else(|| FintrackError::account_not_found(identifier))
    }

    pub fn list(&self) -> FintrackResult<Vec<Account>> {
        self.storage.accounts.get_all()
    }
}
