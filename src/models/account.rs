//! Account model
//!
//! The engine only needs an account's identity and current balance; the
//! balance is what a linked savings goal measures progress against.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::AccountId;
use super::money::Money;

/// A financial account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,

    /// Account name (e.g., "Emergency Savings")
    pub name: String,

    /// Current balance, kept in step with recorded transactions
    pub balance: Money,

    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_balance(name, Money::zero())
    }

    pub fn with_balance(name: impl Into<String>, balance: Money) -> Self {
        Self {
            id: AccountId::new(),
            name: name.into(),
            balance,
            created_at: Utc::now(),
        }
    }

    /// Apply a signed change to the balance
    ///
    /// Leaves the balance untouched if the result would pass
    /// [`Money::MAX_AMOUNT`].
    pub fn apply(&mut self, delta: Money) -> Result<(), AccountValidationError> {
        let balance = self
            .balance
            .checked_add(delta)
            .filter(Money::within_limit)
            .ok_or(AccountValidationError::BalanceOutOfRange(delta))?;
        self.balance = balance;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), AccountValidationError> {
        if self.name.trim().is_empty() {
            return Err(AccountValidationError::EmptyName);
        }

        if self.name.len() > 100 {
            return Err(AccountValidationError::NameTooLong(self.name.len()));
        }

        if !self.balance.within_limit() {
            return Err(AccountValidationError::BalanceTooLarge(self.balance));
        }

        Ok(())
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Validation errors for accounts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountValidationError {
    EmptyName,
    NameTooLong(usize),
    BalanceTooLarge(Money),
    BalanceOutOfRange(Money),
}

impl fmt::Display for AccountValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Account name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(f, "Account name too long ({} chars, max 100)", len)
            }
            Self::BalanceTooLarge(balance) => {
                write!(f, "Balance {} is larger than {}", balance, Money::MAX_AMOUNT)
            }
            Self::BalanceOutOfRange(amount) => write!(
                f,
                "Applying {} would put the balance beyond {}",
                amount,
                Money::MAX_AMOUNT
            ),
        }
    }
}

impl std::error::Error for AccountValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply() {
        let mut account = Account::with_balance("Savings", Money::from_cents(10000));
        account.apply(Money::from_cents(-2500)).unwrap();
        account.apply(Money::from_cents(500)).unwrap();
        assert_eq!(account.balance.cents(), 8000);
    }

    #[test]
    fn test_apply_refuses_out_of_range_balance() {
        let mut account = Account::with_balance("Savings", Money::MAX_AMOUNT);
        assert_eq!(
            account.apply(Money::from_cents(1)),
            Err(AccountValidationError::BalanceOutOfRange(Money::from_cents(1)))
        );
        assert_eq!(account.balance, Money::MAX_AMOUNT);
    }

    #[test]
    fn test_validation() {
        assert!(Account::new("Checking").validate().is_ok());
        assert_eq!(
            Account::new("").validate(),
            Err(AccountValidationError::EmptyName)
        );
    }
}
