//! Transaction records
//!
//! A record is an income or an expense against one category and one account.
//! The amount is never negative; its direction comes from [`TransactionKind`].

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::{AccountId, CategoryId, TransactionId};
use super::money::Money;

/// Direction of a transaction (also used as a category type)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn is_income(&self) -> bool {
        matches!(self, Self::Income)
    }

    pub fn is_expense(&self) -> bool {
        matches!(self, Self::Expense)
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Income => write!(f, "income"),
            Self::Expense => write!(f, "expense"),
        }
    }
}

impl FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" | "in" | "credit" => Ok(Self::Income),
            "expense" | "out" | "debit" => Ok(Self::Expense),
            other => Err(format!(
                "Unknown transaction type '{}' (expected income or expense)",
                other
            )),
        }
    }
}

/// A single ledger entry as read by the analytics engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub id: TransactionId,

    pub date: NaiveDate,

    /// Non-negative amount
    pub amount: Money,

    #[serde(rename = "type")]
    pub kind: TransactionKind,

    pub category_id: CategoryId,

    pub account_id: AccountId,

    #[serde(default)]
    pub description: String,

    /// When the record was written to the ledger
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl TransactionRecord {
    pub fn new(
        date: NaiveDate,
        amount: Money,
        kind: TransactionKind,
        category_id: CategoryId,
        account_id: AccountId,
    ) -> Self {
        Self {
            id: TransactionId::new(),
            date,
            amount,
            kind,
            category_id,
            account_id,
            description: String::new(),
            created_at: Utc::now(),
        }
    }

    /// Shorthand for an expense record
    pub fn expense(
        date: NaiveDate,
        amount: Money,
        category_id: CategoryId,
        account_id: AccountId,
    ) -> Self {
        Self::new(date, amount, TransactionKind::Expense, category_id, account_id)
    }

    /// Shorthand for an income record
    pub fn income(
        date: NaiveDate,
        amount: Money,
        category_id: CategoryId,
        account_id: AccountId,
    ) -> Self {
        Self::new(date, amount, TransactionKind::Income, category_id, account_id)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Effect on an account balance: income adds, expense subtracts
    pub fn signed_amount(&self) -> Money {
        match self.kind {
            TransactionKind::Income => self.amount,
            TransactionKind::Expense => -self.amount,
        }
    }

    pub fn validate(&self) -> Result<(), TransactionValidationError> {
        if self.amount.is_negative() {
            return Err(TransactionValidationError::NegativeAmount(self.amount));
        }
        if !self.amount.within_limit() {
            return Err(TransactionValidationError::AmountTooLarge(self.amount));
        }
        if self.description.len() > 500 {
            return Err(TransactionValidationError::DescriptionTooLong(
                self.description.len(),
            ));
        }
        Ok(())
    }
}

impl fmt::Display for TransactionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.date.format("%Y-%m-%d"),
            self.kind,
            self.amount
        )?;
        if !self.description.is_empty() {
            write!(f, " ({})", self.description)?;
        }
        Ok(())
    }
}

/// Validation errors for transaction records
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionValidationError {
    NegativeAmount(Money),
    AmountTooLarge(Money),
    DescriptionTooLong(usize),
}

impl fmt::Display for TransactionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativeAmount(amount) => write!(
                f,
                "Transaction amount must not be negative (got {}); use the income/expense type instead",
                amount
            ),
            Self::AmountTooLarge(amount) => {
                write!(f, "Transaction amount {} is larger than {}", amount, Money::MAX_AMOUNT)
            }
            Self::DescriptionTooLong(len) => {
                write!(f, "Description too long ({} characters, max 500)", len)
            }
        }
    }
}

impl std::error::Error for TransactionValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(kind: TransactionKind, cents: i64) -> TransactionRecord {
        TransactionRecord::new(
            NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
            Money::from_cents(cents),
            kind,
            CategoryId::new(),
            AccountId::new(),
        )
    }

    #[test]
    fn test_signed_amount() {
        assert_eq!(sample(TransactionKind::Income, 500).signed_amount().cents(), 500);
        assert_eq!(sample(TransactionKind::Expense, 500).signed_amount().cents(), -500);
    }

    #[test]
    fn test_validate_rejects_negative_amount() {
        let record = sample(TransactionKind::Expense, -1);
        assert_eq!(
            record.validate(),
            Err(TransactionValidationError::NegativeAmount(Money::from_cents(-1)))
        );
        assert!(sample(TransactionKind::Expense, 0).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_oversized_amount() {
        let record = sample(TransactionKind::Income, Money::MAX_AMOUNT.cents() + 1);
        assert!(matches!(
            record.validate(),
            Err(TransactionValidationError::AmountTooLarge(_))
        ));
        assert!(sample(TransactionKind::Income, Money::MAX_AMOUNT.cents()).validate().is_ok());
    }

    #[test]
    fn test_kind_parse() {
        assert_eq!("Income".parse::<TransactionKind>(), Ok(TransactionKind::Income));
        assert_eq!("debit".parse::<TransactionKind>(), Ok(TransactionKind::Expense));
        assert!("transfer".parse::<TransactionKind>().is_err());
    }

    #[test]
    fn test_serialization_uses_type_field() {
        let record = sample(TransactionKind::Expense, 1250).with_description("Lunch");
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["type"], "expense");
        assert_eq!(json["amount"], 1250);
        assert_eq!(json["date"], "2025-01-15");

        let back: TransactionRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_display() {
        let record = sample(TransactionKind::Income, 100000).with_description("Salary");
        assert_eq!(record.to_string(), "2025-01-15 income $1000.00 (Salary)");
    }
}
