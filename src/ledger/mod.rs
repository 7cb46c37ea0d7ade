//! Read-only query interface over the transaction ledger
//!
//! Every analytic report starts with a [`LedgerQuery::fetch`]. Adapters exist
//! for an in-memory record set and for the JSON transaction store
//! (`storage::TransactionRepository`).

mod memory;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::{FintrackError, FintrackResult};
use crate::models::{AccountId, CategoryId, PeriodKey, TransactionKind, TransactionRecord};

pub use memory::InMemoryLedger;

/// An inclusive date range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Fails with `InvalidRange` when `end` precedes `start`
    pub fn new(start: NaiveDate, end: NaiveDate) -> FintrackResult<Self> {
        if end < start {
            return Err(FintrackError::invalid_range(start, end));
        }
        Ok(Self { start, end })
    }

    pub fn single_day(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Number of days covered, both ends included
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

impl From<PeriodKey> for DateRange {
    fn from(period: PeriodKey) -> Self {
        Self {
            start: period.start_date(),
            end: period.end_date(),
        }
    }
}

/// Criteria for a ledger fetch
///
/// A record matches when its date is in `range` and every criterion that is
/// set matches. Empty id sets are treated as "no restriction".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerFilter {
    pub range: DateRange,
    pub account_ids: Option<BTreeSet<AccountId>>,
    pub category_ids: Option<BTreeSet<CategoryId>>,
    pub kind: Option<TransactionKind>,
}

impl LedgerFilter {
    pub fn new(range: DateRange) -> Self {
        Self {
            range,
            account_ids: None,
            category_ids: None,
            kind: None,
        }
    }

    /// Everything in one period
    pub fn for_period(period: PeriodKey) -> Self {
        Self::new(period.into())
    }

    /// Restrict to these accounts; an empty set leaves accounts unrestricted
    pub fn accounts(mut self, ids: impl IntoIterator<Item = AccountId>) -> Self {
        self.account_ids = Some(ids.into_iter().collect());
        self
    }

    /// Restrict to these categories; an empty set leaves categories unrestricted
    pub fn categories(mut self, ids: impl IntoIterator<Item = CategoryId>) -> Self {
        self.category_ids = Some(ids.into_iter().collect());
        self
    }

    pub fn category(self, id: CategoryId) -> Self {
        self.categories([id])
    }

    pub fn kind(mut self, kind: TransactionKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn expenses(self) -> Self {
        self.kind(TransactionKind::Expense)
    }

    pub fn matches(&self, record: &TransactionRecord) -> bool {
        if !self.range.contains(record.date) {
            return false;
        }

        if let Some(kind) = self.kind {
            if record.kind != kind {
                return false;
            }
        }

        if let Some(accounts) = &self.account_ids {
            if !accounts.is_empty() && !accounts.contains(&record.account_id) {
                return false;
            }
        }

        if let Some(categories) = &self.category_ids {
            if !categories.is_empty() && !categories.contains(&record.category_id) {
                return false;
            }
        }

        true
    }

    /// The account restriction, if one is actually in effect
    pub fn restricted_accounts(&self) -> Option<&BTreeSet<AccountId>> {
        self.account_ids.as_ref().filter(|ids| !ids.is_empty())
    }

    /// The category restriction, if one is actually in effect
    pub fn restricted_categories(&self) -> Option<&BTreeSet<CategoryId>> {
        self.category_ids.as_ref().filter(|ids| !ids.is_empty())
    }
}

/// Source of transaction records for the analytics engine
///
/// Implementations return every record matching the filter, in no
/// particular order.
pub trait LedgerQuery {
    fn fetch(&self, filter: &LedgerFilter) -> FintrackResult<Vec<TransactionRecord>>;
}

impl<T: LedgerQuery + ?Sized> LedgerQuery for &T {
    fn fetch(&self, filter: &LedgerFilter) -> FintrackResult<Vec<TransactionRecord>> {
        (**self).fetch(filter)
    }
}
