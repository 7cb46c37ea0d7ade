//! In-memory ledger adapter

use super::{LedgerFilter, LedgerQuery};
use crate::error::FintrackResult;
use crate::models::TransactionRecord;

/// A ledger backed by a plain vector of records
#[derive(Debug, Clone, Default)]
pub struct InMemoryLedger {
    records: Vec<TransactionRecord>,
}

impl InMemoryLedger {
    pub fn new(records: Vec<TransactionRecord>) -> Self {
        Self { records }
    }

    pub fn push(&mut self, record: TransactionRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[TransactionRecord] {
        &self.records
    }
}

impl FromIterator<TransactionRecord> for InMemoryLedger {
    fn from_iter<I: IntoIterator<Item = TransactionRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl LedgerQuery for InMemoryLedger {
    fn fetch(&self, filter: &LedgerFilter) -> FintrackResult<Vec<TransactionRecord>> {
        Ok(self
            .records
            .iter()
            .filter(|record| filter.matches(record))
            .cloned()
            .collect())
    }
}
