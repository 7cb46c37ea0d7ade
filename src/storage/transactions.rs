//! Transaction repository backed by transactions.json
//!
//! Keeps account and category indexes so category-restricted ledger queries
//! (the common case for forecasts and budgets) avoid a full scan.

use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;
use std::sync::RwLock;

use tracing::debug;

use crate::error::FintrackError;
use crate::ledger::{LedgerFilter, LedgerQuery};
use crate::models::{AccountId, CategoryId, TransactionId, TransactionRecord};

use super::file_io::{read_json, write_json_atomic};
use super::{read_lock, write_lock};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct TransactionData {
    transactions: Vec<TransactionRecord>,
}

#[derive(Default)]
struct Indexed {
    records: HashMap<TransactionId, TransactionRecord>,
    by_account: HashMap<AccountId, Vec<TransactionId>>,
    by_category: HashMap<CategoryId, Vec<TransactionId>>,
}

impl Indexed {
    fn insert(&mut self, record: TransactionRecord) {
        self.remove(record.id);
        self.by_account
            .entry(record.account_id)
            .or_default()
            .push(record.id);
        self.by_category
            .entry(record.category_id)
            .or_default()
            .push(record.id);
        self.records.insert(record.id, record);
    }

    fn remove(&mut self, id: TransactionId) -> Option<TransactionRecord> {
        let record = self.records.remove(&id)?;
        if let Some(ids) = self.by_account.get_mut(&record.account_id) {
            ids.retain(|&other| other != id);
        }
        if let Some(ids) = self.by_category.get_mut(&record.category_id) {
            ids.retain(|&other| other != id);
        }
        Some(record)
    }

    /// Ids worth checking against the filter, narrowed by an index if possible
    fn candidates(&self, filter: &LedgerFilter) -> Vec<TransactionId> {
        if let Some(categories) = filter.restricted_categories() {
            return collect_ids(categories, &self.by_category);
        }
        if let Some(accounts) = filter.restricted_accounts() {
            return collect_ids(accounts, &self.by_account);
        }
        self.records.keys().copied().collect()
    }
}

fn collect_ids<K: Ord + std::hash::Hash>(
    keys: &BTreeSet<K>,
    index: &HashMap<K, Vec<TransactionId>>,
) -> Vec<TransactionId> {
    keys.iter()
        .filter_map(|key| index.get(key))
        .flatten()
        .copied()
        .collect()
}

pub struct TransactionRepository {
    path: PathBuf,
    data: RwLock<Indexed>,
}

impl TransactionRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(Indexed::default()),
        }
    }

    /// Load records from disk and rebuild the indexes
    pub fn load(&self) -> Result<(), FintrackError> {
        let file_data: TransactionData = read_json(&self.path)?;
        let mut data = write_lock(&self.data)?;

        *data = Indexed::default();
        for record in file_data.transactions {
            data.insert(record);
        }

        debug!(count = data.records.len(), path = %self.path.display(), "loaded transactions");
        Ok(())
    }

    /// Save records to disk, newest first
    pub fn save(&self) -> Result<(), FintrackError> {
        let transactions = self.get_all()?;
        write_json_atomic(&self.path, &TransactionData { transactions })
    }

    pub fn get(&self, id: TransactionId) -> Result<Option<TransactionRecord>, FintrackError> {
        let data = read_lock(&self.data)?;
        Ok(data.records.get(&id).cloned())
    }

    /// All records, newest first
    pub fn get_all(&self) -> Result<Vec<TransactionRecord>, FintrackError> {
        let data = read_lock(&self.data)?;
        let mut records: Vec<_> = data.records.values().cloned().collect();
        sort_newest_first(&mut records);
        Ok(records)
    }

    /// Insert or replace a record
    pub fn upsert(&self, record: TransactionRecord) -> Result<(), FintrackError> {
        let mut data = write_lock(&self.data)?;
        data.insert(record);
        Ok(())
    }

    pub fn delete(&self, id: TransactionId) -> Result<Option<TransactionRecord>, FintrackError> {
        let mut data = write_lock(&self.data)?;
        Ok(data.remove(id))
    }

    pub fn count(&self) -> Result<usize, FintrackError> {
        let data = read_lock(&self.data)?;
        Ok(data.records.len())
    }
}

impl LedgerQuery for TransactionRepository {
    fn fetch(&self, filter: &LedgerFilter) -> Result<Vec<TransactionRecord>, FintrackError> {
        let data = read_lock(&self.data)?;
        let candidates = data.candidates(filter);
        let scanned = candidates.len();

        let records: Vec<TransactionRecord> = candidates
            .into_iter()
            .filter_map(|id| data.records.get(&id))
            .filter(|record| filter.matches(record))
            .cloned()
            .collect();

        debug!(
            scanned,
            matched = records.len(),
            start = %filter.range.start(),
            end = %filter.range.end(),
            "ledger fetch"
        );
        Ok(records)
    }
}

fn sort_newest_first(records: &mut [TransactionRecord]) {
    records.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::DateRange;
    use crate::models::{Money, TransactionKind};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
    }

    fn create_test_repo() -> (TempDir, TransactionRepository) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("transactions.json");
        let repo = TransactionRepository::new(path);
        (temp_dir, repo)
    }

    #[test]
    fn test_empty_load() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_upsert_save_and_reload() {
        let (temp_dir, repo) = create_test_repo();
        let account = AccountId::new();
        let food = CategoryId::new();

        let older = TransactionRecord::expense(day(2), Money::from_dollars(10), food, account);
        let newer = TransactionRecord::expense(day(9), Money::from_dollars(20), food, account)
            .with_description("Market");
        repo.upsert(older.clone()).unwrap();
        repo.upsert(newer.clone()).unwrap();
        repo.save().unwrap();

        let reloaded = TransactionRepository::new(temp_dir.path().join("transactions.json"));
        reloaded.load().unwrap();
        let all = reloaded.get_all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, newer.id);
        assert_eq!(all[0].description, "Market");
        let january = LedgerFilter::new(DateRange::new(day(1), day(31)).unwrap());
        assert_eq!(reloaded.fetch(&january.clone().accounts([account])).unwrap().len(), 2);
        assert!(reloaded.fetch(&january.accounts([AccountId::new()])).unwrap().is_empty());
    }

    #[test]
    fn test_upsert_moves_record_between_indexes() {
        let (_temp_dir, repo) = create_test_repo();
        let account = AccountId::new();
        let food = CategoryId::new();
        let fuel = CategoryId::new();

        let mut record = TransactionRecord::expense(day(5), Money::from_dollars(30), food, account);
        repo.upsert(record.clone()).unwrap();
        record.category_id = fuel;
        repo.upsert(record).unwrap();

        let january = LedgerFilter::new(DateRange::new(day(1), day(31)).unwrap());
        assert!(repo.fetch(&january.clone().category(food)).unwrap().is_empty());
        assert_eq!(repo.fetch(&january.category(fuel)).unwrap().len(), 1);
        assert_eq!(repo.count().unwrap(), 1);
    }

    #[test]
    fn test_fetch_applies_every_criterion() {
        let (_temp_dir, repo) = create_test_repo();
        let checking = AccountId::new();
        let savings = AccountId::new();
        let food = CategoryId::new();
        let salary = CategoryId::new();

        repo.upsert(TransactionRecord::expense(day(3), Money::from_dollars(12), food, checking))
            .unwrap();
        repo.upsert(TransactionRecord::expense(day(25), Money::from_dollars(8), food, savings))
            .unwrap();
        repo.upsert(TransactionRecord::income(day(15), Money::from_dollars(2000), salary, checking))
            .unwrap();

        let first_half = LedgerFilter::new(DateRange::new(day(1), day(15)).unwrap());
        assert_eq!(repo.fetch(&first_half).unwrap().len(), 2);
        assert_eq!(
            repo.fetch(&first_half.clone().kind(TransactionKind::Income))
                .unwrap()
                .len(),
            1
        );
        assert_eq!(
            repo.fetch(&first_half.clone().accounts([savings])).unwrap().len(),
            0
        );

        let whole_month = LedgerFilter::new(DateRange::new(day(1), day(31)).unwrap());
        let food_only = repo.fetch(&whole_month.category(food)).unwrap();
        assert_eq!(food_only.len(), 2);
    }

    #[test]
    fn test_delete() {
        let (_temp_dir, repo) = create_test_repo();
        let record = TransactionRecord::expense(
            day(4),
            Money::from_dollars(5),
            CategoryId::new(),
            AccountId::new(),
        );
        let id = record.id;
        repo.upsert(record).unwrap();

        assert!(repo.delete(id).unwrap().is_some());
        assert!(repo.get(id).unwrap().is_none());
        assert!(repo.delete(id).unwrap().is_none());
    }
}
