//! Transaction service
//!
//! Recording or deleting a transaction keeps the owning account's balance in
//! step. Imports resolve every row before anything is written, so a bad row
//! leaves the ledger untouched. Transactions are written before accounts; a
//! failed write puts both back as they were.

use std::collections::HashMap;

use tracing::{debug, info, warn};

use crate::error::{FintrackError, FintrackResult};
use crate::ledger::{LedgerFilter, LedgerQuery};
use crate::models::{Account, AccountId, Category, Money, TransactionId, TransactionRecord};
use crate::storage::{ImportRow, Storage};

/// Service for recording and listing ledger entries
pub struct TransactionService<'a> {
    storage: &'a Storage,
}

/// Outcome of a CSV import
#[derive(Debug, Clone, serde::Serialize)]
pub struct ImportSummary {
    pub imported: usize,
    pub income_total: Money,
    pub expense_total: Money,
}

impl<'a> TransactionService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Validate and store one record, adjusting the account balance
    pub fn record(&self, record: TransactionRecord) -> FintrackResult<TransactionRecord> {
        let mut account = self
            .storage
            .accounts
            .get(record.account_id)?
            .ok_or_else(|| FintrackError::account_not_found(record.account_id.to_string()))?;
        let category = self
            .storage
            .categories
            .get(record.category_id)?
            .ok_or_else(|| FintrackError::category_not_found(record.category_id.to_string()))?;

        check_record(&record, &category)?;

        let previous = account.clone();
        apply_to(&mut account, record.signed_amount())?;
        self.storage.transactions.upsert(record.clone())?;
        self.storage.accounts.upsert(account)?;
        self.commit(|| {
            self.storage.transactions.delete(record.id)?;
            self.storage.accounts.upsert(previous)
        })?;

        info!(
            date = %record.date,
            kind = %record.kind,
            amount = %record.amount,
            category = %category.name,
            "recorded transaction"
        );
        Ok(record)
    }

    /// Find a record by full id or by the short id shown in listings
    pub fn find(&self, identifier: &str) -> FintrackResult<TransactionRecord> {
        let identifier = identifier.trim();
        let not_found = || FintrackError::transaction_not_found(identifier);

        if let Ok(id) = identifier.parse::<TransactionId>() {
            return self.storage.transactions.get(id)?.ok_or_else(not_found);
        }

        let prefix = identifier
            .strip_prefix("txn-")
            .unwrap_or(identifier)
            .to_lowercase();
        if prefix.is_empty() {
            return Err(not_found());
        }

        let mut matches = self
            .storage
            .transactions
            .get_all()?
            .into_iter()
            .filter(|r| r.id.as_uuid().to_string().starts_with(&prefix));
        match (matches.next(), matches.next()) {
            (Some(record), None) => Ok(record),
            (None, _) => Err(not_found()),
            (Some(_), Some(_)) => Err(FintrackError::Validation(format!(
                "'{}' matches more than one transaction; use the full id",
                identifier
            ))),
        }
    }

    /// Remove a record and undo its effect on the account balance
    pub fn delete(&self, id: TransactionId) -> FintrackResult<TransactionRecord> {
        let record = self
            .storage
            .transactions
            .get(id)?
            .ok_or_else(|| FintrackError::transaction_not_found(id.to_string()))?;
        let mut account = self
            .storage
            .accounts
            .get(record.account_id)?
            .ok_or_else(|| FintrackError::account_not_found(record.account_id.to_string()))?;

        let previous = account.clone();
        apply_to(&mut account, -record.signed_amount())?;
        self.storage.transactions.delete(id)?;
        self.storage.accounts.upsert(account)?;
        self.commit(|| {
            self.storage.transactions.upsert(record.clone())?;
            self.storage.accounts.upsert(previous)
        })?;

        info!(id = %record.id, date = %record.date, amount = %record.amount, "deleted transaction");
        Ok(record)
    }

    /// Records matching `filter`, newest first
    pub fn list(&self, filter: &LedgerFilter) -> FintrackResult<Vec<TransactionRecord>> {
        let mut records = self.storage.transactions.fetch(filter)?;
        records.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));
        Ok(records)
    }

    /// Resolve names and store every row, or nothing
    pub fn import(&self, rows: Vec<ImportRow>) -> FintrackResult<ImportSummary> {
        let accounts = self.storage.accounts.get_all()?;
        let categories = self.storage.categories.get_all()?;

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            let account = find_named(&accounts, &row.account, |a| &a.name)
                .ok_or_else(|| row.error(format!("unknown account '{}'", row.account)))?;
            let category = find_named(&categories, &row.category, |c| &c.name)
                .ok_or_else(|| row.error(format!("unknown category '{}'", row.category)))?;

            let record = TransactionRecord::new(row.date, row.amount, row.kind, category.id, account.id)
                .with_description(row.description.clone());
            check_record(&record, category).map_err(|e| row.error(e))?;
            records.push(record);
        }

        let mut deltas: HashMap<AccountId, Money> = HashMap::new();
        let mut summary = ImportSummary {
            imported: records.len(),
            income_total: Money::zero(),
            expense_total: Money::zero(),
        };
        for record in &records {
            *deltas.entry(record.account_id).or_default() += record.signed_amount();
            if record.kind.is_income() {
                summary.income_total += record.amount;
            } else {
                summary.expense_total += record.amount;
            }
        }

        // Balances are checked before any row is stored
        let mut previous = Vec::new();
        let mut updated = Vec::new();
        for mut account in accounts {
            if let Some(delta) = deltas.get(&account.id) {
                debug!(account = %account.name, delta = %delta, "import balance change");
                previous.push(account.clone());
                apply_to(&mut account, *delta)?;
                updated.push(account);
            }
        }

        let ids: Vec<TransactionId> = records.iter().map(|r| r.id).collect();
        for record in records {
            self.storage.transactions.upsert(record)?;
        }
        for account in updated {
            self.storage.accounts.upsert(account)?;
        }
        self.commit(|| {
            for id in &ids {
                self.storage.transactions.delete(*id)?;
            }
            for account in previous {
                self.storage.accounts.upsert(account)?;
            }
            Ok(())
        })?;

        info!(imported = summary.imported, "imported transactions");
        Ok(summary)
    }

    /// Persist transactions, then accounts
    ///
    /// On a failed write `undo` restores the in-memory state and the
    /// transaction file is rewritten from it. The account file is the last
    /// write, so it never holds a change the transaction file lacks.
    fn commit(&self, undo: impl FnOnce() -> FintrackResult<()>) -> FintrackResult<()> {
        let written = self
            .storage
            .transactions
            .save()
            .and_then(|()| self.storage.accounts.save());

        if let Err(e) = written {
            warn!(error = %e, "save failed, rolling back");
            undo()?;
            self.storage.transactions.save()?;
            return Err(e);
        }
        Ok(())
    }
}

fn apply_to(account: &mut Account, delta: Money) -> FintrackResult<()> {
    account
        .apply(delta)
        .map_err(|e| FintrackError::Validation(format!("Account '{}': {}", account.name, e)))
}

fn check_record(record: &TransactionRecord, category: &Category) -> FintrackResult<()> {
    record
        .validate()
        .map_err(|e| FintrackError::Validation(e.to_string()))?;

    if record.kind != category.kind {
        return Err(FintrackError::Validation(format!(
            "Category '{}' is for {} transactions, not {}",
            category.name, category.kind, record.kind
        )));
    }
    Ok(())
}

fn find_named<'t, T>(items: &'t [T], name: &str, key: impl Fn(&T) -> &String) -> Option<&'t T> {
    let wanted = name.trim().to_lowercase();
    items.iter().find(|item| key(*item).to_lowercase() == wanted)
}
