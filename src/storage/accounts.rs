//! Account repository backed by accounts.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::FintrackError;
use crate::models::{Account, AccountId};

use super::file_io::{read_json, write_json_atomic};
use super::{read_lock, write_lock};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct AccountData {
    accounts: Vec<Account>,
}

pub struct AccountRepository {
    path: PathBuf,
    data: RwLock<HashMap<AccountId, Account>>,
}

impl AccountRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    pub fn load(&self) -> Result<(), FintrackError> {
        let file_data: AccountData = read_json(&self.path)?;
        let mut data = write_lock(&self.data)?;

        data.clear();
        for account in file_data.accounts {
            data.insert(account.id, account);
        }
        Ok(())
    }

    pub fn save(&self) -> Result<(), FintrackError> {
        let accounts = self.get_all()?;
        write_json_atomic(&self.path, &AccountData { accounts })
    }

    pub fn get(&self, id: AccountId) -> Result<Option<Account>, FintrackError> {
        let data = read_lock(&self.data)?;
        Ok(data.get(&id).cloned())
    }

    /// All accounts sorted by name
    pub fn get_all(&self) -> Result<Vec<Account>, FintrackError> {
        let data = read_lock(&self.data)?;
        let mut accounts: Vec<_> = data.values().cloned().collect();
        accounts.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(accounts)
    }

    /// Case-insensitive lookup
    pub fn get_by_name(&self, name: &str) -> Result<Option<Account>, FintrackError> {
        let data = read_lock(&self.data)?;
        let wanted = name.trim().to_lowercase();
        Ok(data
            .values()
            .find(|account| account.name.to_lowercase() == wanted)
            .cloned())
    }

    pub fn upsert(&self, account: Account) -> Result<(), FintrackError> {
        let mut data = write_lock(&self.data)?;
        data.insert(account.id, account);
        Ok(())
    }

    pub fn name_exists(&self, name: &str) -> Result<bool, FintrackError> {
        Ok(self.get_by_name(name)?.is_some())
    }

    pub fn count(&self) -> Result<usize, FintrackError> {
        Ok(read_lock(&self.data)?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, AccountRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = AccountRepository::new(temp_dir.path().join("accounts.json"));
        (temp_dir, repo)
    }

    #[test]
    fn test_empty_load() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_save_and_reload_keeps_balance() {
        let (temp_dir, repo) = create_test_repo();
        let account = Account::with_balance("Savings", Money::from_dollars(1500));
        let id = account.id;
        repo.upsert(account).unwrap();
        repo.save().unwrap();

        let reloaded = AccountRepository::new(temp_dir.path().join("accounts.json"));
        reloaded.load().unwrap();
        let loaded = reloaded.get(id).unwrap().unwrap();
        assert_eq!(loaded.balance, Money::from_dollars(1500));
    }

    #[test]
    fn test_get_by_name_is_case_insensitive() {
        let (_temp_dir, repo) = create_test_repo();
        repo.upsert(Account::new("Main Checking")).unwrap();

        assert!(repo.get_by_name("main checking").unwrap().is_some());
        assert!(repo.name_exists(" MAIN CHECKING ").unwrap());
        assert!(repo.get_by_name("Savings").unwrap().is_none());
    }

    #[test]
    fn test_get_all_sorted_by_name() {
        let (_temp_dir, repo) = create_test_repo();
        repo.upsert(Account::new("wallet")).unwrap();
        repo.upsert(Account::new("Brokerage")).unwrap();

        let names: Vec<_> = repo.get_all().unwrap().into_iter().map(|a| a.name).collect();
        assert_eq!(names, vec!["Brokerage", "wallet"]);
    }
}
