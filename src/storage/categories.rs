//! Category repository backed by categories.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::FintrackError;
use crate::models::{Category, CategoryId, TransactionKind};

use super::file_io::{read_json, write_json_atomic};
use super::{read_lock, write_lock};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct CategoryData {
    categories: Vec<Category>,
}

pub struct CategoryRepository {
    path: PathBuf,
    categories: RwLock<HashMap<CategoryId, Category>>,
}

impl CategoryRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            categories: RwLock::new(HashMap::new()),
        }
    }

    pub fn load(&self) -> Result<(), FintrackError> {
        let file_data: CategoryData = read_json(&self.path)?;
        let mut categories = write_lock(&self.categories)?;

        categories.clear();
        for category in file_data.categories {
            categories.insert(category.id, category);
        }
        Ok(())
    }

    pub fn save(&self) -> Result<(), FintrackError> {
        let categories = self.get_all()?;
        write_json_atomic(&self.path, &CategoryData { categories })
    }

    pub fn get(&self, id: CategoryId) -> Result<Option<Category>, FintrackError> {
        Ok(read_lock(&self.categories)?.get(&id).cloned())
    }

    /// Income categories first, then expenses, each by name
    pub fn get_all(&self) -> Result<Vec<Category>, FintrackError> {
        let categories = read_lock(&self.categories)?;
        let mut list: Vec<_> = categories.values().cloned().collect();
        list.sort_by_key(|c| (c.kind, c.name.to_lowercase()));
        Ok(list)
    }

    pub fn get_by_kind(&self, kind: TransactionKind) -> Result<Vec<Category>, FintrackError> {
        Ok(self
            .get_all()?
            .into_iter()
            .filter(|c| c.kind == kind)
            .collect())
    }

    /// Case-insensitive lookup
    pub fn get_by_name(&self, name: &str) -> Result<Option<Category>, FintrackError> {
        let categories = read_lock(&self.categories)?;
        let wanted = name.trim().to_lowercase();
        Ok(categories
            .values()
            .find(|c| c.name.to_lowercase() == wanted)
            .cloned())
    }

    pub fn upsert(&self, category: Category) -> Result<(), FintrackError> {
        write_lock(&self.categories)?.insert(category.id, category);
        Ok(())
    }

    pub fn name_exists(&self, name: &str) -> Result<bool, FintrackError> {
        Ok(self.get_by_name(name)?.is_some())
    }

    /// Id to name, for rendering reports
    pub fn names(&self) -> Result<HashMap<CategoryId, String>, FintrackError> {
        let categories = read_lock(&self.categories)?;
        Ok(categories
            .values()
            .map(|c| (c.id, c.name.clone()))
            .collect())
    }
}
