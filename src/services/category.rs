//! Category service

use tracing::info;

use crate::error::{FintrackError, FintrackResult};
use crate::models::{Category, CategoryId, TransactionKind};
use crate::storage::Storage;

/// Service for category management
pub struct CategoryService<'a> {
    storage: &'a Storage,
}

impl<'a> CategoryService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    pub fn create(&self, name: &str, kind: TransactionKind) -> FintrackResult<Category> {
        let name = name.trim();
        if name.is_empty() {
            return Err(FintrackError::Validation(
                "Category name cannot be empty".into(),
            ));
        }

        if self.storage.categories.name_exists(name)? {
            return Err(FintrackError::Duplicate {
                entity_type: "Category",
                identifier: name.to_string(),
            });
        }

        let category = Category::new(name, kind);
        category
            .validate()
            .map_err(|e| FintrackError::Validation(e.to_string()))?;

        self.storage.categories.upsert(category.clone())?;
        self.storage.categories.save()?;

        info!(category = %category.name, kind = %category.kind, "created category");
        Ok(category)
    }

    /// Find a category by name or id string
    pub fn find(&self, identifier: &str) -> FintrackResult<Option<Category>> {
        if let Some(category) = self.storage.categories.get_by_name(identifier)? {
            return Ok(Some(category));
        }

        if let Ok(id) = identifier.parse::<CategoryId>() {
            return self.storage.categories.get(id);
        }

        Ok(None)
    }

    pub fn require(&self, identifier: &str) -> FintrackResult<Category> {
        self.find(identifier)?
            .ok_or_else(|| FintrackError::category_not_found(identifier))
    }

    pub fn list(&self) -> FintrackResult<Vec<Category>> {
        self.storage.categories.get_all()
    }
}
