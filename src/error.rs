//! Error types for fintrack
//!
//! One error enum covers the analytics engine (insufficient history, missing
//! budget limit, bad date ranges) and the collaborators around it (storage,
//! configuration, import).

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::PeriodKey;

/// The main error type for fintrack operations
#[derive(Error, Debug)]
pub enum FintrackError {
    /// A forecast was requested without any usable history
    #[error("Not enough history to forecast {category}{}", in_period(.period))]
    InsufficientData {
        category: String,
        period: Option<PeriodKey>,
    },

    /// A budget has a zero limit, so utilization is undefined
    #[error("No limit configured for budget '{category}' in {period}")]
    NoLimit { category: String, period: String },

    /// A date range whose end precedes its start
    #[error("Invalid date range: {start} to {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// YAML output errors
    #[error("YAML error: {0}")]
    Yaml(String),

    /// Validation errors for data models and inputs
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Duplicate entity errors
    #[error("{entity_type} already exists: {identifier}")]
    Duplicate {
        entity_type: &'static str,
        identifier: String,
    },

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// CSV import errors
    #[error("Import error: {0}")]
    Import(String),
}

impl FintrackError {
    pub fn account_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Account",
            identifier: identifier.into(),
        }
    }

    pub fn category_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Category",
            identifier: identifier.into(),
        }
    }

    pub fn transaction_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Transaction",
            identifier: identifier.into(),
        }
    }

    pub fn budget_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Budget",
            identifier: identifier.into(),
        }
    }

    pub fn goal_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Goal",
            identifier: identifier.into(),
        }
    }

    /// Build an `InvalidRange` error
    pub fn invalid_range(start: NaiveDate, end: NaiveDate) -> Self {
        Self::InvalidRange { start, end }
    }

    /// Name the category and period an engine error is about
    ///
    /// The engine only knows category ids; callers that hold the category
    /// swap in its name. Other errors pass through unchanged.
    pub fn for_category(self, name: &str, period: PeriodKey) -> Self {
        match self {
            Self::InsufficientData { .. } => Self::InsufficientData {
                category: name.to_string(),
                period: Some(period),
            },
            Self::NoLimit { .. } => Self::NoLimit {
                category: name.to_string(),
                period: period.to_string(),
            },
            other => other,
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this error means "not enough history"
    pub fn is_insufficient_data(&self) -> bool {
        matches!(self, Self::InsufficientData { .. })
    }

    /// Check if this error means "budget has no limit"
    pub fn is_no_limit(&self) -> bool {
        matches!(self, Self::NoLimit { .. })
    }
}

impl From<std::io::Error> for FintrackError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for FintrackError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<serde_yaml::Error> for FintrackError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Yaml(err.to_string())
    }
}

impl From<csv::Error> for FintrackError {
    fn from(err: csv::Error) -> Self {
        Self::Import(err.to_string())
    }
}

impl From<crate::models::money::MoneyParseError> for FintrackError {
    fn from(err: crate::models::money::MoneyParseError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<crate::models::period::PeriodParseError> for FintrackError {
    fn from(err: crate::models::period::PeriodParseError) -> Self {
        Self::Validation(err.to_string())
    }
}

/// Result type alias for fintrack operations
pub type FintrackResult<T> = Result<T, FintrackError>;

fn in_period(period: &Option<PeriodKey>) -> String {
    period.map(|p| format!(" in {}", p)).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_data_message() {
        let err = FintrackError::InsufficientData {
            category: "cat-1234".into(),
            period: None,
        };
        assert_eq!(err.to_string(), "Not enough history to forecast cat-1234");

        let named = err.for_category("Groceries", PeriodKey::month(2025, 6).unwrap());
        assert_eq!(
            named.to_string(),
            "Not enough history to forecast Groceries in 2025-06"
        );
        assert!(named.is_insufficient_data());
    }

    #[test]
    fn test_for_category_names_no_limit_and_skips_others() {
        let err = FintrackError::NoLimit {
            category: "cat-1234".into(),
            period: "2025-03".into(),
        };
        let named = err.for_category("Dining", PeriodKey::month(2025, 3).unwrap());
        assert_eq!(
            named.to_string(),
            "No limit configured for budget 'Dining' in 2025-03"
        );

        let other = FintrackError::goal_not_found("Car")
            .for_category("Dining", PeriodKey::month(2025, 3).unwrap());
        assert_eq!(other.to_string(), "Goal not found: Car");
    }

    #[test]
    fn test_no_limit_message() {
        let err = FintrackError::NoLimit {
            category: "Dining".into(),
            period: "2025-03".into(),
        };
        assert_eq!(
            err.to_string(),
            "No limit configured for budget 'Dining' in 2025-03"
        );
        assert!(err.is_no_limit());
    }

    #[test]
    fn test_invalid_range_message() {
        let start = NaiveDate::from_ymd_opt(2025, 2, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let err = FintrackError::invalid_range(start, end);
        assert_eq!(
            err.to_string(),
            "Invalid date range: 2025-02-01 to 2025-01-01"
        );
    }

    #[test]
    fn test_not_found_error() {
        let err = FintrackError::goal_not_found("Vacation");
        assert_eq!(err.to_string(), "Goal not found: Vacation");
        assert!(err.is_not_found());
        assert!(!err.is_validation());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: FintrackError = io_err.into();
        assert!(matches!(err, FintrackError::Io(_)));
    }
}
