//! fintrack - personal finance analytics
//!
//! This library keeps a ledger of income and expense records and derives
//! period aggregates, spending forecasts, budget alerts and savings goal
//! status from it.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration, engine tunables and path management
//! - `error`: Custom error types
//! - `models`: Core data models (money, periods, transactions, budgets, goals)
//! - `ledger`: Read-only query interface over transaction records
//! - `analytics`: Pure engines (aggregator, forecaster, budget evaluator, goal tracker)
//! - `storage`: JSON file storage and CSV import
//! - `services`: Business logic tying storage, ledger and engines together
//! - `display`: Text rendering for the CLI
//! - `cli`: Command handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use fintrack::config::{paths::FintrackPaths, settings::Settings};
//! use fintrack::services::ReportService;
//! use fintrack::storage::Storage;
//!
//! let paths = FintrackPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let storage = Storage::new(paths)?;
//! storage.load_all()?;
//!
//! let reports = ReportService::new(&storage.transactions, &settings.analytics);
//! ```

pub mod analytics;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod ledger;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{FintrackError, FintrackResult};
