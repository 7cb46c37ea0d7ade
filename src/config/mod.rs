//! Configuration module for fintrack
//!
//! - path resolution for the settings file and JSON data files
//! - user settings, including the analytics engine tunables

pub mod paths;
pub mod settings;

pub use paths::FintrackPaths;
pub use settings::{AnalyticsSettings, Settings};
