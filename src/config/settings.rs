//! User settings for fintrack
//!
//! Holds display preferences and the named constants that drive the
//! analytics engine (smoothing factor, alert thresholds, pacing tolerance).

use serde::{Deserialize, Serialize};

use super::paths::FintrackPaths;
use crate::error::FintrackError;
use crate::models::Granularity;

/// Tunables for forecasting, budget alerts and goal pacing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsSettings {
    /// Exponential smoothing factor α in (0, 1]. Higher values follow recent
    /// periods more closely at the cost of more noise.
    #[serde(default = "default_smoothing_alpha")]
    pub smoothing_alpha: f64,

    /// Utilization (%) at which a budget turns `warning`
    #[serde(default = "default_warning_threshold")]
    pub warning_threshold_pct: f64,

    /// Utilization (%) at which a budget turns `exceeded`
    #[serde(default = "default_exceeded_threshold")]
    pub exceeded_threshold_pct: f64,

    /// Fraction by which the required savings pace may exceed the actual
    /// pace before a goal is reported as `behind`
    #[serde(default = "default_behind_tolerance")]
    pub behind_tolerance: f64,

    /// Non-zero periods needed before exponential smoothing is used
    #[serde(default = "default_min_active_periods")]
    pub min_active_periods: usize,

    /// Number of past periods fed to the forecaster
    #[serde(default = "default_lookback_periods")]
    pub lookback_periods: u32,

    /// Bucket size used when none is given
    #[serde(default)]
    pub default_granularity: Granularity,
}

fn default_smoothing_alpha() -> f64 {
    0.3
}

fn default_warning_threshold() -> f64 {
    80.0
}

fn default_exceeded_threshold() -> f64 {
    100.0
}

fn default_behind_tolerance() -> f64 {
    0.10
}

fn default_min_active_periods() -> usize {
    3
}

fn default_lookback_periods() -> u32 {
    6
}

impl Default for AnalyticsSettings {
    fn default() -> Self {
        Self {
            smoothing_alpha: default_smoothing_alpha(),
            warning_threshold_pct: default_warning_threshold(),
            exceeded_threshold_pct: default_exceeded_threshold(),
            behind_tolerance: default_behind_tolerance(),
            min_active_periods: default_min_active_periods(),
            lookback_periods: default_lookback_periods(),
            default_granularity: Granularity::default(),
        }
    }
}

impl AnalyticsSettings {
    /// Reject values the engine cannot work with
    pub fn validate(&self) -> Result<(), FintrackError> {
        if !(self.smoothing_alpha > 0.0 && self.smoothing_alpha <= 1.0) {
            return Err(FintrackError::Config(format!(
                "smoothing_alpha must be in (0, 1], got {}",
                self.smoothing_alpha
            )));
        }

        if self.warning_threshold_pct <= 0.0 || self.exceeded_threshold_pct <= 0.0 {
            return Err(FintrackError::Config(
                "Budget alert thresholds must be positive".into(),
            ));
        }

        if self.warning_threshold_pct >= self.exceeded_threshold_pct {
            return Err(FintrackError::Config(format!(
                "warning_threshold_pct ({}) must be below exceeded_threshold_pct ({})",
                self.warning_threshold_pct, self.exceeded_threshold_pct
            )));
        }

        if self.behind_tolerance < 0.0 {
            return Err(FintrackError::Config(
                "behind_tolerance cannot be negative".into(),
            ));
        }

        if self.lookback_periods == 0 {
            return Err(FintrackError::Config(
                "lookback_periods must be at least 1".into(),
            ));
        }

        Ok(())
    }
}

/// User settings for fintrack
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Currency symbol used in text output
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Engine tunables
    #[serde(default)]
    pub analytics: AnalyticsSettings,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            date_format: default_date_format(),
            analytics: AnalyticsSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or fall back to defaults if the file is missing
    pub fn load_or_create(paths: &FintrackPaths) -> Result<Self, FintrackError> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            // Not persisted until the caller asks for it
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| FintrackError::Io(format!("Failed to read settings file: {}", e)))?;

        let settings: Settings = serde_json::from_str(&contents)
            .map_err(|e| FintrackError::Config(format!("Failed to parse settings file: {}", e)))?;

        settings.analytics.validate()?;
        Ok(settings)
    }

    /// Save settings to disk
    pub fn save(&self, paths: &FintrackPaths) -> Result<(), FintrackError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| FintrackError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| FintrackError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.analytics.smoothing_alpha, 0.3);
        assert_eq!(settings.analytics.warning_threshold_pct, 80.0);
        assert_eq!(settings.analytics.exceeded_threshold_pct, 100.0);
        assert_eq!(settings.analytics.default_granularity, Granularity::Month);
        assert!(settings.analytics.validate().is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = FintrackPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.analytics.smoothing_alpha = 0.5;
        settings.analytics.default_granularity = Granularity::Week;
        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.analytics.smoothing_alpha, 0.5);
        assert_eq!(loaded.analytics.default_granularity, Granularity::Week);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"analytics": {"smoothing_alpha": 0.4}}"#).unwrap();
        assert_eq!(settings.currency_symbol, "$");
        assert_eq!(settings.analytics.smoothing_alpha, 0.4);
        assert_eq!(settings.analytics.behind_tolerance, 0.10);
    }

    #[test]
    fn test_validate_rejects_bad_alpha() {
        let mut analytics = AnalyticsSettings::default();
        analytics.smoothing_alpha = 0.0;
        assert!(analytics.validate().is_err());

        analytics.smoothing_alpha = 1.5;
        assert!(analytics.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_unordered_thresholds() {
        let mut analytics = AnalyticsSettings::default();
        analytics.warning_threshold_pct = 100.0;
        assert!(analytics.validate().is_err());
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let temp_dir = TempDir::new().unwrap();
        let paths = FintrackPaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(
            paths.settings_file(),
            r#"{"analytics": {"behind_tolerance": -1.0}}"#,
        )
        .unwrap();

        assert!(Settings::load_or_create(&paths).is_err());
    }
}
