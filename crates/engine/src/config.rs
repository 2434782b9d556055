//! Service configuration via `ceiling.toml`
//!
//! A single TOML file drives the value-store namespace, the increment mode,
//! catalog limits, migration budgets and the default log filter. Missing keys
//! take their defaults.

use ceiling_core::{CeilingError, CeilingResult, Limits};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = "ceiling.toml";

/// How `increment` enforces the ceiling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncrementMode {
    /// Read the value, check it against the ceiling, then apply a plain
    /// atomic add. Concurrent increments on the same value can each pass
    /// their own check and jointly overshoot.
    #[default]
    Checked,
    /// Check and add inside the store's record lock. No overshoot.
    Atomic,
}

/// Migration job settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MigrationConfig {
    /// Records a single run of a job may process before pausing.
    ///
    /// A paused job is reported as incomplete and can be resumed.
    /// `None` runs every job to completion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_records_per_run: Option<u64>,
}

/// Service configuration loaded from `ceiling.toml`.
///
/// # Example
///
/// ```toml
/// namespace = "limit_counter"
/// increment_mode = "checked"
/// log_level = "info"
///
/// [limits]
/// max_platform_slug = 20
///
/// [migration]
/// max_records_per_run = 10000
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CeilingConfig {
    /// Value-store namespace.
    #[serde(default = "default_namespace")]
    pub namespace: String,
    /// Ceiling enforcement strategy.
    #[serde(default)]
    pub increment_mode: IncrementMode,
    /// Default tracing filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Catalog slug and ceiling limits.
    #[serde(default)]
    pub limits: Limits,
    /// Migration job settings.
    #[serde(default)]
    pub migration: MigrationConfig,
}

fn default_namespace() -> String {
    "limit_counter".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for CeilingConfig {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            increment_mode: IncrementMode::default(),
            log_level: default_log_level(),
            limits: Limits::default(),
            migration: MigrationConfig::default(),
        }
    }
}

impl CeilingConfig {
    /// Check values serde cannot check.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty namespace, a zero record
    /// budget, or a zero slug limit.
    pub fn validate(&self) -> CeilingResult<()> {
        if self.namespace.trim().is_empty() {
            return Err(CeilingError::invalid_input("namespace cannot be empty"));
        }
        if self.migration.max_records_per_run == Some(0) {
            return Err(CeilingError::invalid_input(
                "migration.max_records_per_run must be at least 1",
            ));
        }
        let l = &self.limits;
        if l.max_platform_slug == 0 || l.max_element_slug == 0 || l.max_counter_slug == 0 {
            return Err(CeilingError::invalid_input("slug limits must be at least 1"));
        }
        Ok(())
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# Ceiling configuration
#
# Value-store namespace
namespace = "limit_counter"

# Ceiling enforcement: "checked" (default) or "atomic"
#   "checked" = read, compare with the ceiling, then atomic add;
#               concurrent increments on one value may overshoot
#   "atomic"  = compare and add under the record lock; never overshoots
increment_mode = "checked"

# Log filter used when RUST_LOG is unset
log_level = "info"

[limits]
max_platform_slug = 20
max_element_slug = 30
max_counter_slug = 30

[migration]
# Pause migration jobs after this many records; resume them explicitly.
# max_records_per_run = 10000
"#
    }

    /// Parse config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text does not parse or fails validation.
    pub fn from_toml_str(content: &str) -> CeilingResult<Self> {
        let config: CeilingConfig = toml::from_str(content)
            .map_err(|e| CeilingError::serialization(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> CeilingResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CeilingError::storage(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&content)
    }

    /// Write the default config file if it does not already exist.
    pub fn write_default_if_missing(path: &Path) -> CeilingResult<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|e| {
                CeilingError::storage(format!(
                    "Failed to write default config file '{}': {}",
                    path.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> CeilingResult<()> {
        let content = toml::to_string_pretty(self).map_err(|e| {
            CeilingError::serialization(format!("Failed to serialize config: {}", e))
        })?;
        std::fs::write(path, content).map_err(|e| {
            CeilingError::storage(format!(
                "Failed to write config file '{}': {}",
                path.display(),
                e
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_toml_parses_to_default() {
        let parsed = CeilingConfig::from_toml_str(CeilingConfig::default_toml()).unwrap();
        assert_eq!(parsed, CeilingConfig::default());
    }

    #[test]
    fn empty_file_takes_defaults() {
        let parsed = CeilingConfig::from_toml_str("").unwrap();
        assert_eq!(parsed.namespace, "limit_counter");
        assert_eq!(parsed.increment_mode, IncrementMode::Checked);
        assert_eq!(parsed.migration.max_records_per_run, None);
    }

    #[test]
    fn atomic_mode_and_budget() {
        let parsed = CeilingConfig::from_toml_str(
            "increment_mode = \"atomic\"\n[migration]\nmax_records_per_run = 2\n",
        )
        .unwrap();
        assert_eq!(parsed.increment_mode, IncrementMode::Atomic);
        assert_eq!(parsed.migration.max_records_per_run, Some(2));
    }

    #[test]
    fn unknown_mode_rejected() {
        let err = CeilingConfig::from_toml_str("increment_mode = \"eventual\"").unwrap_err();
        assert!(matches!(err, CeilingError::Serialization { .. }));
    }

    #[test]
    fn zero_budget_rejected() {
        let err =
            CeilingConfig::from_toml_str("[migration]\nmax_records_per_run = 0\n").unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn empty_namespace_rejected() {
        assert!(CeilingConfig::from_toml_str("namespace = \"  \"").is_err());
    }

    #[test]
    fn write_default_if_missing_creates_once() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);

        CeilingConfig::write_default_if_missing(&path).unwrap();
        let first = std::fs::read_to_string(&path).unwrap();
        assert_eq!(first, CeilingConfig::default_toml());

        std::fs::write(&path, "namespace = \"custom\"\n").unwrap();
        CeilingConfig::write_default_if_missing(&path).unwrap();
        let config = CeilingConfig::from_file(&path).unwrap();
        assert_eq!(config.namespace, "custom");
    }

    #[test]
    fn write_to_file_round_trips() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        let config = CeilingConfig {
            namespace: "staging".to_string(),
            increment_mode: IncrementMode::Atomic,
            ..CeilingConfig::default()
        };
        config.write_to_file(&path).unwrap();
        assert_eq!(CeilingConfig::from_file(&path).unwrap(), config);
    }

    #[test]
    fn missing_file_is_storage_error() {
        let dir = TempDir::new().unwrap();
        let err = CeilingConfig::from_file(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, CeilingError::Storage { .. }));
    }
}
