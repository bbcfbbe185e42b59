//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - The current material / concentrate / heater selection
//! - Custom duration override and the bounds it is checked against
//! - An optional catalog file replacing the built-in table
//! - Tick period and default statistics range
//!
//! Configuration is stored at `~/.config/dabtimer/config.toml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::catalog::Catalog;
use crate::duration::{compute_durations, CustomDurations, CycleDurations, DurationBounds, Selection};
use crate::error::{ConfigError, Result};
use crate::ledger::StatsRange;

/// Tick driver configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerConfig {
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
}

/// Statistics view configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsConfig {
    #[serde(default)]
    pub default_range: StatsRange,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/dabtimer/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Catalog file to use instead of the built-in table.
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,
    #[serde(default)]
    pub selection: Selection,
    #[serde(default)]
    pub custom: CustomDurations,
    #[serde(default)]
    pub bounds: DurationBounds,
    #[serde(default)]
    pub timer: TimerConfig,
    #[serde(default)]
    pub stats: StatsConfig,
}

fn default_tick_ms() -> u64 {
    1000
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() || key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<u64>() {
                            serde_json::Value::Number(n.into())
                        } else if let Ok(n) = value.parse::<f64>() {
                            serde_json::Number::from_f64(n)
                                .map(serde_json::Value::Number)
                                .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?
                        } else {
                            return Err(invalid(format!("cannot parse '{value}' as number")));
                        }
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    // Optional fields: an empty value clears them.
                    serde_json::Value::Null | serde_json::Value::String(_) if value.is_empty() => {
                        serde_json::Value::Null
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or return default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, writing the defaults there when the file is missing.
    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
                cfg.bounds.validate()?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, writing defaults");
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
            .into()),
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "falling back to default config");
            Self::default()
        })
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key without saving.
    ///
    /// The bounds are always re-checked, and the custom durations are
    /// re-checked against them, so an edit that leaves an enabled override
    /// out of range is rejected.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value cannot be parsed.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        updated.bounds.validate()?;
        if updated.custom.enabled {
            updated.custom.validate(&updated.bounds)?;
        }
        *self = updated;
        Ok(())
    }

    /// Set a config value by key and save. Returns error if key is unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.apply(key, value)?;
        self.save()
    }

    /// The catalog named by `catalog_path`, or the built-in one.
    pub fn catalog(&self) -> Result<Catalog> {
        match &self.catalog_path {
            Some(path) => Catalog::load(path),
            None => Catalog::builtin(),
        }
    }

    /// Durations for the configured selection, honoring the custom override.
    pub fn durations(&self, catalog: &Catalog) -> Result<CycleDurations> {
        compute_durations(&self.selection, catalog, Some(&self.custom), &self.bounds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::duration::DurationSource;
    use crate::error::CoreError;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn empty_file_gives_defaults() {
        let parsed: Config = toml::from_str("").unwrap();
        assert_eq!(parsed, Config::default());
        assert_eq!(parsed.timer.tick_ms, 1000);
        assert_eq!(parsed.stats.default_range, StatsRange::Week);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("selection.material").as_deref(), Some("quartz"));
        assert_eq!(cfg.get("bounds.heat_max").as_deref(), Some("300"));
        assert_eq!(cfg.get("custom.enabled").as_deref(), Some("false"));
        assert!(cfg.get("selection.missing_key").is_none());
    }

    #[test]
    fn set_json_value_by_path_updates_nested_number() {
        let mut json = serde_json::to_value(Config::default()).unwrap();
        Config::set_json_value_by_path(&mut json, "custom.heat_secs", "60").unwrap();
        assert_eq!(
            Config::get_json_value_by_path(&json, "custom.heat_secs").unwrap(),
            &serde_json::Value::Number(60.into())
        );
    }

    #[test]
    fn set_json_value_by_path_rejects_unknown_key() {
        let mut json = serde_json::to_value(Config::default()).unwrap();
        let err = Config::set_json_value_by_path(&mut json, "selection.bowl", "x").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownKey(_)));
    }

    #[test]
    fn set_json_value_by_path_rejects_invalid_type() {
        let mut json = serde_json::to_value(Config::default()).unwrap();
        let result = Config::set_json_value_by_path(&mut json, "custom.enabled", "sometimes");
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn apply_fills_and_clears_optional_fields() {
        let mut cfg = Config::default();
        cfg.apply("catalog_path", "/tmp/catalog.toml").unwrap();
        assert_eq!(cfg.catalog_path, Some(PathBuf::from("/tmp/catalog.toml")));
        cfg.apply("catalog_path", "").unwrap();
        assert_eq!(cfg.catalog_path, None);
        cfg.apply("selection.rig", "").unwrap();
        assert_eq!(cfg.selection.rig, None);
    }

    #[test]
    fn apply_rejects_out_of_range_enabled_override() {
        let mut cfg = Config::default();
        cfg.apply("custom.heat_secs", "500").unwrap();
        let err = cfg.apply("custom.enabled", "true").unwrap_err();
        assert!(matches!(err, CoreError::InvalidCustomDuration { field: "heat", .. }));
        assert!(!cfg.custom.enabled);
    }

    #[test]
    fn apply_rejects_zero_or_inverted_bounds() {
        let mut cfg = Config::default();
        let err = cfg.apply("bounds.heat_min", "0").unwrap_err();
        assert!(matches!(err, CoreError::InvalidBounds { field: "heat", min: 0, .. }));
        let err = cfg.apply("bounds.cool_min", "500").unwrap_err();
        assert!(matches!(err, CoreError::InvalidBounds { field: "cool", min: 500, max: 120 }));
        assert_eq!(cfg.bounds, DurationBounds::default());
    }

    #[test]
    fn load_from_rejects_zero_minimum_bounds() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut content = toml::to_string_pretty(&Config::default()).unwrap();
        content = content.replace("heat_min = 5", "heat_min = 0");
        std::fs::write(&path, content).unwrap();
        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, CoreError::InvalidBounds { field: "heat", .. }));
    }

    #[test]
    fn durations_prefer_enabled_override() {
        let mut cfg = Config::default();
        let catalog = cfg.catalog().unwrap();
        assert_eq!(cfg.durations(&catalog).unwrap().source, DurationSource::Computed);

        cfg.custom = CustomDurations::new(90, 60, &cfg.bounds).unwrap();
        let durations = cfg.durations(&catalog).unwrap();
        assert_eq!((durations.heat_secs, durations.cool_secs), (90, 60));
        assert_eq!(durations.source, DurationSource::Custom);
    }

    #[test]
    fn load_from_writes_defaults_then_reads_edits() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg, Config::default());
        assert!(path.exists());

        let mut cfg = cfg;
        cfg.apply("selection.heater", "bic_lighter").unwrap();
        cfg.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap().selection.heater, "bic_lighter");
    }

    #[test]
    fn load_from_reports_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "selection = 3").unwrap();
        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, CoreError::Config(ConfigError::LoadFailed { .. })));
    }
}
