//! TOML-based application configuration.
//!
//! Stores:
//! - Engine windows (debt and confidence)
//! - Trend polarity for sleep quality
//! - Curve cache toggle
//! - Log level
//!
//! Configuration is stored at `~/.config/sleepwell/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;

/// Longest debt or confidence window accepted from configuration.
pub const MAX_WINDOW_DAYS: u32 = 366;
use crate::error::{ConfigError, Result};

/// Engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// User the CLI acts for when `--user` is not given
    #[serde(default = "default_user")]
    pub default_user: String,
    /// Days of entries that make up "current" debt
    #[serde(default = "default_7")]
    pub debt_window_days: u32,
    /// Days of entries needed for a fully confident curve
    #[serde(default = "default_7")]
    pub confidence_window_days: u32,
}

/// Trend configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TrendConfig {
    /// When false, rising quality is reported as worsening, matching the
    /// debt trend rule.
    #[serde(default)]
    pub quality_higher_is_better: bool,
}

/// Curve cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter used when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/sleepwell/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub trends: TrendConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_user() -> String {
    "default".into()
}
fn default_7() -> u32 {
    7
}
fn default_true() -> bool {
    true
}
fn default_log_level() -> String {
    "info".into()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_user: default_user(),
            debt_window_days: 7,
            confidence_window_days: 7,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
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
    ) -> std::result::Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        let n = value
                            .parse::<u64>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?;
                        serde_json::Value::Number(n.into())
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        return Err(invalid("cannot set a whole section".to_string()));
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

    /// Load from disk or create the default file.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, writing defaults there if the file is missing.
    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
                cfg.validate()?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
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

    /// Reject values the engine cannot work with.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.engine.default_user.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "engine.default_user".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        if !(1..=MAX_WINDOW_DAYS).contains(&self.engine.debt_window_days) {
            return Err(ConfigError::InvalidValue {
                key: "engine.debt_window_days".to_string(),
                message: format!("must be between 1 and {MAX_WINDOW_DAYS}"),
            });
        }
        if self.engine.confidence_window_days > MAX_WINDOW_DAYS {
            return Err(ConfigError::InvalidValue {
                key: "engine.confidence_window_days".to_string(),
                message: format!("must be at most {MAX_WINDOW_DAYS}"),
            });
        }
        Ok(())
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

    /// Set a value by dot-separated key without saving.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not parse
    /// as the field's type.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json)?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Flattened `key = value` pairs for display.
    pub fn entries(&self) -> Vec<(String, String)> {
        fn walk(prefix: &str, value: &serde_json::Value, out: &mut Vec<(String, String)>) {
            match value {
                serde_json::Value::Object(map) => {
                    for (k, v) in map {
                        let key = if prefix.is_empty() {
                            k.clone()
                        } else {
                            format!("{prefix}.{k}")
                        };
                        walk(&key, v, out);
                    }
                }
                serde_json::Value::String(s) => out.push((prefix.to_string(), s.clone())),
                other => out.push((prefix.to_string(), other.to_string())),
            }
        }

        let mut out = Vec::new();
        if let Ok(json) = serde_json::to_value(self) {
            walk("", &json, &mut out);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.engine.debt_window_days, 7);
        assert!(!parsed.trends.quality_higher_is_better);
        assert!(parsed.cache.enabled);
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let parsed: Config = toml::from_str("[trends]\nquality_higher_is_better = true\n").unwrap();
        assert!(parsed.trends.quality_higher_is_better);
        assert_eq!(parsed.engine.default_user, "default");
        assert_eq!(parsed.logging.level, "info");
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("cache.enabled").as_deref(), Some("true"));
        assert_eq!(cfg.get("engine.confidence_window_days").as_deref(), Some("7"));
        assert_eq!(cfg.get("logging.level").as_deref(), Some("info"));
        assert!(cfg.get("engine.missing_key").is_none());
    }

    #[test]
    fn set_updates_typed_values() {
        let mut cfg = Config::default();
        cfg.set("trends.quality_higher_is_better", "true").unwrap();
        cfg.set("engine.debt_window_days", "14").unwrap();
        cfg.set("engine.default_user", "alice").unwrap();
        assert!(cfg.trends.quality_higher_is_better);
        assert_eq!(cfg.engine.debt_window_days, 14);
        assert_eq!(cfg.engine.default_user, "alice");
    }

    #[test]
    fn set_rejects_unknown_key_and_bad_type() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set("engine.nope", "1"),
            Err(crate::CoreError::Config(ConfigError::UnknownKey(_)))
        ));
        assert!(cfg.set("cache.enabled", "not_a_bool").is_err());
        assert!(cfg.set("engine.debt_window_days", "-3").is_err());
        assert!(cfg.set("engine", "x").is_err());
    }

    #[test]
    fn set_rejects_invalid_window() {
        let mut cfg = Config::default();
        assert!(cfg.set("engine.debt_window_days", "0").is_err());
        assert!(cfg.set("engine.debt_window_days", "200000000").is_err());
        assert!(cfg.set("engine.confidence_window_days", "367").is_err());
        assert_eq!(cfg.engine.debt_window_days, 7);
        assert_eq!(cfg.engine.confidence_window_days, 7);

        cfg.set("engine.debt_window_days", "366").unwrap();
        assert_eq!(cfg.engine.debt_window_days, 366);
    }

    #[test]
    fn load_from_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(cfg.engine.confidence_window_days, 7);

        let mut cfg = cfg;
        cfg.set("logging.level", "debug").unwrap();
        cfg.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap().logging.level, "debug");
    }

    #[test]
    fn entries_lists_flattened_keys() {
        let keys: Vec<String> = Config::default().entries().into_iter().map(|(k, _)| k).collect();
        assert!(keys.contains(&"engine.default_user".to_string()));
        assert!(keys.contains(&"trends.quality_higher_is_better".to_string()));
    }
}
