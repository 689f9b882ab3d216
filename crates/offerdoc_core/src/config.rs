//! Engine configuration.
//!
//! # Responsibility
//! - Hold the tunable limits of trigger detection and menu placement.
//! - Load overrides from a JSON file, falling back to defaults.
//!
//! # Invariants
//! - Every field has a default; a partial file only overrides what it names.
//! - A config that fails validation is never returned by `from_json_str`.

use crate::menu::PlacementConfig;
use crate::model::template::normalize_language;
use crate::trigger::TriggerConfig;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

const DEFAULT_LANGUAGE: &str = "en";

/// Configuration load/validation error.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "failed to read config: {err}"),
            Self::Json(err) => write!(f, "invalid config json: {err}"),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Json(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// Tunables for the template content engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Language used for labels when the host does not pass one.
    pub default_language: String,
    pub trigger: TriggerConfig,
    pub placement: PlacementConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_language: DEFAULT_LANGUAGE.to_string(),
            trigger: TriggerConfig::default(),
            placement: PlacementConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Parses and validates a JSON config document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_json::from_str(json)?;
        config.default_language = normalize_language(&config.default_language)
            .map_err(|err| ConfigError::Invalid(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads config from `path`, or returns defaults when it is missing or
    /// unreadable.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            debug!(
                "event=config_load module=config status=default reason=missing path={}",
                path.display()
            );
            return Self::default();
        }

        match std::fs::read_to_string(path)
            .map_err(ConfigError::from)
            .and_then(|content| Self::from_json_str(&content))
        {
            Ok(config) => {
                info!(
                    "event=config_load module=config status=ok path={}",
                    path.display()
                );
                config
            }
            Err(err) => {
                warn!(
                    "event=config_load module=config status=default path={} error={}",
                    path.display(),
                    err
                );
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.trigger.window_chars == 0 {
            return Err(ConfigError::Invalid(
                "trigger.window_chars must be greater than 0".to_string(),
            ));
        }
        if self.trigger.max_query_chars >= self.trigger.window_chars {
            return Err(ConfigError::Invalid(format!(
                "trigger.max_query_chars ({}) must be smaller than trigger.window_chars ({})",
                self.trigger.max_query_chars, self.trigger.window_chars
            )));
        }
        let placement = &self.placement;
        if [placement.gap, placement.margin, placement.min_top, placement.line_height]
            .iter()
            .any(|value| !value.is_finite() || *value < 0.0)
        {
            return Err(ConfigError::Invalid(
                "placement values must be finite and non-negative".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, EngineConfig};
    use std::io::Write;

    #[test]
    fn defaults_match_trigger_limits() {
        let config = EngineConfig::default();
        assert_eq!(config.trigger.window_chars, 50);
        assert_eq!(config.trigger.max_query_chars, 30);
        assert_eq!(config.default_language, "en");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_overrides_only_named_fields() {
        let config = EngineConfig::from_json_str(
            r#"{"default_language": "DE", "trigger": {"max_query_chars": 12}}"#,
        )
        .expect("partial config should parse");
        assert_eq!(config.default_language, "de");
        assert_eq!(config.trigger.max_query_chars, 12);
        assert_eq!(config.trigger.window_chars, 50);
        assert_eq!(config.placement.gap, 4.0);
    }

    #[test]
    fn rejects_query_limit_not_below_window() {
        let err = EngineConfig::from_json_str(
            r#"{"trigger": {"window_chars": 10, "max_query_chars": 10}}"#,
        )
        .expect_err("query limit equal to window must fail");
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn load_falls_back_to_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let missing = dir.path().join("missing.json");
        assert_eq!(EngineConfig::load(&missing), EngineConfig::default());

        let broken = dir.path().join("broken.json");
        let mut file = std::fs::File::create(&broken).expect("create config file");
        file.write_all(b"{ not json").expect("write config file");
        assert_eq!(EngineConfig::load(&broken), EngineConfig::default());

        let valid = dir.path().join("valid.json");
        std::fs::write(&valid, r#"{"placement": {"margin": 12.0}}"#).expect("write config");
        assert_eq!(EngineConfig::load(&valid).placement.margin, 12.0);
    }
}
