//! Top-level Vigil configuration with layered resolution.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{defaults, ExpirationConfig, FactsConfig, SessionConfig, VisibilityConfig};
use crate::errors::ConfigError;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Programmatic overrides (applied via `apply_overrides`)
/// 2. Environment variables (`VIGIL_*`)
/// 3. Project config (`vigil.toml` in the project root)
/// 4. User config (`~/.vigil/config.toml`)
/// 5. Compiled defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VigilConfig {
    pub expiration: ExpirationConfig,
    pub visibility: VisibilityConfig,
    pub facts: FactsConfig,
    pub session: SessionConfig,
}

/// Overrides supplied by the embedding application.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub expiration_default_days: Option<u32>,
    pub hide_answered: Option<bool>,
    pub validate_on_load: Option<bool>,
    pub snapshot_path: Option<String>,
}

impl VigilConfig {
    /// Load configuration with layered resolution.
    pub fn load(root: &Path, overrides: Option<&ConfigOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Layer 4 (lowest priority): user config
        if let Some(user_config_path) = Self::user_config_path() {
            if user_config_path.exists() {
                match Self::merge_toml_file(&mut config, &user_config_path) {
                    Ok(()) => {}
                    Err(e @ ConfigError::ParseError { .. }) => return Err(e),
                    Err(e) => {
                        tracing::warn!(error = %e, "ignoring unreadable user config");
                    }
                }
            }
        }

        // Layer 3: project config
        let project_config_path = root.join(defaults::CONFIG_FILENAME);
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        // Layer 2: environment variables
        Self::apply_env_overrides(&mut config);

        // Layer 1 (highest priority): programmatic overrides
        if let Some(overrides) = overrides {
            Self::apply_overrides(&mut config, overrides);
        }

        Self::validate(&config)?;

        Ok(config)
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate the configuration values.
    pub fn validate(config: &VigilConfig) -> Result<(), ConfigError> {
        if let Some(days) = config.expiration.default_days {
            validate_days("expiration.default_days", days)?;
        }
        for (idx, rule) in config.expiration.rules.iter().enumerate() {
            validate_days(&format!("expiration.rules[{idx}].days"), rule.days)?;
            if rule.question_id.trim().is_empty() {
                return Err(ConfigError::ValidationFailed {
                    field: format!("expiration.rules[{idx}].question_id"),
                    message: "must not be empty".to_string(),
                });
            }
        }
        if let Some(confidence) = config.facts.answer_confidence {
            if !(0.0..=1.0).contains(&confidence) {
                return Err(ConfigError::ValidationFailed {
                    field: "facts.answer_confidence".to_string(),
                    message: "must be between 0.0 and 1.0".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Returns the user config path: `~/.vigil/config.toml`.
    fn user_config_path() -> Option<std::path::PathBuf> {
        home_dir().map(|h| h.join(defaults::USER_CONFIG_DIR).join("config.toml"))
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored (forward-compatible).
    fn merge_toml_file(config: &mut VigilConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: VigilConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`; `other` wins wherever it sets a value.
    fn merge(base: &mut VigilConfig, other: &VigilConfig) {
        // Expiration
        if other.expiration.default_days.is_some() {
            base.expiration.default_days = other.expiration.default_days;
        }
        if other.expiration.expiring_soon_days.is_some() {
            base.expiration.expiring_soon_days = other.expiration.expiring_soon_days;
        }
        if other.expiration.use_builtin_rules.is_some() {
            base.expiration.use_builtin_rules = other.expiration.use_builtin_rules;
        }
        if !other.expiration.rules.is_empty() {
            base.expiration.rules = other.expiration.rules.clone();
        }

        // Visibility
        if other.visibility.hide_answered.is_some() {
            base.visibility.hide_answered = other.visibility.hide_answered;
        }
        if other.visibility.detect_cycles.is_some() {
            base.visibility.detect_cycles = other.visibility.detect_cycles;
        }
        if !other.visibility.external_facts.is_empty() {
            base.visibility.external_facts = other.visibility.external_facts.clone();
        }

        // Facts
        if other.facts.answer_confidence.is_some() {
            base.facts.answer_confidence = other.facts.answer_confidence;
        }
        if other.facts.default_category.is_some() {
            base.facts.default_category = other.facts.default_category.clone();
        }

        // Session
        if other.session.validate_on_load.is_some() {
            base.session.validate_on_load = other.session.validate_on_load;
        }
        if other.session.snapshot_path.is_some() {
            base.session.snapshot_path = other.session.snapshot_path.clone();
        }
    }

    /// Apply environment variable overrides.
    /// Pattern: `VIGIL_EXPIRATION_DEFAULT_DAYS`, `VIGIL_VISIBILITY_HIDE_ANSWERED`, etc.
    /// Unparseable values are ignored.
    fn apply_env_overrides(config: &mut VigilConfig) {
        if let Ok(val) = std::env::var("VIGIL_EXPIRATION_DEFAULT_DAYS") {
            if let Ok(v) = val.parse::<u32>() {
                config.expiration.default_days = Some(v);
            }
        }
        if let Ok(val) = std::env::var("VIGIL_EXPIRATION_EXPIRING_SOON_DAYS") {
            if let Ok(v) = val.parse::<u32>() {
                config.expiration.expiring_soon_days = Some(v);
            }
        }
        if let Ok(val) = std::env::var("VIGIL_VISIBILITY_HIDE_ANSWERED") {
            if let Ok(v) = val.parse::<bool>() {
                config.visibility.hide_answered = Some(v);
            }
        }
        if let Ok(val) = std::env::var("VIGIL_VISIBILITY_DETECT_CYCLES") {
            if let Ok(v) = val.parse::<bool>() {
                config.visibility.detect_cycles = Some(v);
            }
        }
        if let Ok(val) = std::env::var("VIGIL_FACTS_ANSWER_CONFIDENCE") {
            if let Ok(v) = val.parse::<f64>() {
                config.facts.answer_confidence = Some(v);
            }
        }
        if let Ok(val) = std::env::var("VIGIL_SESSION_VALIDATE_ON_LOAD") {
            if let Ok(v) = val.parse::<bool>() {
                config.session.validate_on_load = Some(v);
            }
        }
        if let Ok(val) = std::env::var("VIGIL_SESSION_SNAPSHOT_PATH") {
            config.session.snapshot_path = Some(val);
        }
    }

    /// Apply programmatic overrides (highest priority).
    fn apply_overrides(config: &mut VigilConfig, overrides: &ConfigOverrides) {
        if let Some(v) = overrides.expiration_default_days {
            config.expiration.default_days = Some(v);
        }
        if let Some(v) = overrides.hide_answered {
            config.visibility.hide_answered = Some(v);
        }
        if let Some(v) = overrides.validate_on_load {
            config.session.validate_on_load = Some(v);
        }
        if let Some(ref v) = overrides.snapshot_path {
            config.session.snapshot_path = Some(v.clone());
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

/// Expiration windows must be at least one day and at most
/// [`defaults::MAX_EXPIRATION_DAYS`].
fn validate_days(field: &str, days: u32) -> Result<(), ConfigError> {
    if days == 0 {
        return Err(ConfigError::ValidationFailed {
            field: field.to_string(),
            message: "must be greater than 0".to_string(),
        });
    }
    if days > defaults::MAX_EXPIRATION_DAYS {
        return Err(ConfigError::ValidationFailed {
            field: field.to_string(),
            message: format!("must be at most {}", defaults::MAX_EXPIRATION_DAYS),
        });
    }
    Ok(())
}

/// Cross-platform home directory resolution.
fn home_dir() -> Option<std::path::PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(std::path::PathBuf::from)
}
