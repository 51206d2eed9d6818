//! Runtime settings.
//!
//! Loaded in layers, later ones winning:
//!
//! 1. built-in defaults,
//! 2. a TOML file (`tierboard.toml` in the working directory when present,
//!    or an explicit path that must exist),
//! 3. `TIERBOARD_*` environment variables, with `__` between nested keys
//!    (`TIERBOARD_BUDGET__WARNING_THRESHOLD=0.8`).

use std::path::Path;

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::budget::ReconcileConfig;
use crate::leaderboard::TieBreak;

/// File looked up in the working directory when no path is given.
pub const DEFAULT_SETTINGS_FILE: &str = "tierboard.toml";

const ENV_PREFIX: &str = "TIERBOARD";

/// Errors from loading settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid settings: {0}")]
    Invalid(String),

    #[error("Serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Leaderboard options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeaderboardSettings {
    /// Ordering among creators with equal total views
    pub tie_break: TieBreak,
}

/// All runtime settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Currency label used in reports
    pub currency: String,
    pub leaderboard: LeaderboardSettings,
    pub budget: ReconcileConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            currency: "THB".to_string(),
            leaderboard: LeaderboardSettings::default(),
            budget: ReconcileConfig::default(),
        }
    }
}

impl Settings {
    /// Load settings from defaults, a TOML file and the environment.
    ///
    /// With `path` the file must exist; without it `tierboard.toml` is read
    /// only if present.
    pub fn load(path: Option<&Path>) -> Result<Self, SettingsError> {
        let file = match path {
            Some(path) => File::from(path).format(FileFormat::Toml).required(true),
            None => File::with_name(DEFAULT_SETTINGS_FILE)
                .format(FileFormat::Toml)
                .required(false),
        };

        let settings: Self = Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        debug!(?settings, "Settings loaded");
        Ok(settings)
    }

    /// Check threshold ordering and ranges.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let budget = &self.budget;
        for (name, value) in [
            ("warning_threshold", budget.warning_threshold),
            ("critical_threshold", budget.critical_threshold),
            ("platform_fee_rate", budget.platform_fee_rate),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(SettingsError::Invalid(format!(
                    "budget.{} must be between 0 and 1, got {}",
                    name, value
                )));
            }
        }
        if budget.warning_threshold > budget.critical_threshold {
            return Err(SettingsError::Invalid(
                "budget.warning_threshold must not exceed budget.critical_threshold".to_string(),
            ));
        }
        if self.currency.trim().is_empty() {
            return Err(SettingsError::Invalid("currency must not be empty".to_string()));
        }
        Ok(())
    }

    /// Render as TOML, suitable for a settings file.
    pub fn to_toml_string(&self) -> Result<String, SettingsError> {
        Ok(toml::to_string_pretty(self)?)
    }
}
