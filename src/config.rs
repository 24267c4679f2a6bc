//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/bstviz/bstviz.toml`
//! 3. Explicit config file passed with `--config`
//! 4. Environment variables: `BSTVIZ_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::consumers::{DEFAULT_LOG_CAPACITY, DEFAULT_VOLUME};
use crate::application::{ApplicationError, DEFAULT_PACING_MS, DEFAULT_SETTLE_MS};

/// Unified configuration for bstviz.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Pause between steps in milliseconds
    pub pacing_ms: u64,
    /// Pause after the last step before highlights are cleared
    pub settle_ms: u64,
    pub audio_enabled: bool,
    /// Cue volume, 0.0 to 1.0
    pub volume: f32,
    /// Entries kept in the step log
    pub log_capacity: usize,
    /// Random values inserted when a shell session starts
    pub seed_nodes: usize,
    /// Random values are drawn from `0..value_range`
    pub value_range: i64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            pacing_ms: DEFAULT_PACING_MS,
            settle_ms: DEFAULT_SETTLE_MS,
            audio_enabled: true,
            volume: DEFAULT_VOLUME,
            log_capacity: DEFAULT_LOG_CAPACITY,
            seed_nodes: 5,
            value_range: 100,
        }
    }
}

/// Raw settings for intermediate parsing; `None` means "not specified, inherit".
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub pacing_ms: Option<u64>,
    pub settle_ms: Option<u64>,
    pub audio_enabled: Option<bool>,
    pub volume: Option<f32>,
    pub log_capacity: Option<usize>,
    pub seed_nodes: Option<usize>,
    pub value_range: Option<i64>,
}

/// Get the XDG config directory for bstviz.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "bstviz").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("bstviz.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Overlay wins wherever it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            pacing_ms: overlay.pacing_ms.unwrap_or(self.pacing_ms),
            settle_ms: overlay.settle_ms.unwrap_or(self.settle_ms),
            audio_enabled: overlay.audio_enabled.unwrap_or(self.audio_enabled),
            volume: overlay.volume.unwrap_or(self.volume),
            log_capacity: overlay.log_capacity.unwrap_or(self.log_capacity),
            seed_nodes: overlay.seed_nodes.unwrap_or(self.seed_nodes),
            value_range: overlay.value_range.unwrap_or(self.value_range),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `explicit` - Config file given on the command line; must exist
    pub fn load(explicit: Option<&Path>) -> Result<Self, ApplicationError> {
        Self::load_from(global_config_path().as_deref(), explicit)
    }

    /// Same as [`Settings::load`] with the global config location supplied.
    ///
    /// A missing global file is skipped; a missing explicit file is an error.
    pub fn load_from(global: Option<&Path>, explicit: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global {
            if global_path.exists() {
                let raw = load_raw_settings(global_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 3. Explicit config
        if let Some(path) = explicit {
            let raw = load_raw_settings(path)?;
            current = current.merge_with(&raw);
        }

        // 4. Environment variables (explicit override)
        current = Self::apply_env_overrides(current)?;

        current.validate()?;
        Ok(current)
    }

    /// Apply BSTVIZ_* environment variables as explicit overrides.
    fn apply_env_overrides(settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("BSTVIZ")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(config_err)?;

        let raw = RawSettings {
            pacing_ms: env_value(&config, "pacing_ms")?,
            settle_ms: env_value(&config, "settle_ms")?,
            audio_enabled: env_value(&config, "audio_enabled")?,
            volume: env_value(&config, "volume")?,
            log_capacity: env_value(&config, "log_capacity")?,
            seed_nodes: env_value(&config, "seed_nodes")?,
            value_range: env_value(&config, "value_range")?,
        };
        Ok(settings.merge_with(&raw))
    }

    pub fn validate(&self) -> Result<(), ApplicationError> {
        if self.pacing_ms == 0 {
            return Err(invalid("pacing_ms must be positive"));
        }
        if !(0.0..=1.0).contains(&self.volume) {
            return Err(invalid(&format!("volume must be within 0.0..=1.0, got {}", self.volume)));
        }
        if self.log_capacity == 0 {
            return Err(invalid("log_capacity must be positive"));
        }
        if self.value_range <= 0 {
            return Err(invalid("value_range must be positive"));
        }
        Ok(())
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# bstviz configuration
#
# Locations (by precedence, lowest to highest):
#   Global:   ~/.config/bstviz/bstviz.toml
#   Explicit: bstviz --config <file>
#   Env:      BSTVIZ_* environment variables (e.g. BSTVIZ_PACING_MS=200)

# Pause between animation steps (ms)
# pacing_ms = 400

# Pause after the last step before highlights are cleared (ms)
# settle_ms = 1000

# audio_enabled = true
# volume = 0.3

# log_capacity = 20

# Random nodes inserted when the shell starts, drawn from 0..value_range
# seed_nodes = 5
# value_range = 100
"#
        .to_string()
    }
}

/// Read an optional key; a present but unparsable value is an error.
fn env_value<T: serde::de::DeserializeOwned>(config: &Config, key: &str) -> Result<Option<T>, ApplicationError> {
    match config.get::<T>(key) {
        Ok(value) => Ok(Some(value)),
        Err(ConfigError::NotFound(_)) => Ok(None),
        Err(e) => Err(config_err(e)),
    }
}

fn invalid(message: &str) -> ApplicationError {
    ApplicationError::Config {
        message: message.to_string(),
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
