//! Configuration system for pngcloak.
//!
//! Resolution order: environment variables → config file → defaults.
//!
//! Config file location:
//!   1. $PNGCLOAK_CONFIG (explicit override)
//!   2. $XDG_CONFIG_HOME/pngcloak/config.toml
//!   3. ~/.config/pngcloak/config.toml

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloakConfig {
    pub decode: DecodeSettings,
    pub output: OutputSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeSettings {
    /// What the CLI does when the input holds no recoverable payload.
    pub on_failure: FailurePolicy,
}

/// Outcome of an undecodable input at the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Write a zero-length output file and succeed.
    #[default]
    Empty,
    /// Write nothing and exit with an error.
    Error,
}

impl FromStr for FailurePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "empty" => Ok(Self::Empty),
            "error" => Ok(Self::Error),
            other => Err(ConfigError::InvalidValue {
                key: "decode.on_failure",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Replace an existing output file. When false the CLI refuses.
    pub overwrite: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// tracing filter directive used when RUST_LOG is unset.
    pub filter: String,
}

// ── Defaults ─────────────────────────────────────────────────────────────────

impl Default for OutputSettings {
    fn default() -> Self {
        Self { overwrite: true }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: "warn".to_string(),
        }
    }
}

// ── Path helpers ─────────────────────────────────────────────────────────────

fn config_dir() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| dirs_or_home().join(".config"))
        .join("pngcloak")
}

fn dirs_or_home() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/tmp"))
}

// ── Errors ───────────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {0}: {1}")]
    ReadFailed(PathBuf, std::io::Error),
    #[error("failed to parse {0}: {1}")]
    ParseFailed(PathBuf, toml::de::Error),
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

// ── Loading ──────────────────────────────────────────────────────────────────

impl CloakConfig {
    /// Load config: env vars → file → defaults.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::file_path())
    }

    /// Load from an explicit path. A missing file yields defaults; env
    /// overrides still apply.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            let text = std::fs::read_to_string(path)
                .map_err(|e| ConfigError::ReadFailed(path.to_path_buf(), e))?;
            Self::parse(&text).map_err(|e| ConfigError::ParseFailed(path.to_path_buf(), e))?
        } else {
            CloakConfig::default()
        };
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Parse TOML text without touching the environment.
    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Config file path.
    pub fn file_path() -> PathBuf {
        std::env::var("PNGCLOAK_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| config_dir().join("config.toml"))
    }

    /// Apply PNGCLOAK_* env var overrides.
    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(v) = lookup("PNGCLOAK_DECODE__ON_FAILURE") {
            self.decode.on_failure = v.parse()?;
        }
        if let Some(v) = lookup("PNGCLOAK_OUTPUT__OVERWRITE") {
            self.output.overwrite = v == "true" || v == "1";
        }
        if let Some(v) = lookup("PNGCLOAK_LOGGING__FILTER") {
            self.logging.filter = v;
        }
        Ok(())
    }
}
