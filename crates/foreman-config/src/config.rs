//! Configuration types and loading for foreman.
//!
//! The main entry point is [`ForemanConfig`], which represents the
//! contents of `.foreman/config.yaml`. Configuration is loaded with
//! [`load_config`] and saved with [`save_config`].

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// The configuration file contained invalid YAML.
    #[error("failed to parse config file: {0}")]
    ParseError(#[from] serde_yaml::Error),

    /// The `.foreman/` directory was not found.
    #[error("no .foreman directory found (run 'foreman init' first)")]
    ForemanDirNotFound,
}

/// A specialized `Result` type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// Git-related configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitConfig {
    /// The git binary to run (a name on `PATH` or an absolute path).
    #[serde(default = "default_git_binary")]
    pub binary: String,

    /// Kill git commands still running after this many seconds.
    #[serde(default, rename = "timeout-secs")]
    pub timeout_secs: Option<u64>,
}

impl GitConfig {
    /// The configured timeout as a [`Duration`], if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            binary: default_git_binary(),
            timeout_secs: None,
        }
    }
}

fn default_git_binary() -> String {
    "git".to_string()
}

// ---------------------------------------------------------------------------
// Main config struct
// ---------------------------------------------------------------------------

/// The full foreman configuration, corresponding to `.foreman/config.yaml`.
///
/// All fields use `serde` defaults so that a partially-specified YAML file
/// will be deserialized correctly with sensible default values.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ForemanConfig {
    /// Output JSON instead of human-readable text.
    #[serde(default)]
    pub json: bool,

    /// Render repository commands instead of running them.
    #[serde(default, rename = "dry-run")]
    pub dry_run: bool,

    /// Database path override.
    #[serde(default)]
    pub db: Option<String>,

    /// Actor identity override.
    #[serde(default)]
    pub actor: Option<String>,

    /// Git-related configuration.
    #[serde(default)]
    pub git: GitConfig,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Load configuration from `config.yaml` inside the given `.foreman/` directory.
///
/// If the file does not exist, a default [`ForemanConfig`] is returned.
///
/// # Errors
///
/// Returns [`ConfigError::ReadError`] if the file exists but cannot be read,
/// or [`ConfigError::ParseError`] if it contains invalid YAML.
pub fn load_config(foreman_dir: &Path) -> Result<ForemanConfig> {
    let config_path = foreman_dir.join("config.yaml");

    if !config_path.exists() {
        return Ok(ForemanConfig::default());
    }

    let content = std::fs::read_to_string(&config_path)?;

    // An empty file is valid and yields default config.
    if content.trim().is_empty() {
        return Ok(ForemanConfig::default());
    }

    let config: ForemanConfig = serde_yaml::from_str(&content)?;
    Ok(config)
}

/// Save configuration to `config.yaml` inside the given `.foreman/` directory.
///
/// The directory is created if it does not exist.
///
/// # Errors
///
/// Returns [`ConfigError::ReadError`] on I/O failure or [`ConfigError::ParseError`]
/// if serialization fails.
pub fn save_config(foreman_dir: &Path, config: &ForemanConfig) -> Result<()> {
    std::fs::create_dir_all(foreman_dir)?;

    let config_path = foreman_dir.join("config.yaml");
    let yaml = serde_yaml::to_string(config)?;
    std::fs::write(config_path, yaml)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
