//! Configuration management for shipcheck.
//!
//! Handles loading and saving configuration from TOML files.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::git::{CommitScheduler, CommitStrategy};

/// Name of the per-project configuration file.
pub const LOCAL_CONFIG_FILE: &str = ".shipcheck.toml";

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Verification hook settings
    pub verification: VerificationConfig,

    /// Git and commit cadence settings
    pub git: GitConfig,
}

/// Verification hook settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct VerificationConfig {
    /// Timeout applied to every detected hook, in milliseconds
    pub timeout_ms: u64,

    /// Project directory to detect hooks in (defaults to the current directory)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<PathBuf>,
}

/// Git settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GitConfig {
    /// When task completion should trigger a commit
    pub commit_strategy: CommitStrategy,

    /// Project name embedded in commit messages
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,

    /// Timeout for each git invocation, in milliseconds
    pub command_timeout_ms: u64,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self { timeout_ms: crate::verification::DEFAULT_HOOK_TIMEOUT_MS, working_dir: None }
    }
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            commit_strategy: CommitStrategy::default(),
            project_name: None,
            command_timeout_ms: crate::git::DEFAULT_GIT_TIMEOUT_MS,
        }
    }
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Looks for config in:
    /// 1. `.shipcheck.toml` in current directory
    /// 2. `~/.config/shipcheck/config.toml`
    /// 3. Falls back to defaults
    pub fn load() -> anyhow::Result<Self> {
        let local_config = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        if let Some(global_config) = Self::config_dir().map(|d| d.join("config.toml")) {
            if global_config.exists() {
                return Self::load_from_file(&global_config);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Invalid config {}: {e}", path.display()))?;
        tracing::debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Save configuration to the global config file.
    pub fn save(&self) -> anyhow::Result<()> {
        let dir = Self::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        std::fs::create_dir_all(&dir)?;

        let content = toml::to_string_pretty(self)?;
        std::fs::write(dir.join("config.toml"), content)?;

        Ok(())
    }

    /// Get the config directory path.
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("shipcheck"))
    }

    /// Build a commit scheduler for the configured strategy.
    pub fn commit_scheduler(&self) -> CommitScheduler {
        CommitScheduler::new(self.git.commit_strategy)
    }
}
