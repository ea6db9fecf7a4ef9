//! Configuration management for Parley.
//!
//! Handles loading configuration from TOML files and environment variables.
//! Command-line flags are applied on top by the binary.

use crate::commands::{DispatchSettings, FaultPolicy, NameMatching};
use crate::error::{ParleyError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure for Parley.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Dispatcher behaviour.
    #[serde(default)]
    pub dispatch: DispatchConfig,

    /// Interactive session settings.
    #[serde(default)]
    pub session: SessionConfig,
}

/// Dispatcher behaviour.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct DispatchConfig {
    /// Log full error detail when an interaction or hardened command fails.
    #[serde(default)]
    pub verbose_errors: bool,

    /// Whether overload faults propagate to the host or are logged and skipped.
    #[serde(default)]
    pub fault_policy: FaultPolicy,

    /// How command names are compared.
    #[serde(default)]
    pub name_matching: NameMatching,
}

impl DispatchConfig {
    /// Converts to dispatcher settings.
    pub fn settings(&self) -> DispatchSettings {
        DispatchSettings {
            fault_policy: self.fault_policy,
            verbose_errors: self.verbose_errors,
        }
    }
}

/// Interactive session settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionConfig {
    /// Prompt printed before each line in interactive mode.
    #[serde(default = "default_prompt")]
    pub prompt: String,

    /// User name reported by the console terminal.
    #[serde(default)]
    pub user: Option<String>,
}

fn default_prompt() -> String {
    "> ".to_string()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            prompt: default_prompt(),
            user: None,
        }
    }
}

impl SessionConfig {
    /// The configured user, falling back to `$USER` and then `"user"`.
    pub fn resolved_user(&self) -> String {
        self.user
            .clone()
            .or_else(|| std::env::var("USER").ok())
            .unwrap_or_else(|| "user".to_string())
    }
}

impl Config {
    /// Returns the default config file path for the current platform.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("parley")
            .join("config.toml")
    }

    /// Loads configuration from a TOML file.
    ///
    /// A missing file yields the defaults.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| ParleyError::config(format!("Failed to read config file: {e}")))?;

        Self::parse_toml(&content, path)
    }

    /// Parses configuration from a TOML string.
    fn parse_toml(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            ParleyError::config(format!(
                "Configuration error in {}:\n  {}",
                path.display(),
                e
            ))
        })
    }

    /// Applies `PARLEY_VERBOSE` and `PARLEY_FAULT_POLICY` over the file values.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(
            std::env::var("PARLEY_VERBOSE").ok().as_deref(),
            std::env::var("PARLEY_FAULT_POLICY").ok().as_deref(),
        )
    }

    fn apply_overrides(&mut self, verbose: Option<&str>, fault_policy: Option<&str>) -> Result<()> {
        if let Some(verbose) = verbose {
            self.dispatch.verbose_errors = matches!(
                verbose.to_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            );
        }
        if let Some(policy) = fault_policy {
            self.dispatch.fault_policy = policy.parse()?;
        }
        Ok(())
    }
}
