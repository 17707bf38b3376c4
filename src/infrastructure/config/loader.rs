//! Layered configuration loading and validation.

use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::domain::models::config::Config;

/// Project configuration file, created by `init`
pub const PROJECT_CONFIG: &str = ".conductor/config.yaml";

/// Optional project-local overrides
pub const LOCAL_CONFIG: &str = ".conductor/local.yaml";

/// Environment variable prefix; `__` separates nested keys
pub const ENV_PREFIX: &str = "CONDUCTOR_";

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Iteration ceiling below 1.
    #[error("Invalid max_iterations: {0}. Must be at least 1")]
    InvalidMaxIterations(u32),

    /// Blank agent executable.
    #[error("agent.command cannot be empty")]
    EmptyAgentCommand,

    /// Blank task file path.
    #[error("tasks_file cannot be empty")]
    EmptyTasksFile,

    /// Zero-second timeout.
    #[error("Invalid agent.timeout_secs: {0}. Must be positive or unset")]
    InvalidTimeout(u64),

    /// Unknown log level.
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    /// Unknown log format.
    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    /// Unknown rotation policy.
    #[error("Invalid log rotation: {0}. Must be one of: daily, hourly, never")]
    InvalidLogRotation(String),
}

/// Command-line settings layered over every other source.
///
/// Unset fields leave the lower layers alone.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConfigOverrides {
    /// Iteration ceiling.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_iterations: Option<u32>,

    /// Task checklist path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tasks_file: Option<PathBuf>,

    /// Agent settings.
    #[serde(skip_serializing_if = "AgentOverrides::is_empty")]
    pub agent: AgentOverrides,
}

/// Overrides for the `agent` section.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AgentOverrides {
    /// Agent executable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,

    /// Model identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Per-process timeout in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    /// Echo agent output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub echo_output: Option<bool>,
}

impl AgentOverrides {
    /// True when no agent setting is overridden.
    pub const fn is_empty(&self) -> bool {
        self.command.is_none()
            && self.model.is_none()
            && self.timeout_secs.is_none()
            && self.echo_output.is_none()
    }
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .conductor/config.yaml (project config, created by init)
    /// 3. .conductor/local.yaml (project local overrides, optional)
    /// 4. Environment variables (CONDUCTOR_* prefix)
    /// 5. Command-line overrides
    ///
    /// An explicit `config_path` replaces both project files.
    pub fn load(config_path: Option<&Path>, overrides: &ConfigOverrides) -> Result<Config> {
        if let Some(path) = config_path.filter(|p| !p.is_file()) {
            anyhow::bail!("Config file {} does not exist", path.display());
        }

        let config: Config = Self::figment(config_path, overrides)
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    fn figment(config_path: Option<&Path>, overrides: &ConfigOverrides) -> Figment {
        let figment = Figment::new().merge(Serialized::defaults(Config::default()));

        let figment = match config_path {
            Some(path) => figment.merge(Yaml::file(path)),
            None => figment
                .merge(Yaml::file(PROJECT_CONFIG))
                .merge(Yaml::file(LOCAL_CONFIG)),
        };

        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .merge(Serialized::defaults(overrides))
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.max_iterations == 0 {
            return Err(ConfigError::InvalidMaxIterations(config.max_iterations));
        }

        if config.agent.command.trim().is_empty() {
            return Err(ConfigError::EmptyAgentCommand);
        }

        if config.tasks_file.as_os_str().is_empty() {
            return Err(ConfigError::EmptyTasksFile);
        }

        if let Some(0) = config.agent.timeout_secs {
            return Err(ConfigError::InvalidTimeout(0));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&config.logging.rotation.as_str()) {
            return Err(ConfigError::InvalidLogRotation(
                config.logging.rotation.clone(),
            ));
        }

        Ok(())
    }
}
