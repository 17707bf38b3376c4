//! Configuration models.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure for conductor
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Agent process settings
    #[serde(default)]
    pub agent: AgentConfig,

    /// Shared task checklist
    #[serde(default = "default_tasks_file")]
    pub tasks_file: PathBuf,

    /// Iteration ceiling for every role frame
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,

    /// Directory holding `<role>.md` template overrides
    #[serde(default = "default_prompts_dir")]
    pub prompts_dir: PathBuf,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_tasks_file() -> PathBuf {
    PathBuf::from("TASKS.md")
}

const fn default_max_iterations() -> u32 {
    10
}

fn default_prompts_dir() -> PathBuf {
    PathBuf::from(".conductor/prompts")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            agent: AgentConfig::default(),
            tasks_file: default_tasks_file(),
            max_iterations: default_max_iterations(),
            prompts_dir: default_prompts_dir(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Agent process configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct AgentConfig {
    /// Executable to spawn for every invocation
    #[serde(default = "default_agent_command")]
    pub command: String,

    /// Arguments passed before the model flag
    #[serde(default = "default_agent_args")]
    pub args: Vec<String>,

    /// Model identifier, passed as `--model <model>`
    #[serde(default)]
    pub model: Option<String>,

    /// Wall-clock limit per agent process
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Echo agent output to the console while it runs
    #[serde(default = "default_true")]
    pub echo_output: bool,
}

fn default_agent_command() -> String {
    "claude".to_string()
}

fn default_agent_args() -> Vec<String> {
    vec!["--print".to_string()]
}

const fn default_true() -> bool {
    true
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            command: default_agent_command(),
            args: default_agent_args(),
            model: None,
            timeout_secs: None,
            echo_output: true,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for JSON log files (console only when unset)
    #[serde(default)]
    pub log_dir: Option<PathBuf>,

    /// Log file rotation: daily, hourly, never
    #[serde(default = "default_rotation")]
    pub rotation: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_rotation() -> String {
    "daily".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
            rotation: default_rotation(),
        }
    }
}

/// Resolved settings for one orchestration frame.
///
/// Built once per top-level run from [`Config`]; every recursion receives a
/// copy with its own overrides applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationConfig {
    /// Agent executable.
    pub agent_command: String,
    /// Arguments passed before `--model`.
    pub agent_args: Vec<String>,
    /// Model passed to the agent as `--model`.
    pub model: Option<String>,
    /// Shared task checklist.
    pub tasks_file: PathBuf,
    /// Iteration ceiling for this frame.
    pub max_iterations: u32,
    /// Wall-clock limit per agent process.
    pub timeout: Option<Duration>,
    /// Free-text request appended to the first prompt of the frame and every
    /// prompt after it.
    pub prompt: Option<String>,
    /// Text appended to the next prompt only.
    pub continuation: Option<String>,
    /// Echo agent output to the terminal while it runs.
    pub echo_output: bool,
}

impl InvocationConfig {
    /// Settings for a top-level run.
    pub fn from_config(config: &Config) -> Self {
        Self {
            agent_command: config.agent.command.clone(),
            agent_args: config.agent.args.clone(),
            model: config.agent.model.clone(),
            tasks_file: config.tasks_file.clone(),
            max_iterations: config.max_iterations,
            timeout: config.agent.timeout_secs.map(Duration::from_secs),
            prompt: None,
            continuation: None,
            echo_output: config.agent.echo_output,
        }
    }

    /// Set the request text.
    #[must_use]
    pub fn with_prompt(mut self, prompt: Option<String>) -> Self {
        self.prompt = prompt;
        self
    }

    /// Copy for a sub-agent frame: inherits everything except the
    /// continuation, then applies the directive's overrides.
    #[must_use]
    pub fn derive(&self, overrides: &InvocationOverrides) -> Self {
        let mut derived = self.clone();
        derived.continuation = None;
        if let Some(max) = overrides.max_iterations {
            derived.max_iterations = max;
        }
        if let Some(timeout) = overrides.timeout {
            derived.timeout = Some(timeout);
        }
        if let Some(ref model) = overrides.model {
            derived.model = Some(model.clone());
        }
        if let Some(ref prompt) = overrides.prompt {
            derived.prompt = Some(prompt.clone());
        }
        derived
    }
}

/// Settings a manager directive may override for its sub-agent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvocationOverrides {
    /// Iteration ceiling.
    pub max_iterations: Option<u32>,
    /// Wall-clock limit per agent process.
    pub timeout: Option<Duration>,
    /// Model passed to the agent as `--model`.
    pub model: Option<String>,
    /// Request text for the sub-agent.
    pub prompt: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config() {
        let mut config = Config::default();
        config.agent.timeout_secs = Some(30);
        config.agent.model = Some("opus".to_string());

        let invocation = InvocationConfig::from_config(&config);
        assert_eq!(invocation.agent_command, "claude");
        assert_eq!(invocation.tasks_file, PathBuf::from("TASKS.md"));
        assert_eq!(invocation.max_iterations, 10);
        assert_eq!(invocation.timeout, Some(Duration::from_secs(30)));
        assert_eq!(invocation.model.as_deref(), Some("opus"));
        assert!(invocation.continuation.is_none());
    }

    #[test]
    fn test_derive_applies_overrides_only() {
        let mut parent = InvocationConfig::from_config(&Config::default())
            .with_prompt(Some("build it".to_string()));
        parent.continuation = Some("previous sub-agent finished".to_string());

        let child = parent.derive(&InvocationOverrides {
            max_iterations: Some(3),
            prompt: Some("plan it".to_string()),
            ..Default::default()
        });

        assert_eq!(child.max_iterations, 3);
        assert_eq!(child.prompt.as_deref(), Some("plan it"));
        assert_eq!(child.agent_command, parent.agent_command);
        assert_eq!(child.timeout, parent.timeout);
        assert!(child.continuation.is_none());
    }

    #[test]
    fn test_derive_without_overrides_inherits_prompt() {
        let parent = InvocationConfig::from_config(&Config::default())
            .with_prompt(Some("build it".to_string()));
        let child = parent.derive(&InvocationOverrides::default());
        assert_eq!(child.prompt.as_deref(), Some("build it"));
        assert_eq!(child.max_iterations, parent.max_iterations);
    }
}
