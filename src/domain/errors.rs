//! Domain errors for the conductor orchestration engine.

use std::path::PathBuf;
use thiserror::Error;

/// Exit code reported when the agent executable cannot be found.
pub const EXIT_AGENT_NOT_INSTALLED: i32 = 127;

/// Exit code for any other structural failure.
pub const EXIT_FAILURE: i32 = 1;

/// Structural errors that abort a run.
///
/// Malformed agent events are recovered locally and never surface here.
#[derive(Debug, Error)]
pub enum DomainError {
    /// The agent executable does not exist.
    #[error(
        "Agent command `{command}` was not found. Install the agent CLI or point `agent.command` at it."
    )]
    AgentNotInstalled { command: String },

    /// The agent executable exists but could not be started.
    #[error("Failed to spawn agent command `{command}`: {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// A role that needs a checklist was started without one.
    #[error("Task file {} is required for this role but does not exist", .0.display())]
    TaskFileRequired(PathBuf),

    /// The task file exists but could not be read.
    #[error("Failed to read task file {}: {source}", path.display())]
    TaskFileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The task file could not be replaced.
    #[error("Failed to write task file {}: {source}", path.display())]
    TaskFileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A template override exists but could not be read.
    #[error("Failed to load prompt template {}: {source}", path.display())]
    TemplateLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Unknown role name.
    #[error("Invalid role: {0}. Must be one of: manager, planner, coder, documentor")]
    InvalidRole(String),

    /// Any other I/O failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DomainError {
    /// Process exit code for this error.
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::AgentNotInstalled { .. } => EXIT_AGENT_NOT_INSTALLED,
            _ => EXIT_FAILURE,
        }
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
