//! Outcome of a single agent process invocation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::event::AgentEvent;
use super::role::Role;

/// Everything captured from one agent process.
///
/// Built once by the runner and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentResult {
    /// Unique id of this invocation.
    pub invocation_id: Uuid,
    /// Role that was invoked.
    pub role: Role,
    /// Iteration of the owning frame that produced this result.
    pub iteration: u32,
    /// `None` when the process was killed and no exit status was reported.
    pub exit_code: Option<i32>,
    /// Standard output, verbatim.
    pub output: String,
    /// Events decoded from standard error, in arrival order.
    pub events: Vec<AgentEvent>,
    /// Standard error lines that were not events, unchanged.
    pub diagnostics: Vec<String>,
    /// The process was killed by the timeout.
    pub timed_out: bool,
    /// When the process was spawned.
    pub started_at: DateTime<Utc>,
    /// When capture finished.
    pub finished_at: DateTime<Utc>,
}

impl AgentResult {
    /// A result for an invocation that has not produced anything yet.
    pub fn empty(role: Role, iteration: u32) -> Self {
        let now = Utc::now();
        Self {
            invocation_id: Uuid::new_v4(),
            role,
            iteration,
            exit_code: None,
            output: String::new(),
            events: Vec::new(),
            diagnostics: Vec::new(),
            timed_out: false,
            started_at: now,
            finished_at: now,
        }
    }

    /// The process exited on its own with a non-zero status.
    pub fn failure_code(&self) -> Option<i32> {
        match self.exit_code {
            Some(code) if code != 0 && !self.timed_out => Some(code),
            _ => None,
        }
    }

    /// Human-readable exit status.
    pub fn exit_label(&self) -> String {
        if self.timed_out {
            return "timed out".to_string();
        }
        match self.exit_code {
            Some(code) => format!("exit code {code}"),
            None => "unknown exit status".to_string(),
        }
    }

    /// Wall-clock time from spawn to the last captured byte.
    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}
