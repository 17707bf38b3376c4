//! Terminal states of an orchestration frame.

use serde::Serialize;
use std::fmt;

use super::result::AgentResult;
use super::role::Role;

/// Exit code for a successful run.
pub const EXIT_SUCCESS: i32 = 0;
/// Exit code when a frame ran out of iterations.
pub const EXIT_ITERATION_LIMIT: i32 = 2;
/// Exit code when an agent process was killed by the timeout.
pub const EXIT_TIMEOUT: i32 = 124;
/// Exit code when the run was interrupted (SIGINT = 128 + 2).
pub const EXIT_INTERRUPTED: i32 = 130;

/// Why a frame stopped invoking its agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Termination {
    /// The agent emitted the completion marker.
    Completed,
    /// The iteration counter passed the ceiling before spawning.
    IterationLimit,
    /// The agent itself emitted the iteration-exhaustion marker.
    IterationExhausted,
    /// The agent process was killed by the timeout.
    TimedOut,
    /// The agent process exited non-zero without any marker.
    AgentFailed { exit_code: i32 },
}

impl Termination {
    /// Process exit code for a run ending this way.
    pub const fn exit_code(self) -> i32 {
        match self {
            Self::Completed => EXIT_SUCCESS,
            Self::IterationLimit | Self::IterationExhausted => EXIT_ITERATION_LIMIT,
            Self::TimedOut => EXIT_TIMEOUT,
            Self::AgentFailed { exit_code } => exit_code,
        }
    }

    /// Whether the agent signalled completion.
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Completed)
    }

    /// Stable snake_case name, as serialized.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::IterationLimit => "iteration_limit",
            Self::IterationExhausted => "iteration_exhausted",
            Self::TimedOut => "timed_out",
            Self::AgentFailed { .. } => "agent_failed",
        }
    }
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AgentFailed { exit_code } => write!(f, "agent failed (exit code {exit_code})"),
            other => f.write_str(&other.as_str().replace('_', " ")),
        }
    }
}

/// What a terminated frame hands back to its caller.
#[derive(Debug, Clone, Serialize)]
pub struct FrameReport {
    /// Role of the frame.
    pub role: Role,
    /// Why the frame stopped.
    pub termination: Termination,
    /// Number of agent processes this frame spawned itself.
    pub iterations: u32,
    /// Results of this frame's own invocations, oldest first.
    pub results: Vec<AgentResult>,
    /// Reports of sub-agent frames, in the order they ran.
    pub children: Vec<FrameReport>,
}

impl FrameReport {
    /// Result of the most recent invocation.
    pub fn last_result(&self) -> Option<&AgentResult> {
        self.results.last()
    }

    /// Total processes spawned by this frame and all its descendants.
    pub fn total_invocations(&self) -> usize {
        self.results.len()
            + self
                .children
                .iter()
                .map(Self::total_invocations)
                .sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_are_distinct() {
        assert_eq!(Termination::Completed.exit_code(), 0);
        assert_eq!(Termination::IterationLimit.exit_code(), 2);
        assert_eq!(Termination::IterationExhausted.exit_code(), 2);
        assert_eq!(Termination::TimedOut.exit_code(), 124);
        assert_eq!(Termination::AgentFailed { exit_code: 7 }.exit_code(), 7);
    }

    #[test]
    fn test_display() {
        assert_eq!(Termination::IterationExhausted.to_string(), "iteration exhausted");
        assert_eq!(
            Termination::AgentFailed { exit_code: 3 }.to_string(),
            "agent failed (exit code 3)"
        );
    }

    #[test]
    fn test_total_invocations_counts_children() {
        let child = FrameReport {
            role: Role::Planner,
            termination: Termination::Completed,
            iterations: 2,
            results: vec![AgentResult::empty(Role::Planner, 1), AgentResult::empty(Role::Planner, 2)],
            children: vec![],
        };
        let parent = FrameReport {
            role: Role::Manager,
            termination: Termination::Completed,
            iterations: 1,
            results: vec![AgentResult::empty(Role::Manager, 1)],
            children: vec![child],
        };
        assert_eq!(parent.total_invocations(), 3);
        assert_eq!(parent.last_result().map(|r| r.role), Some(Role::Manager));
    }
}
