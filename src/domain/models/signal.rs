//! Control signals recognized in agent output.

use super::config::InvocationOverrides;
use super::role::Role;

/// Literal an agent prints when its work is done.
pub const COMPLETION_MARKER: &str = "TASK_COMPLETE";

/// Literal an agent prints when it has given up for lack of iterations.
pub const ITERATION_EXHAUSTED_MARKER: &str = "MAX_ITERATIONS_REACHED";

/// Prefix of a manager directive line.
pub const DIRECTIVE_MARKER: &str = "INVOKE_AGENT:";

/// Delimiters of a task-file block, both in prompts and in planner output.
pub const TASKS_BEGIN_MARKER: &str = "<<<TASKS_BEGIN>>>";
/// Closes a task block.
pub const TASKS_END_MARKER: &str = "<<<TASKS_END>>>";

/// A manager's request to run another role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    /// Sub-agent role.
    pub role: Role,
    /// Settings parsed from the directive flags.
    pub overrides: InvocationOverrides,
    /// Command text after the marker, with markdown noise stripped.
    pub command: String,
}

/// Classification of one agent output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signal {
    /// The completion marker.
    Completed,
    /// The agent's own iteration-exhaustion marker.
    IterationExhausted,
    /// A manager's sub-agent directive.
    Directive(Directive),
    /// Nothing recognized.
    None,
}
