//! Per-frame recursion state and conversation history.

use serde::Serialize;

use super::role::Role;

/// Iteration bookkeeping for one role-invocation chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrchestrationSession {
    /// Role of the frame.
    pub role: Role,
    /// 1-based; strictly increases within the frame.
    pub iteration: u32,
    /// Last iteration allowed to spawn.
    pub ceiling: u32,
}

impl OrchestrationSession {
    /// Start a fresh chain at iteration 1.
    pub const fn new(role: Role, ceiling: u32) -> Self {
        Self {
            role,
            iteration: 1,
            ceiling,
        }
    }

    /// Another invocation is allowed at the current iteration.
    pub const fn within_ceiling(&self) -> bool {
        self.iteration <= self.ceiling
    }

    /// Move to the next iteration.
    pub fn advance(&mut self) {
        self.iteration += 1;
    }
}

/// One past exchange recorded for history-keeping roles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    /// Iteration that produced the response.
    pub iteration: u32,
    /// Agent output, verbatim.
    pub response: String,
}

/// Append-only log of a frame's previous agent responses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConversationLog {
    entries: Vec<HistoryEntry>,
}

impl ConversationLog {
    /// Empty log.
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Record the response of `iteration`.
    pub fn append(&mut self, iteration: u32, response: impl Into<String>) {
        self.entries.push(HistoryEntry {
            iteration,
            response: response.into(),
        });
    }

    /// Entries, oldest first.
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// True when nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render the log as a prompt block; empty when there is no history.
    pub fn render(&self) -> String {
        if self.is_empty() {
            return String::new();
        }
        let mut block = String::from("## Conversation history\n");
        for entry in &self.entries {
            block.push_str(&format!(
                "\n### Iteration {}\n{}\n",
                entry.iteration,
                entry.response.trim_end()
            ));
        }
        block
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ceiling_checks() {
        let mut session = OrchestrationSession::new(Role::Coder, 2);
        assert_eq!(session.iteration, 1);
        assert!(session.within_ceiling());
        session.advance();
        assert!(session.within_ceiling());
        session.advance();
        assert!(!session.within_ceiling());
    }

    #[test]
    fn test_zero_ceiling_never_runs() {
        let session = OrchestrationSession::new(Role::Planner, 0);
        assert!(!session.within_ceiling());
    }

    #[test]
    fn test_history_render() {
        let mut log = ConversationLog::new();
        assert_eq!(log.render(), "");

        log.append(1, "wrote the parser\n");
        log.append(2, "added tests");
        let rendered = log.render();
        assert!(rendered.starts_with("## Conversation history\n"));
        assert!(rendered.contains("### Iteration 1\nwrote the parser\n"));
        assert!(rendered.contains("### Iteration 2\nadded tests\n"));
        assert_eq!(log.entries().len(), 2);
    }
}
