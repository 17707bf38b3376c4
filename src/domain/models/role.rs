//! Agent roles.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::errors::DomainError;

/// One of the four fixed agent identities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Orchestrates the other roles through directives.
    Manager,
    /// Writes and maintains the task checklist.
    Planner,
    /// Implements checklist items.
    Coder,
    /// Documents the finished work.
    Documentor,
}

impl Role {
    /// All roles in workflow order.
    pub const ALL: [Self; 4] = [Self::Manager, Self::Planner, Self::Coder, Self::Documentor];

    /// Lowercase name, as used in directives and template file names.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Manager => "manager",
            Self::Planner => "planner",
            Self::Coder => "coder",
            Self::Documentor => "documentor",
        }
    }

    /// Only the manager may spawn sub-agents.
    pub const fn can_delegate(self) -> bool {
        matches!(self, Self::Manager)
    }

    /// Every role except the manager keeps a conversation history across iterations.
    pub const fn keeps_history(self) -> bool {
        !self.can_delegate()
    }

    /// The planner's output may replace the task file.
    pub const fn writes_tasks(self) -> bool {
        matches!(self, Self::Planner)
    }

    /// Roles that work from an existing checklist and cannot start without one.
    pub const fn requires_task_file(self) -> bool {
        matches!(self, Self::Coder | Self::Documentor)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "manager" => Ok(Self::Manager),
            "planner" => Ok(Self::Planner),
            "coder" => Ok(Self::Coder),
            "documentor" => Ok(Self::Documentor),
            _ => Err(DomainError::InvalidRole(s.to_string())),
        }
    }
}
