//! Domain models.

pub mod checklist;
pub mod config;
pub mod event;
pub mod outcome;
pub mod result;
pub mod role;
pub mod session;
pub mod signal;

pub use checklist::{Checklist, ChecklistItem};
pub use config::{AgentConfig, Config, InvocationConfig, InvocationOverrides, LoggingConfig};
pub use event::{AgentEvent, AgentStatus, EventKind};
pub use outcome::{FrameReport, Termination};
pub use result::AgentResult;
pub use role::Role;
pub use session::{ConversationLog, HistoryEntry, OrchestrationSession};
pub use signal::{Directive, Signal};
