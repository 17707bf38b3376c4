//! Structured events emitted by agent processes on their error stream.
//!
//! An event is kept as the raw JSON object it arrived as, so fields this crate
//! does not know about survive re-serialization unchanged. Typed accessors
//! classify the object for downstream consumers.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Kind of an event, taken from its `type` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    /// `status`
    Status,
    /// `output`
    Output,
    /// `error`
    Error,
    /// A `type` this version does not recognize.
    Other(String),
}

/// Value of the `status` field of a status event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentStatus {
    /// `starting`
    Starting,
    /// `running`
    Running,
    /// `completed`
    Completed,
    /// `error`
    Error,
    /// Any other value.
    Other(String),
}

/// One decoded protocol message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentEvent(Map<String, Value>);

impl AgentEvent {
    /// Wrap an object that is already known to carry `type` and `agent`.
    pub(crate) const fn from_object(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// The `type` field, or an empty string when it is not a string.
    pub fn type_name(&self) -> &str {
        self.str_field("type").unwrap_or_default()
    }

    /// Classified `type` field.
    pub fn kind(&self) -> EventKind {
        match self.type_name() {
            "status" => EventKind::Status,
            "output" => EventKind::Output,
            "error" => EventKind::Error,
            other => EventKind::Other(other.to_string()),
        }
    }

    /// Name of the agent that emitted the event.
    pub fn agent(&self) -> &str {
        self.str_field("agent").unwrap_or_default()
    }

    /// The `status` field; `None` when absent or not a string.
    pub fn status(&self) -> Option<AgentStatus> {
        self.str_field("status").map(|s| match s {
            "starting" => AgentStatus::Starting,
            "running" => AgentStatus::Running,
            "completed" => AgentStatus::Completed,
            "error" => AgentStatus::Error,
            other => AgentStatus::Other(other.to_string()),
        })
    }

    /// The `message` field.
    pub fn message(&self) -> Option<&str> {
        self.str_field("message")
    }

    /// The `error` field.
    pub fn error(&self) -> Option<&str> {
        self.str_field("error")
    }

    /// Look up any field, known or not.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// All fields, including unknown ones.
    pub const fn fields(&self) -> &Map<String, Value> {
        &self.0
    }
}
