//! Application layer - orchestration of role invocations.

pub mod orchestrator;

pub use orchestrator::{continuation_message, Orchestrator};
