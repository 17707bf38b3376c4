//! Port trait definitions (Hexagonal Architecture)
//!
//! This module defines async trait interfaces that adapters must implement:
//! - AgentRunner: executes one agent process invocation
//! - TaskStore: reads and replaces the shared task file
//!
//! These traits keep the orchestration engine independent of real processes
//! and the filesystem.

pub mod agent_runner;
pub mod task_store;

pub use agent_runner::{AgentRequest, AgentRunner};
pub use task_store::TaskStore;
