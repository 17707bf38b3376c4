//! Agent runner adapter implementations.

pub mod process;
pub mod scripted;

pub use process::ProcessSupervisor;
pub use scripted::{ScriptedResponse, ScriptedRunner};
