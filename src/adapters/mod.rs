//! Adapters implementing the domain ports.

pub mod agents;
pub mod task_file;

pub use agents::{ProcessSupervisor, ScriptedResponse, ScriptedRunner};
pub use task_file::FileTaskStore;
