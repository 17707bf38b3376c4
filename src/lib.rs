//! Conductor - multi-role agent orchestrator
//!
//! Conductor drives external AI coding-agent CLIs through a small team of
//! roles (manager, planner, coder, documentor) sharing a markdown task
//! checklist. Each invocation spawns one agent process, feeds it a prompt on
//! stdin, captures its response and structured events, and decides from
//! plain-text markers whether to resume, delegate or stop.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): Roles, results, signals and the runner/store ports
//! - **Service Layer** (`services`): Prompt building, event decoding, signal classification
//! - **Application Layer** (`application`): The orchestration engine
//! - **Adapters** (`adapters`): Agent process supervisor and task-file store
//! - **Infrastructure Layer** (`infrastructure`): Configuration and logging
//! - **CLI Layer** (`cli`): Command-line interface
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use conductor::{FileTaskStore, InvocationConfig, Orchestrator, ProcessSupervisor, Role};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = conductor::ConfigLoader::load(None, &Default::default())?;
//!     let orchestrator = Orchestrator::new(
//!         Arc::new(ProcessSupervisor::new()),
//!         Arc::new(FileTaskStore::new()),
//!         config.prompts_dir.clone(),
//!     );
//!     let report = orchestrator
//!         .run(Role::Manager, InvocationConfig::from_config(&config))
//!         .await?;
//!     println!("{}", report.termination);
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use adapters::{FileTaskStore, ProcessSupervisor, ScriptedResponse, ScriptedRunner};
pub use application::Orchestrator;
pub use domain::models::{
    AgentEvent, AgentResult, Checklist, Config, FrameReport, InvocationConfig, Role, Signal,
    Termination,
};
pub use domain::ports::{AgentRequest, AgentRunner, TaskStore};
pub use domain::{DomainError, DomainResult};
pub use infrastructure::config::{ConfigError, ConfigLoader, ConfigOverrides};
