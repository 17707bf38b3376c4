//! Domain layer for the conductor orchestration engine
//!
//! Roles, configuration, agent results and events, and the ports the
//! application layer drives.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{DomainError, DomainResult};
