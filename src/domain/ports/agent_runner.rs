//! Agent runner port - interface for executing one agent invocation.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::{AgentResult, InvocationConfig, Role};

/// Everything a runner needs to execute one agent process.
#[derive(Debug, Clone)]
pub struct AgentRequest {
    /// Role to invoke.
    pub role: Role,
    /// Iteration of the requesting frame, starting at 1.
    pub iteration: u32,
    /// Fully built prompt, delivered on the agent's input channel.
    pub prompt: String,
    /// Settings of the requesting frame.
    pub config: InvocationConfig,
}

/// Executes a single agent invocation to completion.
///
/// Implementations must return `Err` only for structural failures such as a
/// missing executable. Timeouts, non-zero exits and malformed events are
/// reported inside the [`AgentResult`].
#[async_trait]
pub trait AgentRunner: Send + Sync {
    /// Runner name, for logs.
    fn name(&self) -> &'static str;

    async fn run(&self, request: &AgentRequest) -> DomainResult<AgentResult>;
}
