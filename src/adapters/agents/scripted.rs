//! Scripted agent runner for testing.
//!
//! Replays canned responses per role instead of spawning processes, and
//! records every request it receives.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{AgentEvent, AgentResult, Role};
use crate::domain::ports::{AgentRequest, AgentRunner};

/// One canned invocation outcome.
#[derive(Debug, Clone)]
pub struct ScriptedResponse {
    /// Standard output to return.
    pub output: String,
    /// Exit code to report; `None` means unknown.
    pub exit_code: Option<i32>,
    /// Report the invocation as killed by the timeout.
    pub timed_out: bool,
    /// Events to report as decoded from stderr.
    pub events: Vec<AgentEvent>,
    /// Fail as if the agent executable were missing
    pub not_installed: bool,
}

impl Default for ScriptedResponse {
    fn default() -> Self {
        Self {
            output: String::new(),
            exit_code: Some(0),
            timed_out: false,
            events: Vec::new(),
            not_installed: false,
        }
    }
}

impl ScriptedResponse {
    /// Exit code 0 with `output`.
    pub fn success(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            ..Default::default()
        }
    }

    /// Exit with `code` after printing `output`.
    pub fn exit(code: i32, output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            exit_code: Some(code),
            ..Default::default()
        }
    }

    /// Killed by the timeout after printing `partial`.
    pub fn timeout(partial: impl Into<String>) -> Self {
        Self {
            output: partial.into(),
            exit_code: None,
            timed_out: true,
            ..Default::default()
        }
    }

    /// Launch failure for a missing executable.
    pub fn not_installed() -> Self {
        Self {
            not_installed: true,
            ..Default::default()
        }
    }
}

/// Agent runner that replays responses queued per role.
///
/// When a role's queue is empty the default response is returned.
pub struct ScriptedRunner {
    scripts: Arc<RwLock<HashMap<Role, VecDeque<ScriptedResponse>>>>,
    default_response: ScriptedResponse,
    requests: Arc<RwLock<Vec<AgentRequest>>>,
}

impl ScriptedRunner {
    /// Runner whose default response is a silent success.
    pub fn new() -> Self {
        Self::with_default_response(ScriptedResponse::default())
    }

    /// Runner that falls back to `response` once a queue runs dry.
    pub fn with_default_response(response: ScriptedResponse) -> Self {
        Self {
            scripts: Arc::new(RwLock::new(HashMap::new())),
            default_response: response,
            requests: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Queue responses for a role, replayed in order.
    pub async fn push(&self, role: Role, responses: impl IntoIterator<Item = ScriptedResponse>) {
        let mut scripts = self.scripts.write().await;
        scripts.entry(role).or_default().extend(responses);
    }

    /// Every request received so far, oldest first.
    pub async fn requests(&self) -> Vec<AgentRequest> {
        self.requests.read().await.clone()
    }

    /// Roles of every request received so far.
    pub async fn roles(&self) -> Vec<Role> {
        self.requests.read().await.iter().map(|r| r.role).collect()
    }

    async fn next_response(&self, role: Role) -> ScriptedResponse {
        let mut scripts = self.scripts.write().await;
        scripts
            .get_mut(&role)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| self.default_response.clone())
    }
}

impl Default for ScriptedRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AgentRunner for ScriptedRunner {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn run(&self, request: &AgentRequest) -> DomainResult<AgentResult> {
        self.requests.write().await.push(request.clone());
        let response = self.next_response(request.role).await;

        if response.not_installed {
            return Err(DomainError::AgentNotInstalled {
                command: request.config.agent_command.clone(),
            });
        }

        let now = Utc::now();
        Ok(AgentResult {
            invocation_id: Uuid::new_v4(),
            role: request.role,
            iteration: request.iteration,
            exit_code: response.exit_code,
            output: response.output,
            events: response.events,
            diagnostics: Vec::new(),
            timed_out: response.timed_out,
            started_at: now,
            finished_at: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{Config, InvocationConfig};

    fn request(role: Role) -> AgentRequest {
        AgentRequest {
            role,
            iteration: 1,
            prompt: "hello".to_string(),
            config: InvocationConfig::from_config(&Config::default()),
        }
    }

    #[tokio::test]
    async fn test_replays_in_order_then_default() {
        let runner = ScriptedRunner::new();
        runner
            .push(Role::Coder, [ScriptedResponse::success("one"), ScriptedResponse::exit(3, "two")])
            .await;

        let first = runner.run(&request(Role::Coder)).await.unwrap();
        let second = runner.run(&request(Role::Coder)).await.unwrap();
        let third = runner.run(&request(Role::Coder)).await.unwrap();

        assert_eq!(first.output, "one");
        assert_eq!(second.exit_code, Some(3));
        assert_eq!(third.output, "");
        assert_eq!(runner.requests().await.len(), 3);
    }

    #[tokio::test]
    async fn test_not_installed() {
        let runner = ScriptedRunner::with_default_response(ScriptedResponse::not_installed());
        let err = runner.run(&request(Role::Planner)).await.unwrap_err();
        assert!(matches!(err, DomainError::AgentNotInstalled { .. }));
    }
}
