//! Common test utilities for integration tests
//!
//! Provides shared fixtures and helpers used across multiple integration
//! test files.

use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;

use conductor::{Config, InvocationConfig};

/// Create a temporary directory for test isolation
///
/// Returns a TempDir that will be cleaned up when dropped.
pub fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Setup test logging
///
/// Initializes tracing subscriber for test output.
/// Call this at the beginning of tests that need logging.
#[allow(dead_code)]
pub fn setup_test_logging() {
    use tracing_subscriber::fmt;

    let _ = fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// Invocation config whose agent is `sh -c <script>`, with the task file in `dir`.
#[allow(dead_code)]
pub fn shell_agent(script: &str, dir: &Path) -> InvocationConfig {
    let mut config = invocation(dir, 10);
    config.agent_command = "sh".to_string();
    config.agent_args = vec!["-c".to_string(), script.to_string()];
    config
}

/// Same as [`shell_agent`] with a per-process timeout.
#[allow(dead_code)]
pub fn shell_agent_with_timeout(script: &str, dir: &Path, timeout: Duration) -> InvocationConfig {
    let mut config = shell_agent(script, dir);
    config.timeout = Some(timeout);
    config
}

/// Plain invocation config with the task file in `dir`.
#[allow(dead_code)]
pub fn invocation(dir: &Path, max_iterations: u32) -> InvocationConfig {
    let mut config = InvocationConfig::from_config(&Config::default());
    config.tasks_file = dir.join("TASKS.md");
    config.max_iterations = max_iterations;
    config.echo_output = false;
    config
}
