//! Agent CLI process runner.
//!
//! Spawns one agent process per invocation, writes the prompt to its stdin,
//! and drains stdout (the response) and stderr (the event stream)
//! concurrently. An optional timeout kills the whole process group and returns
//! whatever was captured so far.

use async_trait::async_trait;
use chrono::Utc;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::{Child, ChildStdin, Command};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{AgentEvent, AgentResult};
use crate::domain::ports::{AgentRequest, AgentRunner};
use crate::services::event_decoder::{classify_line, LineAssembler, StreamLine};

/// How long to wait for an exit status after killing a timed-out agent.
pub const DEFAULT_KILL_WAIT: Duration = Duration::from_secs(2);

const READ_CHUNK: usize = 8 * 1024;

/// Collects the decoded error stream of one process.
#[derive(Debug)]
struct ErrorStream {
    assembler: LineAssembler,
    events: Vec<AgentEvent>,
    diagnostics: Vec<String>,
}

impl ErrorStream {
    const fn new() -> Self {
        Self {
            assembler: LineAssembler::new(),
            events: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Feed a chunk; returns the passthrough lines it completed.
    fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.assembler
            .push(chunk)
            .into_iter()
            .filter_map(|line| self.accept(line))
            .collect()
    }

    /// Flush the trailing partial line through the decoder.
    fn finish(&mut self) -> Option<String> {
        let line = self.assembler.finish()?;
        self.accept(line)
    }

    fn accept(&mut self, line: String) -> Option<String> {
        match classify_line(line) {
            StreamLine::Event(event) => {
                info!(
                    agent = event.agent(),
                    kind = event.type_name(),
                    status = event.get("status").and_then(|v| v.as_str()),
                    message = event.message().or_else(|| event.error()),
                    "agent event"
                );
                self.events.push(event);
                None
            }
            StreamLine::Passthrough(line) => {
                self.diagnostics.push(line.clone());
                Some(line)
            }
        }
    }
}

/// Kills the agent's process group when a run is abandoned mid-flight.
///
/// `kill_on_drop` only reaches the group leader; anything the agent spawned
/// shares its group and goes down with it here.
#[derive(Debug)]
struct GroupGuard {
    pgid: Option<i32>,
    armed: bool,
}

impl GroupGuard {
    fn new(child: &Child) -> Self {
        Self {
            pgid: child.id().and_then(|pid| i32::try_from(pid).ok()),
            armed: true,
        }
    }

    /// Signal the whole group now.
    fn kill(&mut self) {
        if let Some(pgid) = self.pgid {
            kill_group(pgid);
        }
        self.armed = false;
    }

    /// The agent exited on its own; leave the group alone.
    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for GroupGuard {
    fn drop(&mut self) {
        if self.armed {
            debug!(pgid = ?self.pgid, "agent run abandoned, killing process group");
            self.kill();
        }
    }
}

#[cfg(unix)]
fn kill_group(pgid: i32) {
    if let Err(err) = nix::sys::signal::killpg(
        nix::unistd::Pid::from_raw(pgid),
        nix::sys::signal::Signal::SIGKILL,
    ) {
        debug!(pgid, error = %err, "failed to signal agent process group");
    }
}

#[cfg(not(unix))]
const fn kill_group(_pgid: i32) {}

/// Runs agents as local child processes.
#[derive(Debug, Clone)]
pub struct ProcessSupervisor {
    kill_wait: Duration,
}

impl ProcessSupervisor {
    /// Supervisor with the default post-kill reap wait.
    pub const fn new() -> Self {
        Self {
            kill_wait: DEFAULT_KILL_WAIT,
        }
    }

    /// How long to wait for an exit status after killing a timed-out agent.
    #[must_use]
    pub const fn with_kill_wait(mut self, kill_wait: Duration) -> Self {
        self.kill_wait = kill_wait;
        self
    }

    /// Build the agent command with appropriate arguments
    fn build_command(request: &AgentRequest) -> Command {
        let config = &request.config;
        let mut cmd = Command::new(&config.agent_command);
        cmd.args(&config.agent_args);

        if let Some(ref model) = config.model {
            cmd.arg("--model").arg(model);
        }

        cmd.env("CONDUCTOR_ROLE", request.role.as_str())
            .env("CONDUCTOR_ITERATION", request.iteration.to_string())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        // Own process group, so a timeout also reaches anything the agent spawned.
        #[cfg(unix)]
        cmd.process_group(0);

        cmd
    }

    /// Kill a timed-out agent and wait briefly for its exit status.
    async fn terminate(&self, child: &mut Child, group: &mut GroupGuard) -> Option<i32> {
        group.kill();

        if let Err(err) = child.start_kill() {
            debug!(error = %err, "agent process already gone");
        }

        match tokio::time::timeout(self.kill_wait, child.wait()).await {
            Ok(Ok(status)) => status.code(),
            Ok(Err(err)) => {
                warn!(error = %err, "failed to reap killed agent process");
                None
            }
            Err(_) => {
                warn!(wait = ?self.kill_wait, "killed agent process did not report an exit status");
                None
            }
        }
    }
}

impl Default for ProcessSupervisor {
    fn default() -> Self {
        Self::new()
    }
}

fn spawn_error(command: &str, source: std::io::Error) -> DomainError {
    if source.kind() == std::io::ErrorKind::NotFound {
        DomainError::AgentNotInstalled {
            command: command.to_string(),
        }
    } else {
        DomainError::SpawnFailed {
            command: command.to_string(),
            source,
        }
    }
}

fn missing_pipe(name: &str) -> DomainError {
    DomainError::Io(std::io::Error::other(format!(
        "failed to capture agent {name}"
    )))
}

/// Write the prompt and close stdin to signal end of input.
async fn feed_prompt(mut stdin: ChildStdin, prompt: &str) {
    if let Err(err) = stdin.write_all(prompt.as_bytes()).await {
        debug!(error = %err, "agent closed stdin before reading the whole prompt");
        return;
    }
    if let Err(err) = stdin.shutdown().await {
        debug!(error = %err, "failed to close agent stdin");
    }
}

async fn drain_stdout<R: AsyncRead + Unpin>(mut stdout: R, buffer: &mut Vec<u8>, echo: bool) {
    let mut console = tokio::io::stdout();
    let mut chunk = vec![0u8; READ_CHUNK];
    loop {
        match stdout.read(&mut chunk).await {
            Ok(0) => break,
            Ok(n) => {
                buffer.extend_from_slice(&chunk[..n]);
                if echo {
                    let _ = console.write_all(&chunk[..n]).await;
                    let _ = console.flush().await;
                }
            }
            Err(err) => {
                warn!(error = %err, "failed to read agent stdout");
                break;
            }
        }
    }
}

async fn drain_stderr<R: AsyncRead + Unpin>(mut stderr: R, stream: &mut ErrorStream, echo: bool) {
    let mut console = tokio::io::stderr();
    let mut chunk = vec![0u8; READ_CHUNK];
    loop {
        match stderr.read(&mut chunk).await {
            Ok(0) => break,
            Ok(n) => {
                let passthrough = stream.push(&chunk[..n]);
                if echo {
                    for line in passthrough {
                        let _ = console.write_all(format!("{line}\n").as_bytes()).await;
                    }
                }
            }
            Err(err) => {
                warn!(error = %err, "failed to read agent stderr");
                break;
            }
        }
    }
}

#[async_trait]
impl AgentRunner for ProcessSupervisor {
    fn name(&self) -> &'static str {
        "process"
    }

    #[instrument(skip(self, request), fields(role = %request.role, iteration = request.iteration, command = %request.config.agent_command))]
    async fn run(&self, request: &AgentRequest) -> DomainResult<AgentResult> {
        let started_at = Utc::now();
        let config = &request.config;

        let mut child = Self::build_command(request)
            .spawn()
            .map_err(|e| spawn_error(&config.agent_command, e))?;
        let mut group = GroupGuard::new(&child);
        info!(pid = child.id(), "agent process started");

        let stdin = child.stdin.take().ok_or_else(|| missing_pipe("stdin"))?;
        let stdout = child.stdout.take().ok_or_else(|| missing_pipe("stdout"))?;
        let stderr = child.stderr.take().ok_or_else(|| missing_pipe("stderr"))?;

        let echo = config.echo_output;
        let mut output = Vec::new();
        let mut errors = ErrorStream::new();

        // The buffers live outside the raced future so a timeout keeps what was read.
        let finished = {
            let io = async {
                tokio::join!(
                    feed_prompt(stdin, &request.prompt),
                    drain_stdout(stdout, &mut output, echo),
                    drain_stderr(stderr, &mut errors, echo),
                );
                child.wait().await
            };
            match config.timeout {
                Some(limit) => tokio::time::timeout(limit, io).await.ok(),
                None => Some(io.await),
            }
        };

        let (exit_code, timed_out) = match finished {
            Some(Ok(status)) => {
                group.disarm();
                (status.code(), false)
            }
            Some(Err(err)) => {
                warn!(error = %err, "failed to wait for agent process");
                (None, false)
            }
            None => {
                warn!(timeout = ?config.timeout, "agent process timed out, killing it");
                (self.terminate(&mut child, &mut group).await, true)
            }
        };

        if let Some(line) = errors.finish() {
            if echo {
                eprintln!("{line}");
            }
        }

        let result = AgentResult {
            invocation_id: Uuid::new_v4(),
            role: request.role,
            iteration: request.iteration,
            exit_code,
            output: String::from_utf8_lossy(&output).into_owned(),
            events: errors.events,
            diagnostics: errors.diagnostics,
            timed_out,
            started_at,
            finished_at: Utc::now(),
        };

        info!(
            exit_code = ?result.exit_code,
            timed_out = result.timed_out,
            events = result.events.len(),
            output_bytes = result.output.len(),
            duration_ms = result.duration().num_milliseconds(),
            "agent process finished"
        );

        Ok(result)
    }
}
