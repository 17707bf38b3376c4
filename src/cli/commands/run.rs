//! Implementation of the `conductor run` command.

use anyhow::Result;
use clap::Args;
use console::style;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;

use crate::adapters::{FileTaskStore, ProcessSupervisor};
use crate::application::Orchestrator;
use crate::cli::output::{output, truncate, CommandOutput};
use crate::domain::models::outcome::EXIT_INTERRUPTED;
use crate::domain::models::{Config, FrameReport, InvocationConfig, Role, Termination};
use crate::infrastructure::config::{AgentOverrides, ConfigOverrides};

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Role to start with (manager, planner, coder, documentor)
    #[arg(default_value = "manager")]
    pub role: Role,

    /// Initial request for the agents
    pub prompt: Option<String>,

    /// Iteration ceiling for every role
    #[arg(short = 'n', long)]
    pub max_iterations: Option<u32>,

    /// Wall-clock limit per agent process, in seconds
    #[arg(short, long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Model passed to the agent as --model
    #[arg(short, long)]
    pub model: Option<String>,

    /// Task checklist file
    #[arg(long, value_name = "PATH")]
    pub tasks_file: Option<PathBuf>,

    /// Agent executable
    #[arg(long, value_name = "COMMAND")]
    pub agent_command: Option<String>,

    /// Do not echo agent output while it runs
    #[arg(short, long)]
    pub quiet: bool,
}

impl RunArgs {
    /// Settings from the command line, layered over every config source.
    ///
    /// JSON mode never echoes agent output, so stdout carries only the report.
    pub fn overrides(&self, json_mode: bool) -> ConfigOverrides {
        ConfigOverrides {
            max_iterations: self.max_iterations,
            tasks_file: self.tasks_file.clone(),
            agent: AgentOverrides {
                command: self.agent_command.clone(),
                model: self.model.clone(),
                timeout_secs: self.timeout,
                echo_output: (self.quiet || json_mode).then_some(false),
            },
        }
    }
}

/// Final report of `conductor run`.
#[derive(Debug, Serialize)]
pub struct RunOutput {
    /// Process exit code derived from the top frame.
    pub exit_code: i32,
    /// Report tree of the top-level frame.
    pub report: FrameReport,
}

impl CommandOutput for RunOutput {
    fn to_human(&self) -> String {
        let mut lines = Vec::new();
        render_frame(&self.report, 0, &mut lines);
        lines.push(String::new());
        lines.push(format!(
            "{} agent invocation(s), exit code {}",
            self.report.total_invocations(),
            self.exit_code
        ));
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

fn render_frame(frame: &FrameReport, depth: usize, lines: &mut Vec<String>) {
    let indent = "  ".repeat(depth);
    let marker = if depth == 0 { "" } else { "└ " };
    let termination = match frame.termination {
        Termination::Completed => style(frame.termination.as_str()).green().bold(),
        Termination::IterationLimit | Termination::IterationExhausted => {
            style(frame.termination.as_str()).yellow()
        }
        Termination::TimedOut | Termination::AgentFailed { .. } => {
            style(frame.termination.as_str()).red().bold()
        }
    };

    let mut line = format!(
        "{indent}{marker}{} {termination} after {} iteration(s)",
        style(frame.role).cyan(),
        frame.iterations
    );
    if let Some(last) = frame.last_result() {
        line.push_str(&format!(" ({})", last.exit_label()));
    }
    lines.push(line);

    if let Some(diagnostic) = frame.last_result().and_then(|r| r.diagnostics.last()) {
        lines.push(format!("{indent}  {}", style(truncate(diagnostic, 100)).dim()));
    }

    for child in &frame.children {
        render_frame(child, depth + 1, lines);
    }
}

/// Run the engine and print its report; returns the exit code.
pub async fn execute(args: RunArgs, config: Config, json_mode: bool) -> Result<i32> {
    let invocation = InvocationConfig::from_config(&config).with_prompt(args.prompt.clone());
    let orchestrator = Orchestrator::new(
        Arc::new(ProcessSupervisor::new()),
        Arc::new(FileTaskStore::new()),
        config.prompts_dir.clone(),
    );

    let report = tokio::select! {
        result = orchestrator.run(args.role, invocation) => result?,
        _ = tokio::signal::ctrl_c() => {
            // Dropping the run future kills the in-flight agent.
            warn!("interrupted, stopping agents");
            if !json_mode {
                eprintln!("{}", style("Interrupted").yellow().bold());
            }
            return Ok(EXIT_INTERRUPTED);
        }
    };

    let run_output = RunOutput {
        exit_code: report.termination.exit_code(),
        report,
    };
    output(&run_output, json_mode);
    Ok(run_output.exit_code)
}
