//! Orchestrator - the recursive role-invocation control loop.
//!
//! Each role invocation chain is a [`Frame`] holding its role, configuration
//! and iteration counter. Manager directives push a fresh frame for the target
//! role onto an explicit stack; the suspended parent resumes once the child
//! reaches a terminal state. Only the top frame ever runs, so child and parent
//! processes never overlap.
//!
//! Per frame: `invoking` (ceiling check, prompt, spawn) → `interpreting`
//! (signal classification) → `recursing` | `resuming` | `terminal`.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    AgentResult, ConversationLog, Directive, FrameReport, InvocationConfig,
    OrchestrationSession, Role, Signal, Termination,
};
use crate::domain::ports::{AgentRequest, AgentRunner, TaskStore};
use crate::services::prompt_builder::{build_prompt, PromptInputs};
use crate::services::signal_classifier::{classify, extract_tasks_block};
use crate::services::templates;

/// One role-invocation chain.
#[derive(Debug)]
struct Frame {
    session: OrchestrationSession,
    config: InvocationConfig,
    history: ConversationLog,
    results: Vec<AgentResult>,
    children: Vec<FrameReport>,
}

impl Frame {
    fn new(role: Role, config: InvocationConfig) -> Self {
        Self {
            session: OrchestrationSession::new(role, config.max_iterations),
            config,
            history: ConversationLog::new(),
            results: Vec::new(),
            children: Vec::new(),
        }
    }

    const fn role(&self) -> Role {
        self.session.role
    }

    fn into_report(self, termination: Termination) -> FrameReport {
        FrameReport {
            role: self.session.role,
            termination,
            iterations: u32::try_from(self.results.len()).unwrap_or(u32::MAX),
            results: self.results,
            children: self.children,
        }
    }
}

/// Transition chosen after interpreting one agent result.
#[derive(Debug)]
enum Step {
    /// Same role, next iteration.
    Resume,
    /// Suspend this frame and run a sub-agent.
    Descend(Box<Frame>),
    Finish(Termination),
}

/// Drives agents through the role state machine.
pub struct Orchestrator {
    runner: Arc<dyn AgentRunner>,
    store: Arc<dyn TaskStore>,
    prompts_dir: PathBuf,
}

impl Orchestrator {
    /// Engine that spawns agents through `runner` and reads templates from `prompts_dir`.
    pub fn new(
        runner: Arc<dyn AgentRunner>,
        store: Arc<dyn TaskStore>,
        prompts_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            runner,
            store,
            prompts_dir: prompts_dir.into(),
        }
    }

    /// Run `role` until it reaches a terminal state.
    ///
    /// Structural failures (agent not installed, required task file missing or
    /// unreadable, task file not writable) abort the whole run. Everything else ends in a
    /// [`Termination`] on the returned report.
    #[instrument(skip(self, config), fields(runner = self.runner.name(), max_iterations = config.max_iterations))]
    pub async fn run(&self, role: Role, config: InvocationConfig) -> DomainResult<FrameReport> {
        if role.requires_task_file() && self.store.read(&config.tasks_file).await?.is_none() {
            return Err(DomainError::TaskFileRequired(config.tasks_file));
        }

        let mut suspended: Vec<Frame> = Vec::new();
        let mut current = Frame::new(role, config);

        loop {
            match self.step(&mut current).await? {
                Step::Resume => {}
                Step::Descend(child) => {
                    info!(
                        parent = %current.role(),
                        child = %child.role(),
                        depth = suspended.len() + 1,
                        "descending into sub-agent"
                    );
                    suspended.push(std::mem::replace(&mut current, *child));
                }
                Step::Finish(termination) => {
                    info!(
                        role = %current.role(),
                        %termination,
                        invocations = current.results.len(),
                        depth = suspended.len(),
                        "frame terminated"
                    );
                    let report = current.into_report(termination);
                    match suspended.pop() {
                        Some(mut parent) => {
                            self.resume_after_child(&mut parent, report).await?;
                            current = parent;
                        }
                        None => return Ok(report),
                    }
                }
            }
        }
    }

    /// `invoking` followed by `interpreting` for the top frame.
    async fn step(&self, frame: &mut Frame) -> DomainResult<Step> {
        let role = frame.role();
        let iteration = frame.session.iteration;

        if !frame.session.within_ceiling() {
            info!(%role, iteration, ceiling = frame.session.ceiling, "iteration ceiling reached");
            return Ok(Step::Finish(Termination::IterationLimit));
        }

        let tasks = self.read_tasks(&frame.config.tasks_file).await;
        let template = templates::load(&self.prompts_dir, role).await?;
        let prompt = build_prompt(
            &template,
            &PromptInputs {
                config: &frame.config,
                iteration,
                tasks_content: &tasks,
                history: role.keeps_history().then_some(&frame.history),
            },
        );

        info!(%role, iteration, ceiling = frame.session.ceiling, "invoking agent");
        let request = AgentRequest {
            role,
            iteration,
            prompt,
            config: frame.config.clone(),
        };
        let result = self.runner.run(&request).await?;

        if role.writes_tasks() {
            self.persist_tasks(&frame.config.tasks_file, &result.output).await?;
        }
        if role.keeps_history() {
            frame.history.append(iteration, result.output.clone());
        }

        let signal = classify(role, &result.output);
        debug!(%role, iteration, ?signal, "classified agent output");

        let step = match signal {
            Signal::Completed => Step::Finish(Termination::Completed),
            Signal::IterationExhausted => Step::Finish(Termination::IterationExhausted),
            _ if result.timed_out => Step::Finish(Termination::TimedOut),
            _ if result.failure_code().is_some() => Step::Finish(Termination::AgentFailed {
                exit_code: result.failure_code().unwrap_or_default(),
            }),
            Signal::Directive(directive) => {
                frame.config.continuation = None;
                Step::Descend(Box::new(Self::child_frame(&directive, &frame.config)))
            }
            Signal::None => {
                frame.config.continuation = None;
                frame.session.advance();
                Step::Resume
            }
        };

        frame.results.push(result);
        Ok(step)
    }

    fn child_frame(directive: &Directive, parent: &InvocationConfig) -> Frame {
        info!(
            target_role = %directive.role,
            command = %directive.command,
            "manager directive"
        );
        Frame::new(directive.role, parent.derive(&directive.overrides))
    }

    /// Fold a finished sub-agent back into its parent and schedule the
    /// parent's next iteration.
    async fn resume_after_child(&self, parent: &mut Frame, child: FrameReport) -> DomainResult<()> {
        if child.role.writes_tasks() {
            if let Some(last) = child.last_result() {
                self.persist_tasks(&parent.config.tasks_file, &last.output).await?;
            }
        }

        parent.config.continuation = Some(continuation_message(&child));
        parent.session.advance();
        parent.children.push(child);
        Ok(())
    }

    /// Task-file contents; missing or unreadable files read as empty.
    async fn read_tasks(&self, path: &Path) -> String {
        match self.store.read(path).await {
            Ok(Some(contents)) => contents,
            Ok(None) => {
                warn!(path = %path.display(), "task file does not exist, using empty task list");
                String::new()
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "task file unreadable, using empty task list");
                String::new()
            }
        }
    }

    /// Replace the task file with the block in `output`, if there is one.
    async fn persist_tasks(&self, path: &Path, output: &str) -> DomainResult<bool> {
        let Some(block) = extract_tasks_block(output) else {
            return Ok(false);
        };
        self.store.write(path, block).await?;
        info!(path = %path.display(), bytes = block.len(), "task file updated from planner output");
        Ok(true)
    }
}

/// Summary of a finished sub-agent handed to the manager's next prompt.
pub fn continuation_message(child: &FrameReport) -> String {
    let exit_status = child
        .last_result()
        .map_or_else(|| "not run".to_string(), AgentResult::exit_label);
    let completed = if child.termination.is_success() { "yes" } else { "no" };

    format!(
        "The {role} agent finished after {iterations} iteration(s).\n\
         Exit status: {exit_status}\n\
         Signalled completion: {completed}\n\
         Outcome: {termination}",
        role = child.role,
        iterations = child.iterations,
        termination = child.termination,
    )
}
