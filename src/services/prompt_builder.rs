//! Prompt rendering for agent invocations.
//!
//! Templates use `$NAME` placeholders. Substitution is a single left-to-right
//! pass: text inserted for one placeholder is never scanned again, so task
//! contents or history that happen to contain `$MAX_ITERATIONS` come through
//! verbatim. Unknown `$` sequences are left alone.

use crate::domain::models::signal::{TASKS_BEGIN_MARKER, TASKS_END_MARKER};
use crate::domain::models::{ConversationLog, InvocationConfig};

/// Task file path.
pub const TASKS_FILE: &str = "$TASKS_FILE";
/// Task file contents, wrapped in block markers.
pub const TASKS_CONTENT: &str = "$TASKS_CONTENT";
/// Iteration ceiling.
pub const MAX_ITERATIONS: &str = "$MAX_ITERATIONS";
/// Current iteration, starting at 1.
pub const CURRENT_ITERATION: &str = "$CURRENT_ITERATION";
/// Rendered history; empty for roles without one.
pub const CONVERSATION_HISTORY: &str = "$CONVERSATION_HISTORY";

/// Inputs for one prompt besides the template itself.
#[derive(Debug, Clone, Copy)]
pub struct PromptInputs<'a> {
    /// Settings of the frame.
    pub config: &'a InvocationConfig,
    /// Iteration that produced the response.
    pub iteration: u32,
    /// Current task-file text; empty when the file is missing.
    pub tasks_content: &'a str,
    /// History of previous iterations, for roles that keep one.
    pub history: Option<&'a ConversationLog>,
}

/// Wrap task-file contents in the begin/end markers.
pub fn tasks_block(contents: &str) -> String {
    format!(
        "{TASKS_BEGIN_MARKER}\n{}\n{TASKS_END_MARKER}",
        contents.trim_end_matches(['\n', '\r'])
    )
}

/// Render `template` for one invocation.
pub fn build_prompt(template: &str, inputs: &PromptInputs<'_>) -> String {
    let config = inputs.config;
    let values = [
        (TASKS_FILE, config.tasks_file.display().to_string()),
        (TASKS_CONTENT, tasks_block(inputs.tasks_content)),
        (MAX_ITERATIONS, config.max_iterations.to_string()),
        (CURRENT_ITERATION, inputs.iteration.to_string()),
        (
            CONVERSATION_HISTORY,
            inputs.history.map(ConversationLog::render).unwrap_or_default(),
        ),
    ];

    let mut prompt = substitute(template, &values);

    if let Some(request) = non_empty(config.prompt.as_deref()) {
        prompt.push_str("\n\n## Request\n");
        prompt.push_str(request);
    }
    if let Some(continuation) = non_empty(config.continuation.as_deref()) {
        prompt.push_str("\n\n## Continuation\n");
        prompt.push_str(continuation);
    }

    prompt
}

fn non_empty(text: Option<&str>) -> Option<&str> {
    text.map(str::trim).filter(|t| !t.is_empty())
}

fn substitute(template: &str, values: &[(&str, String)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        match values.iter().find(|(name, _)| tail.starts_with(name)) {
            Some((name, value)) => {
                out.push_str(value);
                rest = &tail[name.len()..];
            }
            None => {
                out.push('$');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::Config;
    use std::path::PathBuf;

    fn config() -> InvocationConfig {
        let mut config = InvocationConfig::from_config(&Config::default());
        config.tasks_file = PathBuf::from("TASKS.md");
        config.max_iterations = 10;
        config
    }

    #[test]
    fn test_iteration_placeholders() {
        let config = config();
        let inputs = PromptInputs {
            config: &config,
            iteration: 2,
            tasks_content: "",
            history: None,
        };
        let prompt = build_prompt(
            "Task file: $TASKS_FILE, iter $CURRENT_ITERATION/$MAX_ITERATIONS",
            &inputs,
        );
        assert_eq!(prompt, "Task file: TASKS.md, iter 2/10");
    }

    #[test]
    fn test_tasks_content_is_wrapped() {
        let config = config();
        let inputs = PromptInputs {
            config: &config,
            iteration: 1,
            tasks_content: "- [ ] A\n- [x] B\n",
            history: None,
        };
        let prompt = build_prompt("Tasks:\n$TASKS_CONTENT\nGo.", &inputs);
        assert_eq!(
            prompt,
            "Tasks:\n<<<TASKS_BEGIN>>>\n- [ ] A\n- [x] B\n<<<TASKS_END>>>\nGo."
        );
    }

    #[test]
    fn test_inserted_text_is_not_rescanned() {
        let config = config();
        let inputs = PromptInputs {
            config: &config,
            iteration: 1,
            tasks_content: "- [ ] print $MAX_ITERATIONS and $HOME",
            history: None,
        };
        let prompt = build_prompt("$TASKS_CONTENT $5", &inputs);
        assert!(prompt.contains("print $MAX_ITERATIONS and $HOME"));
        assert!(prompt.ends_with(" $5"));
    }

    #[test]
    fn test_trailing_request_and_continuation() {
        let mut config = config();
        config.prompt = Some("Build a CLI".to_string());
        config.continuation = Some("The planner finished.".to_string());
        let inputs = PromptInputs {
            config: &config,
            iteration: 3,
            tasks_content: "",
            history: None,
        };
        let prompt = build_prompt("Work.", &inputs);
        assert_eq!(
            prompt,
            "Work.\n\n## Request\nBuild a CLI\n\n## Continuation\nThe planner finished."
        );
    }

    #[test]
    fn test_history_block() {
        let config = config();
        let mut log = ConversationLog::new();
        log.append(1, "did step one");
        let inputs = PromptInputs {
            config: &config,
            iteration: 2,
            tasks_content: "",
            history: Some(&log),
        };
        let with_history = build_prompt("A\n$CONVERSATION_HISTORY\nB", &inputs);
        assert!(with_history.contains("### Iteration 1\ndid step one"));

        let without = build_prompt(
            "A\n$CONVERSATION_HISTORY\nB",
            &PromptInputs {
                history: None,
                ..inputs
            },
        );
        assert_eq!(without, "A\n\nB");
    }

    #[test]
    fn test_build_is_idempotent() {
        let mut config = config();
        config.continuation = Some("resume".to_string());
        let inputs = PromptInputs {
            config: &config,
            iteration: 4,
            tasks_content: "- [ ] A",
            history: None,
        };
        let template = "$TASKS_FILE $TASKS_CONTENT $CURRENT_ITERATION";
        assert_eq!(build_prompt(template, &inputs), build_prompt(template, &inputs));
    }
}
