//! Classification of agent output into control signals.
//!
//! This is the only place where free-text heuristics meet structured control
//! flow: completion and exhaustion markers, manager directives, and planner
//! task blocks.

use clap::Parser;
use std::time::Duration;
use tracing::warn;

use crate::domain::models::signal::{
    COMPLETION_MARKER, DIRECTIVE_MARKER, ITERATION_EXHAUSTED_MARKER, TASKS_BEGIN_MARKER,
    TASKS_END_MARKER,
};
use crate::domain::models::{Directive, InvocationOverrides, Role, Signal};

/// Markdown decoration that may surround a directive command.
const MARKDOWN_NOISE: &[char] = &['`', '*', '_', '~', '.', ',', ';', ':'];

/// Flags accepted after the target role of a directive.
#[derive(Parser, Debug)]
#[command(
    no_binary_name = true,
    disable_help_flag = true,
    disable_version_flag = true
)]
struct DirectiveArgs {
    #[arg(long, short = 'n')]
    max_iterations: Option<u32>,

    /// Seconds
    #[arg(long)]
    timeout: Option<u64>,

    #[arg(long, short)]
    model: Option<String>,

    #[arg(long, short)]
    prompt: Option<String>,

    /// Free text, used as the prompt when `--prompt` is absent.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    words: Vec<String>,
}

impl DirectiveArgs {
    fn into_overrides(self) -> InvocationOverrides {
        let prompt = self.prompt.or_else(|| {
            let joined = self.words.join(" ");
            (!joined.trim().is_empty()).then_some(joined)
        });
        InvocationOverrides {
            max_iterations: self.max_iterations,
            timeout: self.timeout.filter(|&s| s > 0).map(Duration::from_secs),
            model: self.model,
            prompt,
        }
    }
}

/// Classify one output. Priority: completion, exhaustion, then (manager only)
/// the first recognized directive.
pub fn classify(role: Role, output: &str) -> Signal {
    if output.contains(COMPLETION_MARKER) {
        return Signal::Completed;
    }
    if output.contains(ITERATION_EXHAUSTED_MARKER) {
        return Signal::IterationExhausted;
    }
    if role.can_delegate() {
        if let Some(directive) = find_directive(output) {
            return Signal::Directive(directive);
        }
    }
    Signal::None
}

/// First directive line naming a role the manager may invoke.
pub fn find_directive(output: &str) -> Option<Directive> {
    output.lines().find_map(|line| {
        let idx = line.find(DIRECTIVE_MARKER)?;
        let command = strip_markdown(&line[idx + DIRECTIVE_MARKER.len()..]);
        let directive = parse_directive(command);
        if directive.is_none() {
            warn!(command, "ignoring directive with unknown or disallowed target role");
        }
        directive
    })
}

fn strip_markdown(text: &str) -> &str {
    text.trim().trim_matches(MARKDOWN_NOISE).trim()
}

/// Parse `<role> [flags] [words]`. Returns `None` when the target is not a
/// role the manager may invoke; malformed flags fall back to no overrides.
pub fn parse_directive(command: &str) -> Option<Directive> {
    let mut tokens = split_command(command).into_iter();
    let role: Role = tokens.next()?.parse().ok()?;
    if role.can_delegate() {
        return None;
    }

    let overrides = match DirectiveArgs::try_parse_from(tokens) {
        Ok(args) => args.into_overrides(),
        Err(err) => {
            warn!(command, error = ?err.kind(), "unparseable directive arguments, inheriting parent settings");
            InvocationOverrides::default()
        }
    };

    Some(Directive {
        role,
        overrides,
        command: command.to_string(),
    })
}

/// Whitespace split with single and double quote grouping.
fn split_command(command: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut in_token = false;

    for c in command.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None if c == '"' || c == '\'' => {
                quote = Some(c);
                in_token = true;
            }
            None if c.is_whitespace() => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            None => {
                current.push(c);
                in_token = true;
            }
        }
    }
    if in_token {
        tokens.push(current);
    }
    tokens
}

/// Replacement task-file content between the block markers, trimmed.
///
/// Returns `None` when no complete block is present.
pub fn extract_tasks_block(output: &str) -> Option<&str> {
    let start = output.find(TASKS_BEGIN_MARKER)? + TASKS_BEGIN_MARKER.len();
    let len = output[start..].find(TASKS_END_MARKER)?;
    Some(output[start..start + len].trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_takes_precedence_over_directive() {
        let output = "INVOKE_AGENT: planner\nAll done. TASK_COMPLETE";
        assert_eq!(classify(Role::Manager, output), Signal::Completed);
    }

    #[test]
    fn test_exhaustion_takes_precedence_over_directive() {
        let output = "INVOKE_AGENT: coder\nMAX_ITERATIONS_REACHED";
        assert_eq!(classify(Role::Manager, output), Signal::IterationExhausted);
    }

    #[test]
    fn test_directive_only_for_manager() {
        let output = "Next step:\nINVOKE_AGENT: coder\n";
        assert!(matches!(classify(Role::Manager, output), Signal::Directive(_)));
        assert_eq!(classify(Role::Coder, output), Signal::None);
        assert_eq!(classify(Role::Planner, output), Signal::None);
    }

    #[test]
    fn test_directive_with_flags_and_markdown() {
        let output = "**INVOKE_AGENT: planner --max-iterations 3 --timeout 60 --prompt \"split the work\"**";
        let Signal::Directive(directive) = classify(Role::Manager, output) else {
            panic!("expected directive");
        };
        assert_eq!(directive.role, Role::Planner);
        assert_eq!(directive.overrides.max_iterations, Some(3));
        assert_eq!(directive.overrides.timeout, Some(Duration::from_secs(60)));
        assert_eq!(directive.overrides.prompt.as_deref(), Some("split the work"));
    }

    #[test]
    fn test_directive_free_words_become_prompt() {
        let directive = find_directive("`INVOKE_AGENT: coder implement the parser`.").unwrap();
        assert_eq!(directive.role, Role::Coder);
        assert_eq!(directive.command, "coder implement the parser");
        assert_eq!(directive.overrides.prompt.as_deref(), Some("implement the parser"));
    }

    #[test]
    fn test_only_first_directive_is_used() {
        let output = "INVOKE_AGENT: documentor\nINVOKE_AGENT: coder";
        assert_eq!(find_directive(output).unwrap().role, Role::Documentor);
    }

    #[test]
    fn test_unknown_target_is_skipped() {
        let output = "INVOKE_AGENT: reviewer\nINVOKE_AGENT: coder";
        assert_eq!(find_directive(output).unwrap().role, Role::Coder);
        assert!(find_directive("INVOKE_AGENT: manager").is_none());
        assert!(find_directive("INVOKE_AGENT:").is_none());
    }

    #[test]
    fn test_bad_flags_inherit_settings() {
        let directive = parse_directive("coder --max-iterations lots").unwrap();
        assert_eq!(directive.overrides, InvocationOverrides::default());
    }

    #[test]
    fn test_split_command_quotes() {
        assert_eq!(
            split_command(r#"coder --prompt 'fix "it"' now"#),
            vec!["coder", "--prompt", r#"fix "it""#, "now"]
        );
        assert_eq!(split_command("a  ''  b"), vec!["a", "", "b"]);
    }

    #[test]
    fn test_extract_tasks_block() {
        let output = "Plan ready.\n<<<TASKS_BEGIN>>>\n\n- [ ] A\n- [ ] B\n\n<<<TASKS_END>>>\nTASK_COMPLETE";
        assert_eq!(extract_tasks_block(output), Some("- [ ] A\n- [ ] B"));
        assert_eq!(extract_tasks_block("<<<TASKS_BEGIN>>> unterminated"), None);
        assert_eq!(extract_tasks_block("no block"), None);
    }
}
