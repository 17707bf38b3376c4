//! Instructional templates for each role.
//!
//! Built-in templates are compiled in; a `<role>.md` file in the prompts
//! directory replaces the built-in one for that role.

use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::Role;

const MANAGER: &str = "\
You are the manager of a small team of agents working through the task file $TASKS_FILE.
You cannot edit files yourself. You delegate by printing exactly one line of the form

INVOKE_AGENT: <planner|coder|documentor> [--max-iterations N] [--prompt \"instructions\"]

and then stopping. You will be resumed with a summary of what the agent did.
Start with the planner when the task file is empty, then the coder until every item is
checked, then the documentor. When the project is finished print TASK_COMPLETE.
If you cannot finish within your budget print MAX_ITERATIONS_REACHED.

This is iteration $CURRENT_ITERATION of $MAX_ITERATIONS.

Current task file:
$TASKS_CONTENT
";

const PLANNER: &str = "\
You are the planner. Break the request into a markdown checklist of small, independently
verifiable items using `- [ ]` lines. Print the complete new contents of $TASKS_FILE between
a line containing <<<TASKS_BEGIN>>> and a line containing <<<TASKS_END>>>. The block replaces
the whole file, so keep items that are already checked.
When the checklist is ready print TASK_COMPLETE.

This is iteration $CURRENT_ITERATION of $MAX_ITERATIONS.

Current task file:
$TASKS_CONTENT

$CONVERSATION_HISTORY
";

const CODER: &str = "\
You are the coder. Pick the first unchecked item in $TASKS_FILE, implement it, verify it,
and mark it `- [x]` in the file. Work on one item per iteration.
When every item is checked print TASK_COMPLETE. If you are on iteration $MAX_ITERATIONS and
work remains, print MAX_ITERATIONS_REACHED.

This is iteration $CURRENT_ITERATION of $MAX_ITERATIONS.

Current task file:
$TASKS_CONTENT

$CONVERSATION_HISTORY
";

const DOCUMENTOR: &str = "\
You are the documentor. Read the completed items in $TASKS_FILE and the code they touched,
then write or update the project documentation to match. Do not change code.
When the documentation is complete print TASK_COMPLETE.

This is iteration $CURRENT_ITERATION of $MAX_ITERATIONS.

Current task file:
$TASKS_CONTENT

$CONVERSATION_HISTORY
";

/// Built-in template for `role`.
pub const fn builtin(role: Role) -> &'static str {
    match role {
        Role::Manager => MANAGER,
        Role::Planner => PLANNER,
        Role::Coder => CODER,
        Role::Documentor => DOCUMENTOR,
    }
}

/// Where a project override for `role` lives.
pub fn override_path(prompts_dir: &Path, role: Role) -> PathBuf {
    prompts_dir.join(format!("{role}.md"))
}

/// Template for `role`, preferring an override file when one exists.
pub async fn load(prompts_dir: &Path, role: Role) -> DomainResult<String> {
    let path = override_path(prompts_dir, role);
    match fs::read_to_string(&path).await {
        Ok(template) => {
            debug!(role = %role, path = %path.display(), "using template override");
            Ok(template)
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(builtin(role).to_string()),
        Err(source) => Err(DomainError::TemplateLoad { path, source }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::signal::{
        COMPLETION_MARKER, DIRECTIVE_MARKER, TASKS_BEGIN_MARKER, TASKS_END_MARKER,
    };

    #[test]
    fn test_builtin_templates_mention_markers() {
        for role in Role::ALL {
            let template = builtin(role);
            assert!(template.contains(COMPLETION_MARKER), "{role}");
            assert!(template.contains("$CURRENT_ITERATION"), "{role}");
            assert!(template.contains("$TASKS_CONTENT"), "{role}");
        }
        assert!(builtin(Role::Manager).contains(DIRECTIVE_MARKER));
        assert!(!builtin(Role::Manager).contains("$CONVERSATION_HISTORY"));
        assert!(builtin(Role::Planner).contains(TASKS_BEGIN_MARKER));
        assert!(builtin(Role::Planner).contains(TASKS_END_MARKER));
    }

    #[tokio::test]
    async fn test_override_file_wins() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("coder.md"), "custom $TASKS_FILE").unwrap();

        assert_eq!(load(dir.path(), Role::Coder).await.unwrap(), "custom $TASKS_FILE");
        assert_eq!(load(dir.path(), Role::Planner).await.unwrap(), builtin(Role::Planner));
    }

    #[tokio::test]
    async fn test_missing_dir_falls_back() {
        let template = load(Path::new("/nonexistent/prompts"), Role::Documentor)
            .await
            .unwrap();
        assert_eq!(template, DOCUMENTOR);
    }
}
