//! Implementation of the `conductor tasks` command.

use anyhow::{Context, Result};
use clap::Args;
use comfy_table::{presets, Attribute, Cell, Color, ContentArrangement, Table};
use serde::Serialize;
use std::path::PathBuf;

use crate::adapters::FileTaskStore;
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::{Checklist, Config};
use crate::domain::ports::TaskStore;

#[derive(Args, Debug)]
pub struct TasksArgs {
    /// Task file to read (defaults to the configured tasks_file)
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,
}

/// Checklist summary printed by `conductor tasks`.
#[derive(Debug, Serialize)]
pub struct TasksOutput {
    /// Task file that was read.
    pub path: PathBuf,
    /// Whether the task file exists.
    pub exists: bool,
    /// Number of checked items.
    pub completed: usize,
    /// Number of items.
    pub total: usize,
    /// Parsed items.
    pub checklist: Checklist,
}

impl TasksOutput {
    /// Summarize `contents`; `None` means the file does not exist.
    pub fn new(path: PathBuf, contents: Option<&str>) -> Self {
        let checklist = contents.map(Checklist::parse).unwrap_or_default();
        Self {
            path,
            exists: contents.is_some(),
            completed: checklist.completed(),
            total: checklist.total(),
            checklist,
        }
    }
}

impl CommandOutput for TasksOutput {
    fn to_human(&self) -> String {
        if !self.exists {
            return format!("No task file at {}. Run the planner to create one.", self.path.display());
        }
        if self.checklist.items.is_empty() {
            return format!("{} has no checklist items.", self.path.display());
        }

        let mut table = Table::new();
        table
            .load_preset(presets::UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                Cell::new("Line").add_attribute(Attribute::Bold),
                Cell::new("Status").add_attribute(Attribute::Bold),
                Cell::new("Task").add_attribute(Attribute::Bold),
            ]);

        for item in &self.checklist.items {
            let status = if item.done {
                Cell::new("done").fg(Color::Green)
            } else {
                Cell::new("open").fg(Color::Yellow)
            };
            table.add_row(vec![Cell::new(item.line), status, Cell::new(&item.description)]);
        }

        format!(
            "{table}\n{}/{} completed{}",
            self.completed,
            self.total,
            if self.checklist.is_complete() { " - all done" } else { "" }
        )
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// Run `conductor tasks`.
pub async fn execute(args: TasksArgs, config: &Config, json_mode: bool) -> Result<i32> {
    let path = args.file.unwrap_or_else(|| config.tasks_file.clone());
    let contents = FileTaskStore::new()
        .read(&path)
        .await
        .with_context(|| format!("Failed to read task file {}", path.display()))?;

    output(&TasksOutput::new(path, contents.as_deref()), json_mode);
    Ok(0)
}
