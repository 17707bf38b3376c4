//! Implementation of the `conductor init` command.

use anyhow::{Context, Result};
use clap::Args;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::cli::output::{output, CommandOutput};
use crate::domain::models::Config;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Overwrite an existing configuration file
    #[arg(long, short)]
    pub force: bool,

    /// Target directory (defaults to current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,
}

/// Result of `conductor init`.
#[derive(Debug, serde::Serialize)]
pub struct InitOutput {
    /// Whether anything was written.
    pub success: bool,
    /// Summary line.
    pub message: String,
    /// Project directory.
    pub initialized_path: PathBuf,
    /// Paths created, relative to the project.
    pub files_written: Vec<String>,
}

impl CommandOutput for InitOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![self.message.clone()];
        if !self.files_written.is_empty() {
            lines.push("\nCreated:".to_string());
            for file in &self.files_written {
                lines.push(format!("  - {file}"));
            }
        }
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// Run `conductor init`.
pub async fn execute(args: InitArgs, json_mode: bool) -> Result<i32> {
    let target_path = if args.path.is_absolute() {
        args.path.clone()
    } else {
        std::env::current_dir().context("Failed to get current directory")?.join(&args.path)
    };

    let output_data = initialize(&target_path, args.force).await?;
    output(&output_data, json_mode);
    Ok(0)
}

/// Write the default configuration, prompts directory and an empty task file.
pub async fn initialize(target_path: &Path, force: bool) -> Result<InitOutput> {
    let conductor_dir = target_path.join(".conductor");
    let config_path = conductor_dir.join("config.yaml");

    if config_path.exists() && !force {
        return Ok(InitOutput {
            success: false,
            message: "Project already initialized. Use --force to overwrite the configuration."
                .to_string(),
            initialized_path: target_path.to_path_buf(),
            files_written: vec![],
        });
    }

    let defaults = Config::default();
    let relative = |p: &Path| p.strip_prefix(target_path).unwrap_or(p).to_string_lossy().to_string();
    let mut files_written = vec![];

    let prompts_dir = target_path.join(&defaults.prompts_dir);
    if !prompts_dir.exists() {
        fs::create_dir_all(&prompts_dir)
            .await
            .with_context(|| format!("Failed to create {}", prompts_dir.display()))?;
        files_written.push(format!("{}/", relative(&prompts_dir)));
    }

    fs::create_dir_all(&conductor_dir)
        .await
        .with_context(|| format!("Failed to create {}", conductor_dir.display()))?;
    let yaml = serde_yaml::to_string(&defaults).context("Failed to serialize default configuration")?;
    fs::write(&config_path, yaml)
        .await
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    files_written.push(relative(&config_path));

    let tasks_path = target_path.join(&defaults.tasks_file);
    if !tasks_path.exists() {
        fs::write(&tasks_path, "")
            .await
            .with_context(|| format!("Failed to write {}", tasks_path.display()))?;
        files_written.push(relative(&tasks_path));
    }

    Ok(InitOutput {
        success: true,
        message: if force {
            "Project reinitialized successfully.".to_string()
        } else {
            "Project initialized successfully.".to_string()
        },
        initialized_path: target_path.to_path_buf(),
        files_written,
    })
}
