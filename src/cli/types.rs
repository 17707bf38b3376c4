//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::commands::{init::InitArgs, run::RunArgs, tasks::TasksArgs};

/// Command-line interface.
#[derive(Parser, Debug)]
#[command(name = "conductor")]
#[command(about = "Conductor - multi-role agent orchestrator", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file, replacing .conductor/config.yaml and .conductor/local.yaml
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a role until it completes or exhausts its iterations
    Run(RunArgs),

    /// Show the task checklist
    Tasks(TasksArgs),

    /// Initialize conductor configuration in a project
    Init(InitArgs),
}
