//! Command-line interface.

pub mod commands;
pub mod output;
pub mod types;

pub use types::{Cli, Commands};

use anyhow::Result;
use console::style;

use crate::domain::errors::{DomainError, EXIT_FAILURE};
use crate::domain::models::{Config, LoggingConfig};
use crate::infrastructure::config::{ConfigLoader, ConfigOverrides};
use crate::infrastructure::logging::{LogConfig, LoggerImpl};

/// Load configuration, install logging and run the selected command.
///
/// Returns the process exit code.
pub async fn execute(cli: Cli) -> Result<i32> {
    let json = cli.json;
    match cli.command {
        Commands::Init(args) => {
            let _logger = init_logging(&LoggingConfig::default())?;
            commands::init::execute(args, json).await
        }
        Commands::Tasks(args) => {
            let config = ConfigLoader::load(cli.config.as_deref(), &ConfigOverrides::default())?;
            let _logger = init_logging(&config.logging)?;
            commands::tasks::execute(args, &config, json).await
        }
        Commands::Run(args) => {
            let config: Config = ConfigLoader::load(cli.config.as_deref(), &args.overrides(json))?;
            let _logger = init_logging(&config.logging)?;
            commands::run::execute(args, config, json).await
        }
    }
}

fn init_logging(logging: &LoggingConfig) -> Result<LoggerImpl> {
    LoggerImpl::init(&LogConfig::try_from(logging)?)
}

/// Exit code for a failed command.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<DomainError>())
        .map_or(EXIT_FAILURE, DomainError::exit_code)
}

/// Report a failed command and return its exit code.
pub fn handle_error(err: &anyhow::Error, json_mode: bool) -> i32 {
    if json_mode {
        let causes: Vec<String> = err.chain().skip(1).map(ToString::to_string).collect();
        let body = serde_json::json!({ "error": err.to_string(), "causes": causes });
        println!("{}", serde_json::to_string_pretty(&body).unwrap_or_default());
    } else {
        eprintln!("{} {err:#}", style("Error:").red().bold());
    }
    exit_code_for(err)
}
