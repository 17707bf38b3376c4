//! Conductor CLI entry point.

use clap::Parser;

use conductor::cli::{self, Cli};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let json = cli.json;

    let code = match cli::execute(cli).await {
        Ok(code) => code,
        Err(err) => cli::handle_error(&err, json),
    };

    std::process::exit(code);
}
