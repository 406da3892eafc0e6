//! Powerdex CLI - voting power reports for weighted governance bodies.
//!
//! Reads games from a JSON document, runs the power index engine and prints
//! a table or JSON.

pub mod commands;
pub mod config;
pub mod input;
pub mod output;
pub mod telemetry;

use clap::Parser;

fn main() -> anyhow::Result<()> {
    let cli = commands::Cli::parse();

    let config = commands::load_config(cli.config.as_deref())?;
    let log_level = cli.log_level.as_deref().unwrap_or(&config.logging.level);
    telemetry::init_telemetry(log_level, cli.log_json || config.logging.is_json())?;

    if let Err(e) = commands::execute(cli.command, config) {
        output::print_error(&format!("Error: {:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
