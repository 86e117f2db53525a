//! WaterSave CLI - Household water usage tracker
//!
//! Usage:
//!   watersave                 Start an interactive session
//!   watersave bill 4560       Estimate a monthly bill
//!   watersave prompts list    List advice prompts
//!   watersave check           Show configuration and test the advice service

mod cli;
mod commands;


use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use watersave_core::Config;

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (warn)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();

    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;

    match cli.command.unwrap_or(Commands::Session) {
        Commands::Session => commands::cmd_session(&config).await,
        Commands::Bill { monthly_liters } => commands::cmd_bill(monthly_liters),
        Commands::Prompts { action } => match action.unwrap_or(PromptsAction::List) {
            PromptsAction::List => commands::cmd_prompts_list(),
            PromptsAction::Show { prompt_id } => commands::cmd_prompts_show(&prompt_id),
            PromptsAction::Path => commands::cmd_prompts_path(),
        },
        Commands::Check => commands::cmd_check(&config).await,
    }
}
