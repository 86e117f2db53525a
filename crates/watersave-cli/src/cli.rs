//! CLI argument definitions using clap
//!
//! This module contains the clap structs for the process arguments and for
//! the lines typed at the interactive session prompt. The command
//! implementations are in the `commands` module.

use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use watersave_core::{Action, Behavior};

/// WaterSave - Track household water use and find ways to save
#[derive(Parser)]
#[command(name = "watersave")]
#[command(about = "Household water usage tracker with AI savings advice", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file (defaults to <config dir>/watersave/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive session (default)
    Session,

    /// Estimate a monthly water bill
    Bill {
        /// Monthly usage in liters
        monthly_liters: f64,
    },

    /// Manage AI prompts (list, show, override path)
    Prompts {
        #[command(subcommand)]
        action: Option<PromptsAction>,
    },

    /// Show the resolved configuration and check the advice service
    Check,
}

#[derive(Subcommand)]
pub enum PromptsAction {
    /// List all available prompts and their override status
    List,

    /// Show the content of a specific prompt
    Show {
        /// Prompt ID (e.g., ask_assistant, analyze_pattern)
        prompt_id: String,
    },

    /// Show the path where prompt overrides should be placed
    Path,
}

/// One line typed at the session prompt
///
/// The first word names the command, so `help` and `<command> --help` work
/// the same way they do on the command line.
#[derive(Parser, Debug)]
#[command(multicall = true)]
pub struct SessionLine {
    #[command(subcommand)]
    pub command: SessionCommand,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum SessionCommand {
    /// Record the water used on a day
    Usage {
        /// Date (YYYY-MM-DD, today or yesterday)
        #[arg(value_parser = parse_date)]
        date: NaiveDate,

        /// Liters used that day
        #[arg(allow_negative_numbers = true)]
        liters: f64,
    },

    /// Chart recorded usage by date
    Chart,

    /// Record shower time and laundry loads for a day
    Behavior {
        /// Date (YYYY-MM-DD, today or yesterday)
        #[arg(value_parser = parse_date)]
        date: NaiveDate,

        /// Total shower minutes
        shower_minutes: u32,

        /// Laundry loads run
        laundry_loads: u32,
    },

    /// Show the suggested daily goal, or set one
    Goal {
        /// Daily goal in liters
        #[arg(allow_negative_numbers = true)]
        liters: Option<f64>,
    },

    /// Estimate the monthly bill (projects from your average if omitted)
    Bill {
        /// Monthly usage in liters
        #[arg(allow_negative_numbers = true)]
        monthly_liters: Option<f64>,
    },

    /// Ask the assistant a question about saving water
    Ask {
        /// Your question
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        question: Vec<String>,
    },

    /// Analyze your usage pattern
    Analyze,

    /// Get a personalized water-saving challenge
    Challenge,

    /// Leave the session
    #[command(alias = "exit")]
    Quit,
}

impl SessionCommand {
    /// The dashboard action for this command, `None` for `quit`
    pub fn into_action(self) -> Option<Action> {
        let action = match self {
            SessionCommand::Usage { date, liters } => Action::RecordUsage { date, liters },
            SessionCommand::Chart => Action::VisualizeUsage,
            SessionCommand::Behavior {
                date,
                shower_minutes,
                laundry_loads,
            } => Action::RecordBehavior {
                date,
                behavior: Behavior {
                    shower_minutes,
                    laundry_loads,
                },
            },
            SessionCommand::Goal { liters } => Action::SetGoal { liters },
            SessionCommand::Bill { monthly_liters } => Action::EstimateBill { monthly_liters },
            SessionCommand::Ask { question } => Action::AskAssistant {
                question: question.join(" "),
            },
            SessionCommand::Analyze => Action::AnalyzePattern,
            SessionCommand::Challenge => Action::GenerateChallenge,
            SessionCommand::Quit => return None,
        };
        Some(action)
    }
}

/// Parse a session date argument
pub fn parse_date(input: &str) -> Result<NaiveDate, String> {
    let today = Local::now().date_naive();
    match input.to_ascii_lowercase().as_str() {
        "today" => Ok(today),
        "yesterday" => today
            .pred_opt()
            .ok_or_else(|| "date out of range".to_string()),
        other => NaiveDate::parse_from_str(other, "%Y-%m-%d").map_err(|_| {
            format!(
                "invalid date '{}', expected YYYY-MM-DD, today or yesterday",
                input
            )
        }),
    }
}
