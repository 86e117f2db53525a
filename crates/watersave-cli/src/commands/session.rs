//! Interactive session command

use std::future::Future;
use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Parser;
use tokio::sync::mpsc;
use tracing::debug;
use watersave_core::{
    dispatch, Action, AdviceBackend, AdviceClient, Advisor, Config, Outcome, PromptLibrary,
    Session,
};

use super::render::render_outcome;
use crate::cli::SessionLine;

/// What the loop should do after a line
#[derive(Debug, PartialEq)]
pub enum LineResult {
    /// Blank line
    Skip,
    Run(Action),
    Quit,
}

/// Parse one input line into an action
///
/// Parse errors and help requests come back as clap's rendered text.
pub fn parse_line(line: &str) -> std::result::Result<LineResult, clap::Error> {
    let words: Vec<&str> = line.split_whitespace().collect();
    if words.is_empty() {
        return Ok(LineResult::Skip);
    }

    let parsed = SessionLine::try_parse_from(words)?;
    Ok(match parsed.command.into_action() {
        Some(action) => LineResult::Run(action),
        None => LineResult::Quit,
    })
}

/// How a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    Quit,
    EndOfInput,
    Interrupted,
}

/// Run the interactive session until `quit`, end of input or Ctrl-C
pub async fn cmd_session(config: &Config) -> Result<()> {
    let client = AdviceClient::from_config(config).context("Failed to create advice client")?;
    let mut advisor =
        Advisor::new(client, PromptLibrary::new()).with_summary_window(config.summary_window);
    let mut session = Session::new();

    println!("💧 WaterSave - household water tracker");
    println!("   Advice model: {}", advisor.client().model());
    println!("   Type `help` for commands, `quit` to leave.\n");

    let mut lines = spawn_stdin_reader();
    let end = run_session(&mut session, &mut advisor, &mut lines, || async {
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    })
    .await?;
    debug!(?end, "Session ended");

    println!(
        "Goodbye! {} day(s) of usage recorded this session.",
        session.usage().len()
    );
    Ok(())
}

/// Read stdin lines on a dedicated thread
///
/// A read parked on tokio's blocking pool keeps the runtime from shutting
/// down until the user presses Enter. A plain thread is abandoned at exit.
pub fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<io::Result<String>> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in io::stdin().lines() {
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

/// Drive a session from a stream of input lines
///
/// `interrupt` is raced against every read and every advice request. At the
/// prompt it ends the session; during a request it drops the request and the
/// session carries on.
pub async fn run_session<F, Fut>(
    session: &mut Session,
    advisor: &mut Advisor,
    lines: &mut mpsc::UnboundedReceiver<io::Result<String>>,
    mut interrupt: F,
) -> Result<SessionEnd>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ()>,
{
    let model = advisor.client().model().to_string();

    loop {
        print!("watersave> ");
        std::io::stdout().flush()?;

        let line = tokio::select! {
            biased;
            _ = interrupt() => {
                println!();
                return Ok(SessionEnd::Interrupted);
            }
            line = lines.recv() => line,
        };
        let Some(line) = line else {
            println!();
            return Ok(SessionEnd::EndOfInput);
        };
        let line = line.context("Failed to read input")?;

        let action = match parse_line(&line) {
            Ok(LineResult::Run(action)) => action,
            Ok(LineResult::Skip) => continue,
            Ok(LineResult::Quit) => return Ok(SessionEnd::Quit),
            Err(e) => {
                e.print().context("Failed to print help")?;
                continue;
            }
        };

        debug!(action = action.label(), "Dispatching");
        let outcome = if action.uses_advice() {
            println!("🤖 Asking {}... (Ctrl-C to cancel)", model);
            tokio::select! {
                biased;
                _ = interrupt() => None,
                outcome = dispatch(session, advisor, action) => Some(outcome),
            }
        } else {
            Some(dispatch(session, advisor, action).await)
        };

        match outcome {
            Some(outcome) => print_outcome(&outcome),
            None => println!("Cancelled."),
        }
        println!();
    }
}

fn print_outcome(outcome: &Outcome) {
    let text = render_outcome(outcome);
    if outcome.is_success() {
        println!("{}", text);
    } else {
        eprintln!("{}", text);
    }
}
