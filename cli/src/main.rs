//! `mentor` - command-line front end for the lab mentor.
//!
//! Reads snapshots or tutoring requests as JSON (from a file or stdin) and
//! writes JSON results to stdout. Logs go to stderr.
//!
//! ```text
//! main() -> load config -> compose::mentor() -> Command -> JSON on stdout
//! ```

mod compose;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use futures_util::{StreamExt, stream};
use mentor_core::Mentor;
use mentor_types::{
    ChallengeRequest, HintRequest, InterventionResult, ReportRequest, SimulationSnapshot,
};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const DEFAULT_CONCURRENCY: usize = 8;

#[derive(Parser)]
#[command(name = "mentor")]
#[command(about = "Socratic intervention pipeline for virtual lab simulations")]
struct Cli {
    /// Config file (defaults to $LABMENTOR_CONFIG or ~/.labmentor/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Evaluate one simulation snapshot
    Evaluate {
        /// Snapshot JSON file; stdin when omitted
        file: Option<PathBuf>,
        /// Leave blank messages blank instead of substituting a template
        #[arg(long)]
        raw: bool,
    },
    /// Evaluate newline-delimited snapshots, one result per line
    Batch {
        /// NDJSON file; stdin when omitted
        file: Option<PathBuf>,
        #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
        concurrency: usize,
        #[arg(long)]
        raw: bool,
    },
    /// Answer a hint request
    Hint { file: Option<PathBuf> },
    /// Write a lab report with viva questions
    Report { file: Option<PathBuf> },
    /// Generate a lab challenge
    Challenge { file: Option<PathBuf> },
    /// Report whether text generation is configured
    Health,
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(env_filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = compose::load_config(cli.config.as_deref())?;
    let settings = config.text_gen_settings();
    let mentor = compose::mentor(&config, &settings)?;

    let output = match cli.command {
        Command::Evaluate { file, raw } => {
            let snapshot = SimulationSnapshot::parse(&read_input(file.as_deref())?)
                .context("parsing simulation snapshot")?;
            let result = evaluate(&mentor, &snapshot, raw).await;
            serde_json::to_value(result)?
        }
        Command::Batch {
            file,
            concurrency,
            raw,
        } => {
            let input = read_input(file.as_deref())?;
            let lines = batch(&mentor, &input, concurrency, raw).await;
            let mut stdout = io::stdout().lock();
            for line in lines {
                writeln!(stdout, "{line}")?;
            }
            return Ok(());
        }
        Command::Hint { file } => {
            let request: HintRequest = read_request(file.as_deref())?;
            serde_json::to_value(mentor.hint(&request).await)?
        }
        Command::Report { file } => {
            let request: ReportRequest = read_request(file.as_deref())?;
            serde_json::to_value(mentor.report(&request).await)?
        }
        Command::Challenge { file } => {
            let request: ChallengeRequest = read_request(file.as_deref())?;
            match mentor.challenge(&request).await {
                Ok(challenge) => serde_json::to_value(challenge)?,
                Err(error) => {
                    tracing::warn!(%error, "Challenge generation failed");
                    json!({ "fallback": true, "message": "Use offline challenges" })
                }
            }
        }
        Command::Health => serde_json::to_value(mentor.health(&settings.model))?,
    };

    println!("{output}");
    Ok(())
}

async fn evaluate(
    mentor: &Mentor,
    snapshot: &SimulationSnapshot,
    raw: bool,
) -> InterventionResult {
    if raw {
        mentor.evaluate(snapshot).await
    } else {
        mentor.evaluate_for_display(snapshot).await
    }
}

/// Evaluates each non-blank line concurrently; output order matches input.
async fn batch(mentor: &Mentor, input: &str, concurrency: usize, raw: bool) -> Vec<String> {
    stream::iter(input.lines().filter(|line| !line.trim().is_empty()))
        .map(|line| async move {
            let value = match SimulationSnapshot::parse(line) {
                Ok(snapshot) => {
                    serde_json::to_value(evaluate(mentor, &snapshot, raw).await).unwrap_or(Value::Null)
                }
                Err(error) => {
                    tracing::warn!(%error, "Skipping invalid snapshot line");
                    json!({ "error": error.to_string() })
                }
            };
            value.to_string()
        })
        .buffered(concurrency.max(1))
        .collect()
        .await
}

fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
        }
        None => {
            let mut input = String::new();
            io::stdin()
                .read_to_string(&mut input)
                .context("reading stdin")?;
            Ok(input)
        }
    }
}

fn read_request<T: DeserializeOwned>(file: Option<&Path>) -> Result<T> {
    let input = read_input(file)?;
    serde_json::from_str(&input).context("parsing request JSON")
}
