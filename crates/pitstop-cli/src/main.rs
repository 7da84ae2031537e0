//! Pitstop CLI - Financial insights from a transaction snapshot
//!
//! Usage:
//!   pitstop insights                       Ranked insights for the snapshot
//!   pitstop chat "I spent 200 on fuel"     Route a free-text utterance
//!   pitstop classify "farmers market"      Classify a description
//!   pitstop summary --json                 Budget summary as JSON

mod cli;
mod commands;


use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;
use commands::Session;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .compact()
                .with_writer(std::io::stderr),
        )
        .init();

    if cli.command == Commands::Config {
        let (config, source) = commands::load_config(cli.config.as_deref())?;
        println!("{}", commands::cmd_config(&config, &source, cli.json)?);
        return Ok(());
    }

    let session = commands::open_session(
        &cli.snapshot,
        cli.config.as_deref(),
        cli.today,
        cli.max_transactions,
    )?;

    let command = cli.command.clone();
    let json = cli.json;
    let output = commands::run_with_timeout(Duration::from_secs(cli.timeout_secs), move || {
        run_command(&session, &command, json)
    })?;

    println!("{}", output);
    Ok(())
}

/// Dispatch one snapshot command and render its output
fn run_command(session: &Session, command: &Commands, json: bool) -> Result<String> {
    match command {
        Commands::Classify {
            description,
            amount,
        } => commands::cmd_classify(session, description, *amount, json),
        Commands::Patterns => commands::cmd_patterns(session, json),
        Commands::Anomalies => commands::cmd_anomalies(session, json),
        Commands::Forecast => commands::cmd_forecast(session, json),
        Commands::Insights { with_costs } => commands::cmd_insights(session, *with_costs, json),
        Commands::Costs => commands::cmd_costs(session, json),
        Commands::Chat { utterance } => commands::cmd_chat(session, utterance, json),
        Commands::Quick { action } => commands::cmd_quick(session, action, json),
        Commands::Gamify => commands::cmd_gamify(session, json),
        Commands::Summary => commands::cmd_summary(session, json),
        Commands::Config => commands::cmd_config(&session.config, &session.source, json),
    }
}
