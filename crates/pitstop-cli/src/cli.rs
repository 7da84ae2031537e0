//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

/// Pitstop - Financial insights from your transaction history
#[derive(Parser)]
#[command(name = "pitstop")]
#[command(about = "Personal finance insight and classification engine", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Snapshot file (JSON with transactions, categories, budget, goals)
    #[arg(long, default_value = "snapshot.json", global = true)]
    pub snapshot: PathBuf,

    /// Engine config file (defaults to the override location, then built-ins)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Reference date for the analysis (YYYY-MM-DD, defaults to today)
    #[arg(long, global = true)]
    pub today: Option<NaiveDate>,

    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Abort the analysis after this many seconds
    #[arg(long, default_value = "10", global = true)]
    pub timeout_secs: u64,

    /// Only analyse the most recent N transactions
    #[arg(long, global = true)]
    pub max_transactions: Option<usize>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Clone, Debug, PartialEq)]
pub enum Commands {
    /// Classify a transaction description into a category
    Classify {
        /// Free-text description
        description: String,

        /// Transaction amount (used by the history match)
        #[arg(short, long, default_value = "0")]
        amount: f64,
    },

    /// Show per-category spending patterns
    Patterns,

    /// List unusually large expenses
    Anomalies,

    /// Project this month's cash flow and check for lifestyle creep
    Forecast,

    /// Show ranked financial insights
    Insights {
        /// Merge in cost-reduction candidates
        #[arg(long)]
        with_costs: bool,
    },

    /// Show categories taking a large share of spending
    Costs,

    /// Ask a question or log a transaction in plain language
    Chat {
        /// What to say, e.g. "I spent 200 on fuel"
        #[arg(required = true, num_args = 1..)]
        utterance: Vec<String>,
    },

    /// Run a canned follow-up (quick-balance, budget-status, daily-summary,
    /// budget-tips, goal-tips)
    Quick {
        /// Action id
        action: String,
    },

    /// Show points, badges, challenges and tips
    Gamify,

    /// Show the budget summary for the current month
    Summary,

    /// Show where the engine config comes from and its thresholds
    Config,
}
