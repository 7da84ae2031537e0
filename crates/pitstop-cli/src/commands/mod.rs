//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `analysis` - Classifier, patterns, anomalies, forecast, insights, costs
//! - `chat` - Free-text chat and quick actions
//! - `reports` - Budget summary and gamification
//! - `session` - Session loading, the bounded runner and `config`
//!
//! Every command renders to a `String` (text or JSON) so `main` only prints.

pub mod analysis;
pub mod chat;
pub mod reports;
pub mod session;

// Re-export command functions for main.rs
pub use analysis::*;
pub use chat::*;
pub use reports::*;
pub use session::*;

pub use pitstop_core::summary::money;

use anyhow::{Context, Result};
use serde::Serialize;

/// Pretty JSON for `--json` output
pub fn render_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to serialize output")
}

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
