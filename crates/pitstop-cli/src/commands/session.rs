//! Shared command plumbing
//!
//! This module contains:
//! - `load_config` - Resolve the engine config and remember where it came from
//! - `open_session` - Load the snapshot, config and reference time
//! - `run_bounded` - Run analysis on a blocking task under a timeout
//! - `run_with_timeout` - `run_bounded` on its own runtime, abandoning overruns
//! - `cmd_config` - Print the effective config

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate, NaiveDateTime};
use pitstop_core::config::default_config_path;
use pitstop_core::{AnalysisContext, EngineConfig, Snapshot};
use serde::Serialize;

/// Where the effective engine config was read from
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "path", rename_all = "snake_case")]
pub enum ConfigSource {
    Explicit(PathBuf),
    Override(PathBuf),
    Embedded,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::Explicit(p) => write!(f, "{} (--config)", p.display()),
            ConfigSource::Override(p) => write!(f, "{} (override)", p.display()),
            ConfigSource::Embedded => write!(f, "built-in defaults"),
        }
    }
}

/// Everything a command needs to run the engine
pub struct Session {
    pub snapshot: Snapshot,
    pub config: EngineConfig,
    pub source: ConfigSource,
    pub now: NaiveDateTime,
}

impl Session {
    pub fn context(&self) -> AnalysisContext<'_> {
        AnalysisContext::new(&self.snapshot, self.now, &self.config)
    }
}

pub fn load_config(explicit: Option<&Path>) -> Result<(EngineConfig, ConfigSource)> {
    if let Some(path) = explicit {
        let config = EngineConfig::from_path(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?;
        return Ok((config, ConfigSource::Explicit(path.to_path_buf())));
    }

    let config = EngineConfig::load().context("Failed to load engine config")?;
    let source = match default_config_path() {
        Some(p) if p.exists() => ConfigSource::Override(p),
        _ => ConfigSource::Embedded,
    };
    Ok((config, source))
}

/// Reference time: the given day at the current wall-clock time, or now
pub fn reference_time(today: Option<NaiveDate>) -> NaiveDateTime {
    let now = Local::now().naive_local();
    match today {
        Some(day) => day.and_time(now.time()),
        None => now,
    }
}

pub fn open_session(
    snapshot_path: &Path,
    config_path: Option<&Path>,
    today: Option<NaiveDate>,
    max_transactions: Option<usize>,
) -> Result<Session> {
    let (config, source) = load_config(config_path)?;

    let mut snapshot = Snapshot::load(snapshot_path)
        .with_context(|| format!("Failed to load snapshot from {}", snapshot_path.display()))?;

    if let Some(limit) = max_transactions.or(config.max_transactions) {
        snapshot = snapshot.bounded(limit);
    }

    tracing::debug!(
        transactions = snapshot.transactions.len(),
        categories = snapshot.categories.len(),
        goals = snapshot.goals.len(),
        config = %source,
        "Session ready"
    );

    Ok(Session {
        snapshot,
        config,
        source,
        now: reference_time(today),
    })
}

/// Run `task` on the blocking pool, giving up after `timeout`
pub async fn run_bounded<T, F>(timeout: Duration, task: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    let handle = tokio::task::spawn_blocking(task);
    match tokio::time::timeout(timeout, handle).await {
        Ok(joined) => joined.context("Analysis task failed")?,
        Err(_) => anyhow::bail!("Analysis timed out after {:?}", timeout),
    }
}

/// Run `task` under `timeout` on a dedicated runtime
///
/// The runtime is shut down without joining the blocking pool, so a task that
/// overran is abandoned and the caller returns once the timeout fires.
pub fn run_with_timeout<T, F>(timeout: Duration, task: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    let result = runtime.block_on(run_bounded(timeout, task));
    runtime.shutdown_background();
    result
}

pub fn cmd_config(config: &EngineConfig, source: &ConfigSource, json: bool) -> Result<String> {
    if json {
        return super::render_json(&serde_json::json!({
            "source": source,
            "config": config,
        }));
    }

    let c = config;
    let mut out = String::new();
    out.push_str("\n⚙️  Engine Config\n");
    out.push_str("   ─────────────────────────────\n");
    out.push_str(&format!("   Source: {}\n", source));
    if let Some(path) = default_config_path() {
        out.push_str(&format!("   Override location: {}\n", path.display()));
    }
    out.push_str(&format!("   Income category: {}\n", c.income_category));
    out.push_str(&format!(
        "   Default category: {}\n",
        c.default_category.as_deref().unwrap_or("(first spending category)")
    ));
    if let Some(limit) = c.max_transactions {
        out.push_str(&format!("   Max transactions: {}\n", limit));
    }
    out.push('\n');
    out.push_str(&format!(
        "   Classifier: keyword floor {}, description similarity > {}, amount similarity > {}\n",
        c.classifier.lexical_min_confidence,
        c.classifier.description_similarity,
        c.classifier.amount_similarity
    ));
    out.push_str(&format!(
        "   Anomalies: z > {} over at least {} transactions\n",
        c.anomalies.z_threshold, c.anomalies.min_transactions
    ));
    out.push_str(&format!(
        "   Budgets: approaching > {}%, breached > {}%\n",
        c.insights.approaching_percent, c.insights.breach_percent
    ));
    out.push_str(&format!(
        "   Lifestyle creep: > {:.0}% (high > {:.0}%) over {} months\n",
        c.forecast.creep_threshold * 100.0,
        c.forecast.creep_high_threshold * 100.0,
        c.forecast.creep_window_months
    ));
    out.push_str(&format!(
        "   Keyword tables: {} categories, {} synonyms\n",
        c.categories.len(),
        c.synonyms.len()
    ));

    Ok(out)
}
