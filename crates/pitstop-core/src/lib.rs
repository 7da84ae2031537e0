//! Pitstop Core Library
//!
//! Financial insight and classification engine for the Pitstop personal
//! finance tracker:
//! - Transaction classification (keyword table + history similarity)
//! - Spending pattern analysis (frequency, trend, predictability)
//! - Amount anomaly detection and recurring charge identification
//! - Cash-flow and lifestyle-creep forecasting
//! - Ranked, de-duplicated financial insights
//! - Intent routing for free-text chat input
//! - Budget summaries and derived gamification data
//!
//! Every component is a pure function of a [`Snapshot`], a reference time
//! and an [`EngineConfig`]. Nothing here performs I/O beyond loading the
//! config and snapshot files.

pub mod advice;
pub mod chat;
pub mod classify;
pub mod config;
pub mod detect;
pub mod error;
pub mod forecast;
pub mod gamification;
pub mod insights;
pub mod models;
pub mod patterns;
pub mod stats;
pub mod summary;

/// Fixtures for snapshots, transactions and goals
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use chat::{ChatAction, ChatResponse, Intent, IntentKind, IntentRouter, StateMutation};
pub use classify::{Classification, ClassificationSource, TransactionClassifier};
pub use config::EngineConfig;
pub use detect::{detect_anomalies, identify_recurring, RecurringCharge};
pub use error::{Error, Result};
pub use forecast::{detect_lifestyle_creep, predict_cash_flow, CreepReport};
pub use gamification::{gamification, GamificationData};
pub use insights::{merge_insights, AnalysisContext, Insight, InsightEngine, InsightKind, Priority};
pub use models::{
    Anomaly, Category, Goal, PredictiveInsight, Snapshot, SpendFrequency, SpendingPattern,
    Transaction, TransactionKind, Trend,
};
pub use patterns::analyze_patterns;
