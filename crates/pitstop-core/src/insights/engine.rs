//! Insight engine - runs the registered analyzers and ranks their output

use std::collections::HashSet;

use chrono::{NaiveDate, NaiveDateTime};

use crate::config::EngineConfig;
use crate::models::Snapshot;

use super::types::Insight;
use super::{
    BudgetBreachAnalyzer, CostReductionAnalyzer, GoalProgressAnalyzer, LifestyleCreepAnalyzer,
    SavingsOpportunityAnalyzer,
};

/// Everything an analyzer may look at
#[derive(Debug, Clone, Copy)]
pub struct AnalysisContext<'a> {
    pub snapshot: &'a Snapshot,
    /// Reference time; analyzers never read the clock themselves
    pub now: NaiveDateTime,
    pub config: &'a EngineConfig,
}

impl<'a> AnalysisContext<'a> {
    pub fn new(snapshot: &'a Snapshot, now: NaiveDateTime, config: &'a EngineConfig) -> Self {
        Self {
            snapshot,
            now,
            config,
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.now.date()
    }
}

/// A source of insights
pub trait Analyzer: Send + Sync {
    /// Unique identifier for this analyzer
    fn id(&self) -> &'static str;

    /// Human-readable name
    fn name(&self) -> &'static str;

    /// Analyze the snapshot and produce insights, in emission order
    fn analyze(&self, ctx: &AnalysisContext<'_>) -> Vec<Insight>;
}

/// Runs analyzers and produces one ranked list
pub struct InsightEngine {
    analyzers: Vec<Box<dyn Analyzer>>,
}

impl Default for InsightEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl InsightEngine {
    /// Engine with the primary analyzers. Cost reduction is a separate pass,
    /// see [`InsightEngine::cost_reduction`].
    pub fn new() -> Self {
        let mut engine = Self { analyzers: vec![] };

        engine.register(Box::new(BudgetBreachAnalyzer));
        engine.register(Box::new(SavingsOpportunityAnalyzer));
        engine.register(Box::new(GoalProgressAnalyzer));
        engine.register(Box::new(LifestyleCreepAnalyzer));

        engine
    }

    /// Engine without any analyzers
    pub fn empty() -> Self {
        Self { analyzers: vec![] }
    }

    pub fn register(&mut self, analyzer: Box<dyn Analyzer>) {
        self.analyzers.push(analyzer);
    }

    /// Run every analyzer, drop duplicate ids and rank the result
    pub fn analyze_all(&self, ctx: &AnalysisContext<'_>) -> Vec<Insight> {
        let mut all = vec![];

        for analyzer in &self.analyzers {
            let insights = analyzer.analyze(ctx);
            tracing::debug!(
                analyzer = analyzer.id(),
                count = insights.len(),
                "Insight analysis complete"
            );
            all.extend(insights);
        }

        let ranked = rank(dedup(all));
        tracing::info!(count = ranked.len(), "Insights generated");
        ranked
    }

    /// The independently invokable cost-reduction pass, ranked on its own
    pub fn cost_reduction(ctx: &AnalysisContext<'_>) -> Vec<Insight> {
        rank(CostReductionAnalyzer.analyze(ctx))
    }

    pub fn analyzer_ids(&self) -> Vec<&'static str> {
        self.analyzers.iter().map(|a| a.id()).collect()
    }
}

/// Stable sort by `priority weight * impact`, highest first
pub fn rank(mut insights: Vec<Insight>) -> Vec<Insight> {
    insights.sort_by(|a, b| b.score().cmp(&a.score()));
    insights
}

/// Keep the first insight for every id
fn dedup(insights: Vec<Insight>) -> Vec<Insight> {
    let mut seen = HashSet::new();
    insights
        .into_iter()
        .filter(|i| seen.insert(i.id.clone()))
        .collect()
}

/// Combine two insight lists. Later duplicates (by id) are dropped and the
/// result is re-ranked.
pub fn merge_insights(primary: Vec<Insight>, extra: Vec<Insight>) -> Vec<Insight> {
    let mut all = primary;
    all.extend(extra);
    rank(dedup(all))
}
