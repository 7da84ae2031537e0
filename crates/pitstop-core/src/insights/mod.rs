//! Insight Engine - ranked, actionable financial insights
//!
//! Analyzers look at a read-only snapshot and emit insights; the engine
//! merges their output, drops duplicate ids and ranks everything by
//! `priority weight * impact` (stable, so ties keep emission order).
//!
//! ## Analyzers
//!
//! - **Budget Breach** - categories over or near their budget
//! - **Savings Opportunity** - recurring charges worth reviewing
//! - **Goal Progress** - goals behind schedule or nearly done
//! - **Lifestyle Creep** - sustained rise in monthly spending
//! - **Cost Reduction** - heavy categories (separate pass, not registered)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pitstop_core::insights::{merge_insights, AnalysisContext, InsightEngine};
//!
//! let ctx = AnalysisContext::new(&snapshot, now, &config);
//! let primary = InsightEngine::new().analyze_all(&ctx);
//! let all = merge_insights(primary, InsightEngine::cost_reduction(&ctx));
//! ```

pub mod budget_breach;
pub mod cost_reduction;
pub mod engine;
pub mod goal_progress;
pub mod lifestyle_creep;
pub mod savings_opportunity;
pub mod types;

pub use budget_breach::BudgetBreachAnalyzer;
pub use cost_reduction::CostReductionAnalyzer;
pub use engine::{merge_insights, rank, AnalysisContext, Analyzer, InsightEngine};
pub use goal_progress::GoalProgressAnalyzer;
pub use lifestyle_creep::LifestyleCreepAnalyzer;
pub use savings_opportunity::SavingsOpportunityAnalyzer;
pub use types::{Insight, InsightKind, Priority};
