//! Lifestyle creep insight
//!
//! Folds the forecaster's creep measurement into the ranked insight list.

use crate::forecast::detect_lifestyle_creep;
use crate::stats::impact_score;

use super::engine::{AnalysisContext, Analyzer};
use super::types::{Insight, InsightKind, Priority};

pub struct LifestyleCreepAnalyzer;

impl Analyzer for LifestyleCreepAnalyzer {
    fn id(&self) -> &'static str {
        "lifestyle_creep"
    }

    fn name(&self) -> &'static str {
        "Lifestyle Creep"
    }

    fn analyze(&self, ctx: &AnalysisContext<'_>) -> Vec<Insight> {
        let forecast = &ctx.config.forecast;
        let Some(report) = detect_lifestyle_creep(ctx.snapshot, ctx.today(), forecast) else {
            return vec![];
        };

        let priority = if report.increase > forecast.creep_high_threshold {
            Priority::High
        } else {
            Priority::Medium
        };

        let insight = Insight::new(
            "lifestyle-creep",
            InsightKind::Warning,
            priority,
            "Lifestyle creep detected",
            format!(
                "Your monthly spending rose {:.1}% over the last {} months",
                report.increase * 100.0,
                report.window_months
            ),
        )
        .with_actions([
            "Review the new expenses that crept in",
            "Identify expenses that can be trimmed",
            "Set a fixed monthly budget",
        ])
        .with_impact(impact_score(report.increase * 20.0))
        .with_confidence(forecast.creep_confidence)
        .with_metadata(serde_json::json!({
            "recent_monthly": report.recent_monthly,
            "previous_monthly": report.previous_monthly,
            "increase": report.increase,
        }));

        vec![insight]
    }
}
