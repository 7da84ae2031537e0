//! Cost reduction insight
//!
//! Flags categories that take a large share of total spending. Not part of
//! the primary engine; callers merge it in explicitly.

use crate::stats::impact_score;
use crate::summary::expense_shares;

use super::engine::{AnalysisContext, Analyzer};
use super::types::{Insight, InsightKind, Priority};

const CONFIDENCE: f64 = 0.6;

pub struct CostReductionAnalyzer;

impl Analyzer for CostReductionAnalyzer {
    fn id(&self) -> &'static str {
        "cost_reduction"
    }

    fn name(&self) -> &'static str {
        "Cost Reduction"
    }

    fn analyze(&self, ctx: &AnalysisContext<'_>) -> Vec<Insight> {
        let mut heavy: Vec<(String, f64)> =
            expense_shares(ctx.snapshot, &ctx.config.income_category)
                .into_iter()
                .filter(|(_, share)| *share > ctx.config.insights.cost_share_percent)
                .collect();
        heavy.sort_by(|a, b| b.1.total_cmp(&a.1));

        heavy
            .into_iter()
            .map(|(name, share)| {
                Insight::new(
                    format!("cost-reduction:{}", name),
                    InsightKind::Opportunity,
                    Priority::Medium,
                    format!("Savings opportunity in {}", name),
                    format!("This category makes up {:.1}% of your spending", share),
                )
                .with_actions([
                    "Look for cheaper providers",
                    "Watch for sales and discounts",
                    "Consider cheaper alternatives",
                ])
                .with_category(name)
                .with_impact(impact_score(share / 10.0))
                .with_confidence(CONFIDENCE)
                .with_metadata(serde_json::json!({ "share_percent": share }))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::test_utils::{at, date, expense, snapshot_with};

    #[test]
    fn test_heavy_categories_sorted_by_share() {
        let snapshot = snapshot_with(vec![
            expense("1", 300.0, "Food", date(2024, 3, 1)),
            expense("2", 500.0, "Housing", date(2024, 3, 1)),
            expense("3", 150.0, "Transport", date(2024, 3, 1)),
            expense("4", 50.0, "Health", date(2024, 3, 1)),
        ]);
        let config = EngineConfig::builtin();
        let ctx = AnalysisContext::new(&snapshot, at(2024, 3, 20), &config);

        let insights = CostReductionAnalyzer.analyze(&ctx);
        let ids: Vec<&str> = insights.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["cost-reduction:Housing", "cost-reduction:Food"]);
        assert_eq!(insights[0].impact, 5);
        assert_eq!(insights[1].impact, 3);
        assert!(insights.iter().all(|i| i.priority == Priority::Medium));
        assert_eq!(insights[0].confidence, 0.6);
    }

    #[test]
    fn test_no_expenses_no_insights() {
        let snapshot = snapshot_with(vec![]);
        let config = EngineConfig::builtin();
        let ctx = AnalysisContext::new(&snapshot, at(2024, 3, 20), &config);
        assert!(CostReductionAnalyzer.analyze(&ctx).is_empty());
    }
}
