//! Savings Opportunity Insight
//!
//! Identifies recurring charges (identical description and amount seen more
//! than once) that are worth reviewing. All of them are reported in a single
//! insight.

use crate::detect::identify_recurring;

use super::engine::{AnalysisContext, Analyzer};
use super::types::{Insight, InsightKind, Priority};

const IMPACT: u8 = 6;
const CONFIDENCE: f64 = 0.7;

pub struct SavingsOpportunityAnalyzer;

impl Analyzer for SavingsOpportunityAnalyzer {
    fn id(&self) -> &'static str {
        "savings_opportunity"
    }

    fn name(&self) -> &'static str {
        "Savings Opportunity"
    }

    fn analyze(&self, ctx: &AnalysisContext<'_>) -> Vec<Insight> {
        let recurring = identify_recurring(ctx.snapshot, ctx.config.insights.min_recurring);
        if recurring.is_empty() {
            return vec![];
        }

        let insight = Insight::new(
            "subscription-review",
            InsightKind::Opportunity,
            Priority::Medium,
            "Review recurring payments",
            format!(
                "Found {} recurring payment{} worth reviewing",
                recurring.len(),
                if recurring.len() == 1 { "" } else { "s" }
            ),
        )
        .with_actions([
            "Check which subscriptions you still use",
            "Cancel subscriptions you no longer need",
            "Look for cheaper plans or alternatives",
        ])
        .with_impact(IMPACT)
        .with_confidence(CONFIDENCE)
        .with_metadata(serde_json::json!({ "subscriptions": recurring }));

        vec![insight]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::test_utils::{at, date, expense_with, snapshot_with};

    #[test]
    fn test_five_identical_charges() {
        let snapshot = snapshot_with(
            (1..=5)
                .map(|m| {
                    expense_with(&format!("n{}", m), 50.0, "Netflix", "Entertainment", date(2024, m, 1))
                })
                .collect(),
        );
        let config = EngineConfig::builtin();
        let ctx = AnalysisContext::new(&snapshot, at(2024, 6, 1), &config);

        let insights = SavingsOpportunityAnalyzer.analyze(&ctx);
        assert_eq!(insights.len(), 1);

        let i = &insights[0];
        assert_eq!(i.id, "subscription-review");
        assert_eq!(i.priority, Priority::Medium);
        assert_eq!(i.impact, 6);
        assert_eq!(i.confidence, 0.7);

        let subs = i.metadata["subscriptions"].as_array().unwrap();
        assert_eq!(subs.len(), 1);
        assert_eq!(subs[0]["description"], "Netflix");
        assert_eq!(subs[0]["amount"], 50.0);
        assert_eq!(subs[0]["frequency"], 5);
        assert_eq!(subs[0]["category"], "Entertainment");
    }

    #[test]
    fn test_no_repeats_no_insight() {
        let snapshot = snapshot_with(vec![
            expense_with("1", 50.0, "Netflix", "Entertainment", date(2024, 1, 1)),
            expense_with("2", 55.0, "Netflix", "Entertainment", date(2024, 2, 1)),
        ]);
        let config = EngineConfig::builtin();
        let ctx = AnalysisContext::new(&snapshot, at(2024, 6, 1), &config);

        assert!(SavingsOpportunityAnalyzer.analyze(&ctx).is_empty());
    }
}
