//! Budget breach insight
//!
//! Flags categories over, or close to, their budget ceiling.

use crate::stats::{impact_score, percentage};

use super::engine::{AnalysisContext, Analyzer};
use super::types::{Insight, InsightKind, Priority};

const CONFIDENCE: f64 = 0.9;

pub struct BudgetBreachAnalyzer;

impl Analyzer for BudgetBreachAnalyzer {
    fn id(&self) -> &'static str {
        "budget_breach"
    }

    fn name(&self) -> &'static str {
        "Budget Breach"
    }

    fn analyze(&self, ctx: &AnalysisContext<'_>) -> Vec<Insight> {
        let thresholds = &ctx.config.insights;
        let mut insights = Vec::new();

        for category in ctx.snapshot.spending_categories(&ctx.config.income_category) {
            let spent = ctx.snapshot.category_spent(&category.name);
            let pct = percentage(spent, category.budget);
            if pct <= thresholds.approaching_percent {
                continue;
            }

            let summary = format!(
                "You have used {:.1}% of the {} budget (${:.2} of ${:.2})",
                pct, category.name, spent, category.budget
            );

            let insight = if pct > thresholds.breach_percent {
                Insight::new(
                    format!("budget-breach:{}", category.name),
                    InsightKind::Warning,
                    Priority::Critical,
                    format!("{} budget exceeded", category.name),
                    summary,
                )
                .with_actions([
                    "Stop spending in this category for the rest of the month",
                    "Check whether budget can be moved from another category",
                    "Plan this category more carefully next month",
                ])
            } else {
                Insight::new(
                    format!("budget-breach:{}", category.name),
                    InsightKind::Opportunity,
                    Priority::High,
                    format!("Approaching the {} budget limit", category.name),
                    summary,
                )
                .with_actions([
                    "Slow down spending in this category",
                    "Look for cheaper alternatives",
                ])
            };

            insights.push(
                insight
                    .with_category(category.name.clone())
                    .with_impact(impact_score(pct / 10.0))
                    .with_confidence(CONFIDENCE)
                    .with_metadata(serde_json::json!({
                        "spent": spent,
                        "budget": category.budget,
                        "percentage": pct,
                    })),
            );
        }

        insights
    }
}
