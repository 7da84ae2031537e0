//! Goal progress insight
//!
//! Warns about goals that are behind with a close deadline and celebrates
//! goals that are nearly done. A goal gets at most one insight, keyed by its
//! title and deadline.

use super::engine::{AnalysisContext, Analyzer};
use super::types::{Insight, InsightKind, Priority};

const BEHIND_IMPACT: u8 = 7;
const BEHIND_CONFIDENCE: f64 = 0.8;
const ALMOST_IMPACT: u8 = 8;
const ALMOST_CONFIDENCE: f64 = 0.9;

pub struct GoalProgressAnalyzer;

/// Monthly saving needed to reach `remaining` in `days_left` days
pub fn monthly_required(remaining: f64, days_left: i64) -> f64 {
    remaining / (days_left as f64 / 30.0).max(1.0)
}

impl Analyzer for GoalProgressAnalyzer {
    fn id(&self) -> &'static str {
        "goal_progress"
    }

    fn name(&self) -> &'static str {
        "Goal Progress"
    }

    fn analyze(&self, ctx: &AnalysisContext<'_>) -> Vec<Insight> {
        let thresholds = &ctx.config.insights;
        let today = ctx.today();
        let mut insights = Vec::new();

        for goal in &ctx.snapshot.goals {
            if goal.target <= 0.0 {
                tracing::warn!(goal = %goal.title, "Skipping goal without a positive target");
                continue;
            }

            let progress = goal.progress_percent();
            let days_left = goal.days_left(today);

            let insight = if progress < thresholds.goal_behind_progress
                && days_left < thresholds.goal_behind_days
            {
                let required = monthly_required(goal.remaining(), days_left);
                let priority = if days_left < thresholds.goal_urgent_days {
                    Priority::High
                } else {
                    Priority::Medium
                };

                Insight::new(
                    format!("goal-behind:{}:{}", goal.title, goal.deadline),
                    InsightKind::Warning,
                    priority,
                    format!("Goal \"{}\" is behind schedule", goal.title),
                    format!(
                        "Reached {:.1}% of the goal with {} days left",
                        progress, days_left
                    ),
                )
                .with_actions([
                    format!("Save ${:.2} per month to reach the goal", required),
                    "Look for expenses you can cut".to_string(),
                    "Consider moving the deadline".to_string(),
                ])
                .with_impact(BEHIND_IMPACT)
                .with_confidence(BEHIND_CONFIDENCE)
                .with_metadata(serde_json::json!({
                    "progress": progress,
                    "days_left": days_left,
                    "monthly_required": required,
                }))
            } else if progress > thresholds.goal_almost_progress {
                Insight::new(
                    format!("goal-almost:{}:{}", goal.title, goal.deadline),
                    InsightKind::Achievement,
                    Priority::Low,
                    format!("Almost there with \"{}\"!", goal.title),
                    format!(
                        "Reached {:.1}% of the goal, only ${:.2} to go",
                        progress,
                        goal.remaining()
                    ),
                )
                .with_actions([
                    "Keep going, you are close to the goal!",
                    "Consider raising the target if you reach it early",
                ])
                .with_impact(ALMOST_IMPACT)
                .with_confidence(ALMOST_CONFIDENCE)
            } else {
                continue;
            };

            insights.push(match goal.category {
                Some(ref category) => insight.with_category(category.clone()),
                None => insight,
            });
        }

        insights
    }
}
