//! Derived game data: points, badges, challenges and tips
//!
//! Nothing here is stored; everything is recomputed from the snapshot. The
//! constants are illustrative rather than tuned.

use std::collections::HashSet;

use chrono::{Duration, Months};
use serde::{Deserialize, Serialize};

use crate::advice::{category_tip, GENERAL_TIPS};
use crate::forecast::monthly_average;
use crate::insights::{AnalysisContext, Insight, InsightEngine, InsightKind};
use crate::models::{SpendingPattern, Transaction, Trend};
use crate::patterns::analyze_patterns;

const POINTS_PER_RECENT_TRANSACTION: f64 = 5.0;
const COMPLIANCE_POINTS: f64 = 100.0;
const GOAL_POINTS: f64 = 50.0;
const SAVINGS_BADGE_RATE: f64 = 0.2;
const CONSISTENCY_BADGE_SCORE: f64 = 0.8;
const CONSISTENCY_WINDOW_DAYS: i64 = 30;
const CHALLENGE_REDUCTION: f64 = 0.9;
const MAX_TIPS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Badge {
    pub id: String,
    pub name: String,
    pub description: String,
    /// 0-100
    pub progress: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Challenge {
    pub id: String,
    pub title: String,
    pub description: String,
    pub target: f64,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GamificationData {
    pub points: u32,
    pub badges: Vec<Badge>,
    pub challenges: Vec<Challenge>,
    pub tips: Vec<String>,
}

pub fn gamification(ctx: &AnalysisContext<'_>) -> GamificationData {
    let insights = InsightEngine::new().analyze_all(ctx);
    let patterns = analyze_patterns(ctx.snapshot, &ctx.config.patterns);

    GamificationData {
        points: points(ctx),
        badges: badges(ctx),
        challenges: challenges(&patterns),
        tips: tips(&insights),
    }
}

/// Recent activity, budget compliance and goal progress
pub fn points(ctx: &AnalysisContext<'_>) -> u32 {
    let today = ctx.today();
    let recent = match today.checked_sub_months(Months::new(1)) {
        Some(cutoff) => ctx
            .snapshot
            .expenses()
            .filter(|t| t.date >= cutoff)
            .count(),
        None => 0,
    };

    let goal_progress: f64 = ctx
        .snapshot
        .goals
        .iter()
        .filter(|g| g.target > 0.0)
        .map(|g| g.current / g.target)
        .sum();

    let total = recent as f64 * POINTS_PER_RECENT_TRANSACTION
        + budget_compliance(ctx) * COMPLIANCE_POINTS
        + goal_progress * GOAL_POINTS;

    total.max(0.0).floor() as u32
}

/// `max(0, 1 - spent / total budget)`, 0 without any budget
pub fn budget_compliance(ctx: &AnalysisContext<'_>) -> f64 {
    let total_budget: f64 = ctx
        .snapshot
        .spending_categories(&ctx.config.income_category)
        .map(|c| c.budget)
        .sum();
    if total_budget <= 0.0 {
        return 0.0;
    }
    (1.0 - ctx.snapshot.total_expenses() / total_budget).max(0.0)
}

/// Share of average monthly income not spent, floored at 0
pub fn savings_rate(ctx: &AnalysisContext<'_>) -> f64 {
    let incomes: Vec<&Transaction> = ctx.snapshot.incomes().collect();
    let expenses: Vec<&Transaction> = ctx.snapshot.expenses().collect();
    let income = monthly_average(&incomes);
    if income <= 0.0 {
        return 0.0;
    }
    ((income - monthly_average(&expenses)) / income).max(0.0)
}

/// Fraction of the last 30 days with at least one logged transaction
pub fn consistency_score(ctx: &AnalysisContext<'_>) -> f64 {
    let today = ctx.today();
    let cutoff = today - Duration::days(CONSISTENCY_WINDOW_DAYS);
    let days: HashSet<_> = ctx
        .snapshot
        .transactions
        .iter()
        .filter(|t| t.date >= cutoff && t.date <= today)
        .map(|t| t.date)
        .collect();
    (days.len() as f64 / CONSISTENCY_WINDOW_DAYS as f64).min(1.0)
}

fn badges(ctx: &AnalysisContext<'_>) -> Vec<Badge> {
    let mut badges = Vec::new();

    let rate = savings_rate(ctx);
    if rate > SAVINGS_BADGE_RATE {
        badges.push(Badge {
            id: "savings-master".to_string(),
            name: "Savings Master".to_string(),
            description: "Saved more than 20% of income".to_string(),
            progress: (rate / SAVINGS_BADGE_RATE * 100.0).min(100.0),
        });
    }

    let consistency = consistency_score(ctx);
    if consistency > CONSISTENCY_BADGE_SCORE {
        badges.push(Badge {
            id: "consistency-champion".to_string(),
            name: "Consistency Champion".to_string(),
            description: "Logged transactions consistently".to_string(),
            progress: (consistency * 100.0).min(100.0),
        });
    }

    badges
}

fn challenges(patterns: &[SpendingPattern]) -> Vec<Challenge> {
    patterns
        .iter()
        .find(|p| p.trend == Trend::Increasing)
        .map(|p| Challenge {
            id: format!("reduce-{}", p.category),
            title: format!("Cut {} spending", p.category),
            description: "Try to spend 10% less in this category this month".to_string(),
            target: p.average_amount * CHALLENGE_REDUCTION,
            category: p.category.clone(),
        })
        .into_iter()
        .collect()
}

fn tips(insights: &[Insight]) -> Vec<String> {
    let general = GENERAL_TIPS.iter().map(|t| t.to_string());
    let specific = insights
        .iter()
        .filter(|i| i.kind == InsightKind::Warning)
        .filter_map(|i| i.category.as_deref())
        .map(|c| format!("{} tip: {}", c, category_tip(c)));

    general.chain(specific).take(MAX_TIPS).collect()
}
