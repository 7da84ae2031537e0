//! Domain models for Pitstop

use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Whether money came in or went out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl std::str::FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            _ => Err(format!("Unknown transaction kind: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single income or expense record
///
/// Transactions are immutable once created; an edit replaces the whole record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    /// Always positive; direction is carried by `kind`
    pub amount: f64,
    pub description: String,
    pub category: String,
    pub date: NaiveDate,
    #[serde(alias = "type")]
    pub kind: TransactionKind,
}

impl Transaction {
    pub fn is_expense(&self) -> bool {
        self.kind == TransactionKind::Expense
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionKind::Income
    }
}

/// A spending category with its monthly budget ceiling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    #[serde(default)]
    pub budget: f64,
    /// Display metadata, carried through untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl Category {
    pub fn new(name: impl Into<String>, budget: f64) -> Self {
        Self {
            name: name.into(),
            budget,
            color: None,
            icon: None,
        }
    }
}

/// A savings goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub title: String,
    pub target: f64,
    pub current: f64,
    pub deadline: NaiveDate,
    #[serde(default)]
    pub category: Option<String>,
}

impl Goal {
    /// Progress toward the target as a percentage (0 when the target is not positive)
    pub fn progress_percent(&self) -> f64 {
        if self.target <= 0.0 {
            return 0.0;
        }
        self.current / self.target * 100.0
    }

    pub fn remaining(&self) -> f64 {
        (self.target - self.current).max(0.0)
    }

    /// Whole days from `today` until the deadline (negative when overdue)
    pub fn days_left(&self, today: NaiveDate) -> i64 {
        (self.deadline - today).num_days()
    }
}

/// Read-only view of the financial state handed to every engine component
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub categories: Vec<Category>,
    /// Aggregate monthly budget ceiling
    #[serde(default)]
    pub monthly_budget: f64,
    #[serde(default)]
    pub goals: Vec<Goal>,
}

impl Snapshot {
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Keep only the `limit` most recent transactions, preserving their
    /// original relative order.
    pub fn bounded(mut self, limit: usize) -> Self {
        if self.transactions.len() <= limit {
            return self;
        }

        let mut indices: Vec<usize> = (0..self.transactions.len()).collect();
        indices.sort_by(|&a, &b| self.transactions[b].date.cmp(&self.transactions[a].date));
        indices.truncate(limit);
        indices.sort_unstable();

        let dropped = self.transactions.len() - limit;
        let transactions = std::mem::take(&mut self.transactions);
        self.transactions = transactions
            .into_iter()
            .enumerate()
            .filter(|(i, _)| indices.binary_search(i).is_ok())
            .map(|(_, t)| t)
            .collect();

        tracing::debug!(dropped, kept = limit, "Bounded snapshot history");
        self
    }

    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }

    /// Budget ceiling for a category; unknown categories have no budget
    pub fn category_budget(&self, name: &str) -> f64 {
        self.category(name).map(|c| c.budget).unwrap_or(0.0)
    }

    pub fn expenses(&self) -> impl Iterator<Item = &Transaction> {
        self.transactions.iter().filter(|t| t.is_expense())
    }

    pub fn incomes(&self) -> impl Iterator<Item = &Transaction> {
        self.transactions.iter().filter(|t| t.is_income())
    }

    /// Expense transactions recorded against `category`, in snapshot order
    pub fn category_expenses(&self, category: &str) -> Vec<&Transaction> {
        self.expenses().filter(|t| t.category == category).collect()
    }

    pub fn category_spent(&self, category: &str) -> f64 {
        self.expenses()
            .filter(|t| t.category == category)
            .map(|t| t.amount)
            .sum()
    }

    pub fn total_expenses(&self) -> f64 {
        self.expenses().map(|t| t.amount).sum()
    }

    pub fn total_income(&self) -> f64 {
        self.incomes().map(|t| t.amount).sum()
    }

    /// Categories other than the income bucket, in enumeration order
    pub fn spending_categories<'a>(
        &'a self,
        income_category: &'a str,
    ) -> impl Iterator<Item = &'a Category> + 'a {
        self.categories
            .iter()
            .filter(move |c| !c.name.eq_ignore_ascii_case(income_category))
    }
}

/// How often a category sees spending
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpendFrequency {
    Daily,
    Weekly,
    Monthly,
    Irregular,
}

impl SpendFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Irregular => "irregular",
        }
    }
}

impl std::fmt::Display for SpendFrequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Increasing,
    Decreasing,
    Stable,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Increasing => "increasing",
            Self::Decreasing => "decreasing",
            Self::Stable => "stable",
        }
    }
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Derived spending profile for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpendingPattern {
    pub category: String,
    pub frequency: SpendFrequency,
    pub average_amount: f64,
    pub trend: Trend,
    /// 1 minus the coefficient of variation, floored at 0
    pub predictability: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyKind {
    Amount,
}

/// A transaction whose amount is unusual for its category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anomaly {
    pub transaction_id: String,
    pub kind: AnomalyKind,
    /// 1-10
    pub severity: u8,
    pub description: String,
    pub suggested_action: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictionKind {
    CashFlow,
    LifestyleCreep,
}

/// Forward-looking projection produced by the forecaster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictiveInsight {
    pub kind: PredictionKind,
    pub prediction: String,
    pub confidence: f64,
    pub timeframe: String,
    pub recommended_actions: Vec<String>,
    pub projected_balance: f64,
    pub average_monthly_income: f64,
    pub average_monthly_expense: f64,
    pub current_month_expense: f64,
    pub daily_burn_rate: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{date, expense, income};

    #[test]
    fn test_transaction_kind_parsing() {
        assert_eq!(
            "Expense".parse::<TransactionKind>().unwrap(),
            TransactionKind::Expense
        );
        assert!("refund".parse::<TransactionKind>().is_err());
    }

    #[test]
    fn test_snapshot_from_json_accepts_type_alias() {
        let json = r#"{
            "transactions": [
                {"id": "1", "amount": 12.5, "description": "bus", "category": "Transport",
                 "date": "2024-03-02", "type": "expense"}
            ],
            "categories": [{"name": "Transport", "budget": 600}],
            "monthly_budget": 4000
        }"#;

        let snapshot = Snapshot::from_json(json).unwrap();
        assert_eq!(snapshot.transactions.len(), 1);
        assert_eq!(snapshot.transactions[0].kind, TransactionKind::Expense);
        assert_eq!(snapshot.category_budget("Transport"), 600.0);
        assert!(snapshot.goals.is_empty());
    }

    #[test]
    fn test_unknown_category_has_no_budget() {
        let snapshot = Snapshot::default();
        assert_eq!(snapshot.category_budget("Nope"), 0.0);
    }

    #[test]
    fn test_bounded_keeps_most_recent_in_order() {
        let snapshot = Snapshot {
            transactions: vec![
                expense("a", 10.0, "Food", date(2024, 1, 5)),
                expense("b", 10.0, "Food", date(2024, 3, 5)),
                income("c", 100.0, date(2024, 2, 5)),
                expense("d", 10.0, "Food", date(2024, 4, 5)),
            ],
            ..Default::default()
        };

        let bounded = snapshot.bounded(2);
        let ids: Vec<&str> = bounded.transactions.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "d"]);
    }

    #[test]
    fn test_goal_progress_guards_zero_target() {
        let goal = Goal {
            title: "Nothing".into(),
            target: 0.0,
            current: 10.0,
            deadline: date(2024, 1, 1),
            category: None,
        };
        assert_eq!(goal.progress_percent(), 0.0);
        assert_eq!(goal.remaining(), 0.0);
    }
}
