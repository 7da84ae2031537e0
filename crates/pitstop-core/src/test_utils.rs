//! Test utilities for pitstop-core
//!
//! Builders for transactions, categories and snapshots shared by the unit
//! tests of every engine component.

use chrono::{NaiveDate, NaiveDateTime};

use crate::models::{Category, Goal, Snapshot, Transaction, TransactionKind};

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Noon on the given day, used as the analysis reference time
pub fn at(year: i32, month: u32, day: u32) -> NaiveDateTime {
    date(year, month, day).and_hms_opt(12, 0, 0).unwrap()
}

pub fn expense(id: &str, amount: f64, category: &str, date: NaiveDate) -> Transaction {
    expense_with(id, amount, &category.to_lowercase(), category, date)
}

pub fn expense_with(
    id: &str,
    amount: f64,
    description: &str,
    category: &str,
    date: NaiveDate,
) -> Transaction {
    Transaction {
        id: id.to_string(),
        amount,
        description: description.to_string(),
        category: category.to_string(),
        date,
        kind: TransactionKind::Expense,
    }
}

pub fn income(id: &str, amount: f64, date: NaiveDate) -> Transaction {
    Transaction {
        id: id.to_string(),
        amount,
        description: "salary".to_string(),
        category: "Income".to_string(),
        date,
        kind: TransactionKind::Income,
    }
}

pub fn goal(title: &str, target: f64, current: f64, deadline: NaiveDate) -> Goal {
    Goal {
        title: title.to_string(),
        target,
        current,
        deadline,
        category: None,
    }
}

/// The category set the app ships with
pub fn categories() -> Vec<Category> {
    vec![
        Category::new("Housing", 1500.0),
        Category::new("Food", 800.0),
        Category::new("Transport", 600.0),
        Category::new("Entertainment", 400.0),
        Category::new("Health", 300.0),
        Category::new("Education", 200.0),
        Category::new("Income", 0.0),
    ]
}

pub fn snapshot_with(transactions: Vec<Transaction>) -> Snapshot {
    Snapshot {
        transactions,
        categories: categories(),
        monthly_budget: 4000.0,
        goals: vec![],
    }
}
