//! Budget arithmetic and period totals
//!
//! Shared by the chat handlers and the `summary` command.

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::{Snapshot, Transaction};
use crate::stats::{percentage, same_month};

/// Dollar amount with the sign before the symbol ("-$10.00")
pub fn money(amount: f64) -> String {
    if amount < 0.0 {
        format!("-${:.2}", -amount)
    } else {
        format!("${:.2}", amount)
    }
}

/// Spend against budget for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryUsage {
    pub name: String,
    pub used: f64,
    pub budget: f64,
    /// `used / budget * 100`, 0 when the category has no budget
    pub percentage: f64,
}

impl CategoryUsage {
    pub fn remaining(&self) -> f64 {
        self.budget - self.used
    }
}

/// Usage of every non-income category, highest percentage first.
/// Equal percentages keep category order.
pub fn category_usage(snapshot: &Snapshot, income_category: &str) -> Vec<CategoryUsage> {
    let mut usage: Vec<CategoryUsage> = snapshot
        .spending_categories(income_category)
        .map(|c| {
            let used = snapshot.category_spent(&c.name);
            CategoryUsage {
                name: c.name.clone(),
                used,
                budget: c.budget,
                percentage: percentage(used, c.budget),
            }
        })
        .collect();

    usage.sort_by(|a, b| b.percentage.total_cmp(&a.percentage));
    usage
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub name: String,
    pub amount: f64,
}

/// The non-income category with the most spend, if any category has spend
pub fn top_spending_category(snapshot: &Snapshot, income_category: &str) -> Option<CategoryTotal> {
    snapshot
        .spending_categories(income_category)
        .map(|c| CategoryTotal {
            name: c.name.clone(),
            amount: snapshot.category_spent(&c.name),
        })
        .filter(|t| t.amount > 0.0)
        .fold(None, |best: Option<CategoryTotal>, t| match best {
            Some(b) if b.amount >= t.amount => Some(b),
            _ => Some(t),
        })
}

/// Income and expense totals over some period
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodTotals {
    pub income: f64,
    pub expenses: f64,
    pub transactions: usize,
}

impl PeriodTotals {
    fn collect<'a>(txs: impl Iterator<Item = &'a Transaction>) -> Self {
        txs.fold(Self::default(), |mut acc, t| {
            if t.is_income() {
                acc.income += t.amount;
            } else {
                acc.expenses += t.amount;
            }
            acc.transactions += 1;
            acc
        })
    }

    pub fn balance(&self) -> f64 {
        self.income - self.expenses
    }
}

/// Totals for the calendar month containing `day`
pub fn month_totals(snapshot: &Snapshot, day: NaiveDate) -> PeriodTotals {
    PeriodTotals::collect(snapshot.transactions.iter().filter(|t| same_month(t.date, day)))
}

/// Totals for a single day
pub fn day_totals(snapshot: &Snapshot, day: NaiveDate) -> PeriodTotals {
    PeriodTotals::collect(snapshot.transactions.iter().filter(|t| t.date == day))
}

/// Transactions recorded on `day`, in snapshot order
pub fn day_transactions(snapshot: &Snapshot, day: NaiveDate) -> Vec<&Transaction> {
    snapshot.transactions.iter().filter(|t| t.date == day).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthPoint {
    pub year: i32,
    pub month: u32,
    pub income: f64,
    pub expenses: f64,
}

/// The last `months` calendar months up to and including the month of
/// `today`, oldest first
pub fn monthly_series(snapshot: &Snapshot, today: NaiveDate, months: u32) -> Vec<MonthPoint> {
    let Some(first_of_month) = today.with_day(1) else {
        return Vec::new();
    };

    (0..months)
        .rev()
        .filter_map(|back| first_of_month.checked_sub_months(Months::new(back)))
        .map(|start| {
            let totals = month_totals(snapshot, start);
            MonthPoint {
                year: start.year(),
                month: start.month(),
                income: totals.income,
                expenses: totals.expenses,
            }
        })
        .collect()
}

/// Share of total expenses per non-income category, as a percentage
pub fn expense_shares(snapshot: &Snapshot, income_category: &str) -> Vec<(String, f64)> {
    let total = snapshot.total_expenses();
    snapshot
        .spending_categories(income_category)
        .map(|c| (c.name.clone(), percentage(snapshot.category_spent(&c.name), total)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{date, expense, income, snapshot_with};

    #[test]
    fn test_money() {
        assert_eq!(money(1234.5), "$1234.50");
        assert_eq!(money(-10.0), "-$10.00");
        assert_eq!(money(0.0), "$0.00");
    }

    #[test]
    fn test_category_usage_sorted_and_guarded() {
        let mut snapshot = snapshot_with(vec![
            expense("1", 850.0, "Food", date(2024, 3, 2)),
            expense("2", 300.0, "Transport", date(2024, 3, 3)),
            expense("3", 50.0, "Pets", date(2024, 3, 3)),
        ]);
        snapshot.categories.push(crate::models::Category::new("Pets", 0.0));

        let usage = category_usage(&snapshot, "Income");
        assert_eq!(usage[0].name, "Food");
        assert_eq!(usage[0].percentage, 106.25);
        assert_eq!(usage[1].name, "Transport");
        assert_eq!(usage[1].percentage, 50.0);
        assert!(usage.iter().all(|u| u.name != "Income"));

        let pets = usage.iter().find(|u| u.name == "Pets").unwrap();
        assert_eq!(pets.used, 50.0);
        assert_eq!(pets.percentage, 0.0);

        // zero-percentage categories keep enumeration order
        let zero: Vec<&str> = usage
            .iter()
            .filter(|u| u.percentage == 0.0)
            .map(|u| u.name.as_str())
            .collect();
        assert_eq!(zero, vec!["Housing", "Entertainment", "Health", "Education", "Pets"]);
    }

    #[test]
    fn test_usage_percentage_monotonic() {
        let mut txs = vec![];
        let mut last = 0.0;
        for i in 0..5 {
            txs.push(expense(&i.to_string(), 75.0, "Food", date(2024, 3, 1 + i)));
            let snapshot = snapshot_with(txs.clone());
            let pct = category_usage(&snapshot, "Income")
                .into_iter()
                .find(|u| u.name == "Food")
                .unwrap()
                .percentage;
            assert!(pct >= last);
            last = pct;
        }
    }

    #[test]
    fn test_top_spending_category() {
        let snapshot = snapshot_with(vec![
            expense("1", 100.0, "Food", date(2024, 3, 2)),
            expense("2", 100.0, "Transport", date(2024, 3, 3)),
            income("3", 9000.0, date(2024, 3, 1)),
        ]);

        let top = top_spending_category(&snapshot, "Income").unwrap();
        assert_eq!(top.name, "Food");
        assert_eq!(top.amount, 100.0);
        assert!(top_spending_category(&snapshot_with(vec![]), "Income").is_none());
    }

    #[test]
    fn test_month_and_day_totals() {
        let snapshot = snapshot_with(vec![
            income("1", 4000.0, date(2024, 3, 1)),
            expense("2", 100.0, "Food", date(2024, 3, 1)),
            expense("3", 40.0, "Food", date(2024, 3, 9)),
            expense("4", 999.0, "Food", date(2024, 2, 29)),
        ]);

        let month = month_totals(&snapshot, date(2024, 3, 20));
        assert_eq!(month.income, 4000.0);
        assert_eq!(month.expenses, 140.0);
        assert_eq!(month.balance(), 3860.0);
        assert_eq!(month.transactions, 3);

        let day = day_totals(&snapshot, date(2024, 3, 1));
        assert_eq!(day.transactions, 2);
        assert_eq!(day.balance(), 3900.0);
        assert_eq!(day_transactions(&snapshot, date(2024, 3, 9)).len(), 1);
    }

    #[test]
    fn test_monthly_series_oldest_first() {
        let snapshot = snapshot_with(vec![
            expense("1", 10.0, "Food", date(2023, 12, 5)),
            expense("2", 20.0, "Food", date(2024, 2, 5)),
        ]);

        let series = monthly_series(&snapshot, date(2024, 2, 29), 3);
        let labels: Vec<(i32, u32, f64)> =
            series.iter().map(|p| (p.year, p.month, p.expenses)).collect();
        assert_eq!(labels, vec![(2023, 12, 10.0), (2024, 1, 0.0), (2024, 2, 20.0)]);
    }

    #[test]
    fn test_expense_shares() {
        let snapshot = snapshot_with(vec![
            expense("1", 750.0, "Housing", date(2024, 3, 2)),
            expense("2", 250.0, "Food", date(2024, 3, 3)),
        ]);
        let shares = expense_shares(&snapshot, "Income");
        assert_eq!(shares[0], ("Housing".to_string(), 75.0));
        assert_eq!(shares[1], ("Food".to_string(), 25.0));
    }
}
