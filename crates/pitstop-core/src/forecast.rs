//! Cash-flow projection and lifestyle-creep detection
//!
//! Both predictions divide totals by the number of calendar months the
//! contributing transactions span (inclusive, at least 1).

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ForecastConfig;
use crate::models::{PredictionKind, PredictiveInsight, Snapshot, Transaction};
use crate::stats::{days_in_month, months_spanned, same_month};

/// Total divided by the months spanned by the given transactions
pub fn monthly_average(txs: &[&Transaction]) -> f64 {
    let total: f64 = txs.iter().map(|t| t.amount).sum();
    if total == 0.0 {
        return 0.0;
    }
    total / months_spanned(txs.iter().map(|t| t.date)) as f64
}

/// Project where this month ends up given the burn rate so far
pub fn predict_cash_flow(
    snapshot: &Snapshot,
    today: NaiveDate,
    config: &ForecastConfig,
) -> PredictiveInsight {
    let incomes: Vec<&Transaction> = snapshot.incomes().collect();
    let expenses: Vec<&Transaction> = snapshot.expenses().collect();
    let average_monthly_income = monthly_average(&incomes);
    let average_monthly_expense = monthly_average(&expenses);

    let current_month_expense: f64 = expenses
        .iter()
        .filter(|t| same_month(t.date, today))
        .map(|t| t.amount)
        .sum();

    let day = today.day();
    let remaining_days = days_in_month(today.year(), today.month()).saturating_sub(day);
    let daily_burn_rate = current_month_expense / day as f64;
    let projected_expense = current_month_expense + daily_burn_rate * remaining_days as f64;
    let projected_balance = average_monthly_income - projected_expense;

    debug!(
        income = average_monthly_income,
        projected_expense,
        projected_balance,
        "Cash flow projected"
    );

    let (prediction, confidence, recommended_actions) = if projected_balance > 0.0 {
        (
            format!("Expected surplus of ${:.2} at the end of the month", projected_balance),
            config.surplus_confidence,
            vec![
                "Consider moving part of the surplus into savings".to_string(),
                "Check whether you can reach your financial goals sooner".to_string(),
            ],
        )
    } else {
        (
            format!(
                "Expected deficit of ${:.2} at the end of the month",
                projected_balance.abs()
            ),
            config.deficit_confidence,
            vec![
                "Cut non-essential expenses".to_string(),
                "Postpone large purchases to next month".to_string(),
                "Look into additional sources of income".to_string(),
            ],
        )
    };

    PredictiveInsight {
        kind: PredictionKind::CashFlow,
        prediction,
        confidence,
        timeframe: "End of the current month".to_string(),
        recommended_actions,
        projected_balance,
        average_monthly_income,
        average_monthly_expense,
        current_month_expense,
        daily_burn_rate,
    }
}

/// Measured increase in monthly spending between two adjacent windows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreepReport {
    pub recent_monthly: f64,
    pub previous_monthly: f64,
    /// Relative increase, e.g. 0.3 for +30%
    pub increase: f64,
    pub window_months: u32,
}

/// Compare average monthly spending over the last `creep_window_months`
/// against the window before it. `None` when either window is empty, the
/// older window has no spend, or the increase stays under the threshold.
pub fn detect_lifestyle_creep(
    snapshot: &Snapshot,
    today: NaiveDate,
    config: &ForecastConfig,
) -> Option<CreepReport> {
    let window = Months::new(config.creep_window_months);
    let recent_start = today.checked_sub_months(window)?;
    let previous_start = recent_start.checked_sub_months(window)?;

    let recent: Vec<&Transaction> = snapshot
        .expenses()
        .filter(|t| t.date >= recent_start && t.date <= today)
        .collect();
    let previous: Vec<&Transaction> = snapshot
        .expenses()
        .filter(|t| t.date >= previous_start && t.date < recent_start)
        .collect();

    if recent.is_empty() || previous.is_empty() {
        return None;
    }

    let recent_monthly = monthly_average(&recent);
    let previous_monthly = monthly_average(&previous);
    if previous_monthly <= 0.0 {
        return None;
    }

    let increase = (recent_monthly - previous_monthly) / previous_monthly;
    debug!(recent_monthly, previous_monthly, increase, "Lifestyle creep measured");

    if increase <= config.creep_threshold {
        return None;
    }

    Some(CreepReport {
        recent_monthly,
        previous_monthly,
        increase,
        window_months: config.creep_window_months,
    })
}

impl CreepReport {
    /// Render as a forward-looking prediction record
    pub fn to_prediction(&self, config: &ForecastConfig) -> PredictiveInsight {
        PredictiveInsight {
            kind: PredictionKind::LifestyleCreep,
            prediction: format!(
                "Monthly spending is up {:.1}% over the last {} months",
                self.increase * 100.0,
                self.window_months
            ),
            confidence: config.creep_confidence,
            timeframe: format!("Last {} months", self.window_months),
            recommended_actions: vec![
                "Review newly added expenses".to_string(),
                "Identify expenses that can be trimmed".to_string(),
                "Set a fixed monthly budget".to_string(),
            ],
            projected_balance: -(self.recent_monthly - self.previous_monthly),
            average_monthly_income: 0.0,
            average_monthly_expense: self.recent_monthly,
            current_month_expense: 0.0,
            daily_burn_rate: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{date, expense, income, snapshot_with};

    fn config() -> ForecastConfig {
        ForecastConfig::default()
    }

    #[test]
    fn test_cash_flow_surplus() {
        let snapshot = snapshot_with(vec![
            income("i1", 5000.0, date(2024, 5, 1)),
            income("i2", 5000.0, date(2024, 6, 1)),
            expense("e1", 1000.0, "Housing", date(2024, 6, 2)),
            expense("e2", 500.0, "Food", date(2024, 6, 10)),
        ]);

        // June has 30 days; day 15 -> burn 100/day, 15 days left
        let p = predict_cash_flow(&snapshot, date(2024, 6, 15), &config());
        assert_eq!(p.kind, PredictionKind::CashFlow);
        assert_eq!(p.average_monthly_income, 5000.0);
        assert_eq!(p.current_month_expense, 1500.0);
        assert_eq!(p.daily_burn_rate, 100.0);
        assert_eq!(p.projected_balance, 2000.0);
        assert_eq!(p.confidence, 0.7);
        assert_eq!(p.recommended_actions.len(), 2);
    }

    #[test]
    fn test_cash_flow_deficit_without_income() {
        let snapshot = snapshot_with(vec![expense("e1", 300.0, "Food", date(2024, 2, 10))]);

        let p = predict_cash_flow(&snapshot, date(2024, 2, 10), &config());
        assert!(p.projected_balance < 0.0);
        assert_eq!(p.average_monthly_income, 0.0);
        assert_eq!(p.confidence, 0.8);
        assert_eq!(p.recommended_actions.len(), 3);
    }

    #[test]
    fn test_cash_flow_empty_snapshot() {
        let p = predict_cash_flow(&snapshot_with(vec![]), date(2024, 2, 29), &config());
        assert_eq!(p.projected_balance, 0.0);
        assert_eq!(p.daily_burn_rate, 0.0);
        assert_eq!(p.confidence, 0.8);
    }

    fn creep_snapshot(previous: f64, recent: f64) -> Snapshot {
        snapshot_with(vec![
            expense("p1", previous, "Housing", date(2024, 2, 1)),
            expense("p2", previous, "Housing", date(2024, 3, 1)),
            expense("p3", previous, "Housing", date(2024, 4, 1)),
            expense("r1", recent, "Housing", date(2024, 5, 1)),
            expense("r2", recent, "Housing", date(2024, 6, 1)),
            expense("r3", recent, "Housing", date(2024, 7, 1)),
        ])
    }

    #[test]
    fn test_lifestyle_creep_detected() {
        let report =
            detect_lifestyle_creep(&creep_snapshot(1000.0, 1300.0), date(2024, 7, 15), &config())
                .unwrap();

        assert_eq!(report.previous_monthly, 1000.0);
        assert_eq!(report.recent_monthly, 1300.0);
        assert!((report.increase - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_lifestyle_creep_below_threshold() {
        let report =
            detect_lifestyle_creep(&creep_snapshot(1000.0, 1100.0), date(2024, 7, 15), &config());
        assert!(report.is_none());
    }

    #[test]
    fn test_lifestyle_creep_needs_both_windows() {
        let snapshot = snapshot_with(vec![expense("r1", 900.0, "Food", date(2024, 7, 1))]);
        assert!(detect_lifestyle_creep(&snapshot, date(2024, 7, 15), &config()).is_none());
    }

    #[test]
    fn test_creep_prediction_record() {
        let report =
            detect_lifestyle_creep(&creep_snapshot(1000.0, 1300.0), date(2024, 7, 15), &config())
                .unwrap();
        let p = report.to_prediction(&config());
        assert_eq!(p.kind, PredictionKind::LifestyleCreep);
        assert!(p.prediction.contains("30.0%"));
        assert_eq!(p.projected_balance, -300.0);
    }
}
