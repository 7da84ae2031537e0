//! Detection over transaction history
//!
//! Detects:
//! - Amount anomalies: expenses far from their category's usual ticket
//! - Recurring charges: identical (description, amount) pairs seen repeatedly

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::AnomalyConfig;
use crate::models::{Anomaly, AnomalyKind, Snapshot};
use crate::stats::{impact_score, mean, std_dev};

const VERIFY_ACTION: &str = "Verify this charge is legitimate and not an error";
const REDUCE_ACTION: &str = "Consider whether similar spending can be reduced in the future";

/// Flag expenses whose z-score within their category exceeds the threshold.
///
/// Output follows category order, then transaction order within the category.
pub fn detect_anomalies(snapshot: &Snapshot, config: &AnomalyConfig) -> Vec<Anomaly> {
    let mut anomalies = Vec::new();

    for category in &snapshot.categories {
        let txs = snapshot.category_expenses(&category.name);
        if txs.len() < config.min_transactions {
            continue;
        }

        let amounts: Vec<f64> = txs.iter().map(|t| t.amount).collect();
        let avg = mean(&amounts);
        let sd = std_dev(&amounts);
        if sd == 0.0 {
            continue;
        }

        for t in txs {
            let z = (t.amount - avg).abs() / sd;
            if z <= config.z_threshold {
                continue;
            }

            anomalies.push(Anomaly {
                transaction_id: t.id.clone(),
                kind: AnomalyKind::Amount,
                severity: impact_score(z),
                description: format!(
                    "Unusual {} expense: ${:.2} (average ${:.0})",
                    category.name, t.amount, avg
                ),
                suggested_action: if z > config.severe_z {
                    VERIFY_ACTION.to_string()
                } else {
                    REDUCE_ACTION.to_string()
                },
            });
        }
    }

    debug!(count = anomalies.len(), "Anomaly detection complete");
    anomalies
}

/// A charge that repeats with the exact same description and amount
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurringCharge {
    pub description: String,
    pub amount: f64,
    /// Number of occurrences
    pub frequency: usize,
    pub category: String,
}

/// Group expenses by exact (description, amount) and keep groups with at
/// least `min_occurrences` members, in order of first appearance.
pub fn identify_recurring(snapshot: &Snapshot, min_occurrences: usize) -> Vec<RecurringCharge> {
    let mut index: HashMap<(&str, u64), usize> = HashMap::new();
    let mut groups: Vec<RecurringCharge> = Vec::new();

    for t in snapshot.expenses() {
        let key = (t.description.as_str(), t.amount.to_bits());
        match index.get(&key) {
            Some(&i) => groups[i].frequency += 1,
            None => {
                index.insert(key, groups.len());
                groups.push(RecurringCharge {
                    description: t.description.clone(),
                    amount: t.amount,
                    frequency: 1,
                    category: t.category.clone(),
                });
            }
        }
    }

    groups.retain(|g| g.frequency >= min_occurrences.max(1));
    debug!(count = groups.len(), "Recurring charges identified");
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{date, expense, expense_with, snapshot_with};

    fn config() -> AnomalyConfig {
        AnomalyConfig::default()
    }

    /// `baseline` expenses of 100 plus one outlier. A lone outlier among n
    /// values always has z = sqrt(n - 1), whatever its size.
    fn food_with_outlier(baseline: u32, outlier: f64) -> Snapshot {
        let mut txs: Vec<_> = (1..=baseline)
            .map(|d| expense(&format!("f{}", d), 100.0, "Food", date(2024, 3, d)))
            .collect();
        txs.push(expense("big", outlier, "Food", date(2024, 3, 28)));
        snapshot_with(txs)
    }

    #[test]
    fn test_flags_outlier_with_severity() {
        // mean 190, std 270, z(1000) = 3.0
        let anomalies = detect_anomalies(&food_with_outlier(9, 1000.0), &config());

        assert_eq!(anomalies.len(), 1);
        let a = &anomalies[0];
        assert_eq!(a.transaction_id, "big");
        assert_eq!(a.kind, AnomalyKind::Amount);
        assert_eq!(a.severity, 3);
        // z == 3 is not above the severe band
        assert_eq!(a.suggested_action, REDUCE_ACTION);
    }

    #[test]
    fn test_severe_outlier_asks_for_verification() {
        // z = sqrt(19) ~ 4.36
        let anomalies = detect_anomalies(&food_with_outlier(19, 5000.0), &config());
        assert_eq!(anomalies.len(), 1);
        assert_eq!(anomalies[0].suggested_action, VERIFY_ACTION);
        assert_eq!(anomalies[0].severity, 4);
    }

    #[test]
    fn test_needs_three_transactions() {
        let snapshot = snapshot_with(vec![
            expense("1", 10.0, "Food", date(2024, 3, 1)),
            expense("2", 10_000.0, "Food", date(2024, 3, 2)),
        ]);
        assert!(detect_anomalies(&snapshot, &config()).is_empty());
    }

    #[test]
    fn test_zero_deviation_never_flags() {
        let snapshot = snapshot_with(
            (1..=6)
                .map(|d| expense(&d.to_string(), 42.0, "Health", date(2024, 3, d)))
                .collect(),
        );
        assert!(detect_anomalies(&snapshot, &config()).is_empty());
    }

    #[test]
    fn test_recurring_charges_in_first_seen_order() {
        let mut txs: Vec<_> = (1..=5)
            .map(|m| expense_with(&format!("n{}", m), 50.0, "Netflix", "Entertainment", date(2024, m, 3)))
            .collect();
        txs.insert(0, expense_with("g1", 30.0, "Gym", "Health", date(2023, 12, 1)));
        txs.push(expense_with("g2", 30.0, "Gym", "Health", date(2024, 6, 1)));
        txs.push(expense_with("x", 51.0, "Netflix", "Entertainment", date(2024, 6, 3)));

        let recurring = identify_recurring(&snapshot_with(txs), 2);
        assert_eq!(recurring.len(), 2);
        assert_eq!(recurring[0].description, "Gym");
        assert_eq!(recurring[0].frequency, 2);
        assert_eq!(recurring[1].description, "Netflix");
        assert_eq!(recurring[1].amount, 50.0);
        assert_eq!(recurring[1].frequency, 5);
        assert_eq!(recurring[1].category, "Entertainment");
    }
}
