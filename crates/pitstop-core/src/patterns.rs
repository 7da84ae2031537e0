//! Spending pattern analysis
//!
//! Per category: how often money goes out, the average ticket, whether the
//! ticket size is trending and how predictable it is.

use tracing::{debug, warn};

use crate::config::PatternConfig;
use crate::models::{Snapshot, SpendFrequency, SpendingPattern, Transaction, Trend};
use crate::stats::{mean, std_dev};

/// One pattern per category with at least one expense, in category order
pub fn analyze_patterns(snapshot: &Snapshot, config: &PatternConfig) -> Vec<SpendingPattern> {
    let orphaned = snapshot
        .expenses()
        .filter(|t| snapshot.category(&t.category).is_none())
        .count();
    if orphaned > 0 {
        warn!(count = orphaned, "Expenses reference unknown categories, skipping them");
    }

    let patterns: Vec<SpendingPattern> = snapshot
        .categories
        .iter()
        .filter_map(|category| {
            let mut txs = snapshot.category_expenses(&category.name);
            if txs.is_empty() {
                return None;
            }
            txs.sort_by_key(|t| t.date);

            let amounts: Vec<f64> = txs.iter().map(|t| t.amount).collect();
            Some(SpendingPattern {
                category: category.name.clone(),
                frequency: spend_frequency(&txs, config),
                average_amount: mean(&amounts),
                trend: spend_trend(&amounts, config),
                predictability: predictability(&amounts, config.min_transactions),
            })
        })
        .collect();

    debug!(count = patterns.len(), "Spending patterns analyzed");
    patterns
}

/// Bucket by the average day gap between consecutive (date-sorted) transactions
pub fn spend_frequency(sorted: &[&Transaction], config: &PatternConfig) -> SpendFrequency {
    if sorted.len() < 2 {
        return SpendFrequency::Irregular;
    }

    let gaps: Vec<f64> = sorted
        .windows(2)
        .map(|w| (w[1].date - w[0].date).num_days() as f64)
        .collect();
    let average_gap = mean(&gaps);

    if average_gap <= config.daily_max_gap_days {
        SpendFrequency::Daily
    } else if average_gap <= config.weekly_max_gap_days {
        SpendFrequency::Weekly
    } else if average_gap <= config.monthly_max_gap_days {
        SpendFrequency::Monthly
    } else {
        SpendFrequency::Irregular
    }
}

/// Compare the mean of the older half to the newer half. With an odd count
/// the extra element lands in the newer half.
pub fn spend_trend(sorted_amounts: &[f64], config: &PatternConfig) -> Trend {
    if sorted_amounts.len() < config.min_transactions.max(2) {
        return Trend::Stable;
    }

    let (older, newer) = sorted_amounts.split_at(sorted_amounts.len() / 2);
    let older_mean = mean(older);
    if older_mean <= 0.0 {
        return Trend::Stable;
    }

    let change = (mean(newer) - older_mean) / older_mean;
    if change > config.trend_change {
        Trend::Increasing
    } else if change < -config.trend_change {
        Trend::Decreasing
    } else {
        Trend::Stable
    }
}

/// `max(0, 1 - stddev / mean)`
pub fn predictability(amounts: &[f64], min_transactions: usize) -> f64 {
    if amounts.len() < min_transactions {
        return 0.0;
    }
    let m = mean(amounts);
    if m <= 0.0 {
        return 0.0;
    }
    (1.0 - std_dev(amounts) / m).max(0.0)
}
