//! Small numeric helpers shared by the analyzers
//!
//! Every helper is total: empty input yields 0 (or 1 for month spans) rather
//! than NaN, so callers never have to special-case division by zero.

use chrono::{Datelike, NaiveDate};

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation
pub fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// `part / whole * 100`, or 0 when `whole` is not positive
pub fn percentage(part: f64, whole: f64) -> f64 {
    if whole <= 0.0 {
        return 0.0;
    }
    part / whole * 100.0
}

/// Number of calendar months from the earliest to the latest date, inclusive.
/// Never less than 1.
pub fn months_spanned(dates: impl IntoIterator<Item = NaiveDate>) -> u32 {
    let mut range: Option<(NaiveDate, NaiveDate)> = None;
    for d in dates {
        range = Some(match range {
            None => (d, d),
            Some((lo, hi)) => (lo.min(d), hi.max(d)),
        });
    }

    let Some((first, last)) = range else {
        return 1;
    };

    let months = (last.year() - first.year()) * 12 + last.month() as i32 - first.month() as i32 + 1;
    months.max(1) as u32
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(30)
}

pub fn same_month(a: NaiveDate, b: NaiveDate) -> bool {
    a.year() == b.year() && a.month() == b.month()
}

/// Clamp a heuristic score into the 1-10 impact range
pub fn impact_score(raw: f64) -> u8 {
    if !raw.is_finite() {
        return 1;
    }
    raw.floor().clamp(1.0, 10.0) as u8
}
