//! Chart series builders.
//!
//! Two paths produce `ChartPoint`s:
//!
//! - `to_series`: the general path over normalized entries (bar + pie overview)
//! - fixed-field builders that read a closed set of fields straight from the
//!   payload (area view, the two pie datasets)

use crate::domain::{ChartPoint, StatEntry, StatsPayload};

/// Labels longer than this are cut and suffixed with `TRUNCATION_MARKER`.
pub const MAX_LABEL_CHARS: usize = 25;
pub const TRUNCATION_MARKER: &str = "...";

/// Keep numeric entries, shorten their labels, preserve order.
pub fn to_series(entries: &[StatEntry]) -> Vec<ChartPoint> {
    entries
        .iter()
        .filter_map(|entry| {
            let value = entry.value.as_number()?;
            Some(ChartPoint::new(truncate_label(&entry.label), value))
        })
        .collect()
}

/// Shorten a label to at most `MAX_LABEL_CHARS` characters plus the marker.
pub fn truncate_label(label: &str) -> String {
    match label.char_indices().nth(MAX_LABEL_CHARS) {
        None => label.to_string(),
        Some((cut, _)) => format!("{}{TRUNCATION_MARKER}", &label[..cut]),
    }
}

/// Display name -> payload key, for the area view.
pub const DEPOSIT_FIELDS: [(&str, &str); 3] = [
    ("User Deposit", "totalDepositAmount"),
    ("Admin Deposit", "totalAdminDepositAmount"),
    ("Admin Bonus", "totalAdminBonusAmount"),
];

/// User growth over fixed windows (pie dataset 1).
pub const NEW_USER_FIELDS: [&str; 3] = [
    "todaysUserAddition",
    "lastSevenDaysUserAddition",
    "lastThirtyDaysUsersAddition",
];

/// Active users over fixed windows (pie dataset 2).
pub const ACTIVE_USER_FIELDS: [&str; 3] = ["dailyActiveUsers", "weeklyActiveUsers", "monthlyActiveUsers"];

/// Deposits and bonuses comparison.
pub fn deposit_series(payload: &StatsPayload) -> Vec<ChartPoint> {
    DEPOSIT_FIELDS
        .iter()
        .map(|(name, key)| ChartPoint::new(*name, payload.number_or_zero(key)))
        .collect()
}

pub fn new_users_series(payload: &StatsPayload) -> Vec<ChartPoint> {
    fields_by_key(payload, &NEW_USER_FIELDS)
}

pub fn active_users_series(payload: &StatsPayload) -> Vec<ChartPoint> {
    fields_by_key(payload, &ACTIVE_USER_FIELDS)
}

fn fields_by_key(payload: &StatsPayload, keys: &[&str]) -> Vec<ChartPoint> {
    keys.iter()
        .map(|key| ChartPoint::new(*key, payload.number_or_zero(key)))
        .collect()
}

/// Whole-percent share of each point in the series total.
///
/// Negative values count as zero. A zero total yields all zeros.
pub fn share_percent(series: &[ChartPoint]) -> Vec<u32> {
    let total: f64 = series.iter().map(|p| p.value.max(0.0)).sum();
    if !(total.is_finite() && total > 0.0) {
        return vec![0; series.len()];
    }
    series
        .iter()
        .map(|p| (p.value.max(0.0) / total * 100.0).round() as u32)
        .collect()
}
