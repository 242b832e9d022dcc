//! Stat normalization: payload -> ordered, labelled entries.
//!
//! - `normalize` flattens a payload into `StatEntry`s
//! - `series` narrows entries (or fixed payload fields) into chart series
//! - `color` assigns palette colors by series position

use crate::domain::{StatEntry, StatValue, StatsPayload};

pub mod color;
pub mod series;

pub use color::*;
pub use series::*;

/// Keys whose record lists are expanded rather than shown as a single card.
pub const DEFAULT_EXCLUDED_KEYS: &[&str] = &["withdrawData"];

/// Flatten a payload into labelled entries.
///
/// Regular keys come first, in payload order. Excluded keys holding record
/// lists follow, three entries per record, in payload then record order.
pub fn normalize(payload: &StatsPayload, excluded_keys: &[&str]) -> Vec<StatEntry> {
    let is_excluded = |key: &str| excluded_keys.iter().any(|k| *k == key);

    let mut out: Vec<StatEntry> = payload
        .iter()
        .filter(|(key, _)| !is_excluded(*key))
        .map(|(key, value)| StatEntry {
            label: format_label(key),
            value: value.clone(),
        })
        .collect();

    for (_, value) in payload.iter().filter(|(key, _)| is_excluded(*key)) {
        let StatValue::Records(records) = value else {
            continue;
        };
        for record in records {
            out.push(StatEntry {
                label: format!("{} - Total Amount", record.id),
                value: StatValue::Number(record.total_amount),
            });
            out.push(StatEntry {
                label: format!("{} - TDS Amount", record.id),
                value: StatValue::Number(record.tds_amount),
            });
            out.push(StatEntry {
                label: format!("{} - Count", record.id),
                value: StatValue::Number(record.count),
            });
        }
    }

    out
}

/// Turn a camel-case key into a display label.
///
/// A space goes before every uppercase ASCII letter after the first character,
/// then the first character is uppercased: `todaysUserAddition` ->
/// `Todays User Addition`. Runs of capitals are split letter by letter.
pub fn format_label(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 8);
    for (i, c) in key.chars().enumerate() {
        if i == 0 {
            out.extend(c.to_uppercase());
            continue;
        }
        if c.is_ascii_uppercase() {
            out.push(' ');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StatsResponse;

    fn payload(json: &str) -> StatsPayload {
        StatsResponse::from_slice(json.as_bytes()).unwrap().data
    }

    #[test]
    fn format_label_splits_camel_case() {
        assert_eq!(format_label("todaysUserAddition"), "Todays User Addition");
        assert_eq!(format_label("totalDepositAmount"), "Total Deposit Amount");
        assert_eq!(format_label("count"), "Count");
        assert_eq!(format_label(""), "");
    }

    #[test]
    fn format_label_edge_cases() {
        assert_eq!(format_label("totalAPICalls"), "Total A P I Calls");
        assert_eq!(format_label("Users"), "Users");
        assert_eq!(format_label("last7Days"), "Last7 Days");
    }

    #[test]
    fn normalize_expands_withdraw_records() {
        let p = payload(
            r#"{"data":{"withdrawData":[{"_id":"bank","totalAmount":100,"tdsAmount":10,"count":2}]}}"#,
        );
        let entries = normalize(&p, DEFAULT_EXCLUDED_KEYS);
        let got: Vec<(&str, &StatValue)> =
            entries.iter().map(|e| (e.label.as_str(), &e.value)).collect();
        assert_eq!(
            got,
            vec![
                ("bank - Total Amount", &StatValue::Number(100.0)),
                ("bank - TDS Amount", &StatValue::Number(10.0)),
                ("bank - Count", &StatValue::Number(2.0)),
            ]
        );
    }

    #[test]
    fn normalize_appends_expansions_after_regular_keys() {
        let p = payload(
            r#"{"data":{
                "withdrawData":[{"_id":"bank","totalAmount":1,"tdsAmount":0,"count":1},
                                {"_id":"upi","totalAmount":2,"tdsAmount":0,"count":3}],
                "totalUsers":42,
                "status":"healthy"
            }}"#,
        );
        let entries = normalize(&p, DEFAULT_EXCLUDED_KEYS);

        // 2 regular keys + 3 per record.
        assert_eq!(entries.len(), 2 + 3 * 2);
        assert_eq!(entries[0].label, "Total Users");
        assert_eq!(entries[1].label, "Status");
        assert_eq!(entries[1].value, StatValue::Text("healthy".to_string()));
        assert_eq!(entries[2].label, "bank - Total Amount");
        assert_eq!(entries[5].label, "upi - Total Amount");
        assert_eq!(entries[7].label, "upi - Count");
        assert_eq!(entries[7].value, StatValue::Number(3.0));
    }

    #[test]
    fn excluded_key_without_records_is_dropped() {
        let p = payload(r#"{"data":{"withdrawData":"none","a":1}}"#);
        let entries = normalize(&p, DEFAULT_EXCLUDED_KEYS);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].label, "A");
    }

    #[test]
    fn record_lists_under_regular_keys_stay_single_entries() {
        let p = payload(r#"{"data":{"otherData":[{"_id":"x"}]}}"#);
        let entries = normalize(&p, DEFAULT_EXCLUDED_KEYS);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].label, "Other Data");
    }
}
