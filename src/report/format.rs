//! Plain-text tables for the one-shot commands.
//!
//! We keep formatting code in one place so output changes stay localized and
//! the normalizer/series code stays free of presentation concerns.

use ratatui::style::Color;

use crate::domain::{ChartPoint, StatEntry, StatsResponse};
use crate::stats::{color_hex, color_of, share_percent};

const LABEL_WIDTH: usize = 32;

/// Header line shared by both reports.
pub fn format_header(title: &str, resp: &StatsResponse) -> String {
    format!(
        "=== statdash - {title} ===\nFetched: {} | fields: {}\n",
        resp.received_at.format("%Y-%m-%d %H:%M:%S"),
        resp.data.len()
    )
}

/// Stat cards as a two-column table, in normalized order.
pub fn format_cards(entries: &[StatEntry]) -> String {
    let mut out = String::new();
    out.push_str(&format!("{:<LABEL_WIDTH$} {:>14}\n", "stat", "value"));
    out.push_str(&format!("{:-<LABEL_WIDTH$} {:-<14}\n", "", ""));
    for entry in entries {
        out.push_str(
            format!(
                "{:<LABEL_WIDTH$} {:>14}\n",
                truncate(&entry.label, LABEL_WIDTH),
                entry.value.to_string()
            )
            .trim_end(),
        );
        out.push('\n');
    }
    if entries.is_empty() {
        out.push_str("(no stats)\n");
    }
    out
}

/// Chart series with value, share of total and assigned color.
pub fn format_series(series: &[ChartPoint], palette: &[Color]) -> String {
    let shares = share_percent(series);
    let mut out = String::new();
    out.push_str(&format!(
        "{:<28} {:>14} {:>6} {:<8}\n",
        "name", "value", "share", "color"
    ));
    out.push_str(&format!("{:-<28} {:-<14} {:-<6} {:-<8}\n", "", "", "", ""));
    for (i, (point, share)) in series.iter().zip(&shares).enumerate() {
        let color = color_of(i, palette).map(color_hex).unwrap_or_default();
        out.push_str(&format!(
            "{:<28} {:>14} {:>5}% {:<8}\n",
            point.name,
            crate::domain::format_number(point.value),
            share,
            color
        ));
    }
    if series.is_empty() {
        out.push_str("(no numeric stats)\n");
    }
    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StatValue;
    use crate::stats::PIE_PALETTE;

    #[test]
    fn cards_table_lists_every_entry() {
        let entries = vec![
            StatEntry {
                label: "Total Users".to_string(),
                value: StatValue::Number(42.0),
            },
            StatEntry {
                label: "Status".to_string(),
                value: StatValue::Text("ok".to_string()),
            },
        ];
        let out = format_cards(&entries);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[2].starts_with("Total Users"));
        assert!(lines[2].ends_with("42"));
        assert!(lines[3].ends_with("ok"));
    }

    #[test]
    fn series_table_shows_share_and_color() {
        let series = vec![ChartPoint::new("a", 30.0), ChartPoint::new("b", 10.0)];
        let out = format_series(&series, &PIE_PALETTE);
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[2].contains("75%"));
        assert!(lines[2].contains("#0088FE"));
        assert!(lines[3].contains("25%"));
        assert!(lines[3].contains("#00C49F"));
    }

    #[test]
    fn empty_inputs_say_so() {
        assert!(format_cards(&[]).contains("(no stats)"));
        assert!(format_series(&[], &PIE_PALETTE).contains("(no numeric stats)"));
    }
}
