//! Export a chart series to JSON.
//!
//! The export is meant to be easy to feed into other charting tools: every
//! point carries its share of the total and the color the dashboard gives it.

use std::fs::File;
use std::path::Path;

use chrono::{DateTime, Local};
use ratatui::style::Color;
use serde::Serialize;

use crate::domain::ChartPoint;
use crate::error::{AppError, EXIT_IO};
use crate::stats::{color_hex, color_of, share_percent};

#[derive(Debug, Serialize)]
pub struct SeriesFile {
    pub tool: String,
    pub view: String,
    pub fetched_at: DateTime<Local>,
    pub points: Vec<ExportPoint>,
}

#[derive(Debug, Serialize)]
pub struct ExportPoint {
    pub name: String,
    pub value: f64,
    pub share_percent: u32,
    pub color: String,
}

impl SeriesFile {
    pub fn new(view: &str, fetched_at: DateTime<Local>, series: &[ChartPoint], palette: &[Color]) -> Self {
        let shares = share_percent(series);
        let points = series
            .iter()
            .zip(shares)
            .enumerate()
            .map(|(i, (point, share))| ExportPoint {
                name: point.name.clone(),
                value: point.value,
                share_percent: share,
                color: color_of(i, palette).map(color_hex).unwrap_or_default(),
            })
            .collect();
        Self {
            tool: "statdash".to_string(),
            view: view.to_string(),
            fetched_at,
            points,
        }
    }
}

/// Write a series JSON file.
pub fn write_series_json(path: &Path, file: &SeriesFile) -> Result<(), AppError> {
    let out = File::create(path)
        .map_err(|e| AppError::new(EXIT_IO, format!("Failed to create series JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(out, file)
        .map_err(|e| AppError::new(EXIT_IO, format!("Failed to write series JSON: {e}")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::DASHBOARD_PALETTE;

    #[test]
    fn series_file_assigns_positional_colors() {
        let series: Vec<ChartPoint> = (0..10).map(|i| ChartPoint::new(format!("p{i}"), 1.0)).collect();
        let file = SeriesFile::new("dashboard", Local::now(), &series, &DASHBOARD_PALETTE);
        assert_eq!(file.points.len(), 10);
        assert_eq!(file.points[0].color, "#0088FE");
        assert_eq!(file.points[8].color, file.points[0].color);
        assert_eq!(file.points[9].share_percent, 10);
    }

    #[test]
    fn write_series_json_reports_bad_path() {
        let file = SeriesFile::new("area", Local::now(), &[], &DASHBOARD_PALETTE);
        let err = write_series_json(Path::new("/nonexistent-dir/statdash/out.json"), &file).unwrap_err();
        assert_eq!(err.exit_code(), EXIT_IO);
    }
}
