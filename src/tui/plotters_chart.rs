//! Plotters-powered area and pie chart widgets for Ratatui.
//!
//! Ratatui has bar charts but no area fill or pie, so these two are drawn with
//! Plotters and rendered into the Ratatui buffer through
//! `plotters-ratatui-backend`.

use std::f64::consts::TAU;

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color as TuiColor, Style},
    widgets::Widget,
};

use crate::domain::{ChartPoint, format_number};
use crate::stats::color_of;

/// Points per full turn when approximating a pie arc.
const ARC_STEPS_PER_TURN: usize = 96;

/// Terminal cells are roughly twice as tall as they are wide.
const CELL_ASPECT: f64 = 2.0;

/// Filled area chart over a small categorical series.
pub struct AreaChart<'a> {
    pub points: &'a [ChartPoint],
    pub color: TuiColor,
    pub axis_color: TuiColor,
}

impl<'a> Widget for AreaChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 20 || area.height < 8 {
            too_small(area, buf);
            return;
        }
        if self.points.is_empty() {
            return;
        }

        let names: Vec<String> = self.points.iter().map(|p| p.name.clone()).collect();
        let values: Vec<(f64, f64)> = self
            .points
            .iter()
            .enumerate()
            .map(|(i, p)| (i as f64, p.value))
            .collect();
        let x_max = (values.len() as f64 - 1.0).max(1.0);
        let y_max = y_ceiling(self.points);
        let line = to_rgb(self.color);
        let fill = line.mix(0.3);
        let axis = to_rgb(self.axis_color);

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                .set_label_area_size(LabelAreaPosition::Left, 8)
                .set_label_area_size(LabelAreaPosition::Bottom, 2)
                .build_cartesian_2d(-0.25..x_max + 0.25, 0.0..y_max)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .x_labels(names.len().max(2))
                .y_labels(5)
                .x_label_formatter(&|x| category_label(&names, *x))
                .y_label_formatter(&|y| format_number(y.round()))
                .label_style(("sans-serif", 10).into_font().color(&axis))
                .axis_style(&axis)
                .bold_line_style(&axis.mix(0.3))
                .draw()?;

            chart.draw_series(
                AreaSeries::new(values.iter().copied(), 0.0, &fill).border_style(&line),
            )?;

            Ok(())
        });

        widget.render(area, buf);
    }
}

/// Pie chart; colors follow series position through the palette.
pub struct PieChart<'a> {
    pub points: &'a [ChartPoint],
    pub palette: &'a [TuiColor],
    /// Outer radius as a fraction of the largest radius that fits.
    pub radius_ratio: f64,
}

impl<'a> Widget for PieChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 10 || area.height < 5 {
            too_small(area, buf);
            return;
        }

        let values: Vec<f64> = self.points.iter().map(|p| p.value).collect();
        let wedges = pie_wedges(&values, self.radius_ratio);
        if wedges.iter().all(Vec::is_empty) {
            buf.set_string(area.x, area.y, "Nothing to chart (all values are zero).", Style::default().fg(TuiColor::Yellow));
            return;
        }
        let colors: Vec<RGBColor> = (0..wedges.len())
            .map(|i| color_of(i, self.palette).map(to_rgb).unwrap_or(WHITE))
            .collect();

        // Stretch the shorter axis so the circle stays round on screen.
        let physical = f64::from(area.width) / (f64::from(area.height) * CELL_ASPECT);
        let (x_half, y_half) = if physical >= 1.0 { (physical, 1.0) } else { (1.0, 1.0 / physical) };

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root).build_cartesian_2d(-x_half..x_half, -y_half..y_half)?;
            for (wedge, color) in wedges.iter().zip(&colors) {
                if wedge.is_empty() {
                    continue;
                }
                chart.draw_series(std::iter::once(Polygon::new(wedge.clone(), color.filled())))?;
            }
            Ok(())
        });

        widget.render(area, buf);
    }
}

/// Polygon outline for every slice, starting at 12 o'clock, clockwise.
///
/// Each non-empty wedge starts and ends at the origin. Zero or negative values
/// produce an empty wedge so indices still line up with the series.
pub fn pie_wedges(values: &[f64], radius: f64) -> Vec<Vec<(f64, f64)>> {
    let total: f64 = values.iter().map(|v| v.max(0.0)).sum();
    if !(total.is_finite() && total > 0.0) {
        return vec![Vec::new(); values.len()];
    }

    let mut start = 0.0_f64;
    values
        .iter()
        .map(|v| {
            let sweep = v.max(0.0) / total * TAU;
            if sweep <= 0.0 {
                return Vec::new();
            }
            let steps = ((sweep / TAU) * ARC_STEPS_PER_TURN as f64).ceil().max(1.0) as usize;
            let mut wedge = Vec::with_capacity(steps + 3);
            wedge.push((0.0, 0.0));
            for s in 0..=steps {
                let angle = start + sweep * (s as f64 / steps as f64);
                wedge.push((radius * angle.sin(), radius * angle.cos()));
            }
            wedge.push((0.0, 0.0));
            start += sweep;
            wedge
        })
        .collect()
}

/// Top of the y axis: 10% headroom over the largest value.
fn y_ceiling(points: &[ChartPoint]) -> f64 {
    let max = points.iter().map(|p| p.value).fold(0.0_f64, f64::max);
    if max > 0.0 { max * 1.1 } else { 1.0 }
}

fn category_label(names: &[String], x: f64) -> String {
    let idx = x.round();
    if (x - idx).abs() > 0.05 || idx < 0.0 {
        return String::new();
    }
    names.get(idx as usize).cloned().unwrap_or_default()
}

fn to_rgb(color: TuiColor) -> RGBColor {
    match color {
        TuiColor::Rgb(r, g, b) => RGBColor(r, g, b),
        TuiColor::Black => BLACK,
        TuiColor::Red | TuiColor::LightRed => RED,
        TuiColor::Green | TuiColor::LightGreen => GREEN,
        TuiColor::Blue | TuiColor::LightBlue => BLUE,
        TuiColor::Yellow | TuiColor::LightYellow => YELLOW,
        TuiColor::Cyan | TuiColor::LightCyan => CYAN,
        TuiColor::Magenta | TuiColor::LightMagenta => MAGENTA,
        TuiColor::Gray | TuiColor::DarkGray => RGBColor(128, 128, 128),
        _ => WHITE,
    }
}

fn too_small(area: Rect, buf: &mut Buffer) {
    buf.set_string(
        area.x,
        area.y,
        "Chart area too small (resize terminal).",
        Style::default().fg(TuiColor::Yellow),
    );
}
