//! Positional color assignment.

use ratatui::style::Color;

/// Slice colors for the dashboard overview charts.
pub const DASHBOARD_PALETTE: [Color; 8] = [
    Color::Rgb(0x00, 0x88, 0xFE),
    Color::Rgb(0x00, 0xC4, 0x9F),
    Color::Rgb(0xFF, 0xBB, 0x28),
    Color::Rgb(0xFF, 0x80, 0x42),
    Color::Rgb(0xAA, 0x00, 0xFF),
    Color::Rgb(0xFF, 0x4C, 0x4C),
    Color::Rgb(0x00, 0xD1, 0xB2),
    Color::Rgb(0xFF, 0x69, 0xB4),
];

/// Slice colors for the user distribution pies.
pub const PIE_PALETTE: [Color; 4] = [
    Color::Rgb(0x00, 0x88, 0xFE),
    Color::Rgb(0x00, 0xC4, 0x9F),
    Color::Rgb(0xFF, 0xBB, 0x28),
    Color::Rgb(0xFF, 0x80, 0x42),
];

/// Color for the series position `index`, wrapping around the palette.
///
/// Colors follow position, not label, so a refreshed series keeps its colors
/// slot by slot. Returns `None` only for an empty palette.
pub fn color_of<T: Clone>(index: usize, palette: &[T]) -> Option<T> {
    if palette.is_empty() {
        return None;
    }
    palette.get(index % palette.len()).cloned()
}

/// `#RRGGBB` for a palette color, used in text and JSON output.
pub fn color_hex(color: Color) -> String {
    match color {
        Color::Rgb(r, g, b) => format!("#{r:02X}{g:02X}{b:02X}"),
        other => other.to_string(),
    }
}
