//! Theme inputs handed to the renderer.

use std::str::FromStr;

use clap::ValueEnum;
use ratatui::style::Color;

/// Accent used for stat card labels and bars when none is configured.
pub const DEFAULT_ACCENT: Color = Color::Rgb(0x03, 0xC9, 0xD7);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ThemeMode {
    Light,
    #[default]
    Dark,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Theme {
    pub accent: Color,
    pub mode: ThemeMode,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            accent: DEFAULT_ACCENT,
            mode: ThemeMode::Dark,
        }
    }
}

impl Theme {
    pub fn text(&self) -> Color {
        match self.mode {
            ThemeMode::Dark => Color::White,
            ThemeMode::Light => Color::Black,
        }
    }

    pub fn muted(&self) -> Color {
        match self.mode {
            ThemeMode::Dark => Color::Gray,
            ThemeMode::Light => Color::DarkGray,
        }
    }

    pub fn background(&self) -> Color {
        match self.mode {
            ThemeMode::Dark => Color::Reset,
            ThemeMode::Light => Color::White,
        }
    }

    /// Highlight for the active toggle / tab.
    pub fn active(&self) -> Color {
        self.accent
    }

    /// Background of inactive toggles.
    pub fn inactive(&self) -> Color {
        Color::Rgb(0x00, 0xC4, 0x9F)
    }
}

/// Parse a `#RRGGBB` (or named) color for `--accent`.
pub fn parse_accent(raw: &str) -> Result<Color, String> {
    Color::from_str(raw.trim()).map_err(|_| format!("'{raw}' is not a color (expected #RRGGBB)"))
}
