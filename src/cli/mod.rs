//! Command-line parsing for the stats dashboard.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! fetch and transformation code.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use ratatui::style::Color;

use crate::data::{RequestOptions, URL_ENV};
use crate::report::SeriesView;
use crate::view::theme::parse_accent;
use crate::view::{Theme, ThemeMode};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "statdash", version, about = "Terminal dashboard for an aggregate stats endpoint")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Launch the interactive dashboard (default).
    Tui(TuiArgs),
    /// Fetch once and print every stat as a card table.
    Cards(SourceArgs),
    /// Fetch once and print one chart series.
    Series(SeriesArgs),
}

/// Where and how to fetch.
#[derive(Debug, Args, Clone)]
pub struct SourceArgs {
    /// Stats endpoint URL.
    #[arg(long, env = URL_ENV)]
    pub url: Option<String>,

    /// Request timeout in seconds (no timeout when omitted).
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Extra request header, `Name: Value` (repeatable).
    #[arg(long = "header", value_name = "NAME: VALUE", value_parser = RequestOptions::parse_header)]
    pub headers: Vec<(String, String)>,

    /// Debug-level logging for this crate.
    #[arg(short, long)]
    pub verbose: bool,
}

impl SourceArgs {
    pub fn request_options(&self) -> RequestOptions {
        RequestOptions {
            timeout: self.timeout_secs.map(Duration::from_secs),
            headers: self.headers.clone(),
        }
    }
}

#[derive(Debug, Args, Clone)]
pub struct TuiArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Accent color for card labels and bars (#RRGGBB).
    #[arg(long, value_parser = parse_accent, default_value = "#03C9D7")]
    pub accent: Color,

    #[arg(long, value_enum, default_value_t = ThemeMode::Dark)]
    pub mode: ThemeMode,

    /// Write logs to this file (the TUI never logs to the terminal).
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

impl TuiArgs {
    pub fn theme(&self) -> Theme {
        Theme {
            accent: self.accent,
            mode: self.mode,
        }
    }
}

#[derive(Debug, Args, Clone)]
pub struct SeriesArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Which series to build.
    #[arg(long, value_enum, default_value_t = SeriesView::Dashboard)]
    pub view: SeriesView,

    /// Also write the series to a JSON file.
    #[arg(long, value_name = "JSON")]
    pub export: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn series_args_parse() {
        let cli = Cli::parse_from([
            "statdash",
            "series",
            "--url",
            "http://localhost:9/stats",
            "--view",
            "new-users",
            "--header",
            "X-Key: abc",
            "--timeout-secs",
            "5",
        ]);
        let Command::Series(args) = cli.command else {
            panic!("expected series command");
        };
        assert_eq!(args.view, SeriesView::NewUsers);
        assert_eq!(args.source.url.as_deref(), Some("http://localhost:9/stats"));
        let options = args.source.request_options();
        assert_eq!(options.headers, vec![("X-Key".to_string(), "abc".to_string())]);
        assert_eq!(options.timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn tui_accent_parses_hex() {
        let cli = Cli::parse_from(["statdash", "tui", "--accent", "#FF0000", "--mode", "light"]);
        let Command::Tui(args) = cli.command else {
            panic!("expected tui command");
        };
        assert_eq!(args.theme().accent, Color::Rgb(0xFF, 0, 0));
        assert_eq!(args.theme().mode, ThemeMode::Light);
    }
}
