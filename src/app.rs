//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - installs logging
//! - builds the async runtime that drives fetch lifecycles
//! - dispatches to the TUI or a one-shot report

use clap::{Parser, ValueEnum};
use tokio::runtime::Runtime;

use crate::cli::{Command, SeriesArgs, SourceArgs, TuiArgs};
use crate::error::{AppError, EXIT_IO};
use crate::io::{SeriesFile, write_series_json};
use crate::logging::LogTarget;
use crate::stats::{DEFAULT_EXCLUDED_KEYS, normalize};

pub mod pipeline;

/// Entry point for the `statdash` binary.
pub fn run() -> Result<(), AppError> {
    // The endpoint URL may come from `.env`; load it before clap reads env vars.
    dotenvy::dotenv().ok();

    // We want `statdash` and `statdash --url X` to behave like `statdash tui ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Tui(args) => handle_tui(args),
        Command::Cards(args) => handle_cards(args),
        Command::Series(args) => handle_series(args),
    }
}

fn build_runtime() -> Result<Runtime, AppError> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| AppError::new(EXIT_IO, format!("Failed to start async runtime: {e}")))
}

fn handle_tui(args: TuiArgs) -> Result<(), AppError> {
    let target = match &args.log_file {
        Some(path) => LogTarget::File(path.as_path()),
        None => LogTarget::Off,
    };
    let _log_guard = crate::logging::init(target, args.source.verbose)?;
    let runtime = build_runtime()?;
    crate::tui::run(&runtime, &args)
}

fn handle_cards(args: SourceArgs) -> Result<(), AppError> {
    let _log_guard = crate::logging::init(LogTarget::Stderr, args.verbose)?;
    let url = pipeline::require_url(args.url.as_deref())?;
    let runtime = build_runtime()?;
    let resp = pipeline::fetch_once(&runtime, url, &args.request_options())?;

    let entries = normalize(&resp.data, DEFAULT_EXCLUDED_KEYS);
    println!("{}", crate::report::format_header("Stat Cards", &resp));
    println!("{}", crate::report::format_cards(&entries));
    Ok(())
}

fn handle_series(args: SeriesArgs) -> Result<(), AppError> {
    let _log_guard = crate::logging::init(LogTarget::Stderr, args.source.verbose)?;
    let url = pipeline::require_url(args.source.url.as_deref())?;
    let runtime = build_runtime()?;
    let resp = pipeline::fetch_once(&runtime, url, &args.source.request_options())?;

    let series = args.view.build(&resp.data);
    let palette = args.view.palette();
    println!("{}", crate::report::format_header(args.view.title(), &resp));
    println!("{}", crate::report::format_series(&series, palette));

    if let Some(path) = &args.export {
        let view_name = args
            .view
            .to_possible_value()
            .map(|v| v.get_name().to_string())
            .unwrap_or_default();
        let file = SeriesFile::new(&view_name, resp.received_at, &series, palette);
        write_series_json(path, &file)?;
        println!("Wrote {}", path.display());
    }

    Ok(())
}

/// Rewrite argv so `statdash` defaults to `statdash tui`.
///
/// Rules:
/// - `statdash`                       -> `statdash tui`
/// - `statdash --url X ...`           -> `statdash tui --url X ...`
/// - `statdash --help/--version/-h`   -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "tui" | "cards" | "series");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}
