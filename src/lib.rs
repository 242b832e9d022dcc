//! `statdash` library crate.
//!
//! The binary (`statdash`) is a thin wrapper around this library so that:
//!
//! - the fetch lifecycle and stat transformations are testable without a terminal
//! - the TUI and the one-shot commands share one pipeline

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod report;
pub mod stats;
pub mod tui;
pub mod view;
