//! Input/output helpers.
//!
//! - series exports (JSON) (`export`)

pub mod export;

pub use export::*;
