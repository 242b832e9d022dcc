//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the decoded payload (`StatsResponse`, `StatsPayload`, `StatValue`)
//! - normalized output (`StatEntry`) and chart output (`ChartPoint`)

pub mod types;

pub use types::*;
