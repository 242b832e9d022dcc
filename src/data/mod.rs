//! Remote stats access.
//!
//! - `client`: the `Fetcher` seam and its `reqwest` implementation
//! - `fetch`: the cancellable fetch lifecycle consumed by views

pub mod client;
pub mod fetch;

pub use client::{Fetcher, HttpFetcher, RequestOptions, URL_ENV};
pub use fetch::{FetchController, FetchState};
