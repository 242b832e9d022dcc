//! Shared "fetch once" logic used by the one-shot commands.
//!
//! The TUI keeps a live `FetchController` per mounted page; the CLI commands
//! run a single lifecycle to completion and then work on the settled payload.

use std::sync::Arc;

use tokio::runtime::Runtime;
use tracing::info;

use crate::data::{FetchController, HttpFetcher, RequestOptions, URL_ENV};
use crate::domain::StatsResponse;
use crate::error::{AppError, EXIT_CONFIG, EXIT_FETCH};

/// Resolve the endpoint, failing with a usage error when none is configured.
pub fn require_url(url: Option<&str>) -> Result<String, AppError> {
    match url.map(str::trim) {
        Some(url) if !url.is_empty() => Ok(url.to_string()),
        _ => Err(AppError::new(
            EXIT_CONFIG,
            format!("No stats endpoint configured. Pass --url or set {URL_ENV} (in the environment or .env)."),
        )),
    }
}

/// Run one fetch lifecycle to completion.
pub fn fetch_once(runtime: &Runtime, url: String, options: &RequestOptions) -> Result<Arc<StatsResponse>, AppError> {
    let fetcher = Arc::new(HttpFetcher::new(options)?);
    let mut controller = FetchController::new(fetcher, runtime.handle().clone());
    controller.set_url(Some(url));

    let state = runtime.block_on(controller.settled());
    if let Some(error) = state.error {
        return Err(AppError::new(EXIT_FETCH, format!("Failed to fetch stats: {error}")));
    }
    let data = state
        .data
        .ok_or_else(|| AppError::new(EXIT_FETCH, "Fetch settled without data."))?;

    info!(fields = data.data.len(), "stats fetched");
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_url_rejects_missing_and_blank() {
        assert_eq!(require_url(None).unwrap_err().exit_code(), EXIT_CONFIG);
        assert_eq!(require_url(Some("  ")).unwrap_err().exit_code(), EXIT_CONFIG);
        assert_eq!(require_url(Some(" http://x/stats ")).unwrap(), "http://x/stats");
    }
}
