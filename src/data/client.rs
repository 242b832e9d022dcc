//! HTTP access to the stats endpoint.

use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tracing::debug;

use crate::domain::StatsResponse;
use crate::error::{AppError, EXIT_CONFIG, FetchError};

/// Environment variable holding the endpoint URL (also read from `.env`).
pub const URL_ENV: &str = "STATS_API_URL";

/// Something that can turn a URL into a decoded stats response.
///
/// The fetch controller only depends on this trait, so tests can script
/// latency and failures without a network.
pub trait Fetcher: Send + Sync {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<StatsResponse, FetchError>> + Send;
}

/// Per-request configuration applied to every GET.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub timeout: Option<Duration>,
    /// Extra headers as `(name, value)` pairs.
    pub headers: Vec<(String, String)>,
}

impl RequestOptions {
    /// Parse a `Name: Value` header argument.
    pub fn parse_header(raw: &str) -> Result<(String, String), String> {
        let (name, value) = raw
            .split_once(':')
            .ok_or_else(|| format!("header '{raw}' must look like 'Name: Value'"))?;
        let name = name.trim();
        if name.is_empty() {
            return Err(format!("header '{raw}' has an empty name"));
        }
        Ok((name.to_string(), value.trim().to_string()))
    }
}

/// `reqwest`-backed fetcher.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(options: &RequestOptions) -> Result<Self, AppError> {
        let mut headers = HeaderMap::new();
        for (name, value) in &options.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| AppError::new(EXIT_CONFIG, format!("Invalid header name '{name}': {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| AppError::new(EXIT_CONFIG, format!("Invalid header value for '{name}': {e}")))?;
            // Repeated names are sent as repeated headers.
            headers.append(name, value);
        }

        let mut builder = Client::builder().default_headers(headers);
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| AppError::new(EXIT_CONFIG, format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { client })
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<StatsResponse, FetchError> {
        debug!(url, "GET stats");
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Request {
                status: status.as_u16(),
            });
        }

        let body = resp
            .bytes()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;
        StatsResponse::from_slice(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_header_splits_on_first_colon() {
        assert_eq!(
            RequestOptions::parse_header("Authorization: Bearer a:b").unwrap(),
            ("Authorization".to_string(), "Bearer a:b".to_string())
        );
        assert!(RequestOptions::parse_header("no-colon").is_err());
        assert!(RequestOptions::parse_header(" : value").is_err());
    }

    #[test]
    fn invalid_header_name_is_config_error() {
        let options = RequestOptions {
            timeout: None,
            headers: vec![("bad header".to_string(), "x".to_string())],
        };
        let err = HttpFetcher::new(&options).err().unwrap();
        assert_eq!(err.exit_code(), EXIT_CONFIG);
    }
}
