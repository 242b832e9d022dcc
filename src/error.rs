//! Error types.
//!
//! - `AppError`: top-level failure carrying a process exit code
//! - `FetchError`: why a single fetch lifecycle failed (surfaced as a message)

use thiserror::Error;

/// Exit code for configuration and usage problems.
pub const EXIT_CONFIG: u8 = 2;
/// Exit code for a failed stats fetch in one-shot commands.
pub const EXIT_FETCH: u8 = 3;
/// Exit code for terminal and file IO failures.
pub const EXIT_IO: u8 = 4;

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

/// A failed fetch lifecycle.
///
/// Every variant reaches the consumer the same way: as the `Display` string in
/// `FetchState::error`. Cancellation is not an error and has no variant here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Transport failure before any response was obtained.
    #[error("Network error: {0}")]
    Network(String),
    /// A response arrived with a non-success status.
    #[error("Error: {status}")]
    Request { status: u16 },
    /// The body was not a JSON object with a `data` object inside.
    #[error("Decode error: {0}")]
    Decode(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_error_message_carries_status() {
        let err = FetchError::Request { status: 500 };
        assert_eq!(err.to_string(), "Error: 500");
    }

    #[test]
    fn network_and_decode_messages_are_prefixed() {
        let err = FetchError::Network("connection refused".to_string());
        assert_eq!(err.to_string(), "Network error: connection refused");
        let err = FetchError::Decode("expected an object".to_string());
        assert_eq!(err.to_string(), "Decode error: expected an object");
    }

    #[test]
    fn app_error_keeps_exit_code() {
        let err = AppError::new(EXIT_FETCH, "Failed to fetch stats: Error: 500");
        assert_eq!(err.exit_code(), EXIT_FETCH);
        assert_eq!(err.to_string(), "Failed to fetch stats: Error: 500");
    }
}
