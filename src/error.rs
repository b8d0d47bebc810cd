//! Error types for the metagen crate

use thiserror::Error;

/// Result type for metagen operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for metagen operations
///
/// None of these reach the callers of the generator or analyzer entry points;
/// they are absorbed into fallback results and only show up in logs. The
/// lower-level pieces (the inference client, the retry policy, configuration)
/// return them directly.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Inference API returned an error response
    #[error("API error: {status_code} - {message}")]
    Api {
        /// HTTP status code
        status_code: u16,
        /// Error message
        message: String,
    },

    /// Authentication error
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded. Please retry after {retry_after_secs} seconds")]
    RateLimit {
        /// Seconds to wait before retrying
        retry_after_secs: u64,
    },

    /// Unexpected response format
    #[error("Unexpected response format: {0}")]
    UnexpectedResponse(String),

    /// The model answered but produced no text
    #[error("Model returned an empty response")]
    EmptyResponse,

    /// The retry loop ran out of attempts without a result
    #[error("Max retries reached after {attempts} attempts")]
    MaxRetriesReached {
        /// Attempts that were made
        attempts: u32,
    },

    /// Missing or invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Other errors
    #[error("{0}")]
    Other(String),
}
