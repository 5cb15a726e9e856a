//! Error types for the OpenAI client.

use thiserror::Error;

/// Result type for OpenAI client operations.
pub type Result<T> = std::result::Result<T, OpenAIError>;

#[derive(Debug, Error)]
pub enum OpenAIError {
    /// Missing API key or invalid settings
    #[error("Configuration error: {0}")]
    Config(String),

    /// The request exceeded the client timeout
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Connection failed before a response arrived
    #[error("Network error: {0}")]
    Network(String),

    /// Non-2xx response, rate limit, or empty completion
    #[error("API error: {0}")]
    Api(String),

    /// Response body was not the expected JSON
    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for OpenAIError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            OpenAIError::Timeout(e.to_string())
        } else {
            OpenAIError::Network(e.to_string())
        }
    }
}
