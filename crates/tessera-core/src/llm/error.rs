//! Completion service error types

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while talking to the completion service
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("Rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Duration },

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CompletionError {
    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            CompletionError::RateLimited { .. } => true,
            CompletionError::Api { status, .. } => *status >= 500,
            CompletionError::Network(_) => true,
            CompletionError::Timeout(_) => true,
            CompletionError::InvalidResponse(_) => false,
            CompletionError::Json(_) => false,
        }
    }
}
