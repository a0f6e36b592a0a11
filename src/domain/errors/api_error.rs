//! Matching API error types.

use thiserror::Error;

/// Errors surfaced by the matching API client.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum ApiError {
    #[error("network error: {message}")]
    NetworkError { message: String },

    #[error("request timed out")]
    Timeout,

    #[error("rate limited by the API, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    #[error("API is temporarily unavailable: {message}")]
    ServiceUnavailable { message: String },

    #[error("not found: {message}")]
    NotFound { message: String },

    #[error("invalid response from API: {message}")]
    InvalidResponse { message: String },

    #[error("unexpected API error: {message}")]
    Unexpected { message: String },
}

impl ApiError {
    /// Creates network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::NetworkError {
            message: message.into(),
        }
    }

    /// Creates service unavailable error.
    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable {
            message: message.into(),
        }
    }

    /// Creates not found error.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Creates invalid response error.
    #[must_use]
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }

    /// Creates unexpected error.
    #[must_use]
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected {
            message: message.into(),
        }
    }

    /// Returns whether a later identical request might succeed.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::NetworkError { .. }
                | Self::Timeout
                | Self::RateLimited { .. }
                | Self::ServiceUnavailable { .. }
        )
    }

    /// Returns whether error is network related.
    #[must_use]
    pub const fn is_network_error(&self) -> bool {
        matches!(
            self,
            Self::NetworkError { .. } | Self::Timeout | Self::RateLimited { .. }
        )
    }
}
