//! Error types for cbnews
//!
//! This module defines the error hierarchy for the whole crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.
//!
//! Errors fall into three classes:
//! - transient (network, timeout, non-2xx status): retried by [`crate::http::RetryPolicy`]
//! - malformed response: the body does not have the expected shape, never retried
//! - configuration: raised before any network activity

use thiserror::Error;

/// The main error type for cbnews
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    // ============================================================================
    // HTTP Errors (transient)
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Response Errors
    // ============================================================================
    #[error("Malformed response: {message}")]
    MalformedResponse { message: String },

    #[error("Fetch failed for entity '{entity_id}' (after_id: {}): {source}", .cursor.as_deref().unwrap_or("<none>"))]
    Fetch {
        entity_id: String,
        cursor: Option<String>,
        #[source]
        source: Box<Error>,
    },

    // ============================================================================
    // Output Errors
    // ============================================================================
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Output error: {message}")]
    Output { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create an invalid config value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create a malformed response error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            message: message.into(),
        }
    }

    /// Attach entity and cursor context to a fetch failure
    pub fn fetch(entity_id: impl Into<String>, cursor: Option<String>, source: Error) -> Self {
        Self::Fetch {
            entity_id: entity_id.into(),
            cursor,
            source: Box::new(source),
        }
    }

    /// Create an output error
    pub fn output(message: impl Into<String>) -> Self {
        Self::Output {
            message: message.into(),
        }
    }

    /// Check if this error is retryable.
    ///
    /// Only network/HTTP-layer failures qualify; a body that does not parse
    /// will not parse any better on the next attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Http(e) => !e.is_builder(),
            Error::Timeout { .. } | Error::HttpStatus { .. } => true,
            Error::Fetch { source, .. } => source.is_retryable(),
            _ => false,
        }
    }

    /// Check if this error reports an unexpected response shape
    pub fn is_malformed(&self) -> bool {
        match self {
            Error::MalformedResponse { .. } => true,
            Error::Fetch { source, .. } => source.is_malformed(),
            _ => false,
        }
    }

    /// Check if this error was raised while resolving configuration
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            Error::Config { .. } | Error::MissingConfigField { .. } | Error::InvalidConfigValue { .. }
        )
    }
}

/// Result type alias for cbnews
pub type Result<T> = std::result::Result<T, Error>;
