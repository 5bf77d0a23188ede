//! Core error types.

use thiserror::Error;

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, AdapterError>;

/// Coarse classification of an [`AdapterError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// No response object was produced by the HTTP exchange
    Transport,
    /// Invalid headers, URLs or pool settings
    Configuration,
    /// JSON encoding or decoding failed
    Serialization,
    /// The search index rejected or failed a call
    SearchIndex,
}

/// Errors produced by the adapters
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AdapterError {
    /// The transport layer returned no response (connection refused, DNS,
    /// timeout, truncated body). HTTP error statuses are never reported here.
    #[error("REQUEST_ERROR: {0}")]
    RequestError(String),

    /// Invalid configuration or request shape, detected before any I/O
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(String),

    /// Search index call failed
    #[error("Search index error{}: {message}", .status.map(|s| format!(" ({s})")).unwrap_or_default())]
    SearchIndexError {
        /// HTTP status returned by the index, when one was received
        status: Option<u16>,
        message: String,
    },
}

impl AdapterError {
    /// Create a search index error from a status and message
    pub fn search_index(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::SearchIndexError {
            status,
            message: message.into(),
        }
    }

    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            Self::RequestError(_) => "REQUEST_ERROR",
            Self::ConfigurationError(_) => "CONFIGURATION_ERROR",
            Self::JsonError(_) => "JSON_ERROR",
            Self::SearchIndexError { .. } => "SEARCH_INDEX_ERROR",
        }
    }

    /// Coarse category of this error
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::RequestError(_) => ErrorCategory::Transport,
            Self::ConfigurationError(_) => ErrorCategory::Configuration,
            Self::JsonError(_) => ErrorCategory::Serialization,
            Self::SearchIndexError { .. } => ErrorCategory::SearchIndex,
        }
    }

    /// Whether the HTTP exchange produced no response at all
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::RequestError(_))
    }
}
