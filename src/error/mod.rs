//! Error Handling Module
//!
//! This module provides the error type shared by every adapter in the crate:
//! - Core error type (`AdapterError`) and its coarse `ErrorCategory`
//! - Type conversions from the HTTP and JSON libraries
//!
//! # Example
//!
//! ```rust,ignore
//! use datora_adapters::error::{AdapterError, ErrorCategory};
//!
//! let error = AdapterError::RequestError("connection refused".into());
//! assert_eq!(error.code(), "REQUEST_ERROR");
//! assert_eq!(error.category(), ErrorCategory::Transport);
//! ```

// Module declarations
mod conversions;
pub mod types;

// Re-exports for public API
pub use types::*;
