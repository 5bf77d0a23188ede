//! Type Conversions for AdapterError
//!
//! This module contains From trait implementations for converting
//! common error types into AdapterError.

use super::types::AdapterError;

impl From<reqwest::Error> for AdapterError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            Self::ConfigurationError(err.to_string())
        } else {
            Self::RequestError(err.to_string())
        }
    }
}

impl From<serde_json::Error> for AdapterError {
    fn from(err: serde_json::Error) -> Self {
        Self::JsonError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: AdapterError = json_err.into();
        assert!(matches!(err, AdapterError::JsonError(_)));
    }

    #[test]
    fn test_from_reqwest_builder_error() {
        let req_err = reqwest::Client::new().get("not a url").build().unwrap_err();
        let err: AdapterError = req_err.into();
        assert!(matches!(err, AdapterError::ConfigurationError(_)));
    }
}
