//! Common error types used across all Grid Charts crates
//! Provides consistent error handling and reporting

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Base error type for all Grid Charts operations
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "details")]
pub enum GridChartsError {
    // Surface lifecycle errors
    #[error("Surface initialization failed: {message}")]
    SurfaceInit { message: String },

    #[error("Surface already disposed")]
    SurfaceDisposed,

    #[error("Widget instance not found: {id}")]
    InstanceNotFound { id: String },

    // Boundary errors
    #[error("Malformed drop payload: {message}")]
    PayloadParse { message: String },

    #[error("Export failed: {message}")]
    Export { message: String },

    // Configuration errors
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        message: String,
        field: Option<String>,
    },

    // WASM-specific errors
    #[error("JavaScript interop error: {message}")]
    JsInterop { message: String },

    // Generic errors
    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Result type alias for Grid Charts operations
pub type Result<T> = std::result::Result<T, GridChartsError>;

impl From<serde_json::Error> for GridChartsError {
    fn from(err: serde_json::Error) -> Self {
        GridChartsError::PayloadParse {
            message: err.to_string(),
        }
    }
}

#[cfg(feature = "wasm")]
impl From<wasm_bindgen::JsValue> for GridChartsError {
    fn from(err: wasm_bindgen::JsValue) -> Self {
        GridChartsError::JsInterop {
            message: format!("{err:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let err = GridChartsError::PayloadParse {
            message: "expected value at line 1".to_string(),
        };
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("PayloadParse"));
        assert!(json.contains("expected value"));
    }

    #[test]
    fn test_json_error_conversion() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: GridChartsError = parse_err.into();
        assert!(matches!(err, GridChartsError::PayloadParse { .. }));
    }
}
