//! # Error Types
//!
//! Structured error types for bridge_core. Every error a user can run into
//! while filling in the parameter form is recoverable by correcting input and
//! trying again, so the variants carry enough context to explain what to fix.
//!
//! ## Example
//!
//! ```rust
//! use bridge_core::errors::{BridgeError, BridgeResult};
//!
//! fn require_positive(field: &str, value: f64) -> BridgeResult<f64> {
//!     if value <= 0.0 {
//!         return Err(BridgeError::field_constraint(field, "Must be positive"));
//!     }
//!     Ok(value)
//! }
//!
//! assert!(require_positive("SCALE1", 0.0).is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for bridge_core operations
pub type BridgeResult<T> = Result<T, BridgeError>;

/// Structured error type for form, validation and transport operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum BridgeError {
    /// A single field breaks one of its declared constraints (required, min, max)
    #[error("Invalid value for '{field}': {reason}")]
    FieldConstraint { field: String, reason: String },

    /// A relationship between several parameters does not hold
    #[error("Parameter check failed: {reason}")]
    CrossField { reason: String },

    /// The validation endpoint could not be reached or answered garbage
    #[error("Remote validation failed: {reason}")]
    RemoteValidation { reason: String },

    /// Clipboard text is not a JSON object of parameter values
    #[error("Invalid parameter format in clipboard: {reason}")]
    ClipboardFormat { reason: String },

    /// The clipboard could not be read or written
    #[error("Clipboard unavailable: {operation} - {reason}")]
    ClipboardUnavailable { operation: String, reason: String },

    /// The drawing generation request failed or was bounced by the server
    #[error("Submission failed: {reason}")]
    Submission { reason: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Generic internal error (should be rare)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl BridgeError {
    /// Create a FieldConstraint error
    pub fn field_constraint(field: impl Into<String>, reason: impl Into<String>) -> Self {
        BridgeError::FieldConstraint {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a CrossField error
    pub fn cross_field(reason: impl Into<String>) -> Self {
        BridgeError::CrossField {
            reason: reason.into(),
        }
    }

    /// Create a RemoteValidation error
    pub fn remote_validation(reason: impl Into<String>) -> Self {
        BridgeError::RemoteValidation {
            reason: reason.into(),
        }
    }

    /// Create a ClipboardFormat error
    pub fn clipboard_format(reason: impl Into<String>) -> Self {
        BridgeError::ClipboardFormat {
            reason: reason.into(),
        }
    }

    /// Create a ClipboardUnavailable error
    pub fn clipboard_unavailable(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        BridgeError::ClipboardUnavailable {
            operation: operation.into(),
            reason: reason.into(),
        }
    }

    /// Create a Submission error
    pub fn submission(reason: impl Into<String>) -> Self {
        BridgeError::Submission {
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        BridgeError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Check if this is a recoverable error (the user can correct input or retry)
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, BridgeError::Internal { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            BridgeError::FieldConstraint { .. } => "FIELD_CONSTRAINT",
            BridgeError::CrossField { .. } => "CROSS_FIELD",
            BridgeError::RemoteValidation { .. } => "REMOTE_VALIDATION",
            BridgeError::ClipboardFormat { .. } => "CLIPBOARD_FORMAT",
            BridgeError::ClipboardUnavailable { .. } => "CLIPBOARD_UNAVAILABLE",
            BridgeError::Submission { .. } => "SUBMISSION",
            BridgeError::FileError { .. } => "FILE_ERROR",
            BridgeError::SerializationError { .. } => "SERIALIZATION_ERROR",
            BridgeError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}
