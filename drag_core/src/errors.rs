//! # Error Types
//!
//! Structured error types for drag_core. Numeric degeneracies inside the
//! build-up (zero Reynolds number, collapsed geometry, unknown correlation
//! selectors) never surface here: they resolve to sentinel values in the
//! report. These errors cover invalid configuration, I/O and serialization.
//!
//! ## Example
//!
//! ```rust
//! use drag_core::errors::{DragError, DragResult};
//!
//! fn validate_sref(sref: f64) -> DragResult<()> {
//!     if sref <= 0.0 {
//!         return Err(DragError::InvalidInput {
//!             field: "sref".to_string(),
//!             value: sref.to_string(),
//!             reason: "Reference area must be positive".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for drag_core operations
pub type DragResult<T> = Result<T, DragError>;

/// Structured error type for build-up operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum DragError {
    /// An input value is invalid (out of range, non-finite, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A required field is missing
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// A component id was requested that the vehicle does not contain
    #[error("Component not found: {component_id}")]
    ComponentNotFound { component_id: String },

    /// Calculation could not run
    #[error("Calculation failed: {stage} - {reason}")]
    CalculationFailed { stage: String, reason: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// File is locked by another user/process
    #[error("File locked: '{path}' is locked by {locked_by} since {locked_at}")]
    FileLocked {
        path: String,
        locked_by: String,
        locked_at: String,
    },

    /// JSON/CSV serialization or deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },

    /// Generic internal error (should be rare)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DragError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        DragError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        DragError::MissingField {
            field: field.into(),
        }
    }

    /// Create a ComponentNotFound error
    pub fn component_not_found(component_id: impl Into<String>) -> Self {
        DragError::ComponentNotFound {
            component_id: component_id.into(),
        }
    }

    /// Create a CalculationFailed error
    pub fn calculation_failed(stage: impl Into<String>, reason: impl Into<String>) -> Self {
        DragError::CalculationFailed {
            stage: stage.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        DragError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileLocked error
    pub fn file_locked(path: impl Into<String>, locked_by: impl Into<String>, locked_at: impl Into<String>) -> Self {
        DragError::FileLocked {
            path: path.into(),
            locked_by: locked_by.into(),
            locked_at: locked_at.into(),
        }
    }

    /// Create a SerializationError
    pub fn serialization(reason: impl Into<String>) -> Self {
        DragError::SerializationError {
            reason: reason.into(),
        }
    }

    /// Check if this is a recoverable error (e.g., can retry)
    pub fn is_recoverable(&self) -> bool {
        matches!(self, DragError::FileLocked { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            DragError::InvalidInput { .. } => "INVALID_INPUT",
            DragError::MissingField { .. } => "MISSING_FIELD",
            DragError::ComponentNotFound { .. } => "COMPONENT_NOT_FOUND",
            DragError::CalculationFailed { .. } => "CALCULATION_FAILED",
            DragError::FileError { .. } => "FILE_ERROR",
            DragError::FileLocked { .. } => "FILE_LOCKED",
            DragError::SerializationError { .. } => "SERIALIZATION_ERROR",
            DragError::VersionMismatch { .. } => "VERSION_MISMATCH",
            DragError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

impl From<serde_json::Error> for DragError {
    fn from(e: serde_json::Error) -> Self {
        DragError::serialization(e.to_string())
    }
}

impl From<csv::Error> for DragError {
    fn from(e: csv::Error) -> Self {
        DragError::serialization(e.to_string())
    }
}
