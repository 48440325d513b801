//! Error types for the attendance reconciliation engine.
//!
//! Only configuration problems are errors. Malformed punch or date data never
//! surfaces here; it degrades to a well-defined record state instead.

use thiserror::Error;

/// The main error type for the attendance reconciliation engine.
///
/// # Example
///
/// ```
/// use attendance_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/shifts.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/shifts.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A shift definition in the catalog is inconsistent.
    #[error("Invalid shift definition '{shift_id}': {message}")]
    InvalidShiftDefinition {
        /// The label of the offending shift.
        shift_id: String,
        /// What made the definition invalid.
        message: String,
    },

    /// A shift id was not found in the catalog.
    #[error("Shift not found in catalog: {shift_id}")]
    ShiftNotFound {
        /// The shift id that was not found.
        shift_id: String,
    },

    /// The same shift id appears more than once in the catalog.
    #[error("Duplicate shift definition: {shift_id}")]
    DuplicateShift {
        /// The repeated shift id.
        shift_id: String,
    },

    /// The configured fallback shift is not part of the catalog.
    #[error("Fallback shift '{shift_id}' is not defined in the catalog")]
    MissingFallbackShift {
        /// The fallback shift id.
        shift_id: String,
    },

    /// A reconciliation policy value is out of range.
    #[error("Invalid policy field '{field}': {message}")]
    InvalidPolicy {
        /// The policy field that was rejected.
        field: String,
        /// Why the value was rejected.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
