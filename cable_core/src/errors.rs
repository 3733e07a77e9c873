//! # Error Types
//!
//! Structured error types for cable_core. Store failures are non-fatal by
//! design: callers react to an open failure by falling back to the embedded
//! catalog, so every variant carries enough context to log and move on.
//!
//! ## Example
//!
//! ```rust
//! use cable_core::errors::{CableError, CableResult};
//!
//! fn validate_length(length_km: f64) -> CableResult<()> {
//!     if length_km <= 0.0 {
//!         return Err(CableError::invalid_input(
//!             "length_km",
//!             length_km.to_string(),
//!             "Length must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for cable_core operations
pub type CableResult<T> = Result<T, CableError>;

/// Structured error type for store and calculation operations.
///
/// Each variant maps to one failure mode of the system; the store-side
/// variants (`StoreOpen`, `Schema`, `Seed`) all mean "run without
/// persistence" to the caller.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CableError {
    /// An input value is invalid (not a number, out of range)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// The underlying SQLite database could not be created or opened
    #[error("Could not open cable store at '{path}': {reason}")]
    StoreOpen { path: String, reason: String },

    /// Schema creation failed during first-time initialization
    #[error("Schema creation failed: {reason}")]
    Schema { reason: String },

    /// The one-time bulk seed failed; the transaction was rolled back and
    /// the store is still empty
    #[error("Seeding the cable store failed: {reason}")]
    Seed { reason: String },

    /// A read statement failed after a successful open
    #[error("Store query failed: {reason}")]
    Query { reason: String },

    /// Generic internal error (should be rare)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl CableError {
    /// Create an InvalidInput error
    pub fn invalid_input(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        CableError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a StoreOpen error
    pub fn store_open(path: impl Into<String>, reason: impl Into<String>) -> Self {
        CableError::StoreOpen {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a Schema error
    pub fn schema(reason: impl Into<String>) -> Self {
        CableError::Schema {
            reason: reason.into(),
        }
    }

    /// Create a Seed error
    pub fn seed(reason: impl Into<String>) -> Self {
        CableError::Seed {
            reason: reason.into(),
        }
    }

    /// Create a Query error
    pub fn query(reason: impl Into<String>) -> Self {
        CableError::Query {
            reason: reason.into(),
        }
    }

    /// Create an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        CableError::Internal {
            message: message.into(),
        }
    }

    /// True for failures the caller handles by falling back to the
    /// embedded catalog (the store never became usable).
    pub fn is_open_failure(&self) -> bool {
        matches!(
            self,
            CableError::StoreOpen { .. } | CableError::Schema { .. } | CableError::Seed { .. }
        )
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CableError::InvalidInput { .. } => "INVALID_INPUT",
            CableError::StoreOpen { .. } => "STORE_OPEN",
            CableError::Schema { .. } => "SCHEMA",
            CableError::Seed { .. } => "SEED",
            CableError::Query { .. } => "QUERY",
            CableError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = CableError::invalid_input("power_factor", "1.2", "Power factor must be <= 1");
        let json = serde_json::to_string(&error).unwrap();
        let roundtrip: CableError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            CableError::store_open("cable_design.db", "permission denied").error_code(),
            "STORE_OPEN"
        );
        assert_eq!(CableError::seed("disk full").error_code(), "SEED");
    }

    #[test]
    fn test_open_failure_classification() {
        assert!(CableError::schema("bad DDL").is_open_failure());
        assert!(CableError::seed("insert failed").is_open_failure());
        assert!(!CableError::query("no such table").is_open_failure());
        assert!(!CableError::invalid_input("voltage_kv", "0", "must be positive").is_open_failure());
    }
}
