//! Core error types for dabtimer-core.
//!
//! This module defines the error hierarchy using thiserror. Catalog lookups,
//! duration calculation and the cycle state machine all fail through
//! [`CoreError`]; storage failures are wrapped in [`DatabaseError`] and
//! [`ConfigError`].

use std::path::PathBuf;
use thiserror::Error;

use crate::catalog::Category;
use crate::timer::Phase;

/// Core error type for dabtimer-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// A selection references a key that the catalog does not contain.
    #[error("unknown {category} key '{key}'")]
    UnknownKey { category: Category, key: String },

    /// A user-supplied custom duration lies outside the enforced bounds.
    #[error("custom {field} time {value}s is outside the allowed range [{min}, {max}]s")]
    InvalidCustomDuration {
        field: &'static str,
        value: u32,
        min: u32,
        max: u32,
    },

    /// Configured custom-duration bounds are empty or admit zero.
    #[error("{field} bounds [{min}, {max}]s are invalid: minimum must be at least 1 and not above the maximum")]
    InvalidBounds {
        field: &'static str,
        min: u32,
        max: u32,
    },

    /// A computed duration came out non-finite or negative.
    #[error("computed {phase} duration is invalid: {value}")]
    InvalidDuration { phase: Phase, value: f64 },

    /// The cycle machine was started or ticked before `initialize()`.
    #[error("timer has not been initialized with cycle durations")]
    NotInitialized,

    /// A statistics window ends before it starts.
    #[error("invalid time range: end ({end}) is before start ({start})")]
    InvalidTimeRange {
        start: chrono::DateTime<chrono::Utc>,
        end: chrono::DateTime<chrono::Utc>,
    },

    /// A named range cannot be built around this anchor date.
    #[error("no calendar window can be built around {anchor}")]
    InvalidWindow { anchor: chrono::NaiveDate },

    /// The raw catalog table failed validation.
    #[error("invalid catalog: {0}")]
    InvalidCatalog(String),

    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parse errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Database-specific errors.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// A stored row could not be decoded
    #[error("Corrupt row in '{table}': {message}")]
    CorruptRow { table: &'static str, message: String },

    /// Database is locked
    #[error("Database is locked")]
    Locked,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown dot-path key
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Data directory could not be determined or created
    #[error("data directory unavailable: {0}")]
    DataDir(String),
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _msg) => {
                if e.code == rusqlite::ErrorCode::DatabaseLocked {
                    DatabaseError::Locked
                } else {
                    DatabaseError::QueryFailed(err.to_string())
                }
            }
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Database(err.into())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_key_names_category_and_key() {
        let err = CoreError::UnknownKey {
            category: Category::Heater,
            key: "blowtorch".into(),
        };
        assert_eq!(err.to_string(), "unknown heater key 'blowtorch'");
    }

    #[test]
    fn custom_duration_message_includes_bounds() {
        let err = CoreError::InvalidCustomDuration {
            field: "heat",
            value: 2,
            min: 5,
            max: 300,
        };
        assert_eq!(
            err.to_string(),
            "custom heat time 2s is outside the allowed range [5, 300]s"
        );
    }

    #[test]
    fn bounds_message_names_field() {
        let err = CoreError::InvalidBounds {
            field: "heat",
            min: 0,
            max: 300,
        };
        assert!(err.to_string().starts_with("heat bounds [0, 300]s are invalid"));
    }

    #[test]
    fn sqlite_errors_convert_to_query_failed() {
        let err: DatabaseError = rusqlite::Error::QueryReturnedNoRows.into();
        assert!(matches!(err, DatabaseError::QueryFailed(_)));
    }
}
