//! Error types for enquiry.
//!
//! This module defines all error types used throughout the enquiry crate.
//! Validation failures are kept in their own enum so callers can map them
//! onto the notification severity the user sees.

use std::path::PathBuf;
use thiserror::Error;

use crate::notify::Severity;

/// A user-input problem that aborts an operation without changing state.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// One of the required form fields is empty.
    #[error("incomplete form")]
    IncompleteForm,

    /// The message body is empty or whitespace only.
    #[error("empty message")]
    EmptyMessage,

    /// The recipient address does not look like `local@domain.tld`.
    #[error("invalid address")]
    InvalidAddress,
}

impl ValidationError {
    /// Severity used when this failure is reported to the user.
    #[must_use]
    pub fn severity(self) -> Severity {
        match self {
            Self::IncompleteForm | Self::EmptyMessage => Severity::Warning,
            Self::InvalidAddress => Severity::Error,
        }
    }
}

/// The main error type for enquiry operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Form Errors ===
    /// Input validation failed.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// An edit or delete referenced a row that does not exist.
    #[error("no entry at index {index} (table has {len} rows)")]
    NoSuchEntry {
        /// The requested index.
        index: usize,
        /// Number of rows in the table at the time of the request.
        len: usize,
    },

    /// A field name did not match any form field.
    #[error("unknown field '{0}'")]
    UnknownField(String),

    // === Relay Errors ===
    /// The relay rejected or failed to deliver a message.
    #[error("relay failed: {message}")]
    Relay {
        /// Description of what went wrong.
        message: String,
    },

    /// HTTP transport to the relay failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// An operation timed out.
    #[error("operation timed out: {operation}")]
    Timeout {
        /// Description of the operation that timed out.
        operation: String,
    },

    // === Export Errors ===
    /// The print command could not be started or exited with failure.
    #[error("print command '{program}' failed: {message}")]
    PrintCommand {
        /// Program that was run.
        program: String,
        /// Spawn error or exit status.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for enquiry operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new relay error.
    #[must_use]
    pub fn relay(message: impl Into<String>) -> Self {
        Self::Relay {
            message: message.into(),
        }
    }

    /// Create a new timeout error.
    #[must_use]
    pub fn timeout(operation: impl Into<String>) -> Self {
        Self::Timeout {
            operation: operation.into(),
        }
    }

    /// Check if this error is a validation failure.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// The validation failure carried by this error, if any.
    #[must_use]
    pub fn as_validation(&self) -> Option<ValidationError> {
        match self {
            Self::Validation(v) => Some(*v),
            _ => None,
        }
    }

    /// Check if this error came from dispatching a message.
    #[must_use]
    pub fn is_relay_error(&self) -> bool {
        matches!(
            self,
            Self::Relay { .. } | Self::Http(_) | Self::Timeout { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        assert_eq!(ValidationError::IncompleteForm.to_string(), "incomplete form");
        assert_eq!(ValidationError::EmptyMessage.to_string(), "empty message");
        assert_eq!(ValidationError::InvalidAddress.to_string(), "invalid address");
    }

    #[test]
    fn test_validation_error_severity() {
        assert_eq!(ValidationError::IncompleteForm.severity(), Severity::Warning);
        assert_eq!(ValidationError::EmptyMessage.severity(), Severity::Warning);
        assert_eq!(ValidationError::InvalidAddress.severity(), Severity::Error);
    }

    #[test]
    fn test_from_validation_error() {
        let err: Error = ValidationError::EmptyMessage.into();
        assert!(err.is_validation());
        assert_eq!(err.as_validation(), Some(ValidationError::EmptyMessage));
        assert_eq!(err.to_string(), "validation failed: empty message");
    }

    #[test]
    fn test_no_such_entry_display() {
        let err = Error::NoSuchEntry { index: 4, len: 2 };
        let msg = err.to_string();
        assert!(msg.contains('4'));
        assert!(msg.contains("2 rows"));
        assert!(!err.is_validation());
    }

    #[test]
    fn test_relay_error() {
        let err = Error::relay("503 Service Unavailable");
        assert_eq!(err.to_string(), "relay failed: 503 Service Unavailable");
        assert!(err.is_relay_error());
        assert!(err.as_validation().is_none());
    }

    #[test]
    fn test_timeout_is_relay_error() {
        let err = Error::timeout("relay dispatch");
        assert!(err.to_string().contains("relay dispatch"));
        assert!(err.is_relay_error());
    }

    #[test]
    fn test_unknown_field_display() {
        let err = Error::UnknownField("nickname".to_string());
        assert_eq!(err.to_string(), "unknown field 'nickname'");
    }

    #[test]
    fn test_print_command_error_display() {
        let err = Error::PrintCommand {
            program: "lp".to_string(),
            message: "exit status: 1".to_string(),
        };
        assert_eq!(err.to_string(), "print command 'lp' failed: exit status: 1");
        assert!(!err.is_relay_error());
    }

    #[test]
    fn test_config_validation_error_display() {
        let err = Error::ConfigValidation {
            message: "service_id is required".to_string(),
        };
        assert!(err.to_string().contains("service_id"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(err.to_string().contains("file not found"));
        assert!(!err.is_relay_error());
    }

    #[test]
    fn test_from_json_error() {
        let json_result: std::result::Result<i32, serde_json::Error> =
            serde_json::from_str("not valid json");
        if let Err(json_err) = json_result {
            let err: Error = json_err.into();
            assert!(matches!(err, Error::Json(_)));
        }
    }

    #[test]
    fn test_directory_create_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = Error::DirectoryCreate {
            path: PathBuf::from("/root/forbidden"),
            source: io_err,
        };
        assert!(err.to_string().contains("/root/forbidden"));
    }
}
