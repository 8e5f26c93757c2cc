//! # CLI Error Type
//!
//! Unified error type for command handlers.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Command Loop                       │
//! │                                                                         │
//! │  Operator types a line                                                  │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command handler                                                 │  │
//! │  │  Result<Reply, CliError>                                         │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Unknown verb? ──── ErrorCode::UnknownCommand ──────┐            │  │
//! │  │         │                                          │            │  │
//! │  │         ▼                                          ▼            │  │
//! │  │  File missing? ──── io::Error ───────────────── CliError ──────►│  │
//! │  │         │                                          ▲            │  │
//! │  │         ▼                                          │            │  │
//! │  │  Domain failure? ── CoreError (kind) ──────────────┘            │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  The loop prints `message` and keeps reading. Nothing here is fatal.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::Path;

use kasse_core::{CoreError, ErrorKind, ValidationError};
use serde::Serialize;

use crate::config::ConfigError;

/// Error returned from command handlers.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CliError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable message shown to the operator
    pub message: String,
}

/// Error codes for command failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Barcode (or basket entry) not found
    NotFound,

    /// Malformed line or bad value
    ValidationError,

    /// Operation not allowed in the current state
    IllegalOperation,

    /// A named input file does not exist
    FileNotFound,

    /// Any other I/O failure
    Io,

    /// Configuration could not be loaded
    Config,

    /// The typed line is not a known command
    UnknownCommand,
}

impl CliError {
    /// Creates a new CLI error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        CliError {
            code,
            message: message.into(),
        }
    }

    /// Creates the hint shown for unrecognized input.
    pub fn unknown_command() -> Self {
        CliError::new(
            ErrorCode::UnknownCommand,
            "Unknown command. Use \"help\" to see all commands.",
        )
    }

    /// Maps a failed file open to a user-facing message.
    pub fn from_io(path: &Path, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => CliError::new(
                ErrorCode::FileNotFound,
                format!("The file \"{}\" was not found.", path.display()),
            ),
            _ => {
                tracing::error!(path = %path.display(), "I/O failure: {}", err);
                CliError::new(
                    ErrorCode::Io,
                    format!("Could not read \"{}\": {}", path.display(), err),
                )
            }
        }
    }
}

/// Converts core errors using their kind.
impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        let code = match err.kind() {
            ErrorKind::Validation => ErrorCode::ValidationError,
            ErrorKind::NotFound => ErrorCode::NotFound,
            ErrorKind::IllegalOperation => ErrorCode::IllegalOperation,
        };
        CliError::new(code, err.to_string())
    }
}

impl From<ValidationError> for CliError {
    fn from(err: ValidationError) -> Self {
        CliError::new(ErrorCode::ValidationError, err.to_string())
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::new(ErrorCode::Io, err.to_string())
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        CliError::new(ErrorCode::Config, err.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::new(ErrorCode::Io, format!("Could not encode receipt: {}", err))
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_error_codes() {
        let err: CliError = CoreError::ProductNotFound("9".into()).into();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Product not found: 9");

        let err: CliError = CoreError::NoOpenBasket.into();
        assert_eq!(err.code, ErrorCode::IllegalOperation);

        let err: CliError = ValidationError::Required {
            field: "name".into(),
        }
        .into();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_missing_file_message() {
        let err = CliError::from_io(
            Path::new("nope.txt"),
            std::io::Error::from(std::io::ErrorKind::NotFound),
        );
        assert_eq!(err.code, ErrorCode::FileNotFound);
        assert_eq!(err.to_string(), "The file \"nope.txt\" was not found.");
    }
}
