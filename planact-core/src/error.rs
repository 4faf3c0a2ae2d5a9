//! Core error types
//!
//! Re-exports planact-error and provides core-specific conveniences.

pub use planact_error::{Error, ErrorKind, ErrorStatus, Result};

/// Create an InvalidState error for an unrecognized state label
pub fn invalid_state(label: impl Into<String>) -> Error {
    Error::invalid_state(label)
}

/// Create a ConfigInvalid error
pub fn config_invalid(message: impl Into<String>) -> Error {
    Error::config_invalid(message)
}

/// Create an InferenceFailed error
pub fn inference_failed(reason: impl Into<String>) -> Error {
    Error::inference_failed(reason)
}

/// Create an InvalidArgument error
pub fn invalid_argument(message: impl Into<String>) -> Error {
    Error::invalid_argument(message)
}
