//! Shared error type across greeter crates.

use thiserror::Error;

/// Stable error codes, used in logs and config diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Invalid input / malformed config.
    BadRequest,
    /// Unsupported config version.
    UnsupportedVersion,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, GreeterError>;

/// Unified error type used by core and gateway.
#[derive(Debug, Error)]
pub enum GreeterError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("internal: {0}")]
    Internal(String),
}

impl GreeterError {
    /// Map to a stable code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            GreeterError::BadRequest(_) => ClientCode::BadRequest,
            GreeterError::UnsupportedVersion => ClientCode::UnsupportedVersion,
            GreeterError::Internal(_) => ClientCode::Internal,
        }
    }
}
