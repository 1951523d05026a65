//! Error types used throughout the client

use thiserror::Error;

use crate::types::ErrorDetail;

/// Longest response-body snippet carried inside an error.
const BODY_SNIPPET_LEN: usize = 512;

/// Main error type for Tessera IAM operations.
///
/// Every failure a call can produce is one of these variants; nothing is
/// swallowed or re-thrown as a bare string. `Api` carries the structured
/// error parsed from a 400/500 body untouched, so callers can branch on
/// its `code`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IamError {
    /// Local precondition violation, raised before any network interaction.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Connection, TLS, or timeout failure from the transport.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The cancellation token fired while the call was in flight.
    #[error("Operation cancelled")]
    Cancelled,

    /// Structured error returned by the API in a 400/500 body.
    #[error("API error: {0}")]
    Api(ErrorDetail),

    /// A status code outside the documented set for this operation.
    #[error("Unexpected status {status} in {operation}")]
    UnexpectedStatus { operation: &'static str, status: u16, body: String },

    /// A body that does not parse against its declared schema.
    #[error("Malformed response in {operation}: {message}")]
    MalformedResponse { operation: &'static str, message: String },
}

impl IamError {
    /// Build an `UnexpectedStatus` error, truncating the body to a snippet.
    pub fn unexpected_status(operation: &'static str, status: u16, body: &str) -> Self {
        let snippet = if body.len() > BODY_SNIPPET_LEN {
            let mut end = BODY_SNIPPET_LEN;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            body[..end].to_string()
        } else {
            body.to_string()
        };
        Self::UnexpectedStatus { operation, status, body: snippet }
    }

    /// Build a `MalformedResponse` error for the given operation.
    pub fn malformed_response(operation: &'static str, message: impl Into<String>) -> Self {
        Self::MalformedResponse { operation, message: message.into() }
    }
}

/// Result type alias for Tessera IAM operations
pub type Result<T> = std::result::Result<T, IamError>;
