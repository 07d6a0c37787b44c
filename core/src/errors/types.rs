//! Credential validation and issuance error types
//!
//! Every `TokenError` is an expected, recoverable outcome on the request
//! hot path. The externally visible rendering is deliberately uniform so a
//! credential holder cannot learn which check failed; the specific variant
//! stays in internal logs.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::entities::token::TokenKind;

/// Credential-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Structurally malformed credential. Not a security signal by itself,
    /// it may be a client bug.
    #[error("Malformed token")]
    Malformed,

    /// Signature matched no candidate secret; treat as forged or tampered.
    #[error("Token signature verification failed")]
    InvalidSignature,

    #[error("Token expired")]
    Expired,

    #[error("Token issuer mismatch")]
    InvalidIssuer,

    #[error("Token audience mismatch")]
    InvalidAudience,

    #[error("Expected a {expected} token, got {actual}")]
    WrongKind {
        expected: TokenKind,
        actual: TokenKind,
    },

    #[error("Token revoked")]
    Revoked,

    #[error("Token generation failed")]
    GenerationFailed,

    /// Startup-blocking misconfiguration: no usable signing secret.
    #[error("No usable signing keys configured")]
    NoSigningKeys,
}

/// Unified error response structure for API responses
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub error: String,
    /// Human-readable error message
    pub message: String,
}

impl ErrorResponse {
    /// Create a new error response
    pub fn new(error: impl ToString, message: impl ToString) -> Self {
        Self {
            error: error.to_string(),
            message: message.to_string(),
        }
    }
}

/// Convert TokenError to ErrorResponse
///
/// All credential rejections render identically: the holder must not be
/// able to distinguish a forged signature from an expired credential.
impl From<&TokenError> for ErrorResponse {
    fn from(err: &TokenError) -> Self {
        match err {
            TokenError::NoSigningKeys | TokenError::GenerationFailed => {
                ErrorResponse::new("SERVICE_UNAVAILABLE", "Service temporarily unavailable")
            }
            _ => ErrorResponse::new("NOT_AUTHENTICATED", "Authentication required"),
        }
    }
}
