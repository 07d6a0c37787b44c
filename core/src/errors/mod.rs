//! Domain-specific error types and error handling.

mod types;

// Re-export all error types and utilities
pub use types::{ErrorResponse, TokenError};

use thiserror::Error;

/// Core domain errors (general purpose)
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Revocation store unavailable: {message}")]
    Store { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to credential-specific errors
    #[error(transparent)]
    Token(#[from] TokenError),
}

impl DomainError {
    /// Whether this error is a per-credential rejection, as opposed to an
    /// operational failure that must reach operators instead of clients.
    pub fn is_rejection(&self) -> bool {
        matches!(self, DomainError::Token(_))
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
