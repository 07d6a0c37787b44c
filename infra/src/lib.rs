//! # Infrastructure Layer
//!
//! Concrete implementations of the KeyGate core's external capabilities.
//! Today that is one thing: the shared revocation store, backed by Redis
//! so that a revocation written on one instance is visible on all.

use thiserror::Error;

/// Cache module - Redis client and the revocation store built on it
pub mod cache;

/// Errors raised by infrastructure services
#[derive(Error, Debug)]
pub enum InfrastructureError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    #[error("Revocation lookup timed out after {0:?}")]
    Timeout(std::time::Duration),
}

/// The core treats any infrastructure failure on the revocation path as a
/// store outage, which is an operational error rather than a credential
/// rejection.
impl From<InfrastructureError> for kg_core::errors::DomainError {
    fn from(err: InfrastructureError) -> Self {
        kg_core::errors::DomainError::Store {
            message: err.to_string(),
        }
    }
}
