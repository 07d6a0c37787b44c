//! # KeyGate Core
//!
//! Core session-authentication logic for the KeyGate backend.
//! This crate contains the domain entities, credential services,
//! revocation-store interface, and error types that the transport layer
//! and resource-serving components build on.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;
