//! Credential services for signed-token management
//!
//! This module handles all token-level operations:
//! - HMAC key management with two-generation rotation
//! - Wire-format encoding, decoding, and signature verification
//! - Access/refresh credential issuance
//! - Credential validation against the revocation store
//! - Background pruning of expired revocation entries

pub mod codec;
mod config;
mod issuer;
mod keyring;
mod sweeper;
mod validator;

#[cfg(test)]
mod tests;

pub use config::TokenConfig;
pub use issuer::TokenIssuer;
pub use keyring::{KeyRing, KeySet};
pub use sweeper::{RevocationSweeper, SweeperConfig};
pub use validator::TokenValidator;
