//! Shared configuration types for the KeyGate backend
//!
//! This crate provides the environment-sourced configuration surface used
//! across the server crates:
//! - JWT signing, expiry, and rotation settings
//! - Revocation cache (Redis) settings

pub mod config;

// Re-export commonly used items at crate root
pub use config::{AuthConfig, CacheConfig, JwtConfig};
