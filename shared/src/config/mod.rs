//! Configuration module with business-specific sub-modules
//!
//! This module organizes configuration into logical areas:
//! - `auth` - JWT signing, expiry, and secret-rotation configuration
//! - `cache` - Revocation cache (Redis) configuration

pub mod auth;
pub mod cache;

// Re-export commonly used types
pub use auth::{AuthConfig, JwtConfig};
pub use cache::CacheConfig;
