//! Revocation cache configuration module

use serde::{Deserialize, Serialize};

/// Redis cache configuration for the revocation store
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Redis connection URL
    pub url: String,

    /// Connection timeout in seconds
    pub connection_timeout: u64,

    /// Per-lookup response timeout in milliseconds. Revocation lookups sit
    /// on the request hot path, so this must stay small.
    pub response_timeout_ms: u64,

    /// Enable cache key prefix
    #[serde(default)]
    pub key_prefix: Option<String>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            url: String::from("redis://localhost:6379"),
            connection_timeout: 5,
            response_timeout_ms: 250,
            key_prefix: None,
        }
    }
}

impl CacheConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let url = std::env::var("REDIS_URL")
            .unwrap_or_else(|_| "redis://localhost:6379".to_string());
        let connection_timeout = std::env::var("REDIS_CONNECTION_TIMEOUT")
            .unwrap_or_else(|_| "5".to_string())
            .parse()
            .unwrap_or(5);
        let response_timeout_ms = std::env::var("REDIS_RESPONSE_TIMEOUT")
            .unwrap_or_else(|_| "250".to_string())
            .parse()
            .unwrap_or(250);
        let key_prefix = std::env::var("REDIS_KEY_PREFIX").ok();

        Self {
            url,
            connection_timeout,
            response_timeout_ms,
            key_prefix,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_config_default() {
        let config = CacheConfig::default();
        assert_eq!(config.url, "redis://localhost:6379");
        assert_eq!(config.response_timeout_ms, 250);
        assert!(config.key_prefix.is_none());
    }
}
