//! Configuration for the credential services

use kg_shared::config::JwtConfig;

/// Configuration for credential issuance and validation
#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// Issuer claim stamped into and required from every credential
    pub issuer: String,
    /// Audience claim stamped into and required from every credential
    pub audience: String,
    /// Access credential lifetime in seconds
    pub access_ttl_secs: i64,
    /// Refresh credential lifetime in seconds
    pub refresh_ttl_secs: i64,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            issuer: String::from("keygate"),
            audience: String::from("keygate-api"),
            access_ttl_secs: 900,
            refresh_ttl_secs: 604800,
        }
    }
}

impl From<&JwtConfig> for TokenConfig {
    fn from(jwt: &JwtConfig) -> Self {
        Self {
            issuer: jwt.issuer.clone(),
            audience: jwt.audience.clone(),
            access_ttl_secs: jwt.access_token_expiry,
            refresh_ttl_secs: jwt.refresh_token_expiry,
        }
    }
}
