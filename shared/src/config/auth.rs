//! Authentication and secret-rotation configuration

use serde::{Deserialize, Serialize};

/// JWT signing and expiry configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    /// Secret used to sign newly issued tokens
    pub secret: String,

    /// Previous signing secret, accepted for verification only during the
    /// rotation overlap window
    #[serde(default)]
    pub previous_secret: Option<String>,

    /// Access token expiry time in seconds
    pub access_token_expiry: i64,

    /// Refresh token expiry time in seconds
    pub refresh_token_expiry: i64,

    /// JWT issuer claim
    pub issuer: String,

    /// JWT audience claim
    pub audience: String,

    /// How long both secrets stay accepted after a rotation, in seconds.
    /// Must cover the longest-lived credential signed with the old secret.
    #[serde(default = "default_rotation_overlap")]
    pub rotation_overlap: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::from("development-secret-please-change-in-production"),
            previous_secret: None,
            access_token_expiry: 900,     // 15 minutes
            refresh_token_expiry: 604800, // 7 days
            issuer: String::from("keygate"),
            audience: String::from("keygate-api"),
            rotation_overlap: default_rotation_overlap(),
        }
    }
}

impl JwtConfig {
    /// Create a new JWT configuration with secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }

    /// Set access token expiry in minutes
    pub fn with_access_expiry_minutes(mut self, minutes: i64) -> Self {
        self.access_token_expiry = minutes * 60;
        self
    }

    /// Set refresh token expiry in days
    pub fn with_refresh_expiry_days(mut self, days: i64) -> Self {
        self.refresh_token_expiry = days * 86400;
        self
    }

    /// Set the previous secret for a rotation overlap window
    pub fn with_previous_secret(mut self, secret: impl Into<String>) -> Self {
        self.previous_secret = Some(secret.into());
        self
    }

    /// Check if using default secret (security warning)
    pub fn is_using_default_secret(&self) -> bool {
        self.secret == "development-secret-please-change-in-production"
    }
}

/// Complete authentication configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AuthConfig {
    /// JWT configuration
    pub jwt: JwtConfig,
}

impl AuthConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let secret = std::env::var("AUTH_JWT_SECRET")
            .unwrap_or_else(|_| "development-secret-please-change-in-production".to_string());
        let previous_secret = std::env::var("AUTH_JWT_PREVIOUS_SECRET").ok();
        let access_token_expiry = std::env::var("AUTH_ACCESS_TOKEN_EXPIRY")
            .unwrap_or_else(|_| "900".to_string())
            .parse()
            .unwrap_or(900);
        let refresh_token_expiry = std::env::var("AUTH_REFRESH_TOKEN_EXPIRY")
            .unwrap_or_else(|_| "604800".to_string())
            .parse()
            .unwrap_or(604800);
        let issuer =
            std::env::var("AUTH_ISSUER").unwrap_or_else(|_| String::from("keygate"));
        let audience =
            std::env::var("AUTH_AUDIENCE").unwrap_or_else(|_| String::from("keygate-api"));
        let rotation_overlap = std::env::var("AUTH_ROTATION_OVERLAP")
            .unwrap_or_else(|_| default_rotation_overlap().to_string())
            .parse()
            .unwrap_or_else(|_| default_rotation_overlap());

        Self {
            jwt: JwtConfig {
                secret,
                previous_secret,
                access_token_expiry,
                refresh_token_expiry,
                issuer,
                audience,
                rotation_overlap,
            },
        }
    }
}

/// Overlap defaults to the refresh token lifetime so that nothing signed
/// with the old secret can outlive the window.
fn default_rotation_overlap() -> i64 {
    604800
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jwt_config_default() {
        let config = JwtConfig::default();
        assert_eq!(config.access_token_expiry, 900);
        assert_eq!(config.refresh_token_expiry, 604800);
        assert_eq!(config.rotation_overlap, 604800);
        assert_eq!(config.issuer, "keygate");
        assert_eq!(config.audience, "keygate-api");
        assert!(config.previous_secret.is_none());
        assert!(config.is_using_default_secret());
    }

    #[test]
    fn test_jwt_config_builder() {
        let config = JwtConfig::new("my-secret")
            .with_access_expiry_minutes(30)
            .with_refresh_expiry_days(14)
            .with_previous_secret("old-secret");

        assert_eq!(config.access_token_expiry, 1800);
        assert_eq!(config.refresh_token_expiry, 1209600);
        assert_eq!(config.previous_secret.as_deref(), Some("old-secret"));
        assert!(!config.is_using_default_secret());
    }
}
