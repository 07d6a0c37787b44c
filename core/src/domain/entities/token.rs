//! Credential entities for JWT-based session authentication.

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Authorization scope carried by a session.
///
/// Closed set: business authorization beyond this tag is out of scope for
/// the session core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    User,
    Admin,
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scope::User => write!(f, "user"),
            Scope::Admin => write!(f, "admin"),
        }
    }
}

/// Whether a credential grants resource access or refresh capability.
///
/// A refresh credential must never be accepted where an access credential
/// is required, and vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::Access => write!(f, "access"),
            TokenKind::Refresh => write!(f, "refresh"),
        }
    }
}

/// Verified identity handed over by the external identity-confirmation step.
///
/// The subject is opaque to this core; it is echoed back to resource-serving
/// components on successful validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Opaque subject identifier
    pub subject: String,

    /// Authorization scope tag
    pub scope: Scope,
}

impl Identity {
    pub fn new(subject: impl Into<String>, scope: Scope) -> Self {
        Self {
            subject: subject.into(),
            scope,
        }
    }
}

/// Claims structure for the JWT payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (opaque identity identifier)
    pub sub: String,

    /// Issuer
    pub iss: String,

    /// Audience
    pub aud: String,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// Credential kind (access or refresh)
    #[serde(rename = "type")]
    pub kind: TokenKind,

    /// Authorization scope
    pub scope: Scope,

    /// JWT ID, unique per issuance; the handle revocation uses
    pub jti: String,

    /// Session link id, shared by the access/refresh pair of one logical
    /// session and preserved across refreshes
    pub sid: String,
}

impl Claims {
    /// Creates new claims for an access credential
    pub fn new_access(
        identity: &Identity,
        sid: impl Into<String>,
        issuer: &str,
        audience: &str,
        ttl_seconds: i64,
    ) -> Self {
        Self::new(identity, sid, issuer, audience, ttl_seconds, TokenKind::Access)
    }

    /// Creates new claims for a refresh credential
    pub fn new_refresh(
        identity: &Identity,
        sid: impl Into<String>,
        issuer: &str,
        audience: &str,
        ttl_seconds: i64,
    ) -> Self {
        Self::new(identity, sid, issuer, audience, ttl_seconds, TokenKind::Refresh)
    }

    fn new(
        identity: &Identity,
        sid: impl Into<String>,
        issuer: &str,
        audience: &str,
        ttl_seconds: i64,
        kind: TokenKind,
    ) -> Self {
        let now = Utc::now();
        let expiry = now + Duration::seconds(ttl_seconds);

        Self {
            sub: identity.subject.clone(),
            iss: issuer.to_string(),
            aud: audience.to_string(),
            iat: now.timestamp(),
            exp: expiry.timestamp(),
            kind,
            scope: identity.scope,
            jti: Uuid::new_v4().to_string(),
            sid: sid.into(),
        }
    }

    /// Checks if the claims have expired
    pub fn is_expired(&self) -> bool {
        let now = Utc::now().timestamp();
        now > self.exp
    }

    /// Remaining lifetime in seconds, zero once expired
    pub fn ttl_remaining(&self) -> i64 {
        (self.exp - Utc::now().timestamp()).max(0)
    }

    /// The identity embedded in the claims
    pub fn identity(&self) -> Identity {
        Identity {
            subject: self.sub.clone(),
            scope: self.scope,
        }
    }
}

/// Credential pair returned to the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// JWT access credential
    pub access_token: String,

    /// JWT refresh credential
    pub refresh_token: String,

    /// Access credential expiry time in seconds
    pub expires_in: i64,

    /// Refresh credential expiry time in seconds
    pub refresh_expires_in: i64,
}

impl TokenPair {
    /// Creates a new credential pair with the given expiry times
    pub fn new(
        access_token: String,
        refresh_token: String,
        expires_in: i64,
        refresh_expires_in: i64,
    ) -> Self {
        Self {
            access_token,
            refresh_token,
            expires_in,
            refresh_expires_in,
        }
    }
}
