//! Credential issuance

use tracing::debug;

use crate::domain::entities::token::{Claims, Identity};
use crate::errors::DomainResult;

use super::codec;
use super::config::TokenConfig;
use super::keyring::KeyRing;

/// Builds and signs access and refresh credentials
///
/// Pure function of the identity, the clock, and the key ring's current
/// secret; holds no per-call state, so concurrent issuance needs no
/// locking.
#[derive(Clone)]
pub struct TokenIssuer {
    keyring: KeyRing,
    config: TokenConfig,
}

impl TokenIssuer {
    /// Creates a new issuer over the given key ring
    pub fn new(keyring: KeyRing, config: TokenConfig) -> Self {
        Self { keyring, config }
    }

    /// Issues an access credential for an identity
    pub fn issue_access(&self, identity: &Identity, sid: &str) -> DomainResult<String> {
        let claims = Claims::new_access(
            identity,
            sid,
            &self.config.issuer,
            &self.config.audience,
            self.config.access_ttl_secs,
        );
        self.sign(&claims)
    }

    /// Issues a refresh credential for an identity
    ///
    /// `sid` links the refresh credential to the access credential it was
    /// paired with, so revoking the session invalidates both.
    pub fn issue_refresh(&self, identity: &Identity, sid: &str) -> DomainResult<String> {
        let claims = Claims::new_refresh(
            identity,
            sid,
            &self.config.issuer,
            &self.config.audience,
            self.config.refresh_ttl_secs,
        );
        self.sign(&claims)
    }

    fn sign(&self, claims: &Claims) -> DomainResult<String> {
        let secret = self.keyring.signing_secret()?;
        let token = codec::encode_token(claims, &secret)?;
        debug!(
            subject = %claims.sub,
            kind = %claims.kind,
            jti = %claims.jti,
            "credential issued"
        );
        Ok(token)
    }
}
