//! Credential validation

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{TimeZone, Utc};
use tracing::{debug, warn};

use crate::domain::entities::token::{Claims, TokenKind};
use crate::errors::{DomainResult, TokenError};
use crate::repositories::RevocationStore;

use super::codec;
use super::config::TokenConfig;
use super::keyring::KeyRing;

/// Validates presented credentials
///
/// Checks run cheapest-first and short-circuit: structure, then signature
/// against each candidate secret, then the standard claims, and only then
/// the revocation store, so floods of malformed or forged credentials
/// never load the store.
pub struct TokenValidator<R: RevocationStore> {
    keyring: KeyRing,
    config: TokenConfig,
    store: Arc<R>,
    /// Revocation-store failures observed on the read path; an operator
    /// surface, not part of any per-credential outcome.
    store_failures: AtomicU64,
}

impl<R: RevocationStore> TokenValidator<R> {
    /// Creates a new validator over the given key ring and store
    pub fn new(keyring: KeyRing, config: TokenConfig, store: Arc<R>) -> Self {
        Self {
            keyring,
            config,
            store,
            store_failures: AtomicU64::new(0),
        }
    }

    /// Validates a credential of the expected kind
    ///
    /// Returns the embedded claims on success. Every rejection carries its
    /// specific reason for internal logging; callers rendering a response
    /// to the credential holder must collapse them to a uniform
    /// not-authenticated answer (`ErrorResponse` does this).
    pub async fn validate(&self, token: &str, expected: TokenKind) -> DomainResult<Claims> {
        let claims = self.check_signed(token)?;

        let now = Utc::now().timestamp();
        if claims.exp < now {
            debug!(jti = %claims.jti, "rejected expired credential");
            return Err(TokenError::Expired.into());
        }
        if claims.iss != self.config.issuer {
            debug!(jti = %claims.jti, iss = %claims.iss, "rejected credential with foreign issuer");
            return Err(TokenError::InvalidIssuer.into());
        }
        if claims.aud != self.config.audience {
            debug!(jti = %claims.jti, aud = %claims.aud, "rejected credential with foreign audience");
            return Err(TokenError::InvalidAudience.into());
        }
        if claims.kind != expected {
            debug!(jti = %claims.jti, kind = %claims.kind, "rejected credential of wrong kind");
            return Err(TokenError::WrongKind {
                expected,
                actual: claims.kind,
            }
            .into());
        }

        let issued_at = Utc
            .timestamp_opt(claims.iat, 0)
            .single()
            .ok_or(TokenError::Malformed)?;
        match self
            .store
            .is_revoked(&claims.jti, &claims.sid, &claims.sub, issued_at)
            .await
        {
            Ok(true) => {
                debug!(jti = %claims.jti, subject = %claims.sub, "rejected revoked credential");
                return Err(TokenError::Revoked.into());
            }
            Ok(false) => {}
            Err(e) => {
                // Read path fails open: an unavailable store must not make
                // every credential invalid. The failure is an operational
                // signal, surfaced separately from rejection counts.
                self.store_failures.fetch_add(1, Ordering::Relaxed);
                warn!(
                    target: "revocation_store",
                    error = %e,
                    jti = %claims.jti,
                    "revocation lookup failed, failing open"
                );
            }
        }

        Ok(claims)
    }

    /// Structural and signature checks only
    ///
    /// Used by the revocation flow, where an expired or wrong-kind
    /// credential must still be revocable.
    pub(crate) fn check_signed(&self, token: &str) -> DomainResult<Claims> {
        let claims = match codec::decode_unverified(token) {
            Ok(claims) => claims,
            Err(e) => {
                debug!(token = %codec::fingerprint(token), "rejected malformed credential");
                return Err(e);
            }
        };

        for secret in self.keyring.candidate_secrets()? {
            if codec::verify_signature(token, &secret)? {
                return Ok(claims);
            }
        }

        debug!(jti = %claims.jti, "rejected credential with unknown signature");
        Err(TokenError::InvalidSignature.into())
    }

    /// Number of revocation-store failures seen on the read path
    pub fn store_failure_count(&self) -> u64 {
        self.store_failures.load(Ordering::Relaxed)
    }
}
