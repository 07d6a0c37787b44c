//! Session service implementation
//!
//! Orchestrates the three externally visible flows - issue, refresh,
//! revoke - over the issuer, validator, and revocation store. A logical
//! session moves Issued -> Active -> (Refreshed -> Active)* ->
//! Revoked | Expired; the terminal states are never stored, they fall out
//! of validation.

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use tracing::info;
use uuid::Uuid;

use crate::domain::entities::token::{Identity, TokenKind, TokenPair};
use crate::errors::{DomainResult, TokenError};
use crate::repositories::RevocationStore;
use crate::services::token::{KeyRing, TokenConfig, TokenIssuer, TokenValidator};

/// Service for issuing, refreshing, and revoking sessions
pub struct SessionService<R: RevocationStore> {
    issuer: TokenIssuer,
    validator: TokenValidator<R>,
    store: Arc<R>,
    config: TokenConfig,
}

impl<R: RevocationStore> SessionService<R> {
    /// Creates a new session service
    ///
    /// The key ring is shared with the issuer and validator, so an
    /// operator-driven rotation is picked up by both without
    /// reconstruction.
    pub fn new(keyring: KeyRing, config: TokenConfig, store: Arc<R>) -> Self {
        let issuer = TokenIssuer::new(keyring.clone(), config.clone());
        let validator = TokenValidator::new(keyring, config.clone(), Arc::clone(&store));
        Self {
            issuer,
            validator,
            store,
            config,
        }
    }

    /// The validator resource-serving components use on every request
    pub fn validator(&self) -> &TokenValidator<R> {
        &self.validator
    }

    /// Exchanges a verified external identity for a new session
    ///
    /// Produces one access and one refresh credential sharing a fresh
    /// session link id.
    pub fn issue(&self, identity: &Identity) -> DomainResult<TokenPair> {
        let sid = Uuid::new_v4().to_string();

        let access_token = self.issuer.issue_access(identity, &sid)?;
        let refresh_token = self.issuer.issue_refresh(identity, &sid)?;

        info!(subject = %identity.subject, sid = %sid, "session issued");

        Ok(TokenPair::new(
            access_token,
            refresh_token,
            self.config.access_ttl_secs,
            self.config.refresh_ttl_secs,
        ))
    }

    /// Exchanges a refresh credential for a fresh credential pair
    ///
    /// The presented credential must validate as a refresh credential; an
    /// access credential is rejected here. On success the old refresh
    /// credential is revoked immediately (refresh-token rotation), so a
    /// stolen refresh credential replays at most once. The new pair keeps
    /// the session link id.
    ///
    /// The revocation write is fail-closed: if the store cannot record it,
    /// the refresh fails and no new pair is handed out.
    pub async fn refresh(&self, refresh_token: &str) -> DomainResult<TokenPair> {
        let claims = self.validator.validate(refresh_token, TokenKind::Refresh).await?;
        let identity = claims.identity();

        let access_token = self.issuer.issue_access(&identity, &claims.sid)?;
        let new_refresh_token = self.issuer.issue_refresh(&identity, &claims.sid)?;

        // Retain the entry until the old credential would have expired on
        // its own; afterwards it needs no explicit revocation.
        let old_expiry = Utc
            .timestamp_opt(claims.exp, 0)
            .single()
            .ok_or(TokenError::Malformed)?;
        self.store.revoke_id(&claims.jti, old_expiry).await?;

        info!(subject = %claims.sub, sid = %claims.sid, "session refreshed");

        Ok(TokenPair::new(
            access_token,
            new_refresh_token,
            self.config.access_ttl_secs,
            self.config.refresh_ttl_secs,
        ))
    }

    /// Revokes the session a credential belongs to
    ///
    /// Only structure and signature are checked: a credential at or past
    /// its expiry, or of either kind, must still be revocable. Revocation
    /// writes both the credential's own id and its session link id, so the
    /// paired credential dies with it. With `all_sessions`, a subject-wide
    /// cutoff at the current instant additionally invalidates every
    /// outstanding credential of the subject.
    ///
    /// Store writes are fail-closed: an error here means the revocation
    /// is not durable and must surface to the caller.
    pub async fn revoke(&self, token: &str, all_sessions: bool) -> DomainResult<()> {
        let claims = self.validator.check_signed(token)?;

        let now = Utc::now();
        let credential_expiry = Utc
            .timestamp_opt(claims.exp, 0)
            .single()
            .ok_or(TokenError::Malformed)?;
        // The paired credential may outlive the presented one; retain the
        // session entry for the longest lifetime any pair member can have.
        let session_horizon = now + Duration::seconds(self.config.refresh_ttl_secs);

        self.store.revoke_id(&claims.jti, credential_expiry).await?;
        self.store.revoke_id(&claims.sid, session_horizon).await?;

        if all_sessions {
            self.store
                .revoke_subject(&claims.sub, now, session_horizon)
                .await?;
        }

        info!(
            subject = %claims.sub,
            sid = %claims.sid,
            all_sessions,
            "session revoked"
        );

        Ok(())
    }
}
