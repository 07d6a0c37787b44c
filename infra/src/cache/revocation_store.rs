//! Redis-backed implementation of the revocation store
//!
//! Key patterns:
//! - `revoked:id:{id}` - id entry for a credential (`jti`) or session
//!   (`sid`); the Redis TTL is the entry's retention horizon
//! - `revoked:subject:{subject}` - subject-wide cutoff, value is the
//!   cutoff as epoch seconds
//!
//! Native TTLs make the store self-pruning, so `prune_expired` has
//! nothing to do here.
//!
//! Lookups sit on the request hot path and are bounded by the configured
//! response timeout. A timeout or transport error surfaces as
//! `DomainError::Store`; the validator fails open on it, while the write
//! paths in the session service fail closed.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::time::Duration;
use tracing::debug;

use kg_core::errors::{DomainError, DomainResult};
use kg_core::repositories::RevocationStore;
use kg_shared::config::CacheConfig;

use super::redis_client::RedisClient;
use crate::InfrastructureError;

/// Shared revocation store on Redis
pub struct RedisRevocationStore {
    client: RedisClient,
    response_timeout: Duration,
    key_prefix: String,
}

impl RedisRevocationStore {
    /// Create a store over an existing client
    pub fn new(client: RedisClient, config: &CacheConfig) -> Self {
        Self {
            client,
            response_timeout: Duration::from_millis(config.response_timeout_ms),
            key_prefix: config.key_prefix.clone().unwrap_or_default(),
        }
    }

    /// Connect and create a store from configuration
    pub async fn connect(config: &CacheConfig) -> Result<Self, InfrastructureError> {
        let client = RedisClient::new(config).await?;
        Ok(Self::new(client, config))
    }

    fn id_key(&self, id: &str) -> String {
        id_key(&self.key_prefix, id)
    }

    fn subject_key(&self, subject: &str) -> String {
        subject_key(&self.key_prefix, subject)
    }

    /// Seconds until the horizon, `None` once it has passed
    fn ttl_until(expires_at: DateTime<Utc>) -> Option<u64> {
        let seconds = (expires_at - Utc::now()).num_seconds();
        (seconds > 0).then_some(seconds as u64)
    }
}

#[async_trait]
impl RevocationStore for RedisRevocationStore {
    async fn revoke_id(&self, id: &str, expires_at: DateTime<Utc>) -> DomainResult<()> {
        // An entry past its horizon would cover a credential that has
        // already expired on its own
        let Some(ttl) = Self::ttl_until(expires_at) else {
            return Ok(());
        };

        self.client
            .set_with_expiry(&self.id_key(id), "1", ttl)
            .await?;
        debug!(id, ttl, "revocation entry written");
        Ok(())
    }

    async fn revoke_subject(
        &self,
        subject: &str,
        cutoff: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> DomainResult<()> {
        let Some(ttl) = Self::ttl_until(expires_at) else {
            return Ok(());
        };
        let key = self.subject_key(subject);

        // An earlier cutoff must not narrow an existing one. Cutoffs are
        // always "now" at write time, so the read-then-write race between
        // two concurrent writers is benign: either order yields the later
        // cutoff within clock precision.
        if let Some(existing) = self.client.get(&key).await? {
            if let Ok(existing_ts) = existing.parse::<i64>() {
                if existing_ts >= cutoff.timestamp() {
                    return Ok(());
                }
            }
        }

        self.client
            .set_with_expiry(&key, &cutoff.timestamp().to_string(), ttl)
            .await?;
        debug!(subject, cutoff = cutoff.timestamp(), "subject cutoff written");
        Ok(())
    }

    async fn is_revoked(
        &self,
        jti: &str,
        sid: &str,
        subject: &str,
        issued_at: DateTime<Utc>,
    ) -> DomainResult<bool> {
        let lookup = async {
            for id in [jti, sid] {
                if self.client.exists(&self.id_key(id)).await? {
                    return Ok::<bool, InfrastructureError>(true);
                }
            }

            if let Some(value) = self.client.get(&self.subject_key(subject)).await? {
                if let Ok(cutoff_ts) = value.parse::<i64>() {
                    if cutoff_ts > issued_at.timestamp() {
                        return Ok(true);
                    }
                }
            }

            Ok(false)
        };

        match tokio::time::timeout(self.response_timeout, lookup).await {
            Ok(result) => result.map_err(DomainError::from),
            Err(_) => Err(InfrastructureError::Timeout(self.response_timeout).into()),
        }
    }

    async fn prune_expired(&self) -> DomainResult<usize> {
        // Redis expires entries natively
        Ok(0)
    }
}

fn id_key(prefix: &str, id: &str) -> String {
    format!("{}revoked:id:{}", prefix, id)
}

fn subject_key(prefix: &str, subject: &str) -> String {
    format!("{}revoked:subject:{}", prefix, subject)
}
