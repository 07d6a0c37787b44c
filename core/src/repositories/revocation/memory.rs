//! In-memory implementation of RevocationStore
//!
//! Suitable for single-instance deployments and tests. Multi-instance
//! deployments need the shared Redis store from the infrastructure crate,
//! since a revocation written on one instance must be visible on all.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::errors::DomainError;

use super::r#trait::RevocationStore;

/// Subject-wide cutoff entry
#[derive(Debug, Clone)]
struct SubjectCutoff {
    cutoff: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

/// In-memory revocation store
///
/// A single lock over both maps keeps reads and writes linearizable per
/// key. Lookups prune lazily: an entry found past its horizon counts as
/// absent.
pub struct InMemoryRevocationStore {
    /// id (`jti` or `sid`) -> retention horizon
    ids: RwLock<HashMap<String, DateTime<Utc>>>,
    /// subject -> cutoff
    subjects: RwLock<HashMap<String, SubjectCutoff>>,
}

impl InMemoryRevocationStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self {
            ids: RwLock::new(HashMap::new()),
            subjects: RwLock::new(HashMap::new()),
        }
    }

    /// Number of live entries, for monitoring
    pub async fn len(&self) -> usize {
        self.ids.read().await.len() + self.subjects.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for InMemoryRevocationStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RevocationStore for InMemoryRevocationStore {
    async fn revoke_id(&self, id: &str, expires_at: DateTime<Utc>) -> Result<(), DomainError> {
        let mut ids = self.ids.write().await;
        // Keep the later horizon if the id was already revoked
        let entry = ids.entry(id.to_string()).or_insert(expires_at);
        if expires_at > *entry {
            *entry = expires_at;
        }
        Ok(())
    }

    async fn revoke_subject(
        &self,
        subject: &str,
        cutoff: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        let mut subjects = self.subjects.write().await;
        match subjects.get_mut(subject) {
            // A later cutoff supersedes; an earlier one must not narrow it
            Some(existing) if existing.cutoff >= cutoff => {}
            _ => {
                subjects.insert(subject.to_string(), SubjectCutoff { cutoff, expires_at });
            }
        }
        Ok(())
    }

    async fn is_revoked(
        &self,
        jti: &str,
        sid: &str,
        subject: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<bool, DomainError> {
        let now = Utc::now();

        {
            let ids = self.ids.read().await;
            for id in [jti, sid] {
                if let Some(expires_at) = ids.get(id) {
                    if *expires_at > now {
                        return Ok(true);
                    }
                }
            }
        }

        let subjects = self.subjects.read().await;
        if let Some(entry) = subjects.get(subject) {
            if entry.expires_at > now && entry.cutoff > issued_at {
                return Ok(true);
            }
        }

        Ok(false)
    }

    async fn prune_expired(&self) -> Result<usize, DomainError> {
        let now = Utc::now();
        let mut dropped = 0;

        {
            let mut ids = self.ids.write().await;
            let before = ids.len();
            ids.retain(|_, expires_at| *expires_at > now);
            dropped += before - ids.len();
        }

        {
            let mut subjects = self.subjects.write().await;
            let before = subjects.len();
            subjects.retain(|_, entry| entry.expires_at > now);
            dropped += before - subjects.len();
        }

        Ok(dropped)
    }
}
