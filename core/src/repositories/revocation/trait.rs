//! Revocation store trait defining the interface for revocation persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::errors::DomainError;

/// Store trait for revocation entries
///
/// The store records which credentials have been invalidated ahead of their
/// natural expiry. Validation is otherwise stateless, so this is the one
/// shared mutable resource on the request path.
///
/// Two entry shapes exist:
/// - id entries, keyed by a credential's `jti` or a session's `sid`, each
///   carrying its own retention horizon;
/// - subject-wide cutoffs, invalidating every credential of a subject
///   issued strictly before the cutoff ("log out everywhere").
///
/// Entries past their horizon are useless (the credential has expired on
/// its own) and may be dropped opportunistically; `prune_expired` exists
/// for stores without native expiry.
///
/// # Consistency
/// Writes and reads must be linearizable per id/subject key so a revocation
/// is never lost under concurrent reads. Writes to different keys need no
/// mutual ordering.
#[async_trait]
pub trait RevocationStore: Send + Sync {
    /// Record an id entry for a credential (`jti`) or session (`sid`)
    ///
    /// # Arguments
    /// * `id` - The token or session identifier to revoke
    /// * `expires_at` - Retention horizon, normally the credential's own expiry
    async fn revoke_id(&self, id: &str, expires_at: DateTime<Utc>) -> Result<(), DomainError>;

    /// Record a subject-wide cutoff
    ///
    /// Invalidates every credential of `subject` issued before `cutoff`.
    /// A later cutoff supersedes an earlier one; an earlier one never
    /// narrows an existing cutoff.
    ///
    /// # Arguments
    /// * `subject` - The subject whose credentials are invalidated
    /// * `cutoff` - Credentials issued strictly before this instant are revoked
    /// * `expires_at` - Retention horizon for the entry itself
    async fn revoke_subject(
        &self,
        subject: &str,
        cutoff: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<(), DomainError>;

    /// Check whether a credential is revoked
    ///
    /// A credential is revoked if its `jti` has an entry, OR its `sid` has
    /// an entry, OR a subject-wide cutoff exists with `cutoff > issued_at`.
    ///
    /// # Returns
    /// * `Ok(true)` - The credential has been revoked
    /// * `Ok(false)` - No matching entry
    /// * `Err(DomainError::Store)` - The store could not answer; callers
    ///   decide the fail-open/fail-closed policy
    async fn is_revoked(
        &self,
        jti: &str,
        sid: &str,
        subject: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<bool, DomainError>;

    /// Drop entries past their retention horizon
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of entries dropped
    async fn prune_expired(&self) -> Result<usize, DomainError>;
}
