//! HMAC signing-key management with two-generation rotation

use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::errors::{DomainError, DomainResult, TokenError};
use kg_shared::config::JwtConfig;

/// One generation pair of signing secrets
///
/// Exactly one `current` secret signs new credentials. `previous` exists
/// only during a rotation overlap window and is used for verification
/// only, never for signing.
#[derive(Clone)]
pub struct KeySet {
    current: String,
    previous: Option<String>,
    rotated_at: Option<DateTime<Utc>>,
}

impl std::fmt::Debug for KeySet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeySet")
            .field("has_previous", &self.previous.is_some())
            .field("rotated_at", &self.rotated_at)
            .finish()
    }
}

/// Shared signing-key ring
///
/// Readers snapshot the whole `KeySet` through an `Arc` clone, so a
/// concurrent `rotate` is observed either entirely or not at all, never
/// as a torn half-update. Cloning the ring shares the same underlying
/// keys.
#[derive(Clone)]
pub struct KeyRing {
    inner: Arc<RwLock<Arc<KeySet>>>,
}

impl std::fmt::Debug for KeyRing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.snapshot() {
            Ok(keys) => f.debug_struct("KeyRing").field("keys", &keys).finish(),
            Err(_) => f.debug_struct("KeyRing").finish_non_exhaustive(),
        }
    }
}

impl KeyRing {
    /// Creates a key ring with a single signing secret
    ///
    /// An empty secret is the one misconfiguration that must prevent
    /// startup entirely.
    pub fn new(secret: impl Into<String>) -> DomainResult<Self> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(TokenError::NoSigningKeys.into());
        }

        Ok(Self {
            inner: Arc::new(RwLock::new(Arc::new(KeySet {
                current: secret,
                previous: None,
                rotated_at: None,
            }))),
        })
    }

    /// Creates a key ring from configuration
    ///
    /// A configured `previous_secret` seeds an already-open rotation
    /// overlap window, e.g. after a restart mid-rotation.
    pub fn from_config(config: &JwtConfig) -> DomainResult<Self> {
        let ring = Self::new(config.secret.clone())?;
        if let Some(previous) = config
            .previous_secret
            .as_ref()
            .filter(|s| !s.is_empty())
        {
            let mut keys = ring.write()?;
            *keys = Arc::new(KeySet {
                current: keys.current.clone(),
                previous: Some(previous.clone()),
                rotated_at: None,
            });
        }
        Ok(ring)
    }

    /// The secret used to sign newly issued credentials
    pub fn signing_secret(&self) -> DomainResult<String> {
        Ok(self.snapshot()?.current.clone())
    }

    /// Secrets to try when verifying a presented credential, newest first
    pub fn candidate_secrets(&self) -> DomainResult<Vec<String>> {
        let keys = self.snapshot()?;
        let mut candidates = vec![keys.current.clone()];
        if let Some(previous) = &keys.previous {
            candidates.push(previous.clone());
        }
        Ok(candidates)
    }

    /// Rotate to a new signing secret
    ///
    /// The old `current` becomes `previous` and stays accepted for
    /// verification until `expire_previous`. Only two generations are ever
    /// retained: rotating again while an overlap window is still open
    /// discards the oldest secret, making anything signed with it
    /// unverifiable.
    pub fn rotate(&self, new_secret: impl Into<String>) -> DomainResult<()> {
        let new_secret = new_secret.into();
        if new_secret.is_empty() {
            return Err(DomainError::Validation {
                message: "Rotation requires a non-empty secret".to_string(),
            });
        }

        let mut keys = self.write()?;
        if keys.previous.is_some() {
            warn!("Discarding previous signing secret before its overlap window elapsed");
        }
        *keys = Arc::new(KeySet {
            current: new_secret,
            previous: Some(keys.current.clone()),
            rotated_at: Some(Utc::now()),
        });
        info!("Signing secret rotated");
        Ok(())
    }

    /// Close the rotation overlap window, dropping the previous secret
    ///
    /// Operator-driven once the window configured for the deployment has
    /// elapsed; credentials still signed with the old secret fail
    /// verification afterwards.
    pub fn expire_previous(&self) -> DomainResult<()> {
        let mut keys = self.write()?;
        if keys.previous.is_none() {
            return Ok(());
        }
        *keys = Arc::new(KeySet {
            current: keys.current.clone(),
            previous: None,
            rotated_at: keys.rotated_at,
        });
        info!("Previous signing secret expired");
        Ok(())
    }

    /// When the last rotation happened, if any
    pub fn rotated_at(&self) -> DomainResult<Option<DateTime<Utc>>> {
        Ok(self.snapshot()?.rotated_at)
    }

    /// Whether a rotation overlap window is currently open
    pub fn overlap_open(&self) -> DomainResult<bool> {
        Ok(self.snapshot()?.previous.is_some())
    }

    /// Whether the overlap window has run its course and the previous
    /// secret is safe to expire
    ///
    /// A window seeded from configuration has no known rotation instant
    /// and never reports elapsed; the operator closes it explicitly.
    pub fn overlap_elapsed(&self, overlap_secs: i64) -> DomainResult<bool> {
        let keys = self.snapshot()?;
        match (keys.previous.is_some(), keys.rotated_at) {
            (false, _) => Ok(true),
            (true, None) => Ok(false),
            (true, Some(rotated_at)) => {
                Ok(Utc::now() - rotated_at >= chrono::Duration::seconds(overlap_secs))
            }
        }
    }

    fn snapshot(&self) -> DomainResult<Arc<KeySet>> {
        self.inner
            .read()
            .map(|keys| Arc::clone(&keys))
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to read key set: {}", e),
            })
    }

    fn write(&self) -> DomainResult<std::sync::RwLockWriteGuard<'_, Arc<KeySet>>> {
        self.inner.write().map_err(|e| DomainError::Internal {
            message: format!("Failed to write key set: {}", e),
        })
    }
}
