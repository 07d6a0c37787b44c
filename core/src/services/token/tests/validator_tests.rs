//! Unit tests for credential validation

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use crate::domain::entities::token::{Identity, Scope, TokenKind};
use crate::errors::{DomainError, DomainResult, TokenError};
use crate::repositories::revocation::{InMemoryRevocationStore, RevocationStore};
use crate::services::token::{codec, KeyRing, TokenConfig, TokenIssuer, TokenValidator};

const SECRET: &str = "validator-test-secret";

/// Store wrapper counting lookups, to pin down check ordering
struct CountingStore {
    inner: InMemoryRevocationStore,
    lookups: AtomicUsize,
}

impl CountingStore {
    fn new() -> Self {
        Self {
            inner: InMemoryRevocationStore::new(),
            lookups: AtomicUsize::new(0),
        }
    }

    fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl RevocationStore for CountingStore {
    async fn revoke_id(&self, id: &str, expires_at: DateTime<Utc>) -> DomainResult<()> {
        self.inner.revoke_id(id, expires_at).await
    }

    async fn revoke_subject(
        &self,
        subject: &str,
        cutoff: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> DomainResult<()> {
        self.inner.revoke_subject(subject, cutoff, expires_at).await
    }

    async fn is_revoked(
        &self,
        jti: &str,
        sid: &str,
        subject: &str,
        issued_at: DateTime<Utc>,
    ) -> DomainResult<bool> {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        self.inner.is_revoked(jti, sid, subject, issued_at).await
    }

    async fn prune_expired(&self) -> DomainResult<usize> {
        self.inner.prune_expired().await
    }
}

/// Store that is always unavailable
struct BrokenStore;

#[async_trait]
impl RevocationStore for BrokenStore {
    async fn revoke_id(&self, _id: &str, _expires_at: DateTime<Utc>) -> DomainResult<()> {
        Err(DomainError::Store {
            message: "connection refused".to_string(),
        })
    }

    async fn revoke_subject(
        &self,
        _subject: &str,
        _cutoff: DateTime<Utc>,
        _expires_at: DateTime<Utc>,
    ) -> DomainResult<()> {
        Err(DomainError::Store {
            message: "connection refused".to_string(),
        })
    }

    async fn is_revoked(
        &self,
        _jti: &str,
        _sid: &str,
        _subject: &str,
        _issued_at: DateTime<Utc>,
    ) -> DomainResult<bool> {
        Err(DomainError::Store {
            message: "connection refused".to_string(),
        })
    }

    async fn prune_expired(&self) -> DomainResult<usize> {
        Err(DomainError::Store {
            message: "connection refused".to_string(),
        })
    }
}

fn identity() -> Identity {
    Identity::new("42", Scope::User)
}

fn setup<R: RevocationStore>(store: Arc<R>) -> (KeyRing, TokenIssuer, TokenValidator<R>) {
    let keyring = KeyRing::new(SECRET).unwrap();
    let config = TokenConfig::default();
    let issuer = TokenIssuer::new(keyring.clone(), config.clone());
    let validator = TokenValidator::new(keyring.clone(), config, store);
    (keyring, issuer, validator)
}

#[tokio::test]
async fn test_fresh_access_token_validates() {
    let store = Arc::new(InMemoryRevocationStore::new());
    let (_, issuer, validator) = setup(store);

    let token = issuer.issue_access(&identity(), "sid-1").unwrap();
    let claims = validator.validate(&token, TokenKind::Access).await.unwrap();

    assert_eq!(claims.sub, "42");
    assert_eq!(claims.scope, Scope::User);
    assert_eq!(claims.kind, TokenKind::Access);
    assert_eq!(claims.sid, "sid-1");
}

#[tokio::test]
async fn test_malformed_token_never_reaches_the_store() {
    let store = Arc::new(CountingStore::new());
    let (_, _, validator) = setup(Arc::clone(&store));

    let result = validator.validate("not-a-token", TokenKind::Access).await;

    assert!(matches!(
        result,
        Err(DomainError::Token(TokenError::Malformed))
    ));
    assert_eq!(store.lookup_count(), 0);
}

#[tokio::test]
async fn test_forged_token_never_reaches_the_store() {
    let store = Arc::new(CountingStore::new());
    let (_, _, validator) = setup(Arc::clone(&store));

    let foreign_keyring = KeyRing::new("attacker-secret").unwrap();
    let foreign_issuer = TokenIssuer::new(foreign_keyring, TokenConfig::default());
    let token = foreign_issuer.issue_access(&identity(), "sid-1").unwrap();

    let result = validator.validate(&token, TokenKind::Access).await;

    assert!(matches!(
        result,
        Err(DomainError::Token(TokenError::InvalidSignature))
    ));
    assert_eq!(store.lookup_count(), 0);
}

#[tokio::test]
async fn test_valid_token_triggers_exactly_one_lookup() {
    let store = Arc::new(CountingStore::new());
    let (_, issuer, validator) = setup(Arc::clone(&store));

    let token = issuer.issue_access(&identity(), "sid-1").unwrap();
    validator.validate(&token, TokenKind::Access).await.unwrap();

    assert_eq!(store.lookup_count(), 1);
}

#[tokio::test]
async fn test_expiry_boundary() {
    let store = Arc::new(InMemoryRevocationStore::new());
    let (_, _, validator) = setup(store);
    let config = TokenConfig::default();
    let now = Utc::now().timestamp();

    // Issued 899s ago with a 900s lifetime: one second left
    let mut claims = crate::domain::entities::token::Claims::new_access(
        &identity(),
        "sid-1",
        &config.issuer,
        &config.audience,
        900,
    );
    claims.iat = now - 899;
    claims.exp = claims.iat + 900;
    let token = codec::encode_token(&claims, SECRET).unwrap();
    assert!(validator.validate(&token, TokenKind::Access).await.is_ok());

    // Issued 901s ago with the same lifetime: expired one second ago
    claims.iat = now - 901;
    claims.exp = claims.iat + 900;
    let token = codec::encode_token(&claims, SECRET).unwrap();
    let result = validator.validate(&token, TokenKind::Access).await;
    assert!(matches!(
        result,
        Err(DomainError::Token(TokenError::Expired))
    ));
}

#[tokio::test]
async fn test_foreign_issuer_is_rejected() {
    let store = Arc::new(InMemoryRevocationStore::new());
    let (_, _, validator) = setup(store);

    let claims = crate::domain::entities::token::Claims::new_access(
        &identity(),
        "sid-1",
        "someone-else",
        "keygate-api",
        900,
    );
    let token = codec::encode_token(&claims, SECRET).unwrap();

    let result = validator.validate(&token, TokenKind::Access).await;

    assert!(matches!(
        result,
        Err(DomainError::Token(TokenError::InvalidIssuer))
    ));
}

#[tokio::test]
async fn test_foreign_audience_is_rejected() {
    let store = Arc::new(InMemoryRevocationStore::new());
    let (_, _, validator) = setup(store);

    let claims = crate::domain::entities::token::Claims::new_access(
        &identity(),
        "sid-1",
        "keygate",
        "some-other-api",
        900,
    );
    let token = codec::encode_token(&claims, SECRET).unwrap();

    let result = validator.validate(&token, TokenKind::Access).await;

    assert!(matches!(
        result,
        Err(DomainError::Token(TokenError::InvalidAudience))
    ));
}

#[tokio::test]
async fn test_refresh_token_is_not_an_access_token() {
    let store = Arc::new(InMemoryRevocationStore::new());
    let (_, issuer, validator) = setup(store);

    let token = issuer.issue_refresh(&identity(), "sid-1").unwrap();
    let result = validator.validate(&token, TokenKind::Access).await;

    assert!(matches!(
        result,
        Err(DomainError::Token(TokenError::WrongKind {
            expected: TokenKind::Access,
            actual: TokenKind::Refresh,
        }))
    ));
}

#[tokio::test]
async fn test_access_token_is_not_a_refresh_token() {
    let store = Arc::new(InMemoryRevocationStore::new());
    let (_, issuer, validator) = setup(store);

    let token = issuer.issue_access(&identity(), "sid-1").unwrap();
    let result = validator.validate(&token, TokenKind::Refresh).await;

    assert!(matches!(
        result,
        Err(DomainError::Token(TokenError::WrongKind { .. }))
    ));
}

#[tokio::test]
async fn test_revoked_jti_is_rejected() {
    let store = Arc::new(InMemoryRevocationStore::new());
    let (_, issuer, validator) = setup(Arc::clone(&store));

    let token = issuer.issue_access(&identity(), "sid-1").unwrap();
    let claims = codec::decode_unverified(&token).unwrap();
    store
        .revoke_id(&claims.jti, Utc::now() + Duration::minutes(15))
        .await
        .unwrap();

    let result = validator.validate(&token, TokenKind::Access).await;

    assert!(matches!(
        result,
        Err(DomainError::Token(TokenError::Revoked))
    ));
}

#[tokio::test]
async fn test_revoked_session_id_cascades_to_the_credential() {
    let store = Arc::new(InMemoryRevocationStore::new());
    let (_, issuer, validator) = setup(Arc::clone(&store));

    let token = issuer.issue_access(&identity(), "sid-1").unwrap();
    store
        .revoke_id("sid-1", Utc::now() + Duration::days(7))
        .await
        .unwrap();

    let result = validator.validate(&token, TokenKind::Access).await;

    assert!(matches!(
        result,
        Err(DomainError::Token(TokenError::Revoked))
    ));
}

#[tokio::test]
async fn test_subject_cutoff_rejects_earlier_issuance() {
    let store = Arc::new(InMemoryRevocationStore::new());
    let (_, _, validator) = setup(Arc::clone(&store));
    let config = TokenConfig::default();
    let now = Utc::now();

    // Credential issued 50s ago, cutoff now: revoked despite a far-off exp
    let mut claims = crate::domain::entities::token::Claims::new_access(
        &identity(),
        "sid-1",
        &config.issuer,
        &config.audience,
        900,
    );
    claims.iat = (now - Duration::seconds(50)).timestamp();
    claims.exp = (now + Duration::seconds(900)).timestamp();
    let token = codec::encode_token(&claims, SECRET).unwrap();

    store
        .revoke_subject("42", now, now + Duration::days(7))
        .await
        .unwrap();

    let result = validator.validate(&token, TokenKind::Access).await;

    assert!(matches!(
        result,
        Err(DomainError::Token(TokenError::Revoked))
    ));
}

#[tokio::test]
async fn test_unavailable_store_fails_open_on_reads() {
    let store = Arc::new(BrokenStore);
    let (_, issuer, validator) = setup(store);

    let token = issuer.issue_access(&identity(), "sid-1").unwrap();

    // A dead revocation store must not make the whole system unusable;
    // the failure is surfaced to operators through the counter instead
    assert_eq!(validator.store_failure_count(), 0);
    let claims = validator.validate(&token, TokenKind::Access).await.unwrap();
    assert_eq!(claims.sub, "42");
    assert_eq!(validator.store_failure_count(), 1);
}

#[tokio::test]
async fn test_pre_rotation_token_survives_the_overlap_window() {
    let store = Arc::new(InMemoryRevocationStore::new());
    let (keyring, issuer, validator) = setup(store);

    let old_token = issuer.issue_access(&identity(), "sid-1").unwrap();
    keyring.rotate("next-secret").unwrap();

    // Signed with the previous secret, still accepted during overlap
    let claims = validator
        .validate(&old_token, TokenKind::Access)
        .await
        .unwrap();
    assert_eq!(claims.sub, "42");
}

#[tokio::test]
async fn test_post_rotation_issuance_signs_with_current_only() {
    let store = Arc::new(InMemoryRevocationStore::new());
    let (keyring, issuer, validator) = setup(store);

    keyring.rotate("next-secret").unwrap();
    let token = issuer.issue_access(&identity(), "sid-1").unwrap();

    assert!(codec::verify_signature(&token, "next-secret").unwrap());
    assert!(!codec::verify_signature(&token, SECRET).unwrap());
    assert!(validator.validate(&token, TokenKind::Access).await.is_ok());
}

#[tokio::test]
async fn test_expired_overlap_window_invalidates_old_signatures() {
    let store = Arc::new(InMemoryRevocationStore::new());
    let (keyring, issuer, validator) = setup(store);

    let old_token = issuer.issue_access(&identity(), "sid-1").unwrap();
    keyring.rotate("next-secret").unwrap();
    keyring.expire_previous().unwrap();

    let result = validator.validate(&old_token, TokenKind::Access).await;

    assert!(matches!(
        result,
        Err(DomainError::Token(TokenError::InvalidSignature))
    ));
}
