//! Wire-format codec for credentials
//!
//! Encoding and structural decoding are independent of any business
//! meaning. Decoding rejects malformed input before any signature work so
//! the cost of hostile input stays bounded; the signature check is a
//! separate step the validator can retry across candidate secrets.

use jsonwebtoken::{
    decode, decode_header, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use sha2::{Digest, Sha256};

use crate::domain::entities::token::Claims;
use crate::errors::{DomainResult, TokenError};

/// The only algorithm this service signs or accepts
const ALGORITHM: Algorithm = Algorithm::HS256;

/// Encodes claims into a signed compact JWT
pub fn encode_token(claims: &Claims, secret: &str) -> DomainResult<String> {
    let header = Header::new(ALGORITHM);
    encode(&header, claims, &EncodingKey::from_secret(secret.as_bytes()))
        .map_err(|_| TokenError::GenerationFailed.into())
}

/// Structurally decodes a credential without touching its signature
///
/// Rejects, in order of increasing cost: wrong segment count, an
/// unparseable header, any algorithm other than HS256 (including `none`),
/// and a payload that does not carry the required claims.
pub fn decode_unverified(token: &str) -> DomainResult<Claims> {
    if token.split('.').count() != 3 {
        return Err(TokenError::Malformed.into());
    }

    let header = decode_header(token).map_err(|_| TokenError::Malformed)?;
    if header.alg != ALGORITHM {
        return Err(TokenError::Malformed.into());
    }

    let mut validation = Validation::new(ALGORITHM);
    validation.insecure_disable_signature_validation();
    // Expiry, issuer, and audience are the validator's job, with specific
    // rejection reasons; here only the structure matters.
    validation.validate_exp = false;
    validation.validate_aud = false;

    decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)
        .map(|data| data.claims)
        .map_err(|_| TokenError::Malformed.into())
}

/// Verifies the HMAC signature of a structurally valid credential
/// against one secret
pub fn verify_signature(token: &str, secret: &str) -> DomainResult<bool> {
    let (message, signature) = token.rsplit_once('.').ok_or(TokenError::Malformed)?;

    jsonwebtoken::crypto::verify(
        signature,
        message.as_bytes(),
        &DecodingKey::from_secret(secret.as_bytes()),
        ALGORITHM,
    )
    .map_err(|_| TokenError::Malformed.into())
}

/// Log-safe fingerprint of a presented credential
///
/// The only form in which a raw token may appear in logs.
pub fn fingerprint(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    digest[..16].to_string()
}
