//! Bearer token issuing and validation.
//!
//! Tokens are HS256 JWTs signed with the shared secret from `[auth]`. The
//! issuer must match exactly and expiry is checked without leeway. Audience
//! is not checked.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::AuthConfig;

/// Longest lifetime a configured or CLI-issued token may have (one year).
pub const MAX_TOKEN_LIFETIME_MINUTES: i64 = 60 * 24 * 365;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Token expired")]
    Expired,

    #[error("Invalid token: {0}")]
    Invalid(String),

    #[error("Failed to sign token: {0}")]
    Signing(String),

    #[error("Token lifetime must be between 1 and {MAX_TOKEN_LIFETIME_MINUTES} minutes, got {0}")]
    Lifetime(i64),
}

/// Converts a lifetime in minutes, rejecting values outside
/// `1..=MAX_TOKEN_LIFETIME_MINUTES`.
pub fn lifetime_from_minutes(minutes: i64) -> Result<Duration, TokenError> {
    if !(1..=MAX_TOKEN_LIFETIME_MINUTES).contains(&minutes) {
        return Err(TokenError::Lifetime(minutes));
    }
    Duration::try_minutes(minutes).ok_or(TokenError::Lifetime(minutes))
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::ExpiredSignature => Self::Expired,
            _ => Self::Invalid(err.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Clone)]
pub struct TokenValidator {
    issuer: String,
    lifetime: Duration,
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenValidator {
    pub fn new(config: &AuthConfig) -> Result<Self, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.validate_aud = false;
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        Ok(Self {
            issuer: config.issuer.clone(),
            lifetime: lifetime_from_minutes(config.token_lifetime_minutes)?,
            encoding: EncodingKey::from_secret(config.signing_key.as_bytes()),
            decoding: DecodingKey::from_secret(config.signing_key.as_bytes()),
            validation,
        })
    }

    pub fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation)?;
        Ok(data.claims)
    }

    /// Signs a token for `subject` valid for the configured lifetime.
    pub fn issue(&self, subject: &str) -> Result<String, TokenError> {
        self.issue_with_lifetime(subject, self.lifetime)
    }

    pub fn issue_with_lifetime(
        &self,
        subject: &str,
        lifetime: Duration,
    ) -> Result<String, TokenError> {
        let now = Utc::now();
        let expires = now
            .checked_add_signed(lifetime)
            .ok_or_else(|| TokenError::Lifetime(lifetime.num_minutes()))?;
        let claims = Claims {
            sub: subject.to_string(),
            iss: self.issuer.clone(),
            iat: now.timestamp(),
            exp: expires.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }
}
