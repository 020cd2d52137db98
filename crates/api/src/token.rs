//! HS256 encode/decode for access tokens.
//!
//! Signature handling lives here at the transport edge; the claims window
//! itself is validated by `fleetdesk_auth::validate_claims`.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;

use fleetdesk_auth::AccessClaims;
use fleetdesk_core::UserId;

/// Token lifetime issued at bootstrap (mirrors the 7-day admin session).
const TOKEN_LIFETIME_DAYS: i64 = 7;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("malformed or badly signed token")]
    Invalid(#[from] jsonwebtoken::errors::Error),
}

#[derive(Clone)]
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenCodec {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }

    pub fn issue(&self, user_id: UserId) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = AccessClaims {
            sub: user_id,
            issued_at: now,
            expires_at: now + Duration::days(TOKEN_LIFETIME_DAYS),
        };

        Ok(jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &self.encoding,
        )?)
    }

    /// Verify the signature and return the claims.
    ///
    /// The time window is deliberately not checked here; callers run
    /// `validate_claims` against their own clock.
    pub fn decode(&self, token: &str) -> Result<AccessClaims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let data = jsonwebtoken::decode::<AccessClaims>(token, &self.decoding, &validation)?;
        Ok(data.claims)
    }
}
