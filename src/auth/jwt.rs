use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde_json::{Map, Value};
use thiserror::Error;
use time::{Duration, OffsetDateTime};
use tracing::debug;

use super::claims::{Claims, Identity};
use crate::config::JwtConfig;

const ALGORITHM: Algorithm = Algorithm::HS256;
const SESSION_TTL: Duration = Duration::days(7);

/// Claims that passed signature, algorithm and expiry checks. Kept untyped so the
/// identity fields can be checked separately from token validity.
pub type VerifiedClaims = Map<String, Value>;

/// Why a token was refused. Only used for logging; clients see one outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidReason {
    Malformed,
    Signature,
    Algorithm,
    Expired,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("invalid token ({0:?})")]
    InvalidToken(InvalidReason),
    #[error("malformed claims: {0}")]
    MalformedClaims(&'static str),
    #[error("token signing failed: {0}")]
    Issue(#[source] jsonwebtoken::errors::Error),
    #[error("token expiry out of range")]
    ExpiryOutOfRange,
}

/// Signs and verifies session tokens with a shared HMAC secret.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl JwtKeys {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl,
        }
    }

    pub fn from_config(cfg: &JwtConfig) -> Self {
        Self::new(cfg.secret.as_bytes(), SESSION_TTL)
    }

    pub fn issue(&self, user_id: i64, username: &str) -> Result<String, TokenError> {
        self.issue_at(user_id, username, OffsetDateTime::now_utc())
    }

    fn issue_at(
        &self,
        user_id: i64,
        username: &str,
        now: OffsetDateTime,
    ) -> Result<String, TokenError> {
        let exp = now
            .checked_add(self.ttl)
            .ok_or(TokenError::ExpiryOutOfRange)?;
        let claims = Claims {
            user_id,
            username: username.to_owned(),
            iat: now.unix_timestamp(),
            exp: exp.unix_timestamp(),
        };
        let token =
            encode(&Header::new(ALGORITHM), &claims, &self.encoding).map_err(TokenError::Issue)?;
        debug!(user_id, "jwt signed");
        Ok(token)
    }

    /// Decodes `token`, pinning HS256 and requiring `now < exp`.
    pub fn validate(&self, token: &str) -> Result<VerifiedClaims, TokenError> {
        let mut validation = Validation::new(ALGORITHM);
        validation.leeway = 0;
        let data = decode::<VerifiedClaims>(token, &self.decoding, &validation).map_err(|e| {
            let reason = match e.kind() {
                ErrorKind::InvalidSignature => InvalidReason::Signature,
                ErrorKind::InvalidAlgorithm => InvalidReason::Algorithm,
                ErrorKind::ExpiredSignature => InvalidReason::Expired,
                _ => InvalidReason::Malformed,
            };
            debug!(error = %e, ?reason, "jwt rejected");
            TokenError::InvalidToken(reason)
        })?;

        let exp = data
            .claims
            .get("exp")
            .and_then(Value::as_i64)
            .ok_or(TokenError::InvalidToken(InvalidReason::Malformed))?;
        if OffsetDateTime::now_utc().unix_timestamp() >= exp {
            return Err(TokenError::InvalidToken(InvalidReason::Expired));
        }
        debug!("jwt verified");
        Ok(data.claims)
    }

    pub fn extract_identity(claims: &VerifiedClaims) -> Result<Identity, TokenError> {
        let user_id = claims
            .get("user_id")
            .and_then(Value::as_i64)
            .ok_or(TokenError::MalformedClaims("user_id"))?;
        let username = claims
            .get("username")
            .and_then(Value::as_str)
            .ok_or(TokenError::MalformedClaims("username"))?;
        Ok(Identity {
            user_id,
            username: username.to_owned(),
        })
    }
}

#[cfg(test)]
pub(crate) fn test_keys() -> JwtKeys {
    JwtKeys::from_config(&JwtConfig {
        secret: "test-secret".into(),
    })
}
