use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use thiserror::Error;
use tracing::warn;

use super::{
    claims::Identity,
    jwt::{JwtKeys, TokenError},
};
use crate::error::AppError;

#[derive(Debug, Error)]
pub enum GateRejection {
    #[error("authorization header required")]
    MissingHeader,
    #[error(transparent)]
    Token(#[from] TokenError),
}

impl From<GateRejection> for AppError {
    fn from(r: GateRejection) -> Self {
        match r {
            GateRejection::MissingHeader => {
                AppError::Unauthorized("authorization token required".into())
            }
            GateRejection::Token(_) => AppError::Unauthorized("invalid token".into()),
        }
    }
}

/// Per-request check of the `Authorization` header.
#[derive(Clone)]
pub struct AuthGate {
    keys: JwtKeys,
}

impl AuthGate {
    pub fn new(keys: JwtKeys) -> Self {
        Self { keys }
    }

    pub fn check(&self, headers: &HeaderMap) -> Result<Identity, GateRejection> {
        let header = headers
            .get(AUTHORIZATION)
            .map(|v| v.to_str().unwrap_or_default())
            .filter(|v| !v.is_empty())
            .ok_or(GateRejection::MissingHeader)?;
        let claims = self.keys.validate(bearer_token(header))?;
        Ok(JwtKeys::extract_identity(&claims)?)
    }
}

/// Strips a case-sensitive `Bearer ` prefix; without it the whole value is the token.
fn bearer_token(header: &str) -> &str {
    header.strip_prefix("Bearer ").unwrap_or(header)
}

/// Middleware for protected routes: rejects with 401 or stores the caller's
/// `Identity` in the request extensions.
pub async fn require_auth(
    State(gate): State<AuthGate>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    match gate.check(req.headers()) {
        Ok(identity) => {
            req.extensions_mut().insert(identity);
            Ok(next.run(req).await)
        }
        Err(rejection) => {
            warn!(error = %rejection, path = %req.uri().path(), "request rejected by auth gate");
            Err(rejection.into())
        }
    }
}
