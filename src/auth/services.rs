use std::sync::Arc;

use axum::extract::FromRef;
use thiserror::Error;
use time::OffsetDateTime;
use tracing::{error, info, warn};

use crate::{
    auth::{
        dto::RegisterRequest,
        jwt::{JwtKeys, TokenError},
        password::{hash_password, verify_password, PasswordError},
        repo::UserStore,
        repo_types::{NewUser, User},
    },
    db::StoreError,
    error::AppError,
    state::AppState,
};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("user lookup failed: {0}")]
    LookupFailed(#[source] StoreError),
    #[error("username or email already exists")]
    AlreadyExists,
    #[error("{0}")]
    HashingFailed(#[source] PasswordError),
    #[error("saving user failed: {0}")]
    PersistFailed(#[source] StoreError),
    #[error("user not found")]
    NotFound,
    #[error("wrong password")]
    BadCredentials,
    #[error("{0}")]
    TokenIssuanceFailed(#[source] TokenError),
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::AlreadyExists => AppError::Conflict("username or email already exists".into()),
            AuthError::NotFound | AuthError::BadCredentials => {
                AppError::Unauthorized("invalid credentials".into())
            }
            AuthError::LookupFailed(_) => AppError::Persistence("error looking up user".into()),
            AuthError::HashingFailed(_) => AppError::Persistence("error securing password".into()),
            AuthError::PersistFailed(_) => AppError::Persistence("error creating user".into()),
            AuthError::TokenIssuanceFailed(_) => {
                AppError::Persistence("error generating token".into())
            }
        }
    }
}

/// Registration and login over a user store.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    keys: JwtKeys,
}

impl FromRef<AppState> for AuthService {
    fn from_ref(state: &AppState) -> Self {
        Self::new(state.users.clone(), state.keys.clone())
    }
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, keys: JwtKeys) -> Self {
        Self { users, keys }
    }

    /// Creates a user. Collisions on username or email are reported the same way.
    pub async fn register(&self, req: RegisterRequest) -> Result<User, AuthError> {
        let existing = self
            .users
            .count_by_username_or_email(&req.username, &req.email)
            .await
            .map_err(|e| {
                error!(error = %e, "count users failed");
                AuthError::LookupFailed(e)
            })?;
        if existing > 0 {
            warn!(username = %req.username, "username or email already registered");
            return Err(AuthError::AlreadyExists);
        }

        let now = OffsetDateTime::now_utc();
        let password_hash = hash_password(&req.password).map_err(AuthError::HashingFailed)?;
        let record = NewUser {
            username: req.username,
            email: req.email,
            password_hash,
            first_name: req.first_name,
            last_name: req.last_name,
            created_at: now,
            updated_at: now,
        };

        // the unique index catches registrations racing past the count above
        let user = self.users.insert(record).await.map_err(|e| match e {
            StoreError::Conflict => {
                warn!("unique constraint rejected registration");
                AuthError::AlreadyExists
            }
            other => {
                error!(error = %other, "insert user failed");
                AuthError::PersistFailed(other)
            }
        })?;

        info!(user_id = user.id, username = %user.username, "user registered");
        Ok(user.without_password())
    }

    /// Authenticates by username or email and issues a session token.
    pub async fn login(&self, login: &str, password: &str) -> Result<(String, User), AuthError> {
        let user = match self.users.find_by_login(login).await {
            Ok(u) => u,
            Err(StoreError::NotFound) => {
                warn!(login, "login unknown user");
                return Err(AuthError::NotFound);
            }
            Err(e) => {
                error!(error = %e, "find_by_login failed");
                return Err(AuthError::LookupFailed(e));
            }
        };

        if !verify_password(password, &user.password_hash) {
            warn!(user_id = user.id, "login invalid password");
            return Err(AuthError::BadCredentials);
        }

        let token = self.keys.issue(user.id, &user.username).map_err(|e| {
            error!(error = %e, "jwt sign failed");
            AuthError::TokenIssuanceFailed(e)
        })?;

        info!(user_id = user.id, username = %user.username, "user logged in");
        Ok((token, user.without_password()))
    }
}
