use async_trait::async_trait;
use sqlx::PgPool;

use crate::auth::repo_types::{NewUser, User};
use crate::db::StoreError;

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Number of users whose username or email matches.
    async fn count_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> Result<i64, StoreError>;

    /// First user whose username or email equals `login`.
    async fn find_by_login(&self, login: &str) -> Result<User, StoreError>;

    /// Inserts `user`; a duplicate username or email is `StoreError::Conflict`.
    async fn insert(&self, user: NewUser) -> Result<User, StoreError>;
}

#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn count_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> Result<i64, StoreError> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM users
            WHERE username = $1 OR email = $2
            "#,
        )
        .bind(username)
        .bind(email)
        .fetch_one(&self.db)
        .await?;
        Ok(count)
    }

    async fn find_by_login(&self, login: &str) -> Result<User, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, first_name, last_name, created_at, updated_at
            FROM users
            WHERE username = $1 OR email = $1
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(login)
        .fetch_one(&self.db)
        .await?;
        Ok(user)
    }

    async fn insert(&self, user: NewUser) -> Result<User, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, password_hash, first_name, last_name, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, username, email, password_hash, first_name, last_name, created_at, updated_at
            "#,
        )
        .bind(user.username)
        .bind(user.email)
        .bind(user.password_hash)
        .bind(user.first_name)
        .bind(user.last_name)
        .bind(user.created_at)
        .bind(user.updated_at)
        .fetch_one(&self.db)
        .await?;
        Ok(user)
    }
}
