use async_trait::async_trait;
use sqlx::PgPool;

use crate::db::StoreError;
use crate::games::{dto::GameInput, repo_types::Game};

/// Text column a search runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameField {
    Title,
    Status,
    Genre,
}

#[async_trait]
pub trait GameStore: Send + Sync {
    /// All games in id order.
    async fn find_all(&self) -> Result<Vec<Game>, StoreError>;

    async fn find_by_id(&self, id: i64) -> Result<Game, StoreError>;

    /// Games whose `field` contains `needle`, ignoring case.
    async fn find_matching(&self, field: GameField, needle: &str)
        -> Result<Vec<Game>, StoreError>;

    async fn create(&self, game: &GameInput) -> Result<Game, StoreError>;

    /// Overwrites every mutable field of game `id`.
    async fn replace(&self, id: i64, game: &GameInput) -> Result<Game, StoreError>;

    async fn delete(&self, id: i64) -> Result<(), StoreError>;
}

#[derive(Clone)]
pub struct PgGameStore {
    db: PgPool,
}

impl PgGameStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl GameStore for PgGameStore {
    async fn find_all(&self) -> Result<Vec<Game>, StoreError> {
        let rows = sqlx::query_as::<_, Game>(
            r#"
            SELECT id, title, platform, genre, status, progress, hours_played, personal_note,
                   score, started_at, finished_at, cover_url, created_at, updated_at
            FROM games
            ORDER BY id
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: i64) -> Result<Game, StoreError> {
        let game = sqlx::query_as::<_, Game>(
            r#"
            SELECT id, title, platform, genre, status, progress, hours_played, personal_note,
                   score, started_at, finished_at, cover_url, created_at, updated_at
            FROM games
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_one(&self.db)
        .await?;
        Ok(game)
    }

    async fn find_matching(
        &self,
        field: GameField,
        needle: &str,
    ) -> Result<Vec<Game>, StoreError> {
        let sql = match field {
            GameField::Title => {
                r#"
                SELECT id, title, platform, genre, status, progress, hours_played, personal_note,
                       score, started_at, finished_at, cover_url, created_at, updated_at
                FROM games
                WHERE title ILIKE '%' || $1 || '%'
                ORDER BY id
                "#
            }
            GameField::Status => {
                r#"
                SELECT id, title, platform, genre, status, progress, hours_played, personal_note,
                       score, started_at, finished_at, cover_url, created_at, updated_at
                FROM games
                WHERE status ILIKE '%' || $1 || '%'
                ORDER BY id
                "#
            }
            GameField::Genre => {
                r#"
                SELECT id, title, platform, genre, status, progress, hours_played, personal_note,
                       score, started_at, finished_at, cover_url, created_at, updated_at
                FROM games
                WHERE genre ILIKE '%' || $1 || '%'
                ORDER BY id
                "#
            }
        };
        let rows = sqlx::query_as::<_, Game>(sql)
            .bind(needle)
            .fetch_all(&self.db)
            .await?;
        Ok(rows)
    }

    async fn create(&self, game: &GameInput) -> Result<Game, StoreError> {
        let created = sqlx::query_as::<_, Game>(
            r#"
            INSERT INTO games (title, platform, genre, status, progress, hours_played,
                               personal_note, score, started_at, finished_at, cover_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING id, title, platform, genre, status, progress, hours_played, personal_note,
                      score, started_at, finished_at, cover_url, created_at, updated_at
            "#,
        )
        .bind(&game.title)
        .bind(&game.platform)
        .bind(&game.genre)
        .bind(&game.status)
        .bind(game.progress)
        .bind(game.hours_played)
        .bind(&game.personal_note)
        .bind(game.score)
        .bind(game.started_at)
        .bind(game.finished_at)
        .bind(&game.cover_url)
        .fetch_one(&self.db)
        .await?;
        Ok(created)
    }

    async fn replace(&self, id: i64, game: &GameInput) -> Result<Game, StoreError> {
        let updated = sqlx::query_as::<_, Game>(
            r#"
            UPDATE games
            SET title = $2, platform = $3, genre = $4, status = $5, progress = $6,
                hours_played = $7, personal_note = $8, score = $9, started_at = $10,
                finished_at = $11, cover_url = $12, updated_at = now()
            WHERE id = $1
            RETURNING id, title, platform, genre, status, progress, hours_played, personal_note,
                      score, started_at, finished_at, cover_url, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&game.title)
        .bind(&game.platform)
        .bind(&game.genre)
        .bind(&game.status)
        .bind(game.progress)
        .bind(game.hours_played)
        .bind(&game.personal_note)
        .bind(game.score)
        .bind(game.started_at)
        .bind(game.finished_at)
        .bind(&game.cover_url)
        .fetch_one(&self.db)
        .await?;
        Ok(updated)
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let res = sqlx::query("DELETE FROM games WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        if res.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
