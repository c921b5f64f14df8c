//! In-memory stores for tests.

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;

use crate::{
    auth::{
        repo::UserStore,
        repo_types::{NewUser, User},
    },
    db::StoreError,
    games::{
        dto::GameInput,
        repo::{GameField, GameStore},
        repo_types::Game,
    },
};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    games: Vec<Game>,
    next_user_id: i64,
    next_game_id: i64,
}

/// Mirrors the SQL stores: unique usernames/emails, id-ordered scans,
/// case-insensitive substring search.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub async fn user_count(&self) -> usize {
        self.tables.read().await.users.len()
    }
}

fn apply(game: &mut Game, input: &GameInput) {
    game.title = input.title.clone();
    game.platform = input.platform.clone();
    game.genre = input.genre.clone();
    game.status = input.status.clone();
    game.progress = input.progress;
    game.hours_played = input.hours_played;
    game.personal_note = input.personal_note.clone();
    game.score = input.score;
    game.started_at = input.started_at;
    game.finished_at = input.finished_at;
    game.cover_url = input.cover_url.clone();
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn count_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> Result<i64, StoreError> {
        let tables = self.tables.read().await;
        let n = tables
            .users
            .iter()
            .filter(|u| u.username == username || u.email == email)
            .count();
        Ok(n as i64)
    }

    async fn find_by_login(&self, login: &str) -> Result<User, StoreError> {
        let tables = self.tables.read().await;
        tables
            .users
            .iter()
            .find(|u| u.username == login || u.email == login)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn insert(&self, user: NewUser) -> Result<User, StoreError> {
        let mut tables = self.tables.write().await;
        if tables
            .users
            .iter()
            .any(|u| u.username == user.username || u.email == user.email)
        {
            return Err(StoreError::Conflict);
        }
        tables.next_user_id += 1;
        let record = User {
            id: tables.next_user_id,
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            first_name: user.first_name,
            last_name: user.last_name,
            created_at: user.created_at,
            updated_at: user.updated_at,
        };
        tables.users.push(record.clone());
        Ok(record)
    }
}

#[async_trait]
impl GameStore for MemoryStore {
    async fn find_all(&self) -> Result<Vec<Game>, StoreError> {
        Ok(self.tables.read().await.games.clone())
    }

    async fn find_by_id(&self, id: i64) -> Result<Game, StoreError> {
        let tables = self.tables.read().await;
        tables
            .games
            .iter()
            .find(|g| g.id == id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn find_matching(
        &self,
        field: GameField,
        needle: &str,
    ) -> Result<Vec<Game>, StoreError> {
        let needle = needle.to_lowercase();
        let tables = self.tables.read().await;
        Ok(tables
            .games
            .iter()
            .filter(|g| {
                let hay = match field {
                    GameField::Title => &g.title,
                    GameField::Status => &g.status,
                    GameField::Genre => &g.genre,
                };
                hay.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect())
    }

    async fn create(&self, input: &GameInput) -> Result<Game, StoreError> {
        let mut tables = self.tables.write().await;
        tables.next_game_id += 1;
        let now = OffsetDateTime::now_utc();
        let mut game = Game {
            id: tables.next_game_id,
            title: String::new(),
            platform: String::new(),
            genre: String::new(),
            status: String::new(),
            progress: 0,
            hours_played: 0.0,
            personal_note: String::new(),
            score: 0,
            started_at: None,
            finished_at: None,
            cover_url: String::new(),
            created_at: now,
            updated_at: now,
        };
        apply(&mut game, input);
        tables.games.push(game.clone());
        Ok(game)
    }

    async fn replace(&self, id: i64, input: &GameInput) -> Result<Game, StoreError> {
        let mut tables = self.tables.write().await;
        let game = tables
            .games
            .iter_mut()
            .find(|g| g.id == id)
            .ok_or(StoreError::NotFound)?;
        apply(game, input);
        game.updated_at = OffsetDateTime::now_utc();
        Ok(game.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        let before = tables.games.len();
        tables.games.retain(|g| g.id != id);
        if tables.games.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

/// Every call fails as if the database were unreachable.
pub struct FailingStore;

fn unreachable_backend() -> StoreError {
    StoreError::Backend(sqlx::Error::PoolTimedOut)
}

#[async_trait]
impl UserStore for FailingStore {
    async fn count_by_username_or_email(&self, _: &str, _: &str) -> Result<i64, StoreError> {
        Err(unreachable_backend())
    }
    async fn find_by_login(&self, _: &str) -> Result<User, StoreError> {
        Err(unreachable_backend())
    }
    async fn insert(&self, _: NewUser) -> Result<User, StoreError> {
        Err(unreachable_backend())
    }
}

#[async_trait]
impl GameStore for FailingStore {
    async fn find_all(&self) -> Result<Vec<Game>, StoreError> {
        Err(unreachable_backend())
    }
    async fn find_by_id(&self, _: i64) -> Result<Game, StoreError> {
        Err(unreachable_backend())
    }
    async fn find_matching(&self, _: GameField, _: &str) -> Result<Vec<Game>, StoreError> {
        Err(unreachable_backend())
    }
    async fn create(&self, _: &GameInput) -> Result<Game, StoreError> {
        Err(unreachable_backend())
    }
    async fn replace(&self, _: i64, _: &GameInput) -> Result<Game, StoreError> {
        Err(unreachable_backend())
    }
    async fn delete(&self, _: i64) -> Result<(), StoreError> {
        Err(unreachable_backend())
    }
}
