use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;

/// Game record in the database.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub id: i64,
    pub title: String,
    pub platform: String,
    pub genre: String,
    pub status: String,        // free text, e.g. "Completed", "Playing"
    pub progress: i32,         // 0..=100
    pub hours_played: f64,
    pub personal_note: String,
    pub score: i32,            // 0..=10
    #[serde(with = "time::serde::rfc3339::option")]
    pub started_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub finished_at: Option<OffsetDateTime>,
    #[serde(rename = "coverURL")]
    pub cover_url: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}
