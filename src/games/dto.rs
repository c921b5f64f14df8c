use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::error::AppError;

/// Client-supplied game fields, used for both create and full replace.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameInput {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub platform: String,
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub progress: i32,
    #[serde(default)]
    pub hours_played: f64,
    #[serde(default)]
    pub personal_note: String,
    #[serde(default)]
    pub score: i32,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub started_at: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub finished_at: Option<OffsetDateTime>,
    #[serde(default, rename = "coverURL")]
    pub cover_url: String,
}

impl GameInput {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.title.trim().is_empty() {
            return Err(AppError::Validation("title is required".into()));
        }
        if !(0..=100).contains(&self.progress) {
            return Err(AppError::Validation("progress must be between 0 and 100".into()));
        }
        if !(0..=10).contains(&self.score) {
            return Err(AppError::Validation("score must be between 0 and 10".into()));
        }
        if !self.hours_played.is_finite() || self.hours_played < 0.0 {
            return Err(AppError::Validation("hoursPlayed must be a non-negative number".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct TitleQuery {
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct GenreQuery {
    #[serde(default)]
    pub genre: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Parses a path id; anything but a positive integer is a bad request.
pub fn parse_id(raw: &str) -> Result<i64, AppError> {
    raw.parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| AppError::Validation("invalid game id".into()))
}
