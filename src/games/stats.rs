use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use axum::extract::FromRef;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error};

use crate::{
    db::StoreError,
    error::AppError,
    games::{repo::GameStore, repo_types::Game},
    state::AppState,
};

const COMPLETED: &str = "Completed";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameStats {
    pub total_games: usize,
    pub by_status: BTreeMap<String, usize>,
    #[serde(rename = "average_hours_played")]
    pub average_hours: f64,
    pub most_played_genre: String,
    pub pending_games: usize,
}

#[derive(Debug, Error)]
pub enum StatsError {
    #[error("game scan failed: {0}")]
    PersistFailed(#[source] StoreError),
}

impl From<StatsError> for AppError {
    fn from(_: StatsError) -> Self {
        AppError::Persistence("error obtaining statistics".into())
    }
}

/// A game counts as pending until it is marked completed or reaches full progress.
pub fn is_pending(game: &Game) -> bool {
    game.status != COMPLETED && game.progress < 100
}

impl GameStats {
    /// Single pass over `games`. Genre ties go to the genre seen first.
    pub fn from_games(games: &[Game]) -> Self {
        let mut by_status: BTreeMap<String, usize> = BTreeMap::new();
        let mut genre_counts: HashMap<&str, usize> = HashMap::new();
        let mut genre_order: Vec<&str> = Vec::new();
        let mut total_hours = 0.0;
        let mut pending_games = 0;

        for game in games {
            *by_status.entry(game.status.clone()).or_default() += 1;
            let count = genre_counts.entry(game.genre.as_str()).or_insert_with(|| {
                genre_order.push(game.genre.as_str());
                0
            });
            *count += 1;
            total_hours += game.hours_played;
            if is_pending(game) {
                pending_games += 1;
            }
        }

        let mut most_played_genre = "";
        let mut best = 0;
        for genre in genre_order {
            let count = genre_counts[genre];
            if count > best {
                best = count;
                most_played_genre = genre;
            }
        }

        let total_games = games.len();
        let average_hours = if total_games == 0 {
            0.0
        } else {
            total_hours / total_games as f64
        };

        Self {
            total_games,
            by_status,
            average_hours,
            most_played_genre: most_played_genre.to_owned(),
            pending_games,
        }
    }
}

#[derive(Clone)]
pub struct StatsAggregator {
    games: Arc<dyn GameStore>,
}

impl FromRef<AppState> for StatsAggregator {
    fn from_ref(state: &AppState) -> Self {
        Self::new(state.games.clone())
    }
}

impl StatsAggregator {
    pub fn new(games: Arc<dyn GameStore>) -> Self {
        Self { games }
    }

    pub async fn compute(&self) -> Result<GameStats, StatsError> {
        let games = self.games.find_all().await.map_err(|e| {
            error!(error = %e, "stats scan failed");
            StatsError::PersistFailed(e)
        })?;
        let stats = GameStats::from_games(&games);
        debug!(total = stats.total_games, pending = stats.pending_games, "stats computed");
        Ok(stats)
    }
}
