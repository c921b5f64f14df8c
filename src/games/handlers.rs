use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{header::LOCATION, HeaderMap, HeaderValue, StatusCode},
    routing::get,
    Json, Router,
};
use tracing::{error, info, instrument};

use crate::{
    db::StoreError,
    error::AppError,
    games::{
        dto::{parse_id, GameInput, GenreQuery, MessageResponse, StatusQuery, TitleQuery},
        repo::GameField,
        repo_types::Game,
        stats::{GameStats, StatsAggregator},
    },
    state::AppState,
};

pub fn game_routes() -> Router<AppState> {
    Router::new()
        .route("/games", get(list_games).post(create_game))
        .route("/games/", get(list_games).post(create_game))
        .route("/games/title", get(search_by_title))
        .route("/games/search", get(search_by_title))
        .route("/games/status", get(search_by_status))
        .route("/games/genre", get(search_by_genre))
        .route("/games/stats", get(get_stats))
        .route("/stats", get(get_stats))
        .route(
            "/games/:id",
            get(get_game).put(update_game).delete(delete_game),
        )
}

/// Maps a store failure to the client-facing error, logging backend detail.
fn store_error(e: StoreError, action: &'static str) -> AppError {
    match e {
        StoreError::NotFound => AppError::NotFound("game not found".into()),
        other => {
            error!(error = %other, action, "game store failed");
            AppError::Persistence(format!("error {action}"))
        }
    }
}

#[instrument(skip(state))]
pub async fn list_games(State(state): State<AppState>) -> Result<Json<Vec<Game>>, AppError> {
    let games = state
        .games
        .find_all()
        .await
        .map_err(|e| store_error(e, "obtaining games"))?;
    Ok(Json(games))
}

#[instrument(skip(state))]
pub async fn get_game(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Game>, AppError> {
    let id = parse_id(&id)?;
    let game = state
        .games
        .find_by_id(id)
        .await
        .map_err(|e| store_error(e, "obtaining game"))?;
    Ok(Json(game))
}

#[instrument(skip(state, payload))]
pub async fn create_game(
    State(state): State<AppState>,
    payload: Result<Json<GameInput>, JsonRejection>,
) -> Result<(StatusCode, HeaderMap, Json<Game>), AppError> {
    let Json(input) = payload?;
    input.validate()?;
    let game = state
        .games
        .create(&input)
        .await
        .map_err(|e| store_error(e, "creating game"))?;

    let mut headers = HeaderMap::new();
    if let Ok(location) = HeaderValue::from_str(&format!("/games/{}", game.id)) {
        headers.insert(LOCATION, location);
    }
    info!(game_id = game.id, title = %game.title, "game created");
    Ok((StatusCode::CREATED, headers, Json(game)))
}

#[instrument(skip(state, payload))]
pub async fn update_game(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<GameInput>, JsonRejection>,
) -> Result<Json<Game>, AppError> {
    let id = parse_id(&id)?;
    let Json(input) = payload?;
    input.validate()?;
    let game = state
        .games
        .replace(id, &input)
        .await
        .map_err(|e| store_error(e, "updating game"))?;
    info!(game_id = game.id, "game updated");
    Ok(Json(game))
}

#[instrument(skip(state))]
pub async fn delete_game(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = parse_id(&id)?;
    state
        .games
        .delete(id)
        .await
        .map_err(|e| store_error(e, "deleting game"))?;
    info!(game_id = id, "game deleted");
    Ok(Json(MessageResponse {
        message: "game deleted",
    }))
}

async fn search(
    state: &AppState,
    field: GameField,
    needle: &str,
) -> Result<Json<Vec<Game>>, AppError> {
    let games = state
        .games
        .find_matching(field, needle)
        .await
        .map_err(|e| store_error(e, "searching games"))?;
    Ok(Json(games))
}

#[instrument(skip(state))]
pub async fn search_by_title(
    State(state): State<AppState>,
    Query(q): Query<TitleQuery>,
) -> Result<Json<Vec<Game>>, AppError> {
    search(&state, GameField::Title, &q.title).await
}

#[instrument(skip(state))]
pub async fn search_by_status(
    State(state): State<AppState>,
    Query(q): Query<StatusQuery>,
) -> Result<Json<Vec<Game>>, AppError> {
    search(&state, GameField::Status, &q.status).await
}

#[instrument(skip(state))]
pub async fn search_by_genre(
    State(state): State<AppState>,
    Query(q): Query<GenreQuery>,
) -> Result<Json<Vec<Game>>, AppError> {
    search(&state, GameField::Genre, &q.genre).await
}

#[instrument(skip(stats))]
pub async fn get_stats(State(stats): State<StatsAggregator>) -> Result<Json<GameStats>, AppError> {
    Ok(Json(stats.compute().await?))
}
