use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    middleware,
    routing::{get, post},
    Extension, Json, Router,
};
use tracing::instrument;

use crate::{
    auth::{
        claims::Identity,
        dto::{AuthResponse, LoginRequest, ProfileResponse, RegisterRequest, RegisterResponse},
        gate::{require_auth, AuthGate},
        services::AuthService,
    },
    error::AppError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

pub fn profile_routes(gate: AuthGate) -> Router<AppState> {
    Router::new()
        .route("/api/profile", get(profile))
        .route_layer(middleware::from_fn_with_state(gate, require_auth))
}

#[instrument(skip(auth, payload))]
pub async fn register(
    State(auth): State<AuthService>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    let Json(payload) = payload?;
    payload.validate()?;
    let user = auth.register(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "user created",
            user,
        }),
    ))
}

#[instrument(skip(auth, payload))]
pub async fn login(
    State(auth): State<AuthService>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;
    let (token, user) = auth.login(&payload.username, &payload.password).await?;
    Ok(Json(AuthResponse { token, user }))
}

#[instrument]
pub async fn profile(Extension(identity): Extension<Identity>) -> Json<ProfileResponse> {
    Json(ProfileResponse {
        user_id: identity.user_id,
        username: identity.username,
    })
}
