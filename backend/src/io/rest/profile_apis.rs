use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use tracing::info;

use crate::io::rest::extractors::AuthUser;
use crate::io::rest::mappers::UserMapper;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/profile", get(get_profile))
}

/// Profile of the authenticated user
pub async fn get_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> impl IntoResponse {
    info!("GET /api/profile - user: {}", user_id);

    match state.auth_service.profile(&user_id).await {
        Ok(user) => (StatusCode::OK, Json(UserMapper::to_profile(user))).into_response(),
        Err(e) => e.into_response(),
    }
}
