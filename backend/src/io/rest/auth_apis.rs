//! # REST API for Accounts
//!
//! Registration and login. These are the only routes without a bearer token.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::post,
    Router,
};
use shared::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};
use tracing::{info, warn};

use crate::io::rest::extractors::ApiJson;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

/// Create an account and return a token
pub async fn register(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RegisterRequest>,
) -> impl IntoResponse {
    info!("POST /api/auth/register - email: {}", request.email);

    match state.auth_service.register(&request.email, &request.password).await {
        Ok(token) => (StatusCode::CREATED, Json(RegisterResponse { token })).into_response(),
        Err(e) => {
            warn!("Registration failed: {}", e);
            e.into_response()
        }
    }
}

/// Exchange credentials for a token
pub async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> impl IntoResponse {
    info!("POST /api/auth/login - email: {}", request.email);

    match state.auth_service.login(&request.email, &request.password).await {
        Ok((token, user)) => (
            StatusCode::OK,
            Json(LoginResponse {
                token,
                user_id: user.id,
            }),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}
