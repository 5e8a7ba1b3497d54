use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{delete, get, post},
    Router,
};
use shared::{CreateEventRequest, MessageResponse};
use tracing::{info, warn};

use crate::io::rest::extractors::{ApiJson, AuthUser};
use crate::io::rest::mappers::EventMapper;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/events", get(list_events))
        .route("/events/add", post(add_event))
        .route("/events/remove/:id", delete(remove_event))
}

pub async fn add_event(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiJson(request): ApiJson<CreateEventRequest>,
) -> impl IntoResponse {
    info!("POST /api/events/add - request: {:?}", request);

    match state.event_service.add_event(&user_id, request).await {
        Ok(event) => (StatusCode::CREATED, Json(EventMapper::to_dto(event))).into_response(),
        Err(e) => {
            warn!("Failed to add event: {}", e);
            e.into_response()
        }
    }
}

/// Caller's events in date order
pub async fn list_events(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> impl IntoResponse {
    info!("GET /api/events - user: {}", user_id);

    match state.event_service.list_events(&user_id).await {
        Ok(events) => (StatusCode::OK, Json(EventMapper::to_dto_list(events))).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn remove_event(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(event_id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/events/remove/{}", event_id);

    match state.event_service.remove_event(&user_id, &event_id).await {
        Ok(()) => (StatusCode::OK, Json(MessageResponse::new("Event deleted"))).into_response(),
        Err(e) => e.into_response(),
    }
}
