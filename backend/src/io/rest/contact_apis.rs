use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{delete, get, post, put},
    Router,
};
use shared::{CreateContactRequest, MessageResponse, UpdateContactRequest};
use tracing::{info, warn};

use crate::io::rest::extractors::{ApiJson, AuthUser};
use crate::io::rest::mappers::ContactMapper;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/contacts", get(list_contacts))
        .route("/contacts/add", post(add_contact))
        .route("/contacts/update/:id", put(update_contact))
        .route("/contacts/remove/:id", delete(remove_contact))
}

pub async fn add_contact(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiJson(request): ApiJson<CreateContactRequest>,
) -> impl IntoResponse {
    info!("POST /api/contacts/add - request: {:?}", request);

    match state.contact_service.add_contact(&user_id, request).await {
        Ok(contact) => (StatusCode::CREATED, Json(ContactMapper::to_dto(contact))).into_response(),
        Err(e) => {
            warn!("Failed to add contact: {}", e);
            e.into_response()
        }
    }
}

pub async fn list_contacts(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> impl IntoResponse {
    info!("GET /api/contacts - user: {}", user_id);

    match state.contact_service.list_contacts(&user_id).await {
        Ok(contacts) => (StatusCode::OK, Json(ContactMapper::to_dto_list(contacts))).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn update_contact(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(contact_id): Path<String>,
    ApiJson(request): ApiJson<UpdateContactRequest>,
) -> impl IntoResponse {
    info!("PUT /api/contacts/update/{} - request: {:?}", contact_id, request);

    match state.contact_service.update_contact(&user_id, &contact_id, request).await {
        Ok(contact) => (StatusCode::OK, Json(ContactMapper::to_dto(contact))).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn remove_contact(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(contact_id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/contacts/remove/{}", contact_id);

    match state.contact_service.remove_contact(&user_id, &contact_id).await {
        Ok(()) => (StatusCode::OK, Json(MessageResponse::new("Contact deleted"))).into_response(),
        Err(e) => e.into_response(),
    }
}
