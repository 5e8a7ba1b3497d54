use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{delete, get, post},
    Router,
};
use shared::MessageResponse;
use tracing::{info, warn};

use crate::io::rest::extractors::{AuthUser, MultipartForm};
use crate::io::rest::mappers::DocumentMapper;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/documents", get(list_documents))
        .route("/documents/add", post(upload_document))
        .route("/documents/remove/:id", delete(remove_document))
}

/// Upload the multipart file field `document`
pub async fn upload_document(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    multipart: Multipart,
) -> impl IntoResponse {
    info!("POST /api/documents/add - user: {}", user_id);

    let file = match MultipartForm::read(multipart).await {
        Ok(mut form) => form.take_file("document"),
        Err(e) => return e.into_response(),
    };

    match state.document_service.upload_document(&user_id, file).await {
        Ok(document) => (
            StatusCode::CREATED,
            Json(DocumentMapper::to_upload_response(document)),
        )
            .into_response(),
        Err(e) => {
            warn!("Failed to upload document: {}", e);
            e.into_response()
        }
    }
}

pub async fn list_documents(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> impl IntoResponse {
    info!("GET /api/documents - user: {}", user_id);

    match state.document_service.list_documents(&user_id).await {
        Ok(documents) => (StatusCode::OK, Json(DocumentMapper::to_list_response(documents))).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn remove_document(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(document_id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/documents/remove/{}", document_id);

    match state.document_service.remove_document(&user_id, &document_id).await {
        Ok(()) => (StatusCode::OK, Json(MessageResponse::new("Document deleted"))).into_response(),
        Err(e) => e.into_response(),
    }
}
