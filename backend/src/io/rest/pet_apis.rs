//! # REST API for Pets
//!
//! Profile CRUD plus the weight history endpoints. Create and update take
//! multipart forms (`name`, `birthDate`, `type`, `color`, `weight`, `image`);
//! the weight endpoints take JSON `{date, weight}`.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{delete, get, post, put},
    Router,
};
use shared::{MessageResponse, WeightEntryRequest, WeightInput};
use tracing::{info, warn};

use crate::domain::{DomainResult, PetForm};
use crate::io::rest::extractors::{ApiJson, AuthUser, MultipartForm};
use crate::io::rest::mappers::PetMapper;
use crate::storage::file_store::UploadedFile;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/pets", get(list_pets))
        .route("/pets/add", post(add_pet))
        .route("/pets/:id", get(get_pet))
        .route("/pets/update/:id", put(update_pet))
        .route("/pets/add-weight/:id", put(add_weight))
        .route("/pets/remove-weight/:id", put(remove_weight))
        .route("/pets/remove/:id", delete(delete_pet))
}

async fn read_pet_form(multipart: Multipart) -> DomainResult<(PetForm, Option<UploadedFile>)> {
    let mut form = MultipartForm::read(multipart).await?;
    let pet_form = PetForm {
        name: form.take_text("name"),
        birth_date: form.take_text("birthDate"),
        pet_type: form.take_text("type"),
        color: form.take_text("color"),
        weight: form.take_text("weight"),
    };
    Ok((pet_form, form.take_file("image")))
}

fn weight_value(request: &WeightEntryRequest) -> Option<f64> {
    request.weight.as_ref().and_then(WeightInput::to_number)
}

/// Create a pet from a multipart form
pub async fn add_pet(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    multipart: Multipart,
) -> impl IntoResponse {
    info!("POST /api/pets/add - user: {}", user_id);

    let (form, image) = match read_pet_form(multipart).await {
        Ok(parts) => parts,
        Err(e) => return e.into_response(),
    };

    match state.pet_service.add_pet(&user_id, form, image).await {
        Ok(pet) => (StatusCode::CREATED, Json(PetMapper::to_dto(pet))).into_response(),
        Err(e) => {
            warn!("Failed to add pet: {}", e);
            e.into_response()
        }
    }
}

/// List the caller's pets
pub async fn list_pets(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> impl IntoResponse {
    info!("GET /api/pets - user: {}", user_id);

    match state.pet_service.list_pets(&user_id).await {
        Ok(pets) => (StatusCode::OK, Json(PetMapper::to_dto_list(pets))).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn get_pet(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(pet_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/pets/{}", pet_id);

    match state.pet_service.get_pet(&user_id, &pet_id).await {
        Ok(pet) => (StatusCode::OK, Json(PetMapper::to_dto(pet))).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Edit the profile; a sent weight is merged against the last sample
pub async fn update_pet(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(pet_id): Path<String>,
    multipart: Multipart,
) -> impl IntoResponse {
    info!("PUT /api/pets/update/{}", pet_id);

    let (form, image) = match read_pet_form(multipart).await {
        Ok(parts) => parts,
        Err(e) => return e.into_response(),
    };

    match state.pet_service.update_pet(&user_id, &pet_id, form, image).await {
        Ok(pet) => (StatusCode::OK, Json(PetMapper::to_dto(pet))).into_response(),
        Err(e) => {
            warn!("Failed to update pet {}: {}", pet_id, e);
            e.into_response()
        }
    }
}

/// Record a dated weight, one sample per day
pub async fn add_weight(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(pet_id): Path<String>,
    ApiJson(request): ApiJson<WeightEntryRequest>,
) -> impl IntoResponse {
    info!("PUT /api/pets/add-weight/{} - request: {:?}", pet_id, request);

    let weight = weight_value(&request);
    match state
        .pet_service
        .add_weight(&user_id, &pet_id, request.date.as_deref(), weight)
        .await
    {
        Ok(pet) => (StatusCode::OK, Json(PetMapper::to_dto(pet))).into_response(),
        Err(e) => {
            warn!("Failed to add weight to pet {}: {}", pet_id, e);
            e.into_response()
        }
    }
}

pub async fn remove_weight(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(pet_id): Path<String>,
    ApiJson(request): ApiJson<WeightEntryRequest>,
) -> impl IntoResponse {
    info!("PUT /api/pets/remove-weight/{} - request: {:?}", pet_id, request);

    let weight = weight_value(&request);
    match state
        .pet_service
        .remove_weight(&user_id, &pet_id, request.date.as_deref(), weight)
        .await
    {
        Ok(pet) => (StatusCode::OK, Json(PetMapper::to_dto(pet))).into_response(),
        Err(e) => {
            warn!("Failed to remove weight from pet {}: {}", pet_id, e);
            e.into_response()
        }
    }
}

pub async fn delete_pet(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(pet_id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/pets/remove/{}", pet_id);

    match state.pet_service.delete_pet(&user_id, &pet_id).await {
        Ok(()) => (StatusCode::OK, Json(MessageResponse::new("Pet deleted"))).into_response(),
        Err(e) => e.into_response(),
    }
}
