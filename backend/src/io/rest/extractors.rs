//! Request extractors shared by the handlers.

use std::collections::HashMap;

use axum::async_trait;
use axum::extract::multipart::{Multipart, MultipartError};
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::Json;
use serde::de::DeserializeOwned;

use crate::domain::{DomainError, DomainResult};
use crate::storage::file_store::UploadedFile;
use crate::AppState;

/// Upper bound on any request body. Slightly above the largest upload policy
/// so the policies, not the transport, report oversize files.
pub const BODY_LIMIT_BYTES: usize = 12 * 1024 * 1024;

/// The authenticated caller, taken from `Authorization: Bearer <token>`
#[derive(Debug, Clone, PartialEq)]
pub struct AuthUser(pub String);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = DomainError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| DomainError::Unauthorized("Missing bearer token".to_string()))?;

        let token = header
            .strip_prefix("Bearer ")
            .or_else(|| header.strip_prefix("bearer "))
            .ok_or_else(|| DomainError::Unauthorized("Missing bearer token".to_string()))?;

        let user_id = state.auth_service.authenticate(token)?;
        Ok(AuthUser(user_id))
    }
}

/// JSON body whose rejections (bad syntax, wrong types, missing content
/// type) become a 400 `{message}` like every other validation failure
#[derive(Debug, Clone, PartialEq)]
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = DomainError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => Err(json_error(rejection)),
        }
    }
}

fn json_error(rejection: JsonRejection) -> DomainError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        DomainError::FileTooLarge {
            limit_bytes: BODY_LIMIT_BYTES as u64,
        }
    } else {
        DomainError::validation(rejection.body_text())
    }
}

/// A fully read multipart body: text fields by name and file parts by field name
#[derive(Debug, Default)]
pub struct MultipartForm {
    fields: HashMap<String, String>,
    files: HashMap<String, UploadedFile>,
}

impl MultipartForm {
    pub async fn read(mut multipart: Multipart) -> DomainResult<Self> {
        let mut form = MultipartForm::default();

        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            match field.file_name().map(str::to_string) {
                Some(original_name) => {
                    let content_type = field
                        .content_type()
                        .unwrap_or("application/octet-stream")
                        .to_string();
                    let bytes = field.bytes().await.map_err(multipart_error)?;
                    // browsers send an empty part for an untouched file input
                    if original_name.is_empty() && bytes.is_empty() {
                        continue;
                    }
                    form.files.insert(
                        name,
                        UploadedFile {
                            original_name,
                            content_type,
                            bytes: bytes.to_vec(),
                        },
                    );
                }
                None => {
                    let text = field.text().await.map_err(multipart_error)?;
                    form.fields.insert(name, text);
                }
            }
        }

        Ok(form)
    }

    pub fn take_text(&mut self, name: &str) -> Option<String> {
        self.fields.remove(name)
    }

    pub fn take_file(&mut self, name: &str) -> Option<UploadedFile> {
        self.files.remove(name)
    }
}

fn multipart_error(error: MultipartError) -> DomainError {
    if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
        DomainError::FileTooLarge {
            limit_bytes: BODY_LIMIT_BYTES as u64,
        }
    } else {
        DomainError::validation(format!("Malformed multipart body: {}", error.body_text()))
    }
}
