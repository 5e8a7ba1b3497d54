//! # Pet Care Backend
//!
//! REST backend for tracking pets, their weight history, contacts,
//! documents and events. The crate is layered the usual way:
//!
//! - **Storage**: SQLite repositories and the upload file store
//! - **Domain**: services holding the business rules, including the
//!   weight history merge in [`domain::weight_log`]
//! - **IO**: axum handlers that authenticate, call a service and map the result
//!
//! [`initialize_backend`] wires the layers into an [`AppState`] and
//! [`create_router`] exposes it over HTTP.

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use std::sync::Arc;

use anyhow::Result;
use axum::{extract::DefaultBodyLimit, http::Method, Router};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::ServeDir;
use tracing::info;

use crate::config::AppConfig;
use crate::domain::credentials::TokenSigner;
use crate::domain::{AuthService, ContactService, DocumentService, EventService, PetService};
use crate::io::rest;
use crate::io::rest::extractors::BODY_LIMIT_BYTES;
use crate::storage::repositories::{
    ContactRepository, DocumentRepository, EventRepository, PetRepository, UserRepository,
};
use crate::storage::{DbConnection, FileStore};

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub auth_service: AuthService,
    pub pet_service: PetService,
    pub contact_service: ContactService,
    pub document_service: DocumentService,
    pub event_service: EventService,
    pub file_store: FileStore,
}

impl AppState {
    pub fn new(db: DbConnection, file_store: FileStore, signer: TokenSigner) -> Self {
        let pets = Arc::new(PetRepository::new(db.clone()));

        Self {
            auth_service: AuthService::new(Arc::new(UserRepository::new(db.clone())), signer),
            pet_service: PetService::new(pets.clone(), file_store.clone()),
            contact_service: ContactService::new(Arc::new(ContactRepository::new(db.clone()))),
            document_service: DocumentService::new(
                Arc::new(DocumentRepository::new(db.clone())),
                file_store.clone(),
            ),
            event_service: EventService::new(Arc::new(EventRepository::new(db)), pets),
            file_store,
        }
    }
}

/// Initialize the backend with all required services
pub async fn initialize_backend(config: &AppConfig) -> Result<AppState> {
    info!("Setting up database at {}", config.database_url);
    let db = DbConnection::new(&config.database_url).await?;

    info!("Using upload directory {}", config.upload_dir.display());
    tokio::fs::create_dir_all(&config.upload_dir).await?;
    let file_store = FileStore::new(&config.upload_dir);

    let signer = TokenSigner::new(&config.jwt_secret, config.token_ttl_days);
    Ok(AppState::new(db, file_store, signer))
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState, config: &AppConfig) -> Router {
    let origin = match &config.cors_origin {
        Some(origin) => AllowOrigin::exact(origin.clone()),
        None => AllowOrigin::any(),
    };
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    let api_routes = Router::new()
        .merge(rest::auth_apis::router())
        .merge(rest::profile_apis::router())
        .merge(rest::pet_apis::router())
        .merge(rest::contact_apis::router())
        .merge(rest::document_apis::router())
        .merge(rest::event_apis::router());

    let uploads = ServeDir::new(app_state.file_store.root());

    Router::new()
        .nest("/api", api_routes)
        .nest_service("/uploads", uploads)
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(cors)
        .with_state(app_state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tempfile::TempDir;
    use tower::ServiceExt;

    const BOUNDARY: &str = "pet-care-test-boundary";

    async fn setup_test() -> (Router, TempDir) {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        let state = AppState::new(db, FileStore::new(dir.path()), TokenSigner::new("test-secret", 30));

        let config = AppConfig {
            port: 0,
            database_url: "sqlite::memory:".to_string(),
            jwt_secret: "test-secret".to_string(),
            token_ttl_days: 30,
            upload_dir: dir.path().to_path_buf(),
            cors_origin: None,
        };
        (create_router(state, &config), dir)
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.expect("request failed");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn empty_request(method: &str, uri: &str, token: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap()
    }

    fn multipart_request(
        method: &str,
        uri: &str,
        token: &str,
        fields: &[(&str, &str)],
        file: Option<(&str, &str, &str, &[u8])>,
    ) -> Request<Body> {
        let mut body = Vec::new();
        for (name, value) in fields {
            body.extend_from_slice(
                format!(
                    "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                    BOUNDARY, name, value
                )
                .as_bytes(),
            );
        }
        if let Some((field, filename, content_type, bytes)) = file {
            body.extend_from_slice(
                format!(
                    "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                    BOUNDARY, field, filename, content_type
                )
                .as_bytes(),
            );
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn register(app: &Router, email: &str) -> String {
        let (status, body) = send(
            app,
            json_request("POST", "/api/auth/register", None, json!({"email": email, "password": "pw"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        body["token"].as_str().expect("token missing").to_string()
    }

    async fn add_pet(app: &Router, token: &str, weight: &str) -> Value {
        let (status, body) = send(
            app,
            multipart_request(
                "POST",
                "/api/pets/add",
                token,
                &[
                    ("name", "Misty"),
                    ("birthDate", "2019-04-02"),
                    ("type", "cat"),
                    ("color", "black"),
                    ("weight", weight),
                ],
                None,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "add pet failed: {}", body);
        body
    }

    #[tokio::test]
    async fn test_register_login_and_profile() {
        let (app, _dir) = setup_test().await;
        register(&app, "owner@example.com").await;

        let (status, body) = send(
            &app,
            json_request("POST", "/api/auth/login", None, json!({"email": "owner@example.com", "password": "pw"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let token = body["token"].as_str().unwrap();
        let user_id = body["userId"].as_str().unwrap().to_string();

        let (status, profile) = send(&app, empty_request("GET", "/api/profile", token)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(profile["id"], user_id.as_str());
        assert_eq!(profile["email"], "owner@example.com");
        assert!(profile.get("passwordHash").is_none());

        let (status, _) = send(
            &app,
            json_request("POST", "/api/auth/register", None, json!({"email": "owner@example.com", "password": "x"})),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_routes_require_a_valid_token() {
        let (app, _dir) = setup_test().await;

        let request = Request::builder().uri("/api/pets").body(Body::empty()).unwrap();
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body["message"].is_string());

        let (status, _) = send(&app, empty_request("GET", "/api/pets", "forged.token")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_weight_history_over_http() {
        let (app, _dir) = setup_test().await;
        let token = register(&app, "owner@example.com").await;
        let pet = add_pet(&app, &token, "4.0").await;
        let pet_id = pet["id"].as_str().unwrap();
        assert_eq!(pet["data"].as_array().unwrap().len(), 1);

        let uri = format!("/api/pets/add-weight/{}", pet_id);
        send(&app, json_request("PUT", &uri, Some(&token), json!({"date": "2024-01-01", "weight": 5.0}))).await;
        let (status, body) = send(
            &app,
            json_request("PUT", &uri, Some(&token), json!({"date": "2024-01-01T10:00:00Z", "weight": "5.2"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"][1], json!({"date": "2024-01-01", "weight": 5.2}));
        assert_eq!(body["data"].as_array().unwrap().len(), 2);

        let (status, body) = send(
            &app,
            json_request("PUT", &uri, Some(&token), json!({"date": "2024-01-02", "weight": 0})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].is_string());

        let remove_uri = format!("/api/pets/remove-weight/{}", pet_id);
        let (status, _) = send(
            &app,
            json_request("PUT", &remove_uri, Some(&token), json!({"date": "2024-01-01", "weight": 9.9})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = send(
            &app,
            json_request("PUT", &remove_uri, Some(&token), json!({"date": "2024-01-01", "weight": 5.2})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_bad_json_bodies_are_validation_errors() {
        let (app, _dir) = setup_test().await;
        let token = register(&app, "owner@example.com").await;
        let pet = add_pet(&app, &token, "4.0").await;
        let uri = format!("/api/pets/add-weight/{}", pet["id"].as_str().unwrap());

        let (status, body) = send(
            &app,
            json_request("PUT", &uri, Some(&token), json!({"date": "2024-01-01", "weight": true})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].is_string());

        let malformed = Request::builder()
            .method("POST")
            .uri("/api/auth/login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"email\": "))
            .unwrap();
        let (status, body) = send(&app, malformed).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].is_string());

        let pet_uri = format!("/api/pets/{}", pet["id"].as_str().unwrap());
        let (_, unchanged) = send(&app, empty_request("GET", &pet_uri, &token)).await;
        assert_eq!(unchanged["data"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_profile_edit_on_emptied_history_keeps_it_empty() {
        let (app, _dir) = setup_test().await;
        let token = register(&app, "owner@example.com").await;
        let pet = add_pet(&app, &token, "4.0").await;
        let pet_id = pet["id"].as_str().unwrap();
        let today = pet["data"][0]["date"].as_str().unwrap().to_string();

        let (status, body) = send(
            &app,
            json_request(
                "PUT",
                &format!("/api/pets/remove-weight/{}", pet_id),
                Some(&token),
                json!({"date": today, "weight": 4.0}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], json!([]));

        let (status, body) = send(
            &app,
            multipart_request("PUT", &format!("/api/pets/update/{}", pet_id), &token, &[("weight", "4.0")], None),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], json!([]));
    }

    #[tokio::test]
    async fn test_profile_edit_appends_weight() {
        let (app, _dir) = setup_test().await;
        let token = register(&app, "owner@example.com").await;
        let pet = add_pet(&app, &token, "4.0").await;
        let uri = format!("/api/pets/update/{}", pet["id"].as_str().unwrap());

        let (status, body) = send(
            &app,
            multipart_request("PUT", &uri, &token, &[("color", "grey"), ("weight", "4.5")], None),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["color"], "grey");
        assert_eq!(body["name"], "Misty");
        assert_eq!(body["data"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_other_users_are_forbidden() {
        let (app, _dir) = setup_test().await;
        let owner = register(&app, "owner@example.com").await;
        let intruder = register(&app, "intruder@example.com").await;
        let pet = add_pet(&app, &owner, "4.0").await;
        let pet_id = pet["id"].as_str().unwrap();

        let (status, _) = send(&app, empty_request("GET", &format!("/api/pets/{}", pet_id), &intruder)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        let (status, _) = send(&app, empty_request("DELETE", &format!("/api/pets/remove/{}", pet_id), &intruder)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, pets) = send(&app, empty_request("GET", "/api/pets", &intruder)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(pets, json!([]));

        let (status, _) = send(&app, empty_request("DELETE", &format!("/api/pets/remove/{}", pet_id), &owner)).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = send(&app, empty_request("GET", &format!("/api/pets/{}", pet_id), &owner)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_document_upload_is_served_statically() {
        let (app, _dir) = setup_test().await;
        let token = register(&app, "owner@example.com").await;

        let (status, body) = send(
            &app,
            multipart_request(
                "POST",
                "/api/documents/add",
                &token,
                &[],
                Some(("document", "vet bill.pdf", "application/pdf", &b"%PDF-1.4 bill"[..])),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["message"], "Document uploaded");
        let file_path = body["newDocument"]["filePath"].as_str().unwrap().to_string();
        assert!(file_path.ends_with("_vet_bill.pdf"));

        let request = Request::builder().uri(file_path.as_str()).body(Body::empty()).unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"%PDF-1.4 bill");

        let (status, body) = send(
            &app,
            multipart_request(
                "POST",
                "/api/documents/add",
                &token,
                &[],
                Some(("document", "notes.txt", "text/plain", &b"hello"[..])),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert!(body["message"].is_string());

        let (status, list) = send(&app, empty_request("GET", "/api/documents", &token)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(list["documents"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_contacts_and_events() {
        let (app, _dir) = setup_test().await;
        let token = register(&app, "owner@example.com").await;
        let pet = add_pet(&app, &token, "4.0").await;

        let (status, contact) = send(
            &app,
            json_request(
                "POST",
                "/api/contacts/add",
                Some(&token),
                json!({"name": "Dr. Martin", "adress": "12 rue des Lilas", "phone": "0102", "mail": "vet@example.com"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(contact["adress"], "12 rue des Lilas");

        let (status, event) = send(
            &app,
            json_request(
                "POST",
                "/api/events/add",
                Some(&token),
                json!({"date": "2024-05-03T09:15:00Z", "petId": pet["id"], "description": "Checkup"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(event["name"], "Misty");

        let (_, events) = send(&app, empty_request("GET", "/api/events", &token)).await;
        assert_eq!(events.as_array().unwrap().len(), 1);

        let uri = format!("/api/events/remove/{}", event["id"].as_str().unwrap());
        let (status, body) = send(&app, empty_request("DELETE", &uri, &token)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Event deleted");
    }
}
