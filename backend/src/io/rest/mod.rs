//! # REST API Interface Layer
//!
//! One module per resource, each exposing a `router()` that is nested under
//! `/api` by [`create_router`](crate::create_router). Every route except
//! register and login requires a bearer token (see [`extractors::AuthUser`]).

pub mod auth_apis;
pub mod contact_apis;
pub mod document_apis;
pub mod errors;
pub mod event_apis;
pub mod extractors;
pub mod mappers;
pub mod pet_apis;
pub mod profile_apis;
