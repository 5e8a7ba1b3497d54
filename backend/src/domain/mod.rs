//! # Domain Layer
//!
//! Business rules of the pet care tracker. Services receive storage through
//! the traits in `storage::traits` and return [`errors::DomainError`], which
//! the REST layer turns into HTTP responses.
//!
//! - [`weight_log`]: weight history merge rules (pure, no I/O)
//! - [`pet_service`]: pet profiles, images and weight operations
//! - [`auth_service`] and [`credentials`]: accounts and bearer tokens
//! - [`contact_service`], [`document_service`], [`event_service`]

pub mod auth_service;
pub mod contact_service;
pub mod credentials;
pub mod dates;
pub mod document_service;
pub mod errors;
pub mod event_service;
pub mod models;
pub mod pet_service;
pub mod validation;
pub mod weight_log;

pub use auth_service::AuthService;
pub use contact_service::ContactService;
pub use document_service::DocumentService;
pub use errors::{DomainError, DomainResult};
pub use event_service::EventService;
pub use pet_service::{PetForm, PetService};
