//! # Storage Traits
//!
//! The services only see these traits. Each entity is keyed by its generated
//! ID and carries its owner's user ID, which is what the `list_*_for_user`
//! lookups filter on.

use anyhow::Result;
use async_trait::async_trait;
use thiserror::Error;

use crate::domain::models::{Contact, Document, Event, Pet, User};

/// Returned (inside `anyhow::Error`) by `store_user` when the email is taken
#[derive(Debug, Error)]
#[error("Email already registered: {0}")]
pub struct DuplicateEmail(pub String);

#[async_trait]
pub trait UserStorage: Send + Sync {
    /// Fails with [`DuplicateEmail`] when another user has the same email
    async fn store_user(&self, user: &User) -> Result<()>;

    async fn get_user(&self, user_id: &str) -> Result<Option<User>>;

    /// Emails are matched exactly, after the caller normalised them
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;
}

#[async_trait]
pub trait PetStorage: Send + Sync {
    async fn store_pet(&self, pet: &Pet) -> Result<()>;

    async fn get_pet(&self, pet_id: &str) -> Result<Option<Pet>>;

    /// Pets of one owner in creation order
    async fn list_pets_for_user(&self, user_id: &str) -> Result<Vec<Pet>>;

    /// Overwrite every mutable column, weight history included
    async fn update_pet(&self, pet: &Pet) -> Result<()>;

    /// Returns true if a row was deleted
    async fn delete_pet(&self, pet_id: &str) -> Result<bool>;
}

#[async_trait]
pub trait ContactStorage: Send + Sync {
    async fn store_contact(&self, contact: &Contact) -> Result<()>;

    async fn get_contact(&self, contact_id: &str) -> Result<Option<Contact>>;

    async fn list_contacts_for_user(&self, user_id: &str) -> Result<Vec<Contact>>;

    async fn update_contact(&self, contact: &Contact) -> Result<()>;

    async fn delete_contact(&self, contact_id: &str) -> Result<bool>;
}

#[async_trait]
pub trait DocumentStorage: Send + Sync {
    async fn store_document(&self, document: &Document) -> Result<()>;

    async fn get_document(&self, document_id: &str) -> Result<Option<Document>>;

    /// Most recent upload first
    async fn list_documents_for_user(&self, user_id: &str) -> Result<Vec<Document>>;

    async fn delete_document(&self, document_id: &str) -> Result<bool>;
}

#[async_trait]
pub trait EventStorage: Send + Sync {
    async fn store_event(&self, event: &Event) -> Result<()>;

    async fn get_event(&self, event_id: &str) -> Result<Option<Event>>;

    /// Ordered by event date, earliest first
    async fn list_events_for_user(&self, user_id: &str) -> Result<Vec<Event>>;

    async fn delete_event(&self, event_id: &str) -> Result<bool>;
}
