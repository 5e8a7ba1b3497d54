//! SQLite implementations of the storage traits, one repository per table.

pub mod contact_repository;
pub mod document_repository;
pub mod event_repository;
pub mod pet_repository;
pub mod user_repository;

pub use contact_repository::ContactRepository;
pub use document_repository::DocumentRepository;
pub use event_repository::EventRepository;
pub use pet_repository::PetRepository;
pub use user_repository::UserRepository;
