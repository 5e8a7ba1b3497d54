//! Conversions from domain models to the `shared` wire DTOs.

pub mod contact_mapper;
pub mod document_mapper;
pub mod event_mapper;
pub mod pet_mapper;
pub mod user_mapper;

pub use contact_mapper::ContactMapper;
pub use document_mapper::DocumentMapper;
pub use event_mapper::EventMapper;
pub use pet_mapper::PetMapper;
pub use user_mapper::UserMapper;
