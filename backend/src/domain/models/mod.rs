//! Domain models. These carry typed dates and never leave the backend; the
//! REST layer maps them to the `shared` DTOs.

pub mod contact;
pub mod document;
pub mod event;
pub mod pet;
pub mod user;

pub use contact::Contact;
pub use document::Document;
pub use event::Event;
pub use pet::Pet;
pub use user::User;

use shared::EntityKind;
use uuid::Uuid;

/// Fresh "<kind>::<uuid>" identifier
pub fn new_id(kind: EntityKind) -> String {
    kind.generate_id(&Uuid::new_v4().simple().to_string())
}
