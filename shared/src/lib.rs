use serde::{Deserialize, Serialize};
use std::fmt;

/// A single weight observation on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightSample {
    /// Calendar day (YYYY-MM-DD)
    pub date: String,
    pub weight: f64,
}

/// Pet ID in format: "pet::<uuid>"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pet {
    pub id: String,
    pub name: String,
    /// Birth date (YYYY-MM-DD)
    pub birth_date: String,
    #[serde(rename = "type")]
    pub pet_type: String,
    pub color: String,
    /// Stored file name of the optimized image, served under /uploads/pets/optimized/
    pub image: Option<String>,
    /// Weight history in insertion order
    pub data: Vec<WeightSample>,
    /// Owner user ID
    pub user: String,
}

/// Weight as sent by clients: forms send strings, JSON clients may send numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WeightInput {
    Number(f64),
    Text(String),
}

impl WeightInput {
    /// Numeric value, or None when the text does not parse as a number
    pub fn to_number(&self) -> Option<f64> {
        match self {
            WeightInput::Number(value) => Some(*value),
            WeightInput::Text(text) => text.trim().parse::<f64>().ok(),
        }
    }
}

impl From<f64> for WeightInput {
    fn from(value: f64) -> Self {
        WeightInput::Number(value)
    }
}

/// Body of PUT /api/pets/add-weight/:id and PUT /api/pets/remove-weight/:id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightEntryRequest {
    pub date: Option<String>,
    pub weight: Option<WeightInput>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub user_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    /// RFC 3339
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub id: String,
    pub name: String,
    #[serde(rename = "adress", alias = "address")]
    pub address: String,
    pub phone: String,
    pub mail: String,
    pub user: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateContactRequest {
    pub name: Option<String>,
    #[serde(rename = "adress", alias = "address")]
    pub address: Option<String>,
    pub phone: Option<String>,
    pub mail: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateContactRequest {
    pub name: Option<String>,
    #[serde(rename = "adress", alias = "address")]
    pub address: Option<String>,
    pub phone: Option<String>,
    pub mail: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub user_id: String,
    #[serde(rename = "originalname")]
    pub original_name: String,
    pub filename: String,
    /// Public path, e.g. /uploads/documents/<userId>/<filename>
    pub file_path: String,
    pub file_type: String,
    pub file_size: u64,
    /// RFC 3339
    pub uploaded_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentUploadResponse {
    pub message: String,
    pub new_document: Document,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentListResponse {
    pub documents: Vec<Document>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    /// Name of the pet the event was created for
    pub name: String,
    /// RFC 3339
    pub date: String,
    pub description: String,
    pub pet_id: String,
    pub user: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    pub date: Option<String>,
    pub pet_id: Option<String>,
    pub description: Option<String>,
}

/// Generic `{message}` body used for confirmations and errors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

/// Kinds of stored entities; each ID is "<prefix>::<uuid>"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    User,
    Pet,
    Contact,
    Document,
    Event,
}

impl EntityKind {
    pub fn prefix(&self) -> &'static str {
        match self {
            EntityKind::User => "user",
            EntityKind::Pet => "pet",
            EntityKind::Contact => "contact",
            EntityKind::Document => "document",
            EntityKind::Event => "event",
        }
    }

    /// Build an ID from a unique token (usually a simple-format UUID)
    pub fn generate_id(&self, unique: &str) -> String {
        format!("{}::{}", self.prefix(), unique)
    }

    /// Check an ID belongs to this kind and return its unique part
    pub fn parse_id<'a>(&self, id: &'a str) -> Result<&'a str, EntityIdError> {
        let (prefix, unique) = id.split_once("::").ok_or(EntityIdError::InvalidFormat)?;
        if prefix != self.prefix() {
            return Err(EntityIdError::WrongKind);
        }
        if unique.is_empty() || unique.contains("::") {
            return Err(EntityIdError::InvalidFormat);
        }
        Ok(unique)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EntityIdError {
    InvalidFormat,
    WrongKind,
}

impl fmt::Display for EntityIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityIdError::InvalidFormat => write!(f, "Invalid ID format"),
            EntityIdError::WrongKind => write!(f, "ID refers to a different kind of entity"),
        }
    }
}

impl std::error::Error for EntityIdError {}
