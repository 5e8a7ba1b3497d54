use thiserror::Error;

use crate::domain::credentials::CredentialError;
use crate::domain::weight_log::WeightLogError;
use crate::storage::file_store::UploadError;

/// Failures surfaced by the domain services.
///
/// The REST layer maps each variant to an HTTP status; nothing here retries.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    /// The entity exists but belongs to another user
    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Unsupported file type: {0}")]
    InvalidFileType(String),

    #[error("File exceeds the {limit_bytes} byte limit")]
    FileTooLarge { limit_bytes: u64 },

    /// Store or file system failure
    #[error(transparent)]
    Upstream(#[from] anyhow::Error),
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        DomainError::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        DomainError::NotFound(message.into())
    }
}

impl From<WeightLogError> for DomainError {
    fn from(error: WeightLogError) -> Self {
        match error {
            WeightLogError::SampleNotFound { .. } => DomainError::NotFound(error.to_string()),
            WeightLogError::InvalidWeight
            | WeightLogError::MissingDate
            | WeightLogError::InvalidDate(_) => DomainError::Validation(error.to_string()),
        }
    }
}

impl From<UploadError> for DomainError {
    fn from(error: UploadError) -> Self {
        match error {
            UploadError::InvalidFileType(mime) => DomainError::InvalidFileType(mime),
            UploadError::FileTooLarge { limit_bytes } => DomainError::FileTooLarge { limit_bytes },
            UploadError::Image(e) => DomainError::Validation(format!("Unreadable image: {}", e)),
            UploadError::Io(e) => DomainError::Upstream(e.into()),
            UploadError::Task(e) => DomainError::Upstream(e.into()),
        }
    }
}

impl From<CredentialError> for DomainError {
    fn from(error: CredentialError) -> Self {
        match error {
            CredentialError::Key | CredentialError::Hashing(_) => DomainError::Upstream(error.into()),
            _ => DomainError::Unauthorized(error.to_string()),
        }
    }
}

pub type DomainResult<T> = std::result::Result<T, DomainError>;
