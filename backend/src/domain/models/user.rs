//! Domain model for a user account.
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: String,
    pub email: String,
    /// bcrypt hash, see `domain::credentials`
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}
