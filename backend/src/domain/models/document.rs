use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub user_id: String,
    pub original_name: String,
    /// Name on disk inside the user's document directory
    pub filename: String,
    pub file_path: String,
    pub file_type: String,
    pub file_size: u64,
    pub uploaded_at: DateTime<Utc>,
}
