use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub id: String,
    pub user_id: String,
    pub pet_id: String,
    /// Pet name at the time the event was created
    pub name: String,
    pub date: DateTime<Utc>,
    pub description: String,
}
