//! Domain model for a pet and its weight history.
use chrono::NaiveDate;

use crate::domain::weight_log::WeightHistory;

#[derive(Debug, Clone, PartialEq)]
pub struct Pet {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub birth_date: NaiveDate,
    pub pet_type: String,
    pub color: String,
    /// File name under the optimized pet image directory
    pub image: Option<String>,
    pub data: WeightHistory,
}

impl Pet {
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }
}
