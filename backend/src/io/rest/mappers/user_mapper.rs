use shared::UserProfile;

use crate::domain::models::User;

pub struct UserMapper;

impl UserMapper {
    /// Profile view of a user. The password hash never leaves the backend.
    pub fn to_profile(user: User) -> UserProfile {
        UserProfile {
            id: user.id,
            email: user.email,
            created_at: user.created_at.to_rfc3339(),
        }
    }
}
