//! HTTP DTOs for user endpoints.

use serde::Serialize;

use crate::domain::user::User;

/// Public view of an account; never includes the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub full_name: Option<String>,
    pub is_active: bool,
    pub is_admin: bool,
    pub stripe_customer_id: Option<String>,
    /// ISO 8601.
    pub created_at: String,
    pub updated_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.as_i64(),
            email: user.email,
            username: user.username,
            full_name: user.full_name,
            is_active: user.is_active,
            is_admin: user.is_admin,
            stripe_customer_id: user.stripe_customer_id,
            created_at: user.created_at.to_rfc3339(),
            updated_at: user.updated_at.to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{Timestamp, UserId};

    #[test]
    fn password_hash_is_not_serialized() {
        let user = User {
            id: UserId::new(1).unwrap(),
            email: "jane@example.com".to_string(),
            username: "jane".to_string(),
            full_name: None,
            password_hash: "$2b$secret".to_string(),
            is_active: true,
            is_admin: false,
            stripe_customer_id: None,
            created_at: Timestamp::now(),
            updated_at: Timestamp::now(),
        };
        let json = serde_json::to_string(&UserResponse::from(user)).unwrap();
        assert!(!json.contains("secret"));
        assert!(json.contains("\"id\":1"));
    }
}
