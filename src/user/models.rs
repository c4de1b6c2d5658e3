use serde::Serialize;
use sqlx::FromRow;

/// Database model for the users table
#[derive(Debug, Clone, FromRow)]
pub struct UserModel {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
}

/// Public view of a user; the password hash never leaves the service
#[derive(Debug, Clone, Serialize, serde::Deserialize, PartialEq)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
}

impl From<&UserModel> for UserResponse {
    fn from(user: &UserModel) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
        }
    }
}
