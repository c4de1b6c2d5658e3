use serde::{Deserialize, Serialize};

use super::models::UserResponse;

/// Request payload shared by registration and login
#[derive(Debug, Default, Deserialize)]
pub struct CredentialsRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl CredentialsRequest {
    /// Returns both fields when present and non-empty
    pub fn into_parts(self) -> Option<(String, String)> {
        match (self.username, self.password) {
            (Some(username), Some(password)) if !username.is_empty() && !password.is_empty() => {
                Some((username, password))
            }
            _ => None,
        }
    }
}

/// Response for successful registration or login
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_parts_requires_both_fields() {
        let complete = CredentialsRequest {
            username: Some("alice".into()),
            password: Some("secret1".into()),
        };
        assert_eq!(
            complete.into_parts(),
            Some(("alice".to_string(), "secret1".to_string()))
        );

        let missing_password = CredentialsRequest {
            username: Some("alice".into()),
            password: None,
        };
        assert_eq!(missing_password.into_parts(), None);

        let empty_username = CredentialsRequest {
            username: Some(String::new()),
            password: Some("secret1".into()),
        };
        assert_eq!(empty_username.into_parts(), None);
    }
}
