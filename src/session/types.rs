use serde::{Deserialize, Serialize};

/// JWT claims identifying the authenticated user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionClaims {
    #[serde(rename = "userId")]
    pub user_id: i64,
    pub exp: usize, // Expiration timestamp (standard JWT claim)
    pub iat: usize, // Issued at timestamp (standard JWT claim)
}

/// Identity resolved from a verified bearer token, attached to request extensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub id: i64,
}

impl From<SessionClaims> for AuthUser {
    fn from(claims: SessionClaims) -> Self {
        Self { id: claims.user_id }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json;

    #[test]
    fn test_session_claims_use_camel_case_user_id() {
        let claims = SessionClaims {
            user_id: 42,
            exp: 1234567890,
            iat: 1234567800,
        };

        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["userId"], 42);
        assert!(json.get("user_id").is_none());

        let deserialized: SessionClaims = serde_json::from_value(json).unwrap();
        assert_eq!(deserialized, claims);
    }

    #[test]
    fn test_auth_user_from_claims() {
        let claims = SessionClaims {
            user_id: 7,
            exp: 2,
            iat: 1,
        };
        assert_eq!(AuthUser::from(claims), AuthUser { id: 7 });
    }
}
