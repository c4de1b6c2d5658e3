use tracing::{instrument, warn};

use crate::shared::AppError;

/// bcrypt hashing, run on the blocking pool from async callers
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub const MIN_COST: u32 = 4;
    pub const MAX_COST: u32 = 31;
    pub const DEFAULT_COST: u32 = 10;

    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    /// Hashes synchronously; used by seeding where no runtime is involved
    pub fn hash_blocking(&self, password: &str) -> Result<String, AppError> {
        bcrypt::hash(password, self.cost).map_err(|e| {
            warn!(error = %e, "Failed to hash password");
            AppError::Internal
        })
    }

    #[instrument(skip_all)]
    pub async fn hash(&self, password: &str) -> Result<String, AppError> {
        let hasher = *self;
        let password = password.to_owned();

        tokio::task::spawn_blocking(move || hasher.hash_blocking(&password))
            .await
            .map_err(|e| {
                warn!(error = %e, "Password hashing task failed");
                AppError::Internal
            })?
    }

    #[instrument(skip_all)]
    pub async fn verify(&self, password: &str, hash: &str) -> Result<bool, AppError> {
        let password = password.to_owned();
        let hash = hash.to_owned();

        tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .map_err(|e| {
                warn!(error = %e, "Password verification task failed");
                AppError::Internal
            })?
            .map_err(|e| {
                warn!(error = %e, "Stored password hash is unreadable");
                AppError::Internal
            })
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(Self::DEFAULT_COST)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hash_and_verify() {
        let hasher = PasswordHasher::new(PasswordHasher::MIN_COST);

        let hash = hasher.hash("secret1").await.unwrap();
        assert_ne!(hash, "secret1");
        assert!(hash.starts_with("$2"));

        assert!(hasher.verify("secret1", &hash).await.unwrap());
        assert!(!hasher.verify("wrong", &hash).await.unwrap());
    }

    #[tokio::test]
    async fn test_hashes_are_salted() {
        let hasher = PasswordHasher::new(PasswordHasher::MIN_COST);

        let first = hasher.hash("secret1").await.unwrap();
        let second = hasher.hash("secret1").await.unwrap();
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_corrupt_hash_is_internal_error() {
        let hasher = PasswordHasher::new(PasswordHasher::MIN_COST);

        let result = hasher.verify("secret1", "not-a-bcrypt-hash").await;
        assert!(matches!(result, Err(AppError::Internal)));
    }

    #[test]
    fn test_invalid_cost_fails() {
        let hasher = PasswordHasher::new(2);
        assert!(matches!(
            hasher.hash_blocking("secret1"),
            Err(AppError::Internal)
        ));
    }
}
