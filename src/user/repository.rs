use async_trait::async_trait;
use tracing::{debug, instrument, warn};

use super::models::UserModel;
use crate::db::{is_unique_violation, storage_error, InMemoryStore, PostgresStore};
use crate::shared::AppError;

/// Result of attempting to create a user
#[derive(Debug, Clone)]
pub enum CreateUserResult {
    Created(UserModel),
    /// Another user already holds this username
    UsernameTaken,
}

/// Trait for user repository operations
#[async_trait]
pub trait UserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<UserModel>, AppError>;

    /// Inserts a user; username uniqueness is decided by the store itself
    async fn create_user(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<CreateUserResult, AppError>;
}

#[async_trait]
impl UserRepository for InMemoryStore {
    #[instrument(skip(self))]
    async fn find_by_username(&self, username: &str) -> Result<Option<UserModel>, AppError> {
        let user = self
            .lock()
            .users
            .iter()
            .find(|u| u.username == username)
            .cloned();

        debug!(found = user.is_some(), "User lookup in memory");
        Ok(user)
    }

    #[instrument(skip(self, password_hash))]
    async fn create_user(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<CreateUserResult, AppError> {
        let mut tables = self.lock();

        if tables.users.iter().any(|u| u.username == username) {
            debug!("Username already taken in memory");
            return Ok(CreateUserResult::UsernameTaken);
        }

        let user = UserModel {
            id: tables.next_user_id(),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
        };
        tables.users.push(user.clone());

        debug!(user_id = user.id, "User created in memory");
        Ok(CreateUserResult::Created(user))
    }
}

#[async_trait]
impl UserRepository for PostgresStore {
    #[instrument(skip(self))]
    async fn find_by_username(&self, username: &str) -> Result<Option<UserModel>, AppError> {
        sqlx::query_as::<_, UserModel>(
            "SELECT id, username, password_hash FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(self.pool())
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to fetch user from database");
            storage_error(e)
        })
    }

    #[instrument(skip(self, password_hash))]
    async fn create_user(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<CreateUserResult, AppError> {
        let result = sqlx::query_as::<_, UserModel>(
            "INSERT INTO users (username, password_hash) VALUES ($1, $2) \
             RETURNING id, username, password_hash",
        )
        .bind(username)
        .bind(password_hash)
        .fetch_one(self.pool())
        .await;

        match result {
            Ok(user) => {
                debug!(user_id = user.id, "User created in database");
                Ok(CreateUserResult::Created(user))
            }
            Err(e) if is_unique_violation(&e) => {
                debug!("Unique constraint rejected duplicate username");
                Ok(CreateUserResult::UsernameTaken)
            }
            Err(e) => {
                warn!(error = %e, "Failed to create user in database");
                Err(storage_error(e))
            }
        }
    }
}
