use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::{
    models::UserResponse,
    password::PasswordHasher,
    repository::{CreateUserResult, UserRepository},
    types::{AuthResponse, CredentialsRequest},
};
use crate::session::TokenService;
use crate::shared::AppError;

/// Service for registration and login
pub struct UserService {
    repository: Arc<dyn UserRepository + Send + Sync>,
    token_service: TokenService,
    password_hasher: PasswordHasher,
}

impl UserService {
    pub fn new(
        repository: Arc<dyn UserRepository + Send + Sync>,
        token_service: TokenService,
        password_hasher: PasswordHasher,
    ) -> Self {
        Self {
            repository,
            token_service,
            password_hasher,
        }
    }

    /// Creates an account and returns it with a fresh token
    #[instrument(skip_all)]
    pub async fn register(
        &self,
        request: Option<CredentialsRequest>,
    ) -> Result<AuthResponse, AppError> {
        let (username, password) = required_credentials(request)?;

        // Fast path only; the store's uniqueness rule is authoritative
        if self.repository.find_by_username(&username).await?.is_some() {
            info!(username = %username, "Registration rejected: username exists");
            return Err(username_taken());
        }

        let password_hash = self.password_hasher.hash(&password).await?;

        let user = match self
            .repository
            .create_user(&username, &password_hash)
            .await?
        {
            CreateUserResult::Created(user) => user,
            CreateUserResult::UsernameTaken => {
                warn!(username = %username, "Concurrent registration of the same username");
                return Err(username_taken());
            }
        };

        let token = self.token_service.issue(user.id)?;

        info!(user_id = user.id, username = %user.username, "User registered");
        Ok(AuthResponse {
            user: UserResponse::from(&user),
            token,
        })
    }

    /// Verifies credentials; unknown users and wrong passwords fail identically
    #[instrument(skip_all)]
    pub async fn login(
        &self,
        request: Option<CredentialsRequest>,
    ) -> Result<AuthResponse, AppError> {
        let (username, password) = required_credentials(request)?;

        let Some(user) = self.repository.find_by_username(&username).await? else {
            info!("Login rejected: unknown username");
            return Err(AppError::InvalidCredentials);
        };

        if !self
            .password_hasher
            .verify(&password, &user.password_hash)
            .await?
        {
            info!(user_id = user.id, "Login rejected: wrong password");
            return Err(AppError::InvalidCredentials);
        }

        let token = self.token_service.issue(user.id)?;

        info!(user_id = user.id, "User logged in");
        Ok(AuthResponse {
            user: UserResponse::from(&user),
            token,
        })
    }
}

fn required_credentials(request: Option<CredentialsRequest>) -> Result<(String, String), AppError> {
    request
        .and_then(CredentialsRequest::into_parts)
        .ok_or_else(|| AppError::BadRequest("Username and password are required".to_string()))
}

fn username_taken() -> AppError {
    AppError::BadRequest("Username already exists".to_string())
}
