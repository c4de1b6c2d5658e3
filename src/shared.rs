use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, warn};

use crate::playlist::repository::PlaylistRepository;
use crate::session::TokenService;
use crate::track::repository::TrackRepository;
use crate::user::{repository::UserRepository, PasswordHasher};

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub track_repository: Arc<dyn TrackRepository + Send + Sync>,
    pub playlist_repository: Arc<dyn PlaylistRepository + Send + Sync>,
    pub user_repository: Arc<dyn UserRepository + Send + Sync>,
    pub token_service: TokenService,
    pub password_hasher: PasswordHasher,
}

impl AppState {
    pub fn new(
        track_repository: Arc<dyn TrackRepository + Send + Sync>,
        playlist_repository: Arc<dyn PlaylistRepository + Send + Sync>,
        user_repository: Arc<dyn UserRepository + Send + Sync>,
        token_service: TokenService,
        password_hasher: PasswordHasher,
    ) -> Self {
        Self {
            track_repository,
            playlist_repository,
            user_repository,
            token_service,
            password_hasher,
        }
    }

    /// Builds state where a single store backs every repository
    pub fn from_store<S>(
        store: Arc<S>,
        token_service: TokenService,
        password_hasher: PasswordHasher,
    ) -> Self
    where
        S: TrackRepository + PlaylistRepository + UserRepository + Send + Sync + 'static,
    {
        Self::new(
            store.clone(),
            store.clone(),
            store,
            token_service,
            password_hasher,
        )
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("JWT error: {0}")]
    JwtError(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal server error")]
    Internal,
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::JwtError(_) | AppError::Unauthorized(_) | AppError::InvalidCredentials => {
                StatusCode::UNAUTHORIZED
            }
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::DatabaseError(_) | AppError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_message = match self {
            AppError::BadRequest(msg)
            | AppError::Unauthorized(msg)
            | AppError::Forbidden(msg)
            | AppError::NotFound(msg) => msg,
            AppError::JwtError(detail) => {
                warn!(error = %detail, "Rejecting request with invalid token");
                "Invalid token".to_string()
            }
            AppError::InvalidCredentials => "Invalid credentials".to_string(),
            // Storage details stay in the logs
            AppError::DatabaseError(detail) => {
                error!(error = %detail, "Database error while handling request");
                "Internal server error".to_string()
            }
            AppError::Internal => "Internal server error".to_string(),
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}
