use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;
use tracing::instrument;

use super::{
    service::UserService,
    types::{AuthResponse, CredentialsRequest},
};
use crate::extract::JsonBody;
use crate::shared::{AppError, AppState};

fn user_service(state: &AppState) -> UserService {
    UserService::new(
        Arc::clone(&state.user_repository),
        state.token_service.clone(),
        state.password_hasher,
    )
}

/// HTTP handler for account registration
///
/// POST /users/register
/// Returns the new user and a session token with 201
#[instrument(name = "register", skip_all)]
pub async fn register(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<CredentialsRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let response = user_service(&state).register(body).await?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// HTTP handler for login
///
/// POST /users/login
#[instrument(name = "login", skip_all)]
pub async fn login(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<CredentialsRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let response = user_service(&state).login(body).await?;

    Ok(Json(response))
}
