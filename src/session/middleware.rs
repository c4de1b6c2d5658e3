use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use tracing::{debug, instrument, warn};

use crate::shared::{AppError, AppState};

/// JWT authentication middleware - validates Authorization Bearer header and adds AuthUser to request.
/// Usage: .route_layer(middleware::from_fn_with_state(app_state.clone(), session::jwt_auth))
/// Handlers can then extract Extension(user): Extension<AuthUser>.
#[instrument(skip(state, req, next))]
pub async fn jwt_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    debug!(uri = %req.uri(), "JWT authentication middleware triggered");

    let auth_header = match req.headers().get(AUTHORIZATION) {
        None => None,
        Some(header) => Some(header.to_str().map_err(|_| {
            warn!("Authorization header is not readable text");
            AppError::Unauthorized("Invalid token".to_string())
        })?),
    }
    .map(str::trim)
    .filter(|value| !value.is_empty())
    .ok_or_else(|| {
        warn!("Missing Authorization header in request");
        AppError::Unauthorized("Access token required".to_string())
    })?;

    let token = match auth_header.split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("Bearer") => token.trim(),
        Some(_) => {
            warn!("Invalid Authorization header format (expected Bearer token)");
            return Err(AppError::Unauthorized("Invalid token".to_string()));
        }
        None if auth_header.eq_ignore_ascii_case("Bearer") => "",
        None => {
            warn!("Invalid Authorization header format (expected Bearer token)");
            return Err(AppError::Unauthorized("Invalid token".to_string()));
        }
    };

    if token.is_empty() {
        warn!("Bearer scheme present without a token");
        return Err(AppError::Unauthorized("Access token required".to_string()));
    }

    let user = match state.token_service.verify(token) {
        Ok(user) => user,
        Err(e) => {
            warn!("JWT authentication failed: {}", e);
            return Err(e);
        }
    };

    debug!(user_id = user.id, "Authentication successful, adding user to request");

    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{AuthUser, TokenService};
    use crate::shared::test_utils::{AppStateBuilder, TEST_SECRET};
    use axum::{
        body::Body,
        http::{HeaderValue, Request, StatusCode},
        middleware,
        routing::get,
        Extension, Router,
    };
    use rstest::rstest;
    use tower::ServiceExt;

    fn protected_app() -> Router {
        let state = AppStateBuilder::new().build();
        Router::new()
            .route(
                "/whoami",
                get(|Extension(user): Extension<AuthUser>| async move { user.id.to_string() }),
            )
            .route_layer(middleware::from_fn_with_state(state.clone(), jwt_auth))
            .with_state(state)
    }

    async fn call(header: Option<String>) -> (StatusCode, String) {
        let mut builder = Request::builder().uri("/whoami");
        if let Some(value) = header {
            builder = builder.header("Authorization", value);
        }
        let response = protected_app()
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_valid_token_attaches_user() {
        let token = TokenService::new(TEST_SECRET, 24).issue(5).unwrap();
        let (status, body) = call(Some(format!("Bearer {}", token))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "5");
    }

    #[tokio::test]
    async fn test_missing_header_requires_token() {
        let (status, body) = call(None).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains("Access token required"));
    }

    #[rstest]
    #[case("Bearer")]
    #[case("Bearer ")]
    #[tokio::test]
    async fn test_empty_bearer_requires_token(#[case] header: &str) {
        let (status, body) = call(Some(header.to_string())).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains("Access token required"));
    }

    #[rstest]
    #[case("Bearer not-a-jwt")]
    #[case("Basic dXNlcjpwYXNz")]
    #[case("garbage")]
    #[tokio::test]
    async fn test_invalid_token_is_rejected(#[case] header: &str) {
        let (status, body) = call(Some(header.to_string())).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains("Invalid token"));
    }

    #[tokio::test]
    async fn test_non_utf8_header_is_invalid_token() {
        let request = Request::builder()
            .uri("/whoami")
            .header(
                "Authorization",
                HeaderValue::from_bytes(b"Bearer \xff\xfe").unwrap(),
            )
            .body(Body::empty())
            .unwrap();
        let response = protected_app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json, serde_json::json!({ "error": "Invalid token" }));
    }

    #[tokio::test]
    async fn test_token_signed_with_other_secret_is_rejected() {
        let token = TokenService::new("another-secret", 24).issue(5).unwrap();
        let (status, body) = call(Some(format!("Bearer {}", token))).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains("Invalid token"));
    }
}
