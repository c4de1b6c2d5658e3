use axum::{
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

use crate::shared::{AppError, AppState};
use crate::{playlist, session, track, user};

/// Builds the HTTP router.
///
/// Registration, login, and plain track reads are public. Every playlist route
/// and the track-to-playlists lookup sit behind the JWT middleware.
pub fn build_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/tracks/:id/playlists", get(track::list_track_playlists))
        .route(
            "/playlists",
            get(playlist::list_playlists).post(playlist::create_playlist),
        )
        .route("/playlists/:id", get(playlist::get_playlist))
        .route(
            "/playlists/:id/tracks",
            get(playlist::list_playlist_tracks).post(playlist::add_track_to_playlist),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            session::jwt_auth,
        ));

    Router::new()
        .route("/health", get(health))
        .route("/users/register", post(user::register))
        .route("/users/login", post(user::login))
        .route("/tracks", get(track::list_tracks))
        .route("/tracks/:id", get(track::get_track))
        .merge(protected)
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn not_found() -> AppError {
    AppError::NotFound("Not found".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::TokenService;
    use crate::shared::test_utils::{send, AppStateBuilder, TEST_SECRET};
    use rstest::rstest;

    #[tokio::test]
    async fn test_health() {
        let app = build_router(AppStateBuilder::new().build());
        let (status, body) = send(app, "GET", "/health", None, None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn test_unknown_route_is_json_404() {
        let app = build_router(AppStateBuilder::new().build());
        let (status, body) = send(app, "GET", "/albums", None, None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": "Not found" }));
    }

    #[rstest]
    #[case("GET", "/tracks/abc", "Invalid track ID")]
    #[case("GET", "/tracks/1.5/playlists", "Invalid track ID")]
    #[case("GET", "/playlists/abc", "Invalid playlist ID")]
    #[case("GET", "/playlists/2x/tracks", "Invalid playlist ID")]
    #[case("POST", "/playlists/abc/tracks", "Invalid playlist ID")]
    #[tokio::test]
    async fn test_non_integer_ids_are_rejected(
        #[case] method: &str,
        #[case] uri: &str,
        #[case] message: &str,
    ) {
        let token = TokenService::new(TEST_SECRET, 24).issue(1).unwrap();
        let app = build_router(AppStateBuilder::new().build());
        let (status, body) = send(app, method, uri, Some(&token), Some(r#"{"trackId": 1}"#)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": message }));
    }
}
