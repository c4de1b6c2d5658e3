use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use std::sync::Arc;
use tracing::{info, instrument};

use super::{
    models::{PlaylistModel, PlaylistTrackModel},
    service::PlaylistService,
    types::{AddTrackRequest, CreatePlaylistRequest},
};
use crate::extract::JsonBody;
use crate::session::AuthUser;
use crate::shared::{AppError, AppState};
use crate::track::models::TrackModel;

fn playlist_service(state: &AppState) -> PlaylistService {
    PlaylistService::new(
        Arc::clone(&state.playlist_repository),
        Arc::clone(&state.track_repository),
    )
}

/// HTTP handler for listing the caller's playlists
///
/// GET /playlists
#[instrument(name = "list_playlists", skip(state))]
pub async fn list_playlists(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<PlaylistModel>>, AppError> {
    let playlists = playlist_service(&state).list_playlists(user).await?;

    info!(
        user_id = user.id,
        playlist_count = playlists.len(),
        "Playlists listed successfully"
    );

    Ok(Json(playlists))
}

/// HTTP handler for creating a playlist owned by the caller
///
/// POST /playlists
#[instrument(name = "create_playlist", skip(state, body))]
pub async fn create_playlist(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    JsonBody(body): JsonBody<CreatePlaylistRequest>,
) -> Result<(StatusCode, Json<PlaylistModel>), AppError> {
    let playlist = playlist_service(&state).create_playlist(user, body).await?;

    Ok((StatusCode::CREATED, Json(playlist)))
}

/// GET /playlists/:id
#[instrument(name = "get_playlist", skip(state))]
pub async fn get_playlist(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<PlaylistModel>, AppError> {
    let playlist = playlist_service(&state).get_playlist(user, &id).await?;

    Ok(Json(playlist))
}

/// GET /playlists/:id/tracks
#[instrument(name = "list_playlist_tracks", skip(state))]
pub async fn list_playlist_tracks(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<Vec<TrackModel>>, AppError> {
    let tracks = playlist_service(&state)
        .list_playlist_tracks(user, &id)
        .await?;

    Ok(Json(tracks))
}

/// HTTP handler for attaching a track to a playlist
///
/// POST /playlists/:id/tracks
/// Returns the association row with 201
#[instrument(name = "add_track_to_playlist", skip(state, body))]
pub async fn add_track_to_playlist(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<AddTrackRequest>,
) -> Result<(StatusCode, Json<PlaylistTrackModel>), AppError> {
    let association = playlist_service(&state).add_track(user, &id, body).await?;

    Ok((StatusCode::CREATED, Json(association)))
}
