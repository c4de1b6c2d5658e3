use axum::{
    extract::{Path, State},
    Extension, Json,
};
use std::sync::Arc;
use tracing::{info, instrument};

use super::{models::TrackModel, service::TrackService};
use crate::playlist::models::PlaylistModel;
use crate::session::AuthUser;
use crate::shared::{AppError, AppState};

/// HTTP handler for listing all tracks
///
/// GET /tracks
#[instrument(name = "list_tracks", skip(state))]
pub async fn list_tracks(
    State(state): State<AppState>,
) -> Result<Json<Vec<TrackModel>>, AppError> {
    let service = TrackService::new(Arc::clone(&state.track_repository));
    let tracks = service.list_tracks().await?;

    info!(track_count = tracks.len(), "Tracks listed successfully");

    Ok(Json(tracks))
}

/// HTTP handler for a single track
///
/// GET /tracks/:id
#[instrument(name = "get_track", skip(state))]
pub async fn get_track(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TrackModel>, AppError> {
    let service = TrackService::new(Arc::clone(&state.track_repository));
    let track = service.get_track(&id).await?;

    Ok(Json(track))
}

/// HTTP handler for the caller's playlists containing a track
///
/// GET /tracks/:id/playlists (authenticated)
#[instrument(name = "list_track_playlists", skip(state))]
pub async fn list_track_playlists(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<Vec<PlaylistModel>>, AppError> {
    let service = TrackService::new(Arc::clone(&state.track_repository));
    let playlists = service.list_playlists_for_track(user, &id).await?;

    Ok(Json(playlists))
}
