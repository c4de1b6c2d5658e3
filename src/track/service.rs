use std::sync::Arc;
use tracing::{debug, info, instrument};

use super::{models::TrackModel, repository::TrackRepository};
use crate::extract::parse_id;
use crate::playlist::models::PlaylistModel;
use crate::session::AuthUser;
use crate::shared::AppError;

/// Service for track lookups
pub struct TrackService {
    repository: Arc<dyn TrackRepository + Send + Sync>,
}

impl TrackService {
    pub fn new(repository: Arc<dyn TrackRepository + Send + Sync>) -> Self {
        Self { repository }
    }

    /// Lists every track; tracks are global, no ownership filter applies
    #[instrument(skip(self))]
    pub async fn list_tracks(&self) -> Result<Vec<TrackModel>, AppError> {
        let tracks = self.repository.list_tracks().await?;

        debug!(track_count = tracks.len(), "Tracks retrieved");
        Ok(tracks)
    }

    #[instrument(skip(self))]
    pub async fn get_track(&self, raw_id: &str) -> Result<TrackModel, AppError> {
        let track_id = parse_track_id(raw_id)?;
        self.find_track(track_id).await
    }

    /// Lists the caller's playlists that contain the track
    #[instrument(skip(self))]
    pub async fn list_playlists_for_track(
        &self,
        user: AuthUser,
        raw_id: &str,
    ) -> Result<Vec<PlaylistModel>, AppError> {
        let track_id = parse_track_id(raw_id)?;
        self.find_track(track_id).await?;

        let playlists = self
            .repository
            .list_playlists_for_track(track_id, user.id)
            .await?;

        info!(
            track_id,
            user_id = user.id,
            playlist_count = playlists.len(),
            "Playlists containing track retrieved"
        );
        Ok(playlists)
    }

    async fn find_track(&self, track_id: i64) -> Result<TrackModel, AppError> {
        self.repository
            .get_track(track_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Track not found".to_string()))
    }
}

fn parse_track_id(raw_id: &str) -> Result<i64, AppError> {
    parse_id(raw_id).ok_or_else(|| AppError::BadRequest("Invalid track ID".to_string()))
}
