use async_trait::async_trait;
use tracing::{debug, instrument, warn};

use super::models::TrackModel;
use crate::db::{storage_error, InMemoryStore, PostgresStore};
use crate::playlist::models::PlaylistModel;
use crate::shared::AppError;

/// Trait for track repository operations
#[async_trait]
pub trait TrackRepository {
    /// All tracks ordered by id
    async fn list_tracks(&self) -> Result<Vec<TrackModel>, AppError>;
    async fn get_track(&self, track_id: i64) -> Result<Option<TrackModel>, AppError>;
    /// Playlists owned by `user_id` that contain the track, ordered by playlist id
    async fn list_playlists_for_track(
        &self,
        track_id: i64,
        user_id: i64,
    ) -> Result<Vec<PlaylistModel>, AppError>;
}

#[async_trait]
impl TrackRepository for InMemoryStore {
    #[instrument(skip(self))]
    async fn list_tracks(&self) -> Result<Vec<TrackModel>, AppError> {
        let mut tracks = self.lock().tracks.clone();
        tracks.sort_by_key(|t| t.id);

        debug!(track_count = tracks.len(), "Tracks listed from memory");
        Ok(tracks)
    }

    #[instrument(skip(self))]
    async fn get_track(&self, track_id: i64) -> Result<Option<TrackModel>, AppError> {
        let track = self
            .lock()
            .tracks
            .iter()
            .find(|t| t.id == track_id)
            .cloned();

        match &track {
            Some(t) => debug!(track_id, name = %t.name, "Track found in memory"),
            None => debug!(track_id, "Track not found in memory"),
        }

        Ok(track)
    }

    #[instrument(skip(self))]
    async fn list_playlists_for_track(
        &self,
        track_id: i64,
        user_id: i64,
    ) -> Result<Vec<PlaylistModel>, AppError> {
        let tables = self.lock();
        let mut playlists: Vec<PlaylistModel> = tables
            .playlists
            .iter()
            .filter(|p| p.is_owned_by(user_id))
            .filter(|p| {
                tables
                    .playlist_tracks
                    .iter()
                    .any(|pt| pt.playlist_id == p.id && pt.track_id == track_id)
            })
            .cloned()
            .collect();
        playlists.sort_by_key(|p| p.id);

        debug!(
            track_id,
            user_id,
            playlist_count = playlists.len(),
            "Playlists containing track listed from memory"
        );
        Ok(playlists)
    }
}

#[async_trait]
impl TrackRepository for PostgresStore {
    #[instrument(skip(self))]
    async fn list_tracks(&self) -> Result<Vec<TrackModel>, AppError> {
        sqlx::query_as::<_, TrackModel>("SELECT id, name, duration_ms FROM tracks ORDER BY id")
            .fetch_all(self.pool())
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to list tracks from database");
                storage_error(e)
            })
    }

    #[instrument(skip(self))]
    async fn get_track(&self, track_id: i64) -> Result<Option<TrackModel>, AppError> {
        sqlx::query_as::<_, TrackModel>("SELECT id, name, duration_ms FROM tracks WHERE id = $1")
            .bind(track_id)
            .fetch_optional(self.pool())
            .await
            .map_err(|e| {
                warn!(error = %e, track_id, "Failed to fetch track from database");
                storage_error(e)
            })
    }

    #[instrument(skip(self))]
    async fn list_playlists_for_track(
        &self,
        track_id: i64,
        user_id: i64,
    ) -> Result<Vec<PlaylistModel>, AppError> {
        sqlx::query_as::<_, PlaylistModel>(
            "SELECT p.id, p.name, p.description, p.user_id \
             FROM playlists p \
             JOIN playlists_tracks pt ON pt.playlist_id = p.id \
             WHERE pt.track_id = $1 AND p.user_id = $2 \
             ORDER BY p.id",
        )
        .bind(track_id)
        .bind(user_id)
        .fetch_all(self.pool())
        .await
        .map_err(|e| {
            warn!(error = %e, track_id, user_id, "Failed to list playlists for track");
            storage_error(e)
        })
    }
}
