use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use super::{
    models::{NewPlaylist, PlaylistModel, PlaylistTrackModel},
    repository::{AddTrackResult, PlaylistRepository},
    types::{AddTrackRequest, CreatePlaylistRequest},
};
use crate::extract::{parse_id, parse_json_id};
use crate::session::AuthUser;
use crate::shared::AppError;
use crate::track::{models::TrackModel, repository::TrackRepository};

/// Service for playlist business logic; every operation is scoped to the caller
pub struct PlaylistService {
    repository: Arc<dyn PlaylistRepository + Send + Sync>,
    tracks: Arc<dyn TrackRepository + Send + Sync>,
}

impl PlaylistService {
    pub fn new(
        repository: Arc<dyn PlaylistRepository + Send + Sync>,
        tracks: Arc<dyn TrackRepository + Send + Sync>,
    ) -> Self {
        Self { repository, tracks }
    }

    #[instrument(skip(self))]
    pub async fn list_playlists(&self, user: AuthUser) -> Result<Vec<PlaylistModel>, AppError> {
        let playlists = self.repository.list_playlists(user.id).await?;

        debug!(
            user_id = user.id,
            playlist_count = playlists.len(),
            "Playlists retrieved"
        );
        Ok(playlists)
    }

    #[instrument(skip(self, request))]
    pub async fn create_playlist(
        &self,
        user: AuthUser,
        request: Option<CreatePlaylistRequest>,
    ) -> Result<PlaylistModel, AppError> {
        let request = request.unwrap_or_default();
        let (name, description) = match (request.name, request.description) {
            (Some(name), Some(description)) if !name.is_empty() && !description.is_empty() => {
                (name, description)
            }
            _ => {
                return Err(AppError::BadRequest(
                    "Name and description are required".to_string(),
                ))
            }
        };

        let playlist = self
            .repository
            .create_playlist(&NewPlaylist {
                name,
                description,
                user_id: user.id,
            })
            .await?;

        info!(
            playlist_id = playlist.id,
            user_id = user.id,
            "Playlist created successfully"
        );
        Ok(playlist)
    }

    #[instrument(skip(self))]
    pub async fn get_playlist(
        &self,
        user: AuthUser,
        raw_id: &str,
    ) -> Result<PlaylistModel, AppError> {
        let playlist_id = parse_playlist_id(raw_id)?;
        self.find_owned_playlist(user, playlist_id).await
    }

    #[instrument(skip(self))]
    pub async fn list_playlist_tracks(
        &self,
        user: AuthUser,
        raw_id: &str,
    ) -> Result<Vec<TrackModel>, AppError> {
        let playlist_id = parse_playlist_id(raw_id)?;
        self.find_owned_playlist(user, playlist_id).await?;

        let tracks = self.repository.list_playlist_tracks(playlist_id).await?;

        debug!(
            playlist_id,
            track_count = tracks.len(),
            "Playlist tracks retrieved"
        );
        Ok(tracks)
    }

    /// Attaches a track to one of the caller's playlists.
    ///
    /// Checks run in a fixed order and stop at the first failure: playlist id
    /// syntax, body presence, track id syntax, playlist existence, ownership,
    /// track existence, duplicate membership. A missing track is a 400 since
    /// its id comes from the body rather than the path.
    #[instrument(skip(self, request))]
    pub async fn add_track(
        &self,
        user: AuthUser,
        raw_playlist_id: &str,
        request: Option<AddTrackRequest>,
    ) -> Result<PlaylistTrackModel, AppError> {
        let playlist_id = parse_playlist_id(raw_playlist_id)?;

        let raw_track_id = request
            .and_then(|r| r.track_id)
            .ok_or_else(|| AppError::BadRequest("trackId is required".to_string()))?;

        let track_id = parse_json_id(&raw_track_id)
            .ok_or_else(|| AppError::BadRequest("Invalid track ID".to_string()))?;

        self.find_owned_playlist(user, playlist_id).await?;

        if self.tracks.get_track(track_id).await?.is_none() {
            debug!(track_id, "Track to add does not exist");
            return Err(AppError::BadRequest("Track not found".to_string()));
        }

        // Fast path only; the store's uniqueness rule is authoritative
        if self
            .repository
            .find_playlist_track(playlist_id, track_id)
            .await?
            .is_some()
        {
            debug!(playlist_id, track_id, "Track already in playlist");
            return Err(already_in_playlist());
        }

        match self.repository.add_track(playlist_id, track_id).await? {
            AddTrackResult::Added(association) => {
                info!(
                    playlist_id,
                    track_id,
                    association_id = association.id,
                    "Track added to playlist"
                );
                Ok(association)
            }
            AddTrackResult::AlreadyPresent => {
                warn!(
                    playlist_id,
                    track_id, "Concurrent insert of the same playlist track"
                );
                Err(already_in_playlist())
            }
        }
    }

    /// Loads a playlist, distinguishing absence (404) from foreign ownership (403)
    async fn find_owned_playlist(
        &self,
        user: AuthUser,
        playlist_id: i64,
    ) -> Result<PlaylistModel, AppError> {
        let playlist = self
            .repository
            .get_playlist(playlist_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Playlist not found".to_string()))?;

        if !playlist.is_owned_by(user.id) {
            warn!(
                playlist_id,
                user_id = user.id,
                owner_id = ?playlist.user_id,
                "Playlist access denied to non-owner"
            );
            return Err(AppError::Forbidden(
                "You do not have access to this playlist".to_string(),
            ));
        }

        Ok(playlist)
    }
}

fn parse_playlist_id(raw_id: &str) -> Result<i64, AppError> {
    parse_id(raw_id).ok_or_else(|| AppError::BadRequest("Invalid playlist ID".to_string()))
}

fn already_in_playlist() -> AppError {
    AppError::BadRequest("Track is already in playlist".to_string())
}
