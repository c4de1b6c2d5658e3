use async_trait::async_trait;
use tracing::{debug, instrument, warn};

use super::models::{NewPlaylist, PlaylistModel, PlaylistTrackModel};
use crate::db::{is_unique_violation, storage_error, InMemoryStore, PostgresStore};
use crate::shared::AppError;
use crate::track::models::TrackModel;

/// Result of attempting to attach a track to a playlist
#[derive(Debug, Clone, PartialEq)]
pub enum AddTrackResult {
    /// Association row inserted
    Added(PlaylistTrackModel),
    /// The (playlist, track) pair already exists
    AlreadyPresent,
}

/// Trait for playlist repository operations
#[async_trait]
pub trait PlaylistRepository {
    /// Playlists owned by the user, ordered by id
    async fn list_playlists(&self, user_id: i64) -> Result<Vec<PlaylistModel>, AppError>;
    async fn create_playlist(&self, playlist: &NewPlaylist) -> Result<PlaylistModel, AppError>;
    async fn get_playlist(&self, playlist_id: i64) -> Result<Option<PlaylistModel>, AppError>;
    /// Tracks in the playlist, ordered by track id
    async fn list_playlist_tracks(&self, playlist_id: i64) -> Result<Vec<TrackModel>, AppError>;
    async fn find_playlist_track(
        &self,
        playlist_id: i64,
        track_id: i64,
    ) -> Result<Option<PlaylistTrackModel>, AppError>;

    /// Inserts the association; uniqueness is decided by the store itself,
    /// so concurrent duplicates resolve to `AlreadyPresent`
    async fn add_track(
        &self,
        playlist_id: i64,
        track_id: i64,
    ) -> Result<AddTrackResult, AppError>;
}

#[async_trait]
impl PlaylistRepository for InMemoryStore {
    #[instrument(skip(self))]
    async fn list_playlists(&self, user_id: i64) -> Result<Vec<PlaylistModel>, AppError> {
        let mut playlists: Vec<PlaylistModel> = self
            .lock()
            .playlists
            .iter()
            .filter(|p| p.is_owned_by(user_id))
            .cloned()
            .collect();
        playlists.sort_by_key(|p| p.id);

        debug!(
            user_id,
            playlist_count = playlists.len(),
            "Playlists listed from memory"
        );
        Ok(playlists)
    }

    #[instrument(skip(self, playlist))]
    async fn create_playlist(&self, playlist: &NewPlaylist) -> Result<PlaylistModel, AppError> {
        let mut tables = self.lock();
        let created = PlaylistModel {
            id: tables.next_playlist_id(),
            name: playlist.name.clone(),
            description: playlist.description.clone(),
            user_id: Some(playlist.user_id),
        };
        tables.playlists.push(created.clone());

        debug!(playlist_id = created.id, user_id = playlist.user_id, "Playlist created in memory");
        Ok(created)
    }

    #[instrument(skip(self))]
    async fn get_playlist(&self, playlist_id: i64) -> Result<Option<PlaylistModel>, AppError> {
        let playlist = self
            .lock()
            .playlists
            .iter()
            .find(|p| p.id == playlist_id)
            .cloned();

        match &playlist {
            Some(p) => debug!(playlist_id, name = %p.name, "Playlist found in memory"),
            None => debug!(playlist_id, "Playlist not found in memory"),
        }

        Ok(playlist)
    }

    #[instrument(skip(self))]
    async fn list_playlist_tracks(&self, playlist_id: i64) -> Result<Vec<TrackModel>, AppError> {
        let tables = self.lock();
        let mut tracks: Vec<TrackModel> = tables
            .tracks
            .iter()
            .filter(|t| {
                tables
                    .playlist_tracks
                    .iter()
                    .any(|pt| pt.playlist_id == playlist_id && pt.track_id == t.id)
            })
            .cloned()
            .collect();
        tracks.sort_by_key(|t| t.id);

        debug!(
            playlist_id,
            track_count = tracks.len(),
            "Playlist tracks listed from memory"
        );
        Ok(tracks)
    }

    #[instrument(skip(self))]
    async fn find_playlist_track(
        &self,
        playlist_id: i64,
        track_id: i64,
    ) -> Result<Option<PlaylistTrackModel>, AppError> {
        Ok(self
            .lock()
            .playlist_tracks
            .iter()
            .find(|pt| pt.playlist_id == playlist_id && pt.track_id == track_id)
            .cloned())
    }

    #[instrument(skip(self))]
    async fn add_track(
        &self,
        playlist_id: i64,
        track_id: i64,
    ) -> Result<AddTrackResult, AppError> {
        let mut tables = self.lock();

        if tables
            .playlist_tracks
            .iter()
            .any(|pt| pt.playlist_id == playlist_id && pt.track_id == track_id)
        {
            debug!(playlist_id, track_id, "Track already in playlist in memory");
            return Ok(AddTrackResult::AlreadyPresent);
        }

        let association = PlaylistTrackModel {
            id: tables.next_playlist_track_id(),
            playlist_id,
            track_id,
        };
        tables.playlist_tracks.push(association.clone());

        debug!(
            playlist_id,
            track_id,
            association_id = association.id,
            "Track added to playlist in memory"
        );
        Ok(AddTrackResult::Added(association))
    }
}

#[async_trait]
impl PlaylistRepository for PostgresStore {
    #[instrument(skip(self))]
    async fn list_playlists(&self, user_id: i64) -> Result<Vec<PlaylistModel>, AppError> {
        sqlx::query_as::<_, PlaylistModel>(
            "SELECT id, name, description, user_id FROM playlists WHERE user_id = $1 ORDER BY id",
        )
        .bind(user_id)
        .fetch_all(self.pool())
        .await
        .map_err(|e| {
            warn!(error = %e, user_id, "Failed to list playlists from database");
            storage_error(e)
        })
    }

    #[instrument(skip(self, playlist))]
    async fn create_playlist(&self, playlist: &NewPlaylist) -> Result<PlaylistModel, AppError> {
        let created = sqlx::query_as::<_, PlaylistModel>(
            "INSERT INTO playlists (name, description, user_id) VALUES ($1, $2, $3) \
             RETURNING id, name, description, user_id",
        )
        .bind(&playlist.name)
        .bind(&playlist.description)
        .bind(playlist.user_id)
        .fetch_one(self.pool())
        .await
        .map_err(|e| {
            warn!(error = %e, user_id = playlist.user_id, "Failed to create playlist in database");
            storage_error(e)
        })?;

        debug!(playlist_id = created.id, "Playlist created in database");
        Ok(created)
    }

    #[instrument(skip(self))]
    async fn get_playlist(&self, playlist_id: i64) -> Result<Option<PlaylistModel>, AppError> {
        sqlx::query_as::<_, PlaylistModel>(
            "SELECT id, name, description, user_id FROM playlists WHERE id = $1",
        )
        .bind(playlist_id)
        .fetch_optional(self.pool())
        .await
        .map_err(|e| {
            warn!(error = %e, playlist_id, "Failed to fetch playlist from database");
            storage_error(e)
        })
    }

    #[instrument(skip(self))]
    async fn list_playlist_tracks(&self, playlist_id: i64) -> Result<Vec<TrackModel>, AppError> {
        sqlx::query_as::<_, TrackModel>(
            "SELECT t.id, t.name, t.duration_ms \
             FROM tracks t \
             JOIN playlists_tracks pt ON pt.track_id = t.id \
             WHERE pt.playlist_id = $1 \
             ORDER BY t.id",
        )
        .bind(playlist_id)
        .fetch_all(self.pool())
        .await
        .map_err(|e| {
            warn!(error = %e, playlist_id, "Failed to list playlist tracks from database");
            storage_error(e)
        })
    }

    #[instrument(skip(self))]
    async fn find_playlist_track(
        &self,
        playlist_id: i64,
        track_id: i64,
    ) -> Result<Option<PlaylistTrackModel>, AppError> {
        sqlx::query_as::<_, PlaylistTrackModel>(
            "SELECT id, playlist_id, track_id FROM playlists_tracks \
             WHERE playlist_id = $1 AND track_id = $2",
        )
        .bind(playlist_id)
        .bind(track_id)
        .fetch_optional(self.pool())
        .await
        .map_err(|e| {
            warn!(error = %e, playlist_id, track_id, "Failed to fetch playlist track");
            storage_error(e)
        })
    }

    #[instrument(skip(self))]
    async fn add_track(
        &self,
        playlist_id: i64,
        track_id: i64,
    ) -> Result<AddTrackResult, AppError> {
        let result = sqlx::query_as::<_, PlaylistTrackModel>(
            "INSERT INTO playlists_tracks (playlist_id, track_id) VALUES ($1, $2) \
             RETURNING id, playlist_id, track_id",
        )
        .bind(playlist_id)
        .bind(track_id)
        .fetch_one(self.pool())
        .await;

        match result {
            Ok(association) => {
                debug!(association_id = association.id, "Track added to playlist in database");
                Ok(AddTrackResult::Added(association))
            }
            Err(e) if is_unique_violation(&e) => {
                debug!(playlist_id, track_id, "Unique constraint rejected duplicate playlist track");
                Ok(AddTrackResult::AlreadyPresent)
            }
            Err(e) => {
                warn!(error = %e, playlist_id, track_id, "Failed to add track to playlist");
                Err(storage_error(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::PasswordHasher;

    fn seeded() -> InMemoryStore {
        InMemoryStore::seeded(&PasswordHasher::new(PasswordHasher::MIN_COST)).unwrap()
    }

    #[tokio::test]
    async fn test_list_playlists_only_returns_owned() {
        let store = seeded();

        let playlists = store.list_playlists(1).await.unwrap();
        assert_eq!(
            playlists.iter().map(|p| p.id).collect::<Vec<_>>(),
            vec![1, 2, 3, 4, 5]
        );
        assert!(store.list_playlists(42).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_and_get_playlist() {
        let store = seeded();
        let created = store
            .create_playlist(&NewPlaylist {
                name: "New Playlist".to_string(),
                description: "New Playlist Description".to_string(),
                user_id: 2,
            })
            .await
            .unwrap();

        assert_eq!(created.id, 11);
        assert_eq!(created.user_id, Some(2));

        let fetched = store.get_playlist(created.id).await.unwrap();
        assert_eq!(fetched, Some(created));
        assert!(store.get_playlist(999_999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_playlist_tracks_ordered_by_track_id() {
        let store = seeded();

        let tracks = store.list_playlist_tracks(3).await.unwrap();
        assert_eq!(
            tracks.iter().map(|t| t.id).collect::<Vec<_>>(),
            vec![6, 21, 22]
        );
    }

    #[tokio::test]
    async fn test_add_track_rejects_duplicates() {
        let store = seeded();
        let (_, _, _, before) = store.counts();

        let first = store.add_track(4, 1).await.unwrap();
        let AddTrackResult::Added(association) = first else {
            panic!("expected the first insert to succeed");
        };
        assert_eq!(association.playlist_id, 4);
        assert_eq!(association.track_id, 1);

        let second = store.add_track(4, 1).await.unwrap();
        assert_eq!(second, AddTrackResult::AlreadyPresent);

        let (_, _, _, after) = store.counts();
        assert_eq!(after, before + 1);
        assert_eq!(
            store.find_playlist_track(4, 1).await.unwrap(),
            Some(association)
        );
    }
}
