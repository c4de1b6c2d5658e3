use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Database model for the playlists table
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq)]
pub struct PlaylistModel {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub user_id: Option<i64>, // Owner; nullable for rows created before ownership existed
}

impl PlaylistModel {
    /// Checks whether the given user owns this playlist
    pub fn is_owned_by(&self, user_id: i64) -> bool {
        self.user_id == Some(user_id)
    }
}

/// Database model for the playlists_tracks association table
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq)]
pub struct PlaylistTrackModel {
    pub id: i64,
    pub playlist_id: i64,
    pub track_id: i64,
}

/// Fields required to insert a playlist
#[derive(Debug, Clone)]
pub struct NewPlaylist {
    pub name: String,
    pub description: String,
    pub user_id: i64,
}
