use std::sync::{Mutex, MutexGuard};

use super::seed;
use crate::playlist::models::{PlaylistModel, PlaylistTrackModel};
use crate::shared::AppError;
use crate::track::models::TrackModel;
use crate::user::{models::UserModel, PasswordHasher};

/// Rows of every table plus their id sequences
#[derive(Debug, Default)]
pub struct Tables {
    pub users: Vec<UserModel>,
    pub tracks: Vec<TrackModel>,
    pub playlists: Vec<PlaylistModel>,
    pub playlist_tracks: Vec<PlaylistTrackModel>,
    user_seq: i64,
    track_seq: i64,
    playlist_seq: i64,
    playlist_track_seq: i64,
}

impl Tables {
    pub fn next_user_id(&mut self) -> i64 {
        self.user_seq += 1;
        self.user_seq
    }

    pub fn next_track_id(&mut self) -> i64 {
        self.track_seq += 1;
        self.track_seq
    }

    pub fn next_playlist_id(&mut self) -> i64 {
        self.playlist_seq += 1;
        self.playlist_seq
    }

    pub fn next_playlist_track_id(&mut self) -> i64 {
        self.playlist_track_seq += 1;
        self.playlist_track_seq
    }
}

/// In-memory relational store for development and testing
///
/// Every repository trait is implemented on this one struct so joins across
/// tables see a consistent snapshot under a single lock. The uniqueness rules
/// of the SQL schema (usernames, playlist/track pairs) are enforced by the
/// repository implementations while the lock is held.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding the demo users, tracks, and playlists
    pub fn seeded(hasher: &PasswordHasher) -> Result<Self, AppError> {
        let mut tables = Tables::default();

        for user in seed::USERS {
            let id = tables.next_user_id();
            tables.users.push(UserModel {
                id,
                username: user.username.to_string(),
                password_hash: hasher.hash_blocking(user.password)?,
            });
        }

        for &(name, duration_ms) in seed::TRACKS {
            let id = tables.next_track_id();
            tables.tracks.push(TrackModel {
                id,
                name: name.to_string(),
                duration_ms,
            });
        }

        for (position, &(name, description)) in seed::PLAYLISTS.iter().enumerate() {
            let id = tables.next_playlist_id();
            tables.playlists.push(PlaylistModel {
                id,
                name: name.to_string(),
                description: description.to_string(),
                user_id: Some(seed::playlist_owner(position)),
            });
        }

        for &(playlist_id, track_id) in seed::PLAYLIST_TRACKS {
            let id = tables.next_playlist_track_id();
            tables.playlist_tracks.push(PlaylistTrackModel {
                id,
                playlist_id,
                track_id,
            });
        }

        Ok(Self {
            tables: Mutex::new(tables),
        })
    }

    /// Locks the tables; a poisoned lock still holds consistent rows since
    /// every mutation is a single push
    pub fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Row counts as (users, tracks, playlists, playlist_tracks)
    pub fn counts(&self) -> (usize, usize, usize, usize) {
        let tables = self.lock();
        (
            tables.users.len(),
            tables.tracks.len(),
            tables.playlists.len(),
            tables.playlist_tracks.len(),
        )
    }
}
