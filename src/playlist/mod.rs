// Public API - what other modules can use
pub use handlers::{
    add_track_to_playlist, create_playlist, get_playlist, list_playlist_tracks, list_playlists,
};

// Internal modules
mod handlers;
pub mod models;
pub mod repository;
pub mod service;
pub mod types;
