// Public API - what other modules can use
pub use handlers::{get_track, list_track_playlists, list_tracks};

// Internal modules
mod handlers;
pub mod models;
pub mod repository;
pub mod service;
