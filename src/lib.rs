// Library crate for the playlist API
// This file exposes the public API for integration tests

pub mod app;
pub mod config;
pub mod db;
pub mod extract;
pub mod playlist;
pub mod session;
pub mod shared;
pub mod track;
pub mod user;

// Re-export commonly used types for easier access in tests
pub use app::build_router;
pub use config::{AppConfig, AppEnv};
pub use db::{InMemoryStore, PostgresStore};
pub use session::TokenService;
pub use shared::{AppError, AppState};
pub use user::PasswordHasher;
