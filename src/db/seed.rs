use tracing::{info, instrument, warn};

use super::PostgresStore;
use crate::shared::AppError;
use crate::user::PasswordHasher;

/// Demo account created by seeding
pub struct SeedUser {
    pub username: &'static str,
    pub password: &'static str,
}

pub const USERS: &[SeedUser] = &[
    SeedUser {
        username: "musiclover",
        password: "password123",
    },
    SeedUser {
        username: "rockfan",
        password: "password456",
    },
];

/// (name, duration_ms)
pub const TRACKS: &[(&str, i64)] = &[
    ("Bohemian Rhapsody", 354000),
    ("Hotel California", 391000),
    ("Stairway to Heaven", 482000),
    ("Imagine", 183000),
    ("Hey Jude", 425000),
    ("Smells Like Teen Spirit", 301000),
    ("Like a Rolling Stone", 369000),
    ("Yesterday", 125000),
    ("Good Vibrations", 215000),
    ("Johnny B. Goode", 158000),
    ("What's Going On", 232000),
    ("My Generation", 227000),
    ("A Day in the Life", 337000),
    ("Light My Fire", 287000),
    ("I Want to Hold Your Hand", 145000),
    ("Respect", 148000),
    ("Goodbye Yellow Brick Road", 199000),
    ("Bridge Over Troubled Water", 294000),
    ("Let It Be", 243000),
    ("Dream On", 263000),
    ("Sweet Child O' Mine", 356000),
    ("Billie Jean", 294000),
    ("Purple Haze", 167000),
    ("Comfortably Numb", 383000),
];

/// (name, description)
pub const PLAYLISTS: &[(&str, &str)] = &[
    (
        "Classic Rock Hits",
        "The best classic rock songs of all time",
    ),
    ("Beatles Greatest", "Essential Beatles tracks"),
    ("90s Alternative", "Alternative rock from the 1990s"),
    ("Motown Classics", "Soul and R&B from Motown Records"),
    ("Guitar Heroes", "Songs featuring legendary guitar solos"),
    ("Summer Vibes", "Perfect songs for summer days"),
    ("Late Night Chill", "Relaxing music for late nights"),
    ("Road Trip Mix", "Great songs for long drives"),
    ("Party Starters", "High-energy songs to get the party going"),
    ("Acoustic Favorites", "Beautiful acoustic performances"),
];

/// Number of seeded playlists owned by each seeded user, in order
pub const PLAYLISTS_PER_USER: usize = 5;

/// (playlist_id, track_id), both 1-based seed positions
pub const PLAYLIST_TRACKS: &[(i64, i64)] = &[
    (1, 1),
    (1, 2),
    (1, 3),
    (1, 6),
    (1, 7),
    (2, 4),
    (2, 5),
    (2, 8),
    (2, 15),
    (2, 19),
    (3, 6),
    (3, 21),
    (3, 22),
    (4, 11),
    (4, 16),
    (5, 3),
    (5, 10),
    (5, 21),
    (5, 24),
    (6, 2),
    (6, 9),
    (6, 17),
    (7, 4),
    (7, 18),
    (7, 19),
    (8, 1),
    (8, 2),
    (8, 20),
    (8, 21),
    (9, 1),
    (9, 6),
    (9, 22),
    (9, 24),
    (10, 4),
    (10, 8),
    (10, 18),
    (10, 19),
];

/// 1-based id of the seeded user owning the playlist at `position` (0-based)
pub fn playlist_owner(position: usize) -> i64 {
    (position / PLAYLISTS_PER_USER + 1) as i64
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub users: usize,
    pub tracks: usize,
    pub playlists: usize,
    pub playlist_tracks: usize,
}

impl SeedSummary {
    pub fn expected() -> Self {
        Self {
            users: USERS.len(),
            tracks: TRACKS.len(),
            playlists: PLAYLISTS.len(),
            playlist_tracks: PLAYLIST_TRACKS.len(),
        }
    }
}

fn db_error(e: sqlx::Error) -> AppError {
    warn!(error = %e, "Seeding statement failed");
    AppError::DatabaseError(e.to_string())
}

/// Clears all tables and inserts the demo data in a single transaction
#[instrument(skip_all)]
pub async fn reseed(store: &PostgresStore, hasher: &PasswordHasher) -> Result<SeedSummary, AppError> {
    let mut hashes = Vec::with_capacity(USERS.len());
    for user in USERS {
        hashes.push(hasher.hash(user.password).await?);
    }

    let mut tx = store.pool().begin().await.map_err(db_error)?;

    sqlx::query("TRUNCATE playlists_tracks, playlists, tracks, users RESTART IDENTITY CASCADE")
        .execute(&mut *tx)
        .await
        .map_err(db_error)?;

    for (user, hash) in USERS.iter().zip(&hashes) {
        sqlx::query("INSERT INTO users (username, password_hash) VALUES ($1, $2)")
            .bind(user.username)
            .bind(hash)
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;
    }

    for &(name, duration_ms) in TRACKS {
        sqlx::query("INSERT INTO tracks (name, duration_ms) VALUES ($1, $2)")
            .bind(name)
            .bind(duration_ms)
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;
    }

    for (position, &(name, description)) in PLAYLISTS.iter().enumerate() {
        sqlx::query("INSERT INTO playlists (name, description, user_id) VALUES ($1, $2, $3)")
            .bind(name)
            .bind(description)
            .bind(playlist_owner(position))
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;
    }

    for &(playlist_id, track_id) in PLAYLIST_TRACKS {
        sqlx::query("INSERT INTO playlists_tracks (playlist_id, track_id) VALUES ($1, $2)")
            .bind(playlist_id)
            .bind(track_id)
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;
    }

    tx.commit().await.map_err(db_error)?;

    let summary = SeedSummary::expected();
    info!(
        users = summary.users,
        tracks = summary.tracks,
        playlists = summary.playlists,
        playlist_tracks = summary.playlist_tracks,
        "Database seeded"
    );
    Ok(summary)
}
