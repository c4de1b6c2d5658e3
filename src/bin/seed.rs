use anyhow::Context;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use playlist_api::{db::seed, AppConfig, PasswordHasher, PostgresStore};

/// Recreates the schema if needed and replaces all rows with the demo dataset
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "playlist_api=info,seed=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env().context("Invalid configuration")?;
    let database_url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL must be set to seed the database")?;

    let store = PostgresStore::connect(database_url)
        .await
        .context("Failed to connect to database")?;
    store
        .apply_schema()
        .await
        .context("Failed to apply database schema")?;

    let summary = seed::reseed(&store, &PasswordHasher::new(config.bcrypt_cost))
        .await
        .context("Seeding failed")?;

    info!(
        users = summary.users,
        tracks = summary.tracks,
        playlists = summary.playlists,
        playlist_tracks = summary.playlist_tracks,
        "Database seeded"
    );
    Ok(())
}
