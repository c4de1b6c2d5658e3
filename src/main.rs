use anyhow::Context;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use playlist_api::{
    build_router, AppConfig, AppState, InMemoryStore, PasswordHasher, PostgresStore, TokenService,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "playlist_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env().context("Invalid configuration")?;
    info!(env = %config.env, "Starting playlist API");

    if config.uses_dev_secret() {
        warn!("JWT_SECRET is not set; signing tokens with the development secret");
    }

    let token_service = TokenService::new(config.jwt_secret.clone(), config.token_expiration_hours);
    let password_hasher = PasswordHasher::new(config.bcrypt_cost);

    let app_state = match config.database_url.as_deref() {
        Some(database_url) => {
            let store = PostgresStore::connect(database_url)
                .await
                .context("Failed to connect to database")?;
            store
                .apply_schema()
                .await
                .context("Failed to apply database schema")?;
            info!("Using PostgreSQL storage");
            AppState::from_store(Arc::new(store), token_service, password_hasher)
        }
        None => {
            let store = InMemoryStore::seeded(&password_hasher)
                .context("Failed to seed in-memory store")?;
            warn!("DATABASE_URL is not set; using seeded in-memory storage");
            AppState::from_store(Arc::new(store), token_service, password_hasher)
        }
    };

    let app = build_router(app_state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    info!("Server running on http://{}", config.bind_addr);
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
