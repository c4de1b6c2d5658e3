use sqlx::{postgres::PgPoolOptions, Executor, PgPool};
use tracing::{info, instrument, warn};

use crate::shared::AppError;

const SCHEMA: &str = include_str!("../../db/schema.sql");

/// PostgreSQL-backed store; repository traits are implemented in each domain module
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[instrument(skip_all)]
    pub async fn connect(database_url: &str) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .connect(database_url)
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to connect to database");
                AppError::DatabaseError(e.to_string())
            })?;

        info!("Connected to database");
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Creates any missing tables and constraints
    #[instrument(skip(self))]
    pub async fn apply_schema(&self) -> Result<(), AppError> {
        self.pool.execute(SCHEMA).await.map_err(|e| {
            warn!(error = %e, "Failed to apply schema");
            AppError::DatabaseError(e.to_string())
        })?;

        info!("Schema applied");
        Ok(())
    }
}

/// Postgres reports unique constraint violations with SQLSTATE 23505
pub(crate) fn is_unique_violation(error: &sqlx::Error) -> bool {
    match error {
        sqlx::Error::Database(db_error) => db_error.is_unique_violation(),
        _ => false,
    }
}

/// Converts a sqlx failure into the opaque storage error
pub(crate) fn storage_error(error: sqlx::Error) -> AppError {
    AppError::DatabaseError(error.to_string())
}
