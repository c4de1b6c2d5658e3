use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Database model for the tracks table
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq)]
pub struct TrackModel {
    pub id: i64,
    pub name: String,
    pub duration_ms: i64,
}
