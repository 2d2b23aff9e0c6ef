use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Dimension of the optional movie embedding vector. The catalog core
/// never computes embeddings; the column is reserved for an external
/// enrichment step.
pub const EMBEDDING_DIM: usize = 384;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    /// MovieLens id, assigned by the source catalog, never autogenerated.
    pub id: i64,
    pub title: String,
    pub year: Option<i32>,
    /// None for legacy rows imported before genres were tracked.
    pub genres: Option<Vec<String>>,
    pub overview: Option<String>,
    pub popularity: f64,
    pub poster_file: Option<String>,
    pub embedding: Option<Vec<f32>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    View,
    Rate,
    Like,
    Watchlist,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::View => "view",
            EventKind::Rate => "rate",
            EventKind::Like => "like",
            EventKind::Watchlist => "watchlist",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interaction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub movie_id: i64,
    pub event: EventKind,
    pub rating: Option<f64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid embedding: expected 384 dimensions, got {0}")]
    InvalidEmbedding(usize),
    #[error("Corrupt {column} column for movie {id}: {reason}")]
    CorruptRow {
        id: i64,
        column: &'static str,
        reason: String,
    },
}

pub type DbResult<T> = Result<T, DbError>;
