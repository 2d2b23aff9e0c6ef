use std::str::FromStr;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::info;

use super::model::*;
use super::repo::*;

pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    pub async fn new(db_path: &str) -> DbResult<Self> {
        let options = SqliteConnectOptions::from_str(db_path)?.create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        let repo = Self { pool };
        repo.init_schema().await?;

        info!("Database initialized at {}", db_path);

        Ok(repo)
    }

    async fn init_schema(&self) -> DbResult<()> {
        let schema = include_str!("schema.sql");
        sqlx::query(schema).execute(&self.pool).await?;
        Ok(())
    }
}

type MovieRow = (
    i64,
    String,
    Option<i32>,
    Option<String>,
    Option<String>,
    f64,
    Option<String>,
    Option<String>,
);

fn movie_from_row(row: MovieRow) -> DbResult<Movie> {
    let id = row.0;
    let genres = row
        .3
        .map(|s| serde_json::from_str::<Vec<String>>(&s))
        .transpose()
        .map_err(|e| DbError::CorruptRow {
            id,
            column: "genres",
            reason: e.to_string(),
        })?;
    let embedding = row
        .7
        .map(|s| serde_json::from_str::<Vec<f32>>(&s))
        .transpose()
        .map_err(|e| DbError::CorruptRow {
            id,
            column: "embedding",
            reason: e.to_string(),
        })?;

    Ok(Movie {
        id,
        title: row.1,
        year: row.2,
        genres,
        overview: row.4,
        popularity: row.5,
        poster_file: row.6,
        embedding,
    })
}

const MOVIE_COLUMNS: &str =
    "id, title, year, genres, overview, popularity, poster_file, embedding";

#[async_trait]
impl MovieRepo for SqliteRepository {
    async fn get_movie(&self, id: i64) -> DbResult<Movie> {
        let row = sqlx::query_as::<_, MovieRow>(&format!(
            "SELECT {} FROM movies WHERE id = ?",
            MOVIE_COLUMNS
        ))
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => DbError::NotFound(format!("Movie not found: {}", id)),
            _ => DbError::Sqlx(e),
        })?;

        movie_from_row(row)
    }

    async fn list_movies(&self, limit: u32) -> DbResult<Vec<Movie>> {
        let rows = sqlx::query_as::<_, MovieRow>(&format!(
            "SELECT {} FROM movies ORDER BY id ASC LIMIT ?",
            MOVIE_COLUMNS
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(movie_from_row).collect()
    }

    async fn count_movies(&self) -> DbResult<i64> {
        let count = sqlx::query_as::<_, (i64,)>("SELECT COUNT(*) FROM movies")
            .fetch_one(&self.pool)
            .await?;
        Ok(count.0)
    }

    async fn insert_movies(&self, movies: &[Movie]) -> DbResult<()> {
        for movie in movies {
            if let Some(ref embedding) = movie.embedding {
                if embedding.len() != EMBEDDING_DIM {
                    return Err(DbError::InvalidEmbedding(embedding.len()));
                }
            }
        }

        let mut tx = self.pool.begin().await?;
        for movie in movies {
            let genres = movie
                .genres
                .as_ref()
                .map(|g| serde_json::to_string(g).unwrap_or_default());
            let embedding = movie
                .embedding
                .as_ref()
                .map(|e| serde_json::to_string(e).unwrap_or_default());

            sqlx::query(
                "INSERT INTO movies
                (id, title, year, genres, overview, popularity, poster_file, embedding)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(movie.id)
            .bind(&movie.title)
            .bind(movie.year)
            .bind(genres)
            .bind(&movie.overview)
            .bind(movie.popularity)
            .bind(&movie.poster_file)
            .bind(embedding)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn clear_movies(&self) -> DbResult<()> {
        sqlx::query("DELETE FROM movies").execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl InteractionRepo for SqliteRepository {
    async fn record_interaction(&self, interaction: &Interaction) -> DbResult<()> {
        sqlx::query(
            "INSERT INTO interactions (id, user_id, movie_id, event, rating, created_at)
            VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(interaction.id.to_string())
        .bind(interaction.user_id.to_string())
        .bind(interaction.movie_id)
        .bind(interaction.event.as_str())
        .bind(interaction.rating)
        .bind(interaction.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
