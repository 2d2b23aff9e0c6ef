use async_trait::async_trait;

use super::model::*;

#[async_trait]
pub trait MovieRepo: Send + Sync {
    async fn get_movie(&self, id: i64) -> DbResult<Movie>;
    /// List movies in ascending id order, at most `limit` rows.
    async fn list_movies(&self, limit: u32) -> DbResult<Vec<Movie>>;
    async fn count_movies(&self) -> DbResult<i64>;
    /// Insert a batch of movies in a single transaction.
    async fn insert_movies(&self, movies: &[Movie]) -> DbResult<()>;
    /// Delete every movie row. The importer runs this before a reload so
    /// stale ids from a previous import cannot survive.
    async fn clear_movies(&self) -> DbResult<()>;
}

#[async_trait]
pub trait InteractionRepo: Send + Sync {
    async fn record_interaction(&self, interaction: &Interaction) -> DbResult<()>;
}
