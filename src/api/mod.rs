pub mod movies;
pub mod types;

pub use movies::list_movies;
