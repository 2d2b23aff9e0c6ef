pub mod csv;
pub mod genres;
pub mod import;
pub mod title;

pub use import::{import_movies, ImportError};
