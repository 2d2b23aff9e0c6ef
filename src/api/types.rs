use serde::{Deserialize, Serialize};

/// Response projection of a persisted movie. Identical to the stored row
/// except that the poster path is resolved into an absolute URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieView {
    pub id: i64,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    pub popularity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genres: Option<Vec<String>>,
    pub poster_url: String,
}
