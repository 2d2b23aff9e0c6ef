use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    Json,
};
use serde::Deserialize;
use tracing::error;

use super::types::MovieView;
use crate::db::{Movie, MovieRepo};
use crate::server::AppState;

/// Hard cap on the number of rows a single request may fetch.
pub const MAX_LIMIT: u32 = 500;

const DEFAULT_LIMIT: u32 = 10;
const POSTER_PREFIX: &str = "/static/posters/";
const FALLBACK_POSTER: &str = "toy_story.jpg";

#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

/// `GET /api/v1/movies/` — the catalog in ascending id order, at most
/// `limit` entries (default 10, clamped to [`MAX_LIMIT`]).
pub async fn list_movies(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<MovieView>>, StatusCode> {
    let limit = clamp_limit(params.limit);

    let movies = state.db.list_movies(limit).await.map_err(|e| {
        error!("Failed to list movies: {}", e);
        StatusCode::SERVICE_UNAVAILABLE
    })?;

    let origin = base_origin(&headers, &state.config.local_authority());
    let views = movies.into_iter().map(|m| project(m, &origin)).collect();
    Ok(Json(views))
}

fn clamp_limit(limit: u32) -> u32 {
    limit.min(MAX_LIMIT)
}

/// Scheme + host under which this request reached us. The host comes from
/// the `Host` header and the scheme from `X-Forwarded-Proto` when a proxy
/// sits in front; posters must be addressable from the caller's side.
/// Requests without a `Host` header (HTTP/2 carries the authority in the
/// URI) fall back to the configured listen authority.
pub fn base_origin(headers: &HeaderMap, fallback_host: &str) -> String {
    let proto = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("http");
    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or(fallback_host);
    format!("{}://{}", proto, host)
}

pub fn project(movie: Movie, base_origin: &str) -> MovieView {
    // No per-movie poster pipeline exists; rows without a poster file all
    // point at the same placeholder image.
    let poster = movie.poster_file.as_deref().unwrap_or(FALLBACK_POSTER);
    let poster_url = format!(
        "{}{}{}",
        base_origin.trim_end_matches('/'),
        POSTER_PREFIX,
        poster
    );

    MovieView {
        id: movie.id,
        title: movie.title,
        year: movie.year,
        popularity: movie.popularity,
        genres: movie.genres,
        poster_url,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::db::{MovieRepo, SqliteRepository};
    use crate::server::build_router;
    use axum::body::Body;
    use axum::http::Request;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn movie(id: i64, title: &str) -> Movie {
        Movie {
            id,
            title: title.to_string(),
            year: Some(1995),
            genres: Some(vec!["Adventure".to_string()]),
            overview: None,
            popularity: 0.0,
            poster_file: None,
            embedding: None,
        }
    }

    #[test]
    fn test_poster_fallback_url() {
        let view = project(movie(1, "Toy Story"), "http://localhost:8000");
        assert_eq!(
            view.poster_url,
            "http://localhost:8000/static/posters/toy_story.jpg"
        );
    }

    #[test]
    fn test_poster_file_used_when_present() {
        let mut m = movie(2, "Jumanji");
        m.poster_file = Some("jumanji.jpg".to_string());
        let view = project(m, "http://localhost:8000/");
        assert_eq!(
            view.poster_url,
            "http://localhost:8000/static/posters/jumanji.jpg"
        );
    }

    #[test]
    fn test_base_origin_from_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, "movies.example.com".parse().unwrap());
        assert_eq!(
            base_origin(&headers, "localhost:8000"),
            "http://movies.example.com"
        );

        headers.insert("x-forwarded-proto", "https".parse().unwrap());
        assert_eq!(
            base_origin(&headers, "localhost:8000"),
            "https://movies.example.com"
        );
    }

    #[test]
    fn test_base_origin_without_host_header_uses_configured_authority() {
        let headers = HeaderMap::new();
        assert_eq!(
            base_origin(&headers, "movies.internal:9000"),
            "http://movies.internal:9000"
        );
    }

    #[test]
    fn test_limit_clamp() {
        assert_eq!(clamp_limit(0), 0);
        assert_eq!(clamp_limit(10), 10);
        assert_eq!(clamp_limit(MAX_LIMIT), MAX_LIMIT);
        assert_eq!(clamp_limit(10_000), MAX_LIMIT);
        assert_eq!(clamp_limit(u32::MAX), MAX_LIMIT);
    }

    #[test]
    fn test_view_serialization_omits_absent_fields() {
        let mut m = movie(3, "Four Rooms");
        m.year = None;
        m.genres = None;
        let json = serde_json::to_value(project(m, "http://localhost:8000")).unwrap();
        assert!(json.get("year").is_none());
        assert!(json.get("genres").is_none());
        assert_eq!(json["popularity"], 0.0);
    }

    async fn test_state() -> (tempfile::TempDir, AppState) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.db");
        let repo = SqliteRepository::new(path.to_str().unwrap())
            .await
            .unwrap();
        let state = AppState::new(Config::default(), Arc::new(repo));
        (dir, state)
    }

    #[tokio::test]
    async fn test_list_movies_endpoint() {
        let (_dir, state) = test_state().await;
        state
            .db
            .insert_movies(&[movie(1, "Toy Story"), movie(2, "Jumanji")])
            .await
            .unwrap();

        let app = build_router(state);
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/movies/?limit=10")
                    .header(header::HOST, "localhost:8000")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let views: Vec<MovieView> = serde_json::from_slice(&body).unwrap();
        assert_eq!(views.len(), 2);
        assert_eq!(views[0].title, "Toy Story");
        assert_eq!(
            views[0].poster_url,
            "http://localhost:8000/static/posters/toy_story.jpg"
        );
        assert_eq!(views[1].title, "Jumanji");
    }

    #[tokio::test]
    async fn test_limit_respected() {
        let (_dir, state) = test_state().await;
        let movies: Vec<Movie> = (1..=5).map(|i| movie(i, "Movie")).collect();
        state.db.insert_movies(&movies).await.unwrap();

        let app = build_router(state);
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/movies?limit=3")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let views: Vec<MovieView> = serde_json::from_slice(&body).unwrap();
        assert_eq!(views.len(), 3);
    }

    #[tokio::test]
    async fn test_oversized_limit_is_clamped_not_rejected() {
        let (_dir, state) = test_state().await;
        state
            .db
            .insert_movies(&[movie(1, "Toy Story"), movie(2, "Jumanji")])
            .await
            .unwrap();

        let app = build_router(state);
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/movies?limit=100000")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let views: Vec<MovieView> = serde_json::from_slice(&body).unwrap();
        assert_eq!(views.len(), 2);
    }

    #[tokio::test]
    async fn test_zero_limit_returns_empty_list() {
        let (_dir, state) = test_state().await;
        state.db.insert_movies(&[movie(1, "Toy Story")]).await.unwrap();

        let app = build_router(state);
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/movies?limit=0")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let views: Vec<MovieView> = serde_json::from_slice(&body).unwrap();
        assert!(views.is_empty());
    }
}
