use axum::http::header;
use axum::response::{Html, IntoResponse};
use tracing::info;

const INDEX_HTML: &str = include_str!("../../static/index.html");

/// GET /
/// Serves the static upload form. `Cache-Control: no-store` keeps stale
/// copies of the form out of browser caches.
pub async fn home_handler() -> impl IntoResponse {
    info!("Serving UI homepage");
    (
        [(header::CACHE_CONTROL, "no-store")],
        Html(INDEX_HTML),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_home_sets_no_store_cache_header() {
        let response = home_handler().await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CACHE_CONTROL).unwrap(),
            "no-store"
        );
    }
}
