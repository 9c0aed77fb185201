//! Browser form for the chat endpoint.

use axum::response::Html;

/// GET / - single-page form that posts to `/chat`.
pub async fn index() -> Html<&'static str> {
    Html(include_str!("index.html"))
}
