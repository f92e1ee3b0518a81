use axum::response::Html;

const INDEX_HTML: &str = include_str!("../../static/index.html");

/// GET /: the single-page question form.
pub async fn index_page() -> Html<&'static str> {
    Html(INDEX_HTML)
}
