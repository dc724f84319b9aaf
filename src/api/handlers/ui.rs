use axum::response::Html;

const INDEX_HTML: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/ui/index.html"));

/// The investigation page.
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}
