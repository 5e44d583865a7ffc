//! Built-in unlock page, served when no site directory is configured.

use axum::{
    http::header::CONTENT_TYPE,
    response::{Html, IntoResponse},
};

const INDEX_HTML: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/site/index.html"));
const INDEX_JS: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/site/index.js"));

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub async fn script() -> impl IntoResponse {
    ([(CONTENT_TYPE, "text/javascript; charset=utf-8")], INDEX_JS)
}
