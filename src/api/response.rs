use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

use crate::api::models::PageView;
use crate::templates::render_page;

pub fn success(view: PageView) -> Response {
    page(StatusCode::OK, &view)
}

pub fn error(status: StatusCode, message: String, video_url: Option<String>) -> Response {
    page(status, &PageView::with_error(message, video_url))
}

fn page(status: StatusCode, view: &PageView) -> Response {
    match render_page(view) {
        Ok(html) => (status, Html(html)).into_response(),
        Err(err) => {
            tracing::error!(error = %err, "Template rendering failed");
            let fallback = view
                .error
                .clone()
                .unwrap_or_else(|| "Something went wrong.".to_string());
            let status = if status.is_success() {
                StatusCode::INTERNAL_SERVER_ERROR
            } else {
                status
            };
            (status, fallback).into_response()
        }
    }
}
