//! HTTP request handlers.

pub(crate) mod articles;
pub(crate) mod goget;

use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Redirect, Response};

use crate::mode::mode_for_host;
use crate::render::Rendered;
use crate::state::AppState;

/// Re-confirm the server mode from the request's `Host` header.
pub(crate) fn confirm_mode(state: &AppState, headers: &HeaderMap) {
    let host = headers
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("");
    state.mode.confirm(mode_for_host(host));
}

/// Redirect the site root to the home article.
pub(crate) async fn home(State(state): State<Arc<AppState>>) -> Redirect {
    Redirect::temporary(&format!("/article/{}", state.home_article))
}

/// Turn a render outcome into the final response.
///
/// Local-mode pages are marked uncacheable; public-mode pages get a
/// long-lived `Cache-Control`. A not-found outcome is a 404 pointing
/// readers at the home article, never cacheable.
pub(crate) fn respond(state: &AppState, rendered: Rendered) -> Response {
    match rendered {
        Rendered::NotFound => not_found_redirect(&state.home_article),
        Rendered::Page(page) => {
            let cache_control = if state.mode.current().is_local() {
                "no-cache, private, max-age=0"
            } else {
                "max-age=5000"
            };
            (
                [
                    (header::CACHE_CONTROL, cache_control),
                    (header::CONTENT_TYPE, "text/html; charset=utf-8"),
                ],
                page.to_vec(),
            )
                .into_response()
        }
    }
}

/// 404 with a `Location` pointing at the home article.
fn not_found_redirect(home: &str) -> Response {
    Response::builder()
        .status(StatusCode::NOT_FOUND)
        .header(header::LOCATION, format!("/article/{home}"))
        .header(header::CACHE_CONTROL, "no-cache, private, max-age=0")
        .body(Body::empty())
        .unwrap()
}
