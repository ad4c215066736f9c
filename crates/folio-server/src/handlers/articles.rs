//! Article and print-book page endpoints.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::Response;

use crate::error::ServerError;
use crate::handlers::{confirm_mode, respond};
use crate::render;
use crate::state::AppState;

/// Handle GET `/article/{item}`.
///
/// Items are case-normalized. In local mode, `print-<book>` and
/// `pdf-<book>` items route to the print-book renderer; everywhere else the
/// item names an article fragment.
pub(crate) async fn article(
    Path(item): Path<String>,
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, ServerError> {
    confirm_mode(&state, &headers);
    let item = item.to_lowercase();

    if state.mode.current().is_local() {
        if let Some((target, book)) = split_print_item(&item) {
            let rendered = render::print_page(&state, target, book)?;
            return Ok(respond(&state, rendered));
        }
    }

    let rendered = render::article_page(&state, &item)?;
    Ok(respond(&state, rendered))
}

/// Split a `print-<book>` or `pdf-<book>` item into target and book name.
fn split_print_item(item: &str) -> Option<(&str, &str)> {
    item.split_once('-')
        .filter(|(target, _)| *target == "print" || *target == "pdf")
}
