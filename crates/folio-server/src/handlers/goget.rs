//! Vanity-import (`go-get`) page endpoint.
//!
//! Any path not claimed by another route is treated as a package path and
//! rendered through the go-get template slot, cached separately from
//! article pages.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, Uri, header};
use axum::response::Response;

use crate::error::ServerError;
use crate::handlers::{confirm_mode, respond};
use crate::render;
use crate::state::AppState;

/// Handle every unrouted GET as a go-get vanity page.
pub(crate) async fn goget(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    uri: Uri,
) -> Result<Response, ServerError> {
    confirm_mode(&state, &headers);

    let host = headers
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("")
        .to_owned();
    let path = uri.path().trim_start_matches('/').to_lowercase();

    let rendered = render::goget_page(&state, &host, &path)?;
    Ok(respond(&state, rendered))
}
