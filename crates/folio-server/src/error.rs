//! Server error type.

use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use folio_content::ContentError;
use folio_templates::TemplateError;

/// Request handling error.
///
/// Missing articles never reach this type on the happy path (they become
/// the cache's not-found sentinel); everything landing here is a genuine
/// failure worth surfacing to the operator.
#[derive(Debug, thiserror::Error)]
pub(crate) enum ServerError {
    #[error(transparent)]
    Content(#[from] ContentError),

    #[error(transparent)]
    Template(#[from] TemplateError),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Content(err) if err.is_not_found() => StatusCode::NOT_FOUND,
            Self::Content(_) | Self::Template(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        tracing::error!(error = %self, "request failed");
        (
            status,
            [(header::CACHE_CONTROL, "no-cache, private, max-age=0")],
            self.to_string(),
        )
            .into_response()
    }
}
