//! Router construction.
//!
//! Builds the axum router: content routes, static file services with
//! long-lived cache headers, and the go-get fallback.

use std::path::Path;
use std::sync::Arc;

use axum::Router;
use axum::http::{HeaderValue, header};
use axum::routing::get;
use tower::ServiceBuilder;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Static assets are immutable enough for a ten-hour client cache.
const STATIC_CACHE_CONTROL: &str = "max-age=360000";

/// Create the application router.
pub(crate) fn create_router(state: Arc<AppState>, root_dir: &Path) -> Router {
    let long_cache = SetResponseHeaderLayer::overriding(
        header::CACHE_CONTROL,
        HeaderValue::from_static(STATIC_CACHE_CONTROL),
    );

    Router::new()
        .route("/", get(handlers::home))
        .route("/article/{item}", get(handlers::articles::article))
        .nest_service(
            "/article/res",
            ServiceBuilder::new()
                .layer(long_cache.clone())
                .service(ServeDir::new(root_dir.join("articles").join("res"))),
        )
        .nest_service(
            "/static",
            ServiceBuilder::new()
                .layer(long_cache)
                .service(ServeDir::new(root_dir.join("web").join("static"))),
        )
        .fallback(handlers::goget::goget)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
