//! HTTP server for the Folio documentation engine.
//!
//! Serves article pages rendered from a directory of HTML fragments, a
//! printable book page assembled from a root article's index, vanity-import
//! (`go-get`) pages and the site's static assets.
//!
//! # Operating modes
//!
//! Every request carries a mode signal derived from its `Host` header: a
//! request addressed to `localhost` puts the server in local mode, anything
//! else in public mode. Public mode caches rendered pages and parsed
//! templates; a transition into local mode invalidates both so maintainers
//! always see their edits live.
//!
//! # Quick start
//!
//! ```ignore
//! use folio_server::{ServerConfig, run_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig::default();
//!     run_server(config).await.unwrap();
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! Browser ──HTTP──► axum router (folio-server)
//!                        │
//!                        ├─► /article/{item} ──► PageCache ──miss──► extract + template
//!                        ├─► /article/print-… ──► book assembly (local mode)
//!                        ├─► /static, /article/res ──► tower-http ServeDir
//!                        └─► fallback ──► go-get vanity page
//! ```

mod app;
mod error;
mod handlers;
mod mode;
mod refresh;
mod render;
mod state;

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use folio_cache::PageCache;
use folio_content::source::{ArticleSource, FsSource};
use folio_templates::TemplateRegistry;

use mode::ModeController;
pub use mode::ServerMode;
use state::AppState;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Site root holding `articles/` and `web/` (templates and static files).
    pub root_dir: PathBuf,
    /// Article fragment the root path redirects to.
    pub home_article: String,
    /// Known printable books: book name to root fragment file.
    pub books: HashMap<String, String>,
    /// Periodically re-pull site content with `git pull`.
    pub refresh_enabled: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 55555,
            root_dir: PathBuf::from("."),
            home_article: "101.html".to_owned(),
            books: HashMap::from([("book101".to_owned(), "101.html".to_owned())]),
            refresh_enabled: false,
        }
    }
}

/// Run the server until shutdown.
///
/// # Errors
///
/// Returns an error if a page template fails to load or parse at startup,
/// or if the listen address cannot be bound.
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let source: Arc<dyn ArticleSource> = Arc::new(FsSource::new(config.root_dir.join("articles")));

    let templates = Arc::new(TemplateRegistry::new(
        config.root_dir.join("web").join("templates"),
    ));
    // Pre-warm every slot; a template that cannot parse aborts startup.
    templates.warm_up()?;

    let article_pages = Arc::new(PageCache::new());
    let goget_pages = Arc::new(PageCache::new());
    let mode = ModeController::new(
        Arc::clone(&templates),
        vec![Arc::clone(&article_pages), Arc::clone(&goget_pages)],
    );

    let state = Arc::new(AppState {
        source,
        templates,
        article_pages,
        goget_pages,
        mode,
        home_article: config.home_article,
        books: config.books,
    });

    if config.refresh_enabled {
        refresh::spawn(config.root_dir.clone());
    }

    let app = app::create_router(state, &config.root_dir);

    let addr = SocketAddr::from_str(&format!("{}:{}", config.host, config.port))?;
    tracing::info!(address = %addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received, stopping server...");
}
