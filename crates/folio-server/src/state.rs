//! Application state.
//!
//! Shared state for all request handlers. There are no ambient globals; the
//! caches, template registry and mode controller are owned here and passed
//! by handle.

use std::collections::HashMap;
use std::sync::Arc;

use folio_cache::PageCache;
use folio_content::source::ArticleSource;
use folio_templates::TemplateRegistry;

use crate::mode::ModeController;

/// Application state shared across all handlers.
pub(crate) struct AppState {
    /// Source of raw article fragments.
    pub(crate) source: Arc<dyn ArticleSource>,
    /// Page template registry.
    pub(crate) templates: Arc<TemplateRegistry>,
    /// Rendered article and print pages, keyed by fragment file name.
    pub(crate) article_pages: Arc<PageCache>,
    /// Rendered go-get vanity pages, keyed by request path.
    pub(crate) goget_pages: Arc<PageCache>,
    /// Local/public mode tracking and invalidation.
    pub(crate) mode: ModeController,
    /// Article the root path redirects to.
    pub(crate) home_article: String,
    /// Known printable books: book name to root fragment file.
    pub(crate) books: HashMap<String, String>,
}
