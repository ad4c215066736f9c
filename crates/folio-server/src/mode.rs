//! Local/public mode tracking.
//!
//! The server runs in public mode for external readers and in local mode
//! for the site maintainer. The mode is re-confirmed on every request from
//! the request's `Host` header; a transition into local mode invalidates
//! the template registry and clears every registered page cache before any
//! reader can observe the new mode.

use std::sync::{Arc, Mutex};

use folio_cache::PageCache;
use folio_templates::TemplateRegistry;

/// Operating mode of the server process.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ServerMode {
    /// Maintainer/dev environment: no durable caching, live template reload.
    Local,
    /// Normal mode for external readers: rendered pages and parsed
    /// templates are cached.
    Public,
}

impl ServerMode {
    /// True in local mode.
    #[must_use]
    pub fn is_local(self) -> bool {
        matches!(self, Self::Local)
    }
}

/// Derive the mode for one request from its `Host` header value.
///
/// A request is local iff the hostname, with any port stripped, is exactly
/// `localhost`.
pub(crate) fn mode_for_host(host: &str) -> ServerMode {
    let hostname = host.split(':').next().unwrap_or(host);
    if hostname == "localhost" {
        ServerMode::Local
    } else {
        ServerMode::Public
    }
}

/// Process-wide mode flag plus the invalidation it drives.
pub(crate) struct ModeController {
    mode: Mutex<ServerMode>,
    templates: Arc<TemplateRegistry>,
    caches: Vec<Arc<PageCache>>,
}

impl ModeController {
    /// Create a controller starting in public mode.
    pub(crate) fn new(templates: Arc<TemplateRegistry>, caches: Vec<Arc<PageCache>>) -> Self {
        Self {
            mode: Mutex::new(ServerMode::Public),
            templates,
            caches,
        }
    }

    /// Record the mode observed on a request. Returns whether it changed.
    ///
    /// A change into local mode invalidates templates and clears every
    /// registered cache under the same lock, so no reader observes local
    /// mode while content cached under public assumptions is still served.
    /// Returning to public mode clears nothing; caches re-populate on
    /// demand.
    pub(crate) fn confirm(&self, mode: ServerMode) -> bool {
        let mut current = self.mode.lock().unwrap();
        if *current == mode {
            return false;
        }
        *current = mode;
        if mode.is_local() {
            self.templates.invalidate_all();
            for cache in &self.caches {
                cache.clear();
            }
        }
        tracing::info!(?mode, "server mode changed");
        true
    }

    /// Current operating mode.
    pub(crate) fn current(&self) -> ServerMode {
        *self.mode.lock().unwrap()
    }
}

#[cfg(test)]
mod tests {
    use folio_cache::Lookup;
    use folio_templates::TemplateSlot;

    use super::*;

    fn controller() -> (tempfile::TempDir, ModeController, Arc<PageCache>, Arc<PageCache>) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("base.html"), "{% block body %}{% endblock %}").unwrap();
        std::fs::write(
            dir.path().join("article.html"),
            "{% extends \"base.html\" %}{% block body %}v1{% endblock %}",
        )
        .unwrap();

        let templates = Arc::new(TemplateRegistry::new(dir.path().to_path_buf()));
        let articles = Arc::new(PageCache::new());
        let gogets = Arc::new(PageCache::new());
        let mode = ModeController::new(
            Arc::clone(&templates),
            vec![Arc::clone(&articles), Arc::clone(&gogets)],
        );
        (dir, mode, articles, gogets)
    }

    #[test]
    fn starts_public() {
        let (_dir, mode, _, _) = controller();
        assert_eq!(mode.current(), ServerMode::Public);
    }

    #[test]
    fn unchanged_mode_is_a_no_op() {
        let (_dir, mode, articles, _) = controller();
        articles.insert("k", b"page".to_vec());

        assert!(!mode.confirm(ServerMode::Public));
        assert!(matches!(articles.get("k"), Lookup::Hit(_)));
    }

    #[test]
    fn transition_to_local_clears_every_cache() {
        let (_dir, mode, articles, gogets) = controller();
        articles.insert("a", b"1".to_vec());
        gogets.insert("g", b"2".to_vec());

        assert!(mode.confirm(ServerMode::Local));

        assert!(articles.get("a").is_absent());
        assert!(gogets.get("g").is_absent());
        assert_eq!(mode.current(), ServerMode::Local);
    }

    #[test]
    fn transition_to_local_forces_template_reparse() {
        let (dir, mode, _, _) = controller();

        // Populate the registry cache, then edit the source on disk.
        let ctx = minijinja::context! {};
        let before = mode.templates.render(TemplateSlot::ArticlePage, true, &ctx).unwrap();
        assert_eq!(before, b"v1");
        std::fs::write(
            dir.path().join("article.html"),
            "{% extends \"base.html\" %}{% block body %}v2{% endblock %}",
        )
        .unwrap();

        mode.confirm(ServerMode::Local);

        let after = mode.templates.render(TemplateSlot::ArticlePage, true, &ctx).unwrap();
        assert_eq!(after, b"v2");
    }

    #[test]
    fn transition_back_to_public_clears_nothing() {
        let (_dir, mode, articles, _) = controller();
        mode.confirm(ServerMode::Local);
        articles.insert("k", b"page".to_vec());

        assert!(mode.confirm(ServerMode::Public));

        assert!(matches!(articles.get("k"), Lookup::Hit(_)));
    }

    #[test]
    fn host_header_mode_signal() {
        assert_eq!(mode_for_host("localhost"), ServerMode::Local);
        assert_eq!(mode_for_host("localhost:55555"), ServerMode::Local);
        assert_eq!(mode_for_host("127.0.0.1:55555"), ServerMode::Public);
        assert_eq!(mode_for_host("example.com"), ServerMode::Public);
        assert_eq!(mode_for_host(""), ServerMode::Public);
    }
}
