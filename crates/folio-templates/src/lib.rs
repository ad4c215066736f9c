//! Runtime page template registry for the Folio documentation engine.
//!
//! Page templates live as `minijinja` sources under `<root>/web/templates/`
//! and are loaded per [`TemplateSlot`]. The registry optionally caches the
//! parsed environment for each slot: public-mode requests reuse the cached
//! parse, local-mode requests pass `allow_cache = false` and re-read from
//! disk every time (live reload).
//!
//! Auto-escaping is disabled throughout: article bodies are trusted,
//! hand-authored markup that must reach the output verbatim.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use minijinja::{AutoEscape, Environment};

/// One of the fixed page template slots.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TemplateSlot {
    /// A single article page.
    ArticlePage,
    /// The assembled printable book page.
    PrintBookPage,
    /// Vanity-import redirect page.
    GoGetPage,
    /// Fallback slot rendering an empty page.
    Blank,
}

impl TemplateSlot {
    /// Every slot, in warm-up order.
    pub const ALL: [Self; 4] = [
        Self::ArticlePage,
        Self::PrintBookPage,
        Self::GoGetPage,
        Self::Blank,
    ];

    fn index(self) -> usize {
        match self {
            Self::ArticlePage => 0,
            Self::PrintBookPage => 1,
            Self::GoGetPage => 2,
            Self::Blank => 3,
        }
    }

    /// Template source files loaded for this slot, relative to the
    /// templates directory.
    fn files(self) -> &'static [&'static str] {
        match self {
            Self::ArticlePage => &["base.html", "article.html"],
            Self::PrintBookPage => &["book.html"],
            Self::GoGetPage => &["go-get.html"],
            Self::Blank => &[],
        }
    }

    /// Name of the template rendered for this slot.
    #[must_use]
    pub fn entry_point(self) -> &'static str {
        match self {
            Self::ArticlePage => "article.html",
            Self::PrintBookPage => "book.html",
            Self::GoGetPage => "go-get.html",
            Self::Blank => "blank.html",
        }
    }
}

/// Template loading or rendering error.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    /// A template source file could not be read.
    #[error("failed to read template {file}: {source}")]
    Io {
        /// File name relative to the templates directory.
        file: String,
        #[source]
        source: std::io::Error,
    },

    /// A template source failed to parse. Fatal at startup for warmed
    /// slots; a request-time error for lazily loaded ones.
    #[error("failed to parse template {file}: {source}")]
    Parse {
        /// File name relative to the templates directory.
        file: String,
        #[source]
        source: minijinja::Error,
    },

    /// Template execution failed.
    #[error("template rendering failed: {0}")]
    Render(#[source] minijinja::Error),
}

/// Parsed-template cache over the fixed slot set.
///
/// The slot array is guarded by one mutex, held only for the check and the
/// maybe-store. Parsing happens outside the lock so concurrent misses do not
/// serialize behind file I/O; the last finished parse wins the store.
#[derive(Debug)]
pub struct TemplateRegistry {
    templates_dir: PathBuf,
    slots: Mutex<[Option<Arc<Environment<'static>>>; TemplateSlot::ALL.len()]>,
}

impl TemplateRegistry {
    /// Create a registry loading sources from `templates_dir`.
    #[must_use]
    pub fn new(templates_dir: PathBuf) -> Self {
        Self {
            templates_dir,
            slots: Mutex::new(Default::default()),
        }
    }

    /// Get the environment for a slot, parsing it on first use.
    ///
    /// With `allow_cache = false` the freshly parsed environment is returned
    /// but not stored, so the next call re-reads from disk.
    pub fn get(
        &self,
        slot: TemplateSlot,
        allow_cache: bool,
    ) -> Result<Arc<Environment<'static>>, TemplateError> {
        {
            let slots = self.slots.lock().unwrap();
            if let Some(env) = slots[slot.index()].as_ref() {
                return Ok(Arc::clone(env));
            }
        }

        let env = Arc::new(self.parse_slot(slot)?);
        if allow_cache {
            self.slots.lock().unwrap()[slot.index()] = Some(Arc::clone(&env));
        }
        Ok(env)
    }

    /// Render a slot's entry-point template to output bytes.
    pub fn render(
        &self,
        slot: TemplateSlot,
        allow_cache: bool,
        ctx: &minijinja::Value,
    ) -> Result<Vec<u8>, TemplateError> {
        let env = self.get(slot, allow_cache)?;
        let template = env
            .get_template(slot.entry_point())
            .map_err(TemplateError::Render)?;
        let html = template.render(ctx).map_err(TemplateError::Render)?;
        Ok(html.into_bytes())
    }

    /// Parse and cache every slot. Called at server startup so that parse
    /// failures abort before the first request.
    pub fn warm_up(&self) -> Result<(), TemplateError> {
        for slot in TemplateSlot::ALL {
            self.get(slot, true)?;
        }
        Ok(())
    }

    /// Clear every slot atomically with respect to concurrent [`get`]s.
    ///
    /// [`get`]: Self::get
    pub fn invalidate_all(&self) {
        *self.slots.lock().unwrap() = Default::default();
        tracing::debug!("template registry invalidated");
    }

    /// Parse all source files for one slot into a fresh environment.
    fn parse_slot(&self, slot: TemplateSlot) -> Result<Environment<'static>, TemplateError> {
        let mut env = Environment::new();
        // Trusted markup; templates emit article bodies verbatim.
        env.set_auto_escape_callback(|_| AutoEscape::None);

        if slot == TemplateSlot::Blank {
            env.add_template_owned(slot.entry_point(), String::new())
                .map_err(|err| TemplateError::Parse {
                    file: slot.entry_point().to_owned(),
                    source: err,
                })?;
            return Ok(env);
        }

        for file in slot.files() {
            let path = self.templates_dir.join(file);
            let source = std::fs::read_to_string(&path).map_err(|err| TemplateError::Io {
                file: (*file).to_owned(),
                source: err,
            })?;
            env.add_template_owned(*file, source)
                .map_err(|err| TemplateError::Parse {
                    file: (*file).to_owned(),
                    source: err,
                })?;
        }
        Ok(env)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use minijinja::context;
    use pretty_assertions::assert_eq;

    use super::*;

    fn write_default_templates(dir: &Path) {
        fs::write(
            dir.join("base.html"),
            "<title>{{ title }}</title>{% block body %}{% endblock %}",
        )
        .unwrap();
        fs::write(
            dir.join("article.html"),
            "{% extends \"base.html\" %}{% block body %}{{ article.content }}{% endblock %}",
        )
        .unwrap();
        fs::write(
            dir.join("book.html"),
            "{% for a in articles %}[{{ a.identifier }}]{% endfor %}",
        )
        .unwrap();
        fs::write(dir.join("go-get.html"), "go-get {{ package_path }}").unwrap();
    }

    fn registry_with_templates() -> (tempfile::TempDir, TemplateRegistry) {
        let dir = tempfile::tempdir().unwrap();
        write_default_templates(dir.path());
        let registry = TemplateRegistry::new(dir.path().to_path_buf());
        (dir, registry)
    }

    fn render_article(registry: &TemplateRegistry, allow_cache: bool) -> String {
        let ctx = context! {
            title => "T",
            article => context! { content => "<p>body</p>" },
        };
        let bytes = registry
            .render(TemplateSlot::ArticlePage, allow_cache, &ctx)
            .unwrap();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn renders_article_slot_without_escaping_content() {
        let (_dir, registry) = registry_with_templates();

        let html = render_article(&registry, true);
        assert_eq!(html, "<title>T</title><p>body</p>");
    }

    #[test]
    fn cached_slot_ignores_source_edits() {
        let (dir, registry) = registry_with_templates();
        render_article(&registry, true);

        fs::write(dir.path().join("base.html"), "edited {% block body %}{% endblock %}").unwrap();

        assert_eq!(render_article(&registry, true), "<title>T</title><p>body</p>");
    }

    #[test]
    fn uncached_get_reparses_from_disk() {
        let (dir, registry) = registry_with_templates();
        render_article(&registry, false);

        fs::write(
            dir.path().join("base.html"),
            "edited {% block body %}{% endblock %}",
        )
        .unwrap();

        assert_eq!(render_article(&registry, false), "edited <p>body</p>");
    }

    #[test]
    fn invalidate_all_forces_reparse_of_cached_slots() {
        let (dir, registry) = registry_with_templates();
        render_article(&registry, true);

        fs::write(
            dir.path().join("base.html"),
            "fresh {% block body %}{% endblock %}",
        )
        .unwrap();
        registry.invalidate_all();

        assert_eq!(render_article(&registry, true), "fresh <p>body</p>");
    }

    #[test]
    fn missing_source_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let registry = TemplateRegistry::new(dir.path().to_path_buf());

        let err = registry.get(TemplateSlot::ArticlePage, true).unwrap_err();
        assert!(matches!(err, TemplateError::Io { file, .. } if file == "base.html"));
    }

    #[test]
    fn broken_source_is_parse_error() {
        let (dir, registry) = registry_with_templates();
        fs::write(dir.path().join("book.html"), "{% for broken %}").unwrap();

        let err = registry.get(TemplateSlot::PrintBookPage, true).unwrap_err();
        assert!(matches!(err, TemplateError::Parse { file, .. } if file == "book.html"));
    }

    #[test]
    fn blank_slot_renders_empty_output() {
        let dir = tempfile::tempdir().unwrap();
        let registry = TemplateRegistry::new(dir.path().to_path_buf());

        let bytes = registry
            .render(TemplateSlot::Blank, true, &context! {})
            .unwrap();
        assert!(bytes.is_empty());
    }

    #[test]
    fn warm_up_parses_every_slot() {
        let (_dir, registry) = registry_with_templates();
        registry.warm_up().unwrap();

        // All slots cached now; a render must not touch the (unchanged) disk.
        assert_eq!(render_article(&registry, true), "<title>T</title><p>body</p>");
    }

    #[test]
    fn warm_up_fails_without_template_files() {
        let dir = tempfile::tempdir().unwrap();
        let registry = TemplateRegistry::new(dir.path().to_path_buf());

        assert!(registry.warm_up().is_err());
    }

    #[test]
    fn book_slot_renders_article_sequence() {
        let (_dir, registry) = registry_with_templates();
        let ctx = context! {
            articles => vec![
                context! { identifier => "101" },
                context! { identifier => "a" },
            ],
        };

        let bytes = registry
            .render(TemplateSlot::PrintBookPage, true, &ctx)
            .unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), "[101][a]");
    }
}
