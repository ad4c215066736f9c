//! In-memory rendered-page cache for the Folio documentation engine.
//!
//! A [`PageCache`] maps content keys to fully rendered output bytes. Besides
//! plain hits and misses it stores an explicit "known not to exist" sentinel,
//! so callers can distinguish "we already looked, there is no such page" from
//! "nobody has asked yet" ([`Lookup::NotFound`] vs [`Lookup::Absent`]).
//!
//! All state is memory-resident and lost on restart; invalidation happens
//! only through [`PageCache::clear`], driven by the server's mode controller.
//!
//! # Example
//!
//! ```
//! use folio_cache::{Lookup, PageCache};
//!
//! let cache = PageCache::new();
//! assert!(matches!(cache.get("101.html"), Lookup::Absent));
//!
//! cache.insert("101.html", b"<html>rendered</html>".to_vec());
//! assert!(matches!(cache.get("101.html"), Lookup::Hit(_)));
//!
//! cache.insert_not_found("ghost.html");
//! assert!(matches!(cache.get("ghost.html"), Lookup::NotFound));
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Result of a cache lookup.
#[derive(Clone, Debug)]
pub enum Lookup {
    /// Rendered output bytes stored for this key.
    Hit(Arc<[u8]>),
    /// The key was computed before and is known not to exist.
    NotFound,
    /// The key has never been computed (or the cache was cleared since).
    Absent,
}

impl Lookup {
    /// True for [`Lookup::Absent`].
    #[must_use]
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }
}

#[derive(Clone, Debug)]
enum Entry {
    Page(Arc<[u8]>),
    NotFound,
}

/// Mutex-guarded mapping from content key to rendered output.
///
/// `get`/`insert` are pure memory operations and never block on I/O. `clear`
/// swaps the backing map wholesale, so a concurrent `get` observes either the
/// fully-old or fully-new mapping, never a mix.
#[derive(Debug, Default)]
pub struct PageCache {
    pages: Mutex<HashMap<String, Entry>>,
}

impl PageCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a key.
    #[must_use]
    pub fn get(&self, key: &str) -> Lookup {
        match self.pages.lock().unwrap().get(key) {
            Some(Entry::Page(bytes)) => Lookup::Hit(Arc::clone(bytes)),
            Some(Entry::NotFound) => Lookup::NotFound,
            None => Lookup::Absent,
        }
    }

    /// Store rendered output for a key, replacing any previous entry.
    pub fn insert(&self, key: impl Into<String>, page: impl Into<Arc<[u8]>>) {
        self.pages
            .lock()
            .unwrap()
            .insert(key.into(), Entry::Page(page.into()));
    }

    /// Record that a key is known not to exist.
    pub fn insert_not_found(&self, key: impl Into<String>) {
        self.pages
            .lock()
            .unwrap()
            .insert(key.into(), Entry::NotFound);
    }

    /// Drop every entry by replacing the backing map.
    pub fn clear(&self) {
        let mut pages = self.pages.lock().unwrap();
        let dropped = pages.len();
        *pages = HashMap::new();
        drop(pages);
        tracing::debug!(entries = dropped, "page cache cleared");
    }

    /// Number of stored entries (pages and not-found sentinels).
    #[must_use]
    pub fn len(&self) -> usize {
        self.pages.lock().unwrap().len()
    }

    /// True when no entries are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
