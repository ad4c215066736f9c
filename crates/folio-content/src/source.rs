//! Article source abstraction.
//!
//! Decouples extraction and book assembly from where fragments live. The
//! server uses [`FsSource`] over the articles directory; tests use
//! [`MemorySource`] to avoid the filesystem entirely.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;

use crate::error::ContentError;

/// Read access to raw article fragments.
///
/// Implementations map a fragment file name (e.g. `"101.html"`) to its raw
/// markup. A missing fragment is [`ContentError::NotFound`]; every other
/// failure is surfaced as [`ContentError::Io`].
pub trait ArticleSource: Send + Sync {
    /// Read one fragment's raw markup.
    fn read(&self, file: &str) -> Result<String, ContentError>;

    /// Check whether a fragment exists without reading it.
    fn exists(&self, file: &str) -> bool;
}

/// Filesystem-backed article source rooted at one directory.
#[derive(Debug)]
pub struct FsSource {
    dir: PathBuf,
}

impl FsSource {
    /// Create a source reading fragments from `dir`.
    #[must_use]
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// The directory fragments are read from.
    #[must_use]
    pub fn dir(&self) -> &std::path::Path {
        &self.dir
    }
}

impl ArticleSource for FsSource {
    fn read(&self, file: &str) -> Result<String, ContentError> {
        std::fs::read_to_string(self.dir.join(file)).map_err(|err| {
            if err.kind() == ErrorKind::NotFound {
                ContentError::NotFound(file.to_owned())
            } else {
                ContentError::Io {
                    file: file.to_owned(),
                    source: err,
                }
            }
        })
    }

    fn exists(&self, file: &str) -> bool {
        self.dir.join(file).is_file()
    }
}

/// In-memory article source for tests and fixtures.
#[derive(Debug, Default)]
pub struct MemorySource {
    fragments: HashMap<String, String>,
}

impl MemorySource {
    /// Create an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a fragment.
    pub fn insert(&mut self, file: impl Into<String>, markup: impl Into<String>) {
        self.fragments.insert(file.into(), markup.into());
    }
}

impl<F: Into<String>, M: Into<String>> FromIterator<(F, M)> for MemorySource {
    fn from_iter<I: IntoIterator<Item = (F, M)>>(iter: I) -> Self {
        Self {
            fragments: iter
                .into_iter()
                .map(|(f, m)| (f.into(), m.into()))
                .collect(),
        }
    }
}

impl ArticleSource for MemorySource {
    fn read(&self, file: &str) -> Result<String, ContentError> {
        self.fragments
            .get(file)
            .cloned()
            .ok_or_else(|| ContentError::NotFound(file.to_owned()))
    }

    fn exists(&self, file: &str) -> bool {
        self.fragments.contains_key(file)
    }
}
