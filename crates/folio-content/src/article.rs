//! Title and body extraction from raw article fragments.

use crate::error::ContentError;
use crate::scan::{find_within, strip_tags};
use crate::source::ArticleSource;

/// Opening title marker.
const TITLE_OPEN: &str = "<h1>";
/// Closing title marker.
const TITLE_CLOSE: &str = "</h1>";

/// Bounded search window for the closing title marker, in bytes after the
/// opening marker. Real titles are short; a closing marker further out than
/// this is treated as absent.
pub const TITLE_WINDOW: usize = 128;

/// One extracted unit of content.
///
/// Constructed once per extraction and immutable afterwards. `content` is
/// trusted markup and is never re-escaped downstream.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Article {
    /// Body markup remaining after title extraction.
    pub content: String,
    /// The full matched title markup including its tags, or empty when no
    /// title was found.
    pub title: String,
    /// Plain-text title with tag markers removed.
    pub title_without_tags: String,
    /// Fragment file name with the `.html` extension stripped; doubles as
    /// the cache and display key.
    pub identifier: String,
}

/// Extract an [`Article`] from one fragment.
///
/// A fragment without a well-formed `<h1>…</h1>` pair inside
/// [`TITLE_WINDOW`] is not an error: the anomaly is logged, both title
/// fields stay empty and the whole input becomes `content`. Missing files
/// surface as [`ContentError::NotFound`].
pub fn extract_article(source: &dyn ArticleSource, file: &str) -> Result<Article, ContentError> {
    let raw = source.read(file)?;
    let identifier = file.strip_suffix(".html").unwrap_or(file).to_owned();

    match locate_title(&raw) {
        Some((start, end)) => {
            let title = raw[start..end].to_owned();
            let title_without_tags = strip_tags(&title);
            Ok(Article {
                content: raw[end..].to_owned(),
                title,
                title_without_tags,
                identifier,
            })
        }
        None => {
            tracing::warn!(article = %identifier, "no title heading found");
            Ok(Article {
                content: raw,
                title: String::new(),
                title_without_tags: String::new(),
                identifier,
            })
        }
    }
}

/// Locate the byte span of the full title markup, `<h1>` through `</h1>`
/// inclusive. The closing marker must fall within [`TITLE_WINDOW`] bytes of
/// the opening marker's end.
fn locate_title(raw: &str) -> Option<(usize, usize)> {
    let start = raw.find(TITLE_OPEN)?;
    let after_open = start + TITLE_OPEN.len();
    let close = find_within(&raw[after_open..], TITLE_CLOSE, TITLE_WINDOW)?;
    Some((start, after_open + close + TITLE_CLOSE.len()))
}
