//! Printable book assembly.
//!
//! A book is built from one root article: its index block (between two
//! literal comment markers) becomes the synthetic root entry, lines flagged
//! for removal are dropped, and every index anchor in the root content is
//! resolved to a further article, in document order.

use crate::article::{Article, extract_article};
use crate::error::ContentError;
use crate::source::ArticleSource;

/// Start of the index block inside the root article.
const INDEX_START: &str = "<!-- index starts (don't remove) -->";
/// End of the index block; optional, content runs to the end without it.
const INDEX_END: &str = "<!-- index ends (don't remove) -->";
/// Per-line flag excluding a line from the assembled book.
const REMOVAL_TAG: &str = "(to remove)";
/// Opening of an index anchor whose href names a linked article.
const ANCHOR_OPEN: &str = r#"<li><a class="index" href=""#;
/// Terminator of the anchor href attribute.
const ANCHOR_CLOSE: &str = r#"">"#;

/// Upper bound on removal passes and anchor matches. The scan loops shrink
/// their input every iteration and terminate on their own; the cap only
/// guards pathological content, and hitting it is logged rather than
/// silently stopping.
const SCAN_LIMIT: usize = 1000;

/// Assemble the ordered article sequence for the printable book rooted at
/// `root_file`.
///
/// The result starts with a synthetic root article (the cleaned index block
/// under the root's identifier) followed by every successfully resolved
/// linked article. Individual link failures are logged and skipped; a
/// missing index start marker is [`ContentError::IndexMarkersMissing`].
pub fn assemble_book(
    source: &dyn ArticleSource,
    root_file: &str,
) -> Result<Vec<Article>, ContentError> {
    let root = extract_article(source, root_file)?;
    let index = index_block(&root)?;

    let mut articles = Vec::with_capacity(64);
    articles.push(Article {
        content: remove_flagged_lines(index),
        title: root.title.clone(),
        title_without_tags: root.title_without_tags.clone(),
        identifier: root.identifier.clone(),
    });

    // Anchors are scanned over the original root content, not the cleaned
    // index block, so a flagged line cannot hide a link target.
    for target in index_links(&root.content) {
        match extract_article(source, target) {
            Ok(article) => articles.push(article),
            Err(err) => {
                tracing::warn!(link = %target, error = %err, "skipping unresolvable book link");
            }
        }
    }

    Ok(articles)
}

/// Slice the index block out of the root article's content.
fn index_block(root: &Article) -> Result<&str, ContentError> {
    let start = root
        .content
        .find(INDEX_START)
        .ok_or_else(|| ContentError::IndexMarkersMissing(root.identifier.clone()))?;
    let body = &root.content[start + INDEX_START.len()..];
    Ok(match body.find(INDEX_END) {
        Some(end) => &body[..end],
        None => body,
    })
}

/// Drop every line containing [`REMOVAL_TAG`].
///
/// Each pass removes the text from the line terminator preceding the tag
/// (exclusive) through the tag's line, keeping the terminator that follows.
/// The unscanned suffix strictly shrinks every pass.
fn remove_flagged_lines(block: &str) -> String {
    let mut out = String::with_capacity(block.len());
    let mut rest = block;
    let mut passes = 0;

    while let Some(at) = rest.find(REMOVAL_TAG) {
        if passes == SCAN_LIMIT {
            tracing::warn!(
                limit = SCAN_LIMIT,
                "removal pass limit reached, remaining flagged lines kept"
            );
            break;
        }
        passes += 1;

        if let Some(line_start) = rest[..at].rfind('\n') {
            out.push_str(&rest[..line_start]);
        }
        rest = match rest[at..].find('\n') {
            Some(nl) => &rest[at + nl..],
            None => "",
        };
    }

    out.push_str(rest);
    out
}

/// Collect anchor href targets from the root content, in document order.
fn index_links(content: &str) -> Vec<&str> {
    let mut targets = Vec::new();
    let mut rest = content;

    while let Some(at) = rest.find(ANCHOR_OPEN) {
        if targets.len() == SCAN_LIMIT {
            tracing::warn!(limit = SCAN_LIMIT, "anchor scan limit reached, remaining links ignored");
            break;
        }

        rest = &rest[at + ANCHOR_OPEN.len()..];
        let Some(end) = rest.find(ANCHOR_CLOSE) else {
            break;
        };
        targets.push(&rest[..end]);
        rest = &rest[end + ANCHOR_CLOSE.len()..];
    }

    targets
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::source::MemorySource;

    fn root_with_index(index_body: &str) -> String {
        format!(
            "<h1>Book</h1>intro\n{INDEX_START}{index_body}{INDEX_END}\ntrailer"
        )
    }

    #[test]
    fn assembles_root_and_linked_articles_in_order() {
        let index = concat!(
            "\n<li><a class=\"index\" href=\"a.html\">A</a></li>\n",
            "<li>skip me (to remove)</li>\n",
            "<li><a class=\"index\" href=\"b.html\">B</a></li>\n",
        );
        let source = MemorySource::from_iter([
            ("101.html", root_with_index(index)),
            ("a.html", "<h1>A</h1>body a".to_owned()),
            ("b.html", "<h1>B</h1>body b".to_owned()),
        ]);

        let book = assemble_book(&source, "101.html").unwrap();

        assert_eq!(book.len(), 3);
        assert_eq!(book[0].identifier, "101");
        assert!(!book[0].content.contains("(to remove)"));
        assert_eq!(book[1].identifier, "a");
        assert_eq!(book[1].content, "body a");
        assert_eq!(book[2].identifier, "b");
    }

    #[test]
    fn synthetic_root_keeps_title_and_scopes_content_to_index_block() {
        let source = MemorySource::from_iter([(
            "101.html",
            root_with_index("\n<li>entry</li>\n"),
        )]);

        let book = assemble_book(&source, "101.html").unwrap();

        assert_eq!(book[0].title_without_tags, "Book");
        assert!(book[0].content.contains("<li>entry</li>"));
        assert!(!book[0].content.contains("intro"));
        assert!(!book[0].content.contains("trailer"));
    }

    #[test]
    fn missing_start_marker_is_configuration_error() {
        let source = MemorySource::from_iter([("101.html", "<h1>Book</h1>no markers here")]);

        let err = assemble_book(&source, "101.html").unwrap_err();
        assert!(matches!(err, ContentError::IndexMarkersMissing(id) if id == "101"));
    }

    #[test]
    fn missing_end_marker_takes_everything_to_content_end() {
        let raw = format!("<h1>Book</h1>{INDEX_START}\n<li>a</li>\n<li>b</li>");
        let source = MemorySource::from_iter([("101.html", raw)]);

        let book = assemble_book(&source, "101.html").unwrap();
        assert!(book[0].content.contains("<li>b</li>"));
    }

    #[test]
    fn unresolvable_links_are_skipped_not_fatal() {
        let index = concat!(
            "\n<li><a class=\"index\" href=\"ghost.html\">G</a></li>\n",
            "<li><a class=\"index\" href=\"real.html\">R</a></li>\n",
        );
        let source = MemorySource::from_iter([
            ("101.html", root_with_index(index)),
            ("real.html", "<h1>R</h1>real".to_owned()),
        ]);

        let book = assemble_book(&source, "101.html").unwrap();

        assert_eq!(book.len(), 2);
        assert_eq!(book[1].identifier, "real");
    }

    #[test]
    fn removes_each_flagged_line_and_preserves_order() {
        let block = "keep1\ndrop (to remove)\nkeep2\nalso drop (to remove)\nkeep3";
        assert_eq!(remove_flagged_lines(block), "keep1\nkeep2\nkeep3");
    }

    #[test]
    fn flagged_first_line_without_preceding_terminator() {
        assert_eq!(remove_flagged_lines("drop (to remove)\nkeep"), "\nkeep");
    }

    #[test]
    fn flagged_last_line_without_following_terminator() {
        assert_eq!(remove_flagged_lines("keep\ndrop (to remove)"), "keep");
    }

    #[test]
    fn block_without_flags_is_unchanged() {
        let block = "a\nb\nc";
        assert_eq!(remove_flagged_lines(block), block);
    }

    #[test]
    fn index_links_in_document_order() {
        let content = concat!(
            "<li><a class=\"index\" href=\"one.html\">1</a></li>",
            "<p>noise</p>",
            "<li><a class=\"index\" href=\"two.html\">2</a></li>",
        );
        assert_eq!(index_links(content), vec!["one.html", "two.html"]);
    }

    #[test]
    fn unterminated_anchor_stops_the_scan() {
        let content = "<li><a class=\"index\" href=\"broken";
        assert!(index_links(content).is_empty());
    }
}
