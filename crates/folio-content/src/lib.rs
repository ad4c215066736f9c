//! Article extraction and book assembly for the Folio documentation engine.
//!
//! This crate turns raw HTML article fragments into structured [`Article`]
//! values and assembles the printable book sequence from a root article's
//! index block. It owns no caching and no HTTP concerns; callers feed it an
//! [`ArticleSource`] and get plain data back.
//!
//! # Architecture
//!
//! - [`scan`]: delimiter scanning and the tag-stripping automaton
//! - [`article`]: title/body extraction from one fragment
//! - [`book`]: index filtering and link traversal for the print book
//! - [`source`]: the [`ArticleSource`] seam (filesystem or in-memory)
//!
//! # Example
//!
//! ```
//! use folio_content::extract_article;
//! use folio_content::source::MemorySource;
//!
//! let source = MemorySource::from_iter([("intro.html", "<h1>Intro</h1><p>Body</p>")]);
//! let article = extract_article(&source, "intro.html").unwrap();
//! assert_eq!(article.title_without_tags, "Intro");
//! assert_eq!(article.content, "<p>Body</p>");
//! ```

mod article;
mod book;
mod error;
pub mod scan;
pub mod source;

pub use article::{Article, TITLE_WINDOW, extract_article};
pub use book::assemble_book;
pub use error::ContentError;
pub use source::ArticleSource;
