//! The rendering pipeline behind every content request.
//!
//! Per request: check the mode, consult the page cache, and on a miss run
//! extraction (or book assembly), render through the template registry and
//! store the result. Storing happens only in public mode; local mode always
//! recomputes so the maintainer sees edits immediately.
//!
//! Two rules keep the cache honest:
//! - only successful renders and the not-found sentinel are ever stored;
//!   template failures are returned as the page body for that one request
//!   but never written to the cache
//! - a zero-length page never exists: "not found" is an explicit sentinel,
//!   not an empty byte string

use std::sync::Arc;

use folio_cache::{Lookup, PageCache};
use folio_content::{assemble_book, extract_article};
use folio_templates::TemplateSlot;
use minijinja::context;

use crate::error::ServerError;
use crate::state::AppState;

/// Outcome of rendering one page.
#[derive(Debug)]
pub(crate) enum Rendered {
    /// Fully rendered output bytes.
    Page(Arc<[u8]>),
    /// The page is known not to exist.
    NotFound,
}

/// Render an article page, keyed by fragment file name.
pub(crate) fn article_page(state: &AppState, file: &str) -> Result<Rendered, ServerError> {
    let is_local = state.mode.current().is_local();
    if let Some(done) = cached(&state.article_pages, file) {
        return Ok(done);
    }

    let article = match extract_article(state.source.as_ref(), file) {
        Ok(article) => article,
        Err(err) if err.is_not_found() => {
            return Ok(miss(&state.article_pages, file, is_local));
        }
        Err(err) => return Err(err.into()),
    };

    let ctx = context! {
        title => article.title_without_tags,
        is_local_server => is_local,
        article => &article,
    };
    Ok(finish(
        state,
        &state.article_pages,
        file,
        TemplateSlot::ArticlePage,
        &ctx,
        is_local,
    ))
}

/// Render the printable book page for `item` (e.g. `book101`).
///
/// `print_target` distinguishes the browser print and PDF variants; it is
/// passed through to the template untouched.
pub(crate) fn print_page(
    state: &AppState,
    print_target: &str,
    item: &str,
) -> Result<Rendered, ServerError> {
    let is_local = state.mode.current().is_local();
    if let Some(done) = cached(&state.article_pages, item) {
        return Ok(done);
    }

    let Some(root_file) = state.books.get(item) else {
        return Ok(miss(&state.article_pages, item, is_local));
    };

    let articles = match assemble_book(state.source.as_ref(), root_file) {
        Ok(articles) => articles,
        Err(err) if err.is_not_found() => {
            return Ok(miss(&state.article_pages, item, is_local));
        }
        Err(err) => return Err(err.into()),
    };

    let ctx = context! {
        print_target => print_target,
        is_local_server => is_local,
        articles => &articles,
    };
    Ok(finish(
        state,
        &state.article_pages,
        item,
        TemplateSlot::PrintBookPage,
        &ctx,
        is_local,
    ))
}

/// Render a go-get vanity page, keyed by the request path.
pub(crate) fn goget_page(state: &AppState, host: &str, path: &str) -> Result<Rendered, ServerError> {
    let is_local = state.mode.current().is_local();
    if let Some(done) = cached(&state.goget_pages, path) {
        return Ok(done);
    }

    let ctx = context! {
        host => host,
        package_path => path,
        is_local_server => is_local,
    };
    Ok(finish(
        state,
        &state.goget_pages,
        path,
        TemplateSlot::GoGetPage,
        &ctx,
        is_local,
    ))
}

/// Resolve a cache lookup into an early answer, if there is one.
fn cached(cache: &PageCache, key: &str) -> Option<Rendered> {
    match cache.get(key) {
        Lookup::Hit(page) => Some(Rendered::Page(page)),
        Lookup::NotFound => Some(Rendered::NotFound),
        Lookup::Absent => None,
    }
}

/// Record a not-found result, storing the sentinel in public mode.
fn miss(cache: &PageCache, key: &str, is_local: bool) -> Rendered {
    if !is_local {
        cache.insert_not_found(key);
    }
    Rendered::NotFound
}

/// Run the template and store the result in public mode.
///
/// A template failure becomes the literal error text for this one request;
/// it is never written to the cache, so a transient failure cannot be
/// served indefinitely.
fn finish(
    state: &AppState,
    cache: &PageCache,
    key: &str,
    slot: TemplateSlot,
    ctx: &minijinja::Value,
    is_local: bool,
) -> Rendered {
    match state.templates.render(slot, !is_local, ctx) {
        Ok(page) => {
            let page: Arc<[u8]> = Arc::from(page);
            if !is_local {
                cache.insert(key, Arc::clone(&page));
            }
            Rendered::Page(page)
        }
        Err(err) => {
            tracing::error!(key = %key, error = %err, "template execution failed");
            Rendered::Page(Arc::from(err.to_string().into_bytes()))
        }
    }
}
