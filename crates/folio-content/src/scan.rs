//! Low-level text scanning helpers.
//!
//! Titles are cleaned by a deliberately naive two-state automaton over the
//! literal characters `<` and `>`. It does not understand attribute values or
//! comments; article fragments are trusted, hand-authored markup.

/// Scanner state for [`strip_tags`].
#[derive(Clone, Copy, PartialEq, Eq)]
enum TagState {
    /// Between tags; characters are copied to the output.
    Outside,
    /// Inside a tag; characters are discarded.
    Inside,
}

/// Remove tag markers from a title string.
///
/// Runs a two-state automaton over the input: `<` switches to the in-tag
/// state, `>` switches back out, and only characters seen outside a tag are
/// kept. Idempotent on tagless input.
#[must_use]
pub fn strip_tags(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut state = TagState::Outside;
    for ch in input.chars() {
        match state {
            TagState::Outside if ch == '<' => state = TagState::Inside,
            TagState::Outside => out.push(ch),
            TagState::Inside if ch == '>' => state = TagState::Outside,
            TagState::Inside => {}
        }
    }
    out
}

/// Find `needle` in `haystack`, accepting only matches that fit entirely
/// within the first `window` bytes.
#[must_use]
pub(crate) fn find_within(haystack: &str, needle: &str, window: usize) -> Option<usize> {
    haystack
        .find(needle)
        .filter(|&at| at + needle.len() <= window)
}
