//! Pure filter pipeline over the accumulated comments.
//!
//! Filtering is always a full re-derivation from the current sequence, never
//! an incremental patch, so the result depends only on (sequence, term,
//! long_only) and stays predictable.

use crate::model::Comment;

/// Fixed threshold for the "long comments only" toggle, measured on the
/// markup-stripped text.
pub const LONG_COMMENT_MIN_CHARS: usize = 30;

/// Strips HTML markup and decodes the basic entities the service emits,
/// yielding the human-readable text used for length checks and CSV export.
pub fn strip_html(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }

    // &amp; goes last so already-decoded ampersands are not re-expanded.
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// Derives the ordered filtered view of `comments`.
///
/// The long-only cut runs first on stripped plain text; the search term then
/// matches case-insensitively against the markup-retaining text (tags count
/// toward matching) or the author. Relative order is preserved.
pub fn filter_comments<'a>(
    comments: &'a [Comment],
    search_term: &str,
    long_only: bool,
) -> Vec<&'a Comment> {
    let term = search_term.to_lowercase();
    comments
        .iter()
        .filter(|comment| {
            !long_only || strip_html(&comment.text).chars().count() >= LONG_COMMENT_MIN_CHARS
        })
        .filter(|comment| {
            term.is_empty()
                || comment.text.to_lowercase().contains(&term)
                || comment.author.to_lowercase().contains(&term)
        })
        .collect()
}
