//! Normalized shapes shared across the crate.
//!
//! These structs are the boundary between the upstream JSON and everything
//! else: the client produces them, the session accumulates them, and the
//! filter/export stages consume them. Nothing downstream ever touches raw
//! API payloads.

use serde::{Deserialize, Serialize};

/// One normalized top-level comment.
///
/// The upstream service exposes no unique comment id in the fields we
/// consume, so position plus author is the de-facto identity. Callers must
/// not assume uniqueness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub author: String,
    /// Avatar URL; absent for some accounts, in which case presentation
    /// layers substitute a deterministic fallback keyed by author name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_thumbnail: Option<String>,
    /// Comment body as sanitized HTML markup, exactly as delivered by the
    /// service. Plain text is derived on demand for search and export.
    pub text: String,
    pub likes: u64,
    /// ISO-8601 timestamp string, kept verbatim.
    pub published_at: String,
}

/// Title and thumbnail for the video a session is bound to. Fetched once per
/// session and immutable thereafter; continuation pages never refresh it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoMetadata {
    pub video_title: String,
    pub thumbnail_url: String,
}

/// One page of normalized comments plus its continuation state.
///
/// The cursor reflects only this page's "next" pointer; its absence means
/// pagination is finished. `total_comments` is the service's running pool
/// count, not a per-page delta, so consumers replace it rather than sum it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentPage {
    pub comments: Vec<Comment>,
    pub next_page_token: Option<String>,
    pub total_comments: Option<u64>,
}
