//! Session-scoped aggregation state.
//!
//! A `CommentSession` owns the accumulated comments, the pagination cursor,
//! the total-count hint, and the active filter parameters for one video.
//! It is an explicit state object passed by the caller, never a global, so
//! merge and filter behavior stays unit-testable without any UI.
//!
//! Invariants: the comment sequence only grows within a session; the cursor
//! and total are replaced wholesale on each merge; completions tagged with a
//! different video id than the current session are discarded, so a stale
//! response from an earlier session can never overwrite newer state.

use crate::filter;
use crate::model::{Comment, CommentPage, VideoMetadata};
use crate::video_id::{VideoId, extract_video_id};

#[derive(Debug, Default)]
pub struct CommentSession {
    video_url: String,
    video_id: Option<VideoId>,
    metadata: Option<VideoMetadata>,
    comments: Vec<Comment>,
    next_page_token: Option<String>,
    total_comments: Option<u64>,
    search_term: String,
    long_only: bool,
    initial_in_flight: bool,
    load_more_in_flight: bool,
}

impl CommentSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a fresh session for `video_url`, dropping all prior state
    /// including filter settings. The parsed video id becomes the tag that
    /// completions must match.
    pub fn reset(&mut self, video_url: &str) {
        *self = Self {
            video_url: video_url.to_owned(),
            video_id: extract_video_id(video_url),
            ..Self::default()
        };
    }

    pub fn video_url(&self) -> &str {
        &self.video_url
    }

    pub fn video_id(&self) -> Option<&VideoId> {
        self.video_id.as_ref()
    }

    pub fn metadata(&self) -> Option<&VideoMetadata> {
        self.metadata.as_ref()
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn next_page_token(&self) -> Option<&str> {
        self.next_page_token.as_deref()
    }

    pub fn total_comments(&self) -> Option<u64> {
        self.total_comments
    }

    /// Marks the initial fetch as in flight. Returns false (and changes
    /// nothing) when one is already running or the session has no valid
    /// video id; re-entrant calls are dropped, not queued.
    pub fn begin_initial_fetch(&mut self) -> bool {
        if self.initial_in_flight || self.video_id.is_none() {
            return false;
        }
        self.initial_in_flight = true;
        true
    }

    /// Installs metadata and the first page wholesale. A completion tagged
    /// with a different video id is stale and gets discarded.
    pub fn complete_initial_fetch(
        &mut self,
        video_id: &VideoId,
        metadata: VideoMetadata,
        page: CommentPage,
    ) {
        self.initial_in_flight = false;
        if self.video_id.as_ref() != Some(video_id) {
            return;
        }
        self.metadata = Some(metadata);
        self.comments = page.comments;
        self.next_page_token = page.next_page_token;
        self.total_comments = page.total_comments;
    }

    /// Clears the in-flight flag after a failed initial fetch.
    pub fn fail_initial_fetch(&mut self) {
        self.initial_in_flight = false;
    }

    /// Whether a load-more could do anything at all: there must be a cursor
    /// and a valid video id, and nothing already in flight.
    pub fn can_load_more(&self) -> bool {
        !self.load_more_in_flight && self.video_id.is_some() && self.next_page_token.is_some()
    }

    /// Marks a load-more as in flight. A second request while one is running
    /// is ignored rather than queued or raced.
    pub fn begin_load_more(&mut self) -> bool {
        if !self.can_load_more() {
            return false;
        }
        self.load_more_in_flight = true;
        true
    }

    /// Appends a fetched page: comments are concatenated in order (no dedup
    /// by design), cursor and total are replaced wholesale. Stale completions
    /// from another session are discarded.
    pub fn complete_load_more(&mut self, video_id: &VideoId, page: CommentPage) {
        self.load_more_in_flight = false;
        if self.video_id.as_ref() != Some(video_id) {
            return;
        }
        self.comments.extend(page.comments);
        self.next_page_token = page.next_page_token;
        self.total_comments = page.total_comments;
    }

    /// Clears the in-flight flag after a failed load-more. Previously loaded
    /// comments are untouched.
    pub fn fail_load_more(&mut self) {
        self.load_more_in_flight = false;
    }

    pub fn set_search_term(&mut self, term: &str) {
        self.search_term = term.to_owned();
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn set_long_only(&mut self, long_only: bool) {
        self.long_only = long_only;
    }

    pub fn long_only(&self) -> bool {
        self.long_only
    }

    /// The ordered filtered view under the current filter parameters,
    /// re-derived from scratch on every call.
    pub fn filtered(&self) -> Vec<&Comment> {
        filter::filter_comments(&self.comments, &self.search_term, self.long_only)
    }
}
