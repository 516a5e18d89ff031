//! Error taxonomy for the retrieval client.
//!
//! Every failure a fetch can produce is one of these variants, so callers can
//! react per category (re-prompt for a key, reject the URL, surface the
//! upstream message) instead of string-matching. Errors are terminal for the
//! triggering operation; nothing here retries.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    /// The input did not match any recognized YouTube video URL shape.
    #[error("not a recognized YouTube video URL")]
    InvalidUrl,

    /// No API key was supplied. Checked before any network I/O.
    #[error("no API key was provided")]
    MissingCredential,

    /// The upstream service rejected the API key. Callers should prompt for
    /// re-entry rather than retry.
    #[error("the YouTube Data API rejected the API key")]
    InvalidCredential,

    /// The metadata lookup returned an empty result set.
    #[error("video not found")]
    VideoNotFound,

    /// Any other non-success outcome, carrying the upstream or transport
    /// message verbatim.
    #[error("upstream request failed: {message}")]
    Upstream { message: String },

    /// A success response whose body did not match the expected schema.
    #[error("unexpected response from the YouTube Data API")]
    Unknown,
}

impl FetchError {
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::Upstream {
            message: message.into(),
        }
    }
}
