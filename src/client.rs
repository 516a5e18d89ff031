//! Retrieval client for the YouTube Data API v3.
//!
//! Translates a (video URL, API key, optional cursor) tuple into one
//! normalized page of data or a typed `FetchError`. Responses are decoded
//! into explicit serde structs at this boundary; shape mismatches become
//! errors instead of panics, and the API key never appears in any message.

use std::time::Duration;

use serde::Deserialize;

use crate::error::FetchError;
use crate::model::{Comment, CommentPage, VideoMetadata};
use crate::video_id::{VideoId, extract_video_id};

pub const DEFAULT_API_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

/// Fixed page size for comment thread listings.
pub const COMMENTS_PAGE_SIZE: u32 = 100;

/// Comments are requested in the service's relevance order, which is also the
/// order the aggregation state preserves.
const COMMENTS_ORDER: &str = "relevance";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const READ_TIMEOUT: Duration = Duration::from_secs(30);

/// Blocking HTTP client for the comment and metadata endpoints.
pub struct CommentClient {
    agent: ureq::Agent,
    base_url: String,
}

impl CommentClient {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_API_BASE_URL)
    }

    /// Points the client at a different base URL. Used by configuration
    /// overrides and by tests that stand in for the real service.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(CONNECT_TIMEOUT)
            .timeout_read(READ_TIMEOUT)
            .build();
        Self {
            agent,
            base_url: base_url.into(),
        }
    }

    /// Fetches video metadata and the first comment page.
    ///
    /// A video with comments disabled is not an error: the result is the
    /// metadata plus an empty page with no cursor.
    pub fn fetch_initial_page(
        &self,
        video_url: &str,
        api_key: &str,
    ) -> Result<(VideoId, VideoMetadata, CommentPage), FetchError> {
        let video_id = validate_inputs(video_url, api_key)?;
        let metadata = self.video_metadata(&video_id, api_key)?;
        let page = match self.list_comment_threads(&video_id, api_key, None)? {
            ThreadsOutcome::Page(page) => page,
            ThreadsOutcome::Disabled => CommentPage::default(),
        };
        Ok((video_id, metadata, page))
    }

    /// Fetches a continuation page using the supplied cursor.
    ///
    /// Metadata is deliberately absent here: continuation calls must not
    /// imply a metadata refresh. A cursor implies comments exist, so the
    /// disabled condition is reported as an upstream error like any other.
    pub fn fetch_next_page(
        &self,
        video_url: &str,
        api_key: &str,
        cursor: &str,
    ) -> Result<(VideoId, CommentPage), FetchError> {
        let video_id = validate_inputs(video_url, api_key)?;
        let page = match self.list_comment_threads(&video_id, api_key, Some(cursor))? {
            ThreadsOutcome::Page(page) => page,
            ThreadsOutcome::Disabled => {
                return Err(FetchError::upstream("comments are disabled for this video"));
            }
        };
        Ok((video_id, page))
    }

    fn video_metadata(
        &self,
        video_id: &VideoId,
        api_key: &str,
    ) -> Result<VideoMetadata, FetchError> {
        let url = format!("{}/videos", self.base_url);
        let response = self
            .agent
            .get(&url)
            .query("part", "snippet")
            .query("id", video_id.as_str())
            .query("key", api_key)
            .call()
            .map_err(|err| classify_request_error(err).into_fetch_error())?;

        let decoded: VideoListResponse =
            response.into_json().map_err(|_| FetchError::Unknown)?;
        let item = decoded
            .items
            .into_iter()
            .next()
            .ok_or(FetchError::VideoNotFound)?;

        Ok(VideoMetadata {
            video_title: item.snippet.title,
            thumbnail_url: item.snippet.thumbnails.best_url().unwrap_or_default(),
        })
    }

    fn list_comment_threads(
        &self,
        video_id: &VideoId,
        api_key: &str,
        cursor: Option<&str>,
    ) -> Result<ThreadsOutcome, FetchError> {
        let url = format!("{}/commentThreads", self.base_url);
        let mut request = self
            .agent
            .get(&url)
            .query("part", "snippet")
            .query("videoId", video_id.as_str())
            .query("order", COMMENTS_ORDER)
            .query("maxResults", &COMMENTS_PAGE_SIZE.to_string())
            .query("key", api_key);
        if let Some(token) = cursor {
            request = request.query("pageToken", token);
        }

        match request.call() {
            Ok(response) => {
                let decoded: CommentThreadListResponse =
                    response.into_json().map_err(|_| FetchError::Unknown)?;
                Ok(ThreadsOutcome::Page(normalize_page(decoded)))
            }
            Err(err) => {
                let failure = classify_request_error(err);
                if failure.reason.as_deref() == Some("commentsDisabled") {
                    Ok(ThreadsOutcome::Disabled)
                } else {
                    Err(failure.into_fetch_error())
                }
            }
        }
    }
}

impl Default for CommentClient {
    fn default() -> Self {
        Self::new()
    }
}

enum ThreadsOutcome {
    Page(CommentPage),
    Disabled,
}

/// URL and credential validation shared by both fetch operations. The URL is
/// checked first, then the credential, both before any network I/O.
fn validate_inputs(video_url: &str, api_key: &str) -> Result<VideoId, FetchError> {
    let video_id = extract_video_id(video_url).ok_or(FetchError::InvalidUrl)?;
    if api_key.trim().is_empty() {
        return Err(FetchError::MissingCredential);
    }
    Ok(video_id)
}

/// Upstream failure details pulled out of a non-success response body.
struct UpstreamFailure {
    reason: Option<String>,
    message: String,
}

impl UpstreamFailure {
    fn into_fetch_error(self) -> FetchError {
        if self.reason.as_deref() == Some("keyInvalid")
            || self.message.contains("API key not valid")
        {
            return FetchError::InvalidCredential;
        }
        FetchError::Upstream {
            message: self.message,
        }
    }
}

fn classify_request_error(err: ureq::Error) -> UpstreamFailure {
    match err {
        ureq::Error::Status(code, response) => match response.into_json::<ApiErrorEnvelope>() {
            Ok(envelope) => UpstreamFailure {
                reason: envelope
                    .error
                    .errors
                    .into_iter()
                    .next()
                    .map(|detail| detail.reason),
                message: envelope.error.message,
            },
            Err(_) => UpstreamFailure {
                reason: None,
                message: format!("HTTP {code}"),
            },
        },
        ureq::Error::Transport(transport) => UpstreamFailure {
            reason: None,
            message: transport.to_string(),
        },
    }
}

/// Maps one raw comment-thread listing into the normalized page shape.
fn normalize_page(response: CommentThreadListResponse) -> CommentPage {
    let comments = response
        .items
        .into_iter()
        .map(|thread| {
            let snippet = thread.snippet.top_level_comment.snippet;
            Comment {
                author: snippet.author_display_name,
                author_thumbnail: snippet.author_profile_image_url,
                text: snippet.text_display,
                likes: snippet.like_count,
                published_at: snippet.published_at,
            }
        })
        .collect();

    CommentPage {
        comments,
        next_page_token: response.next_page_token,
        total_comments: response.page_info.and_then(|info| info.total_results),
    }
}

// --- Raw wire shapes, decoded strictly at this boundary ---

#[derive(Deserialize)]
struct VideoListResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Deserialize)]
struct VideoItem {
    snippet: VideoSnippet,
}

#[derive(Deserialize)]
struct VideoSnippet {
    title: String,
    #[serde(default)]
    thumbnails: Thumbnails,
}

#[derive(Deserialize, Default)]
struct Thumbnails {
    high: Option<Thumbnail>,
    default: Option<Thumbnail>,
}

impl Thumbnails {
    /// Prefers the high-resolution thumbnail, falling back to the default.
    fn best_url(self) -> Option<String> {
        self.high
            .map(|t| t.url)
            .or_else(|| self.default.map(|t| t.url))
    }
}

#[derive(Deserialize)]
struct Thumbnail {
    url: String,
}

#[derive(Deserialize)]
struct CommentThreadListResponse {
    #[serde(default)]
    items: Vec<CommentThread>,
    #[serde(rename = "nextPageToken")]
    next_page_token: Option<String>,
    #[serde(rename = "pageInfo")]
    page_info: Option<PageInfo>,
}

#[derive(Deserialize)]
struct PageInfo {
    #[serde(rename = "totalResults")]
    total_results: Option<u64>,
}

#[derive(Deserialize)]
struct CommentThread {
    snippet: ThreadSnippet,
}

#[derive(Deserialize)]
struct ThreadSnippet {
    #[serde(rename = "topLevelComment")]
    top_level_comment: TopLevelComment,
}

#[derive(Deserialize)]
struct TopLevelComment {
    snippet: CommentSnippet,
}

#[derive(Deserialize)]
struct CommentSnippet {
    #[serde(rename = "authorDisplayName", default)]
    author_display_name: String,
    #[serde(rename = "authorProfileImageUrl")]
    author_profile_image_url: Option<String>,
    #[serde(rename = "textDisplay", default)]
    text_display: String,
    #[serde(rename = "likeCount", default)]
    like_count: u64,
    #[serde(rename = "publishedAt", default)]
    published_at: String,
}

#[derive(Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    errors: Vec<ApiErrorDetail>,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_checks_url_before_credential() {
        let err = validate_inputs("https://example.com/nope", "").unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl));
    }

    #[test]
    fn validate_rejects_blank_credential() {
        let err =
            validate_inputs("https://www.youtube.com/watch?v=dQw4w9WgXcQ", "  ").unwrap_err();
        assert!(matches!(err, FetchError::MissingCredential));
    }

    #[test]
    fn validate_passes_well_formed_inputs() {
        let id = validate_inputs("https://youtu.be/dQw4w9WgXcQ", "key").unwrap();
        assert_eq!(id.as_str(), "dQw4w9WgXcQ");
    }

    #[test]
    fn decodes_and_normalizes_comment_page() {
        let body = r#"{
            "items": [{
                "snippet": {
                    "topLevelComment": {
                        "snippet": {
                            "authorDisplayName": "A",
                            "authorProfileImageUrl": "https://example.com/a.jpg",
                            "textDisplay": "hi <b>there</b>",
                            "likeCount": 5,
                            "publishedAt": "2024-01-01T00:00:00Z"
                        }
                    }
                }
            }],
            "nextPageToken": "p2",
            "pageInfo": { "totalResults": 150 }
        }"#;

        let decoded: CommentThreadListResponse = serde_json::from_str(body).unwrap();
        let page = normalize_page(decoded);

        assert_eq!(page.comments.len(), 1);
        assert_eq!(page.comments[0].author, "A");
        assert_eq!(page.comments[0].text, "hi <b>there</b>");
        assert_eq!(page.comments[0].likes, 5);
        assert_eq!(page.next_page_token.as_deref(), Some("p2"));
        assert_eq!(page.total_comments, Some(150));
    }

    #[test]
    fn normalizes_missing_optional_fields() {
        let body = r#"{
            "items": [{
                "snippet": {
                    "topLevelComment": {
                        "snippet": { "authorDisplayName": "B", "textDisplay": "x" }
                    }
                }
            }]
        }"#;

        let decoded: CommentThreadListResponse = serde_json::from_str(body).unwrap();
        let page = normalize_page(decoded);

        assert_eq!(page.comments[0].author_thumbnail, None);
        assert_eq!(page.comments[0].likes, 0);
        assert_eq!(page.next_page_token, None);
        assert_eq!(page.total_comments, None);
    }

    #[test]
    fn metadata_prefers_high_thumbnail() {
        let body = r#"{
            "items": [{
                "snippet": {
                    "title": "T",
                    "thumbnails": {
                        "high": { "url": "https://example.com/hi.jpg" },
                        "default": { "url": "https://example.com/lo.jpg" }
                    }
                }
            }]
        }"#;
        let decoded: VideoListResponse = serde_json::from_str(body).unwrap();
        let item = decoded.items.into_iter().next().unwrap();
        assert_eq!(
            item.snippet.thumbnails.best_url().as_deref(),
            Some("https://example.com/hi.jpg")
        );
    }

    #[test]
    fn metadata_falls_back_to_default_thumbnail() {
        let body = r#"{
            "items": [{
                "snippet": {
                    "title": "T",
                    "thumbnails": { "default": { "url": "https://example.com/lo.jpg" } }
                }
            }]
        }"#;
        let decoded: VideoListResponse = serde_json::from_str(body).unwrap();
        let item = decoded.items.into_iter().next().unwrap();
        assert_eq!(
            item.snippet.thumbnails.best_url().as_deref(),
            Some("https://example.com/lo.jpg")
        );
    }

    #[test]
    fn rejected_key_maps_to_invalid_credential() {
        let failure = UpstreamFailure {
            reason: Some("keyInvalid".into()),
            message: "Bad Request".into(),
        };
        assert!(matches!(
            failure.into_fetch_error(),
            FetchError::InvalidCredential
        ));

        let failure = UpstreamFailure {
            reason: None,
            message: "API key not valid. Please pass a valid API key.".into(),
        };
        assert!(matches!(
            failure.into_fetch_error(),
            FetchError::InvalidCredential
        ));
    }

    #[test]
    fn other_failures_keep_the_upstream_message() {
        let failure = UpstreamFailure {
            reason: Some("quotaExceeded".into()),
            message: "Quota exceeded".into(),
        };
        match failure.into_fetch_error() {
            FetchError::Upstream { message } => assert_eq!(message, "Quota exceeded"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn error_envelope_exposes_reason() {
        let body = r#"{
            "error": {
                "code": 403,
                "message": "Comments are disabled.",
                "errors": [{ "reason": "commentsDisabled" }]
            }
        }"#;
        let envelope: ApiErrorEnvelope = serde_json::from_str(body).unwrap();
        assert_eq!(envelope.error.errors[0].reason, "commentsDisabled");
        assert_eq!(envelope.error.message, "Comments are disabled.");
    }
}
