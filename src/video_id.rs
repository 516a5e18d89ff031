//! Video id extraction from user-supplied URL strings.
//!
//! YouTube exposes the same 11-character id through many URL shapes: the
//! standard `watch?v=` query, the `youtu.be` shortener, embed/legacy paths,
//! shorts and live pages, and channel-style paths that end in the id. We
//! accept all of them and nothing else; inputs that do not resolve to a
//! syntactically valid id yield `None`.

use url::Url;

pub const VIDEO_ID_LEN: usize = 11;

/// Path prefixes that carry the video id directly after them.
const VIDEO_PATH_PREFIXES: &[&str] = &["/watch/", "/shorts/", "/live/", "/embed/", "/v/", "/e/"];

/// An 11-character YouTube video id, validated on construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoId(String);

impl VideoId {
    /// Accepts exactly 11 characters from `[A-Za-z0-9_-]`.
    pub fn new(candidate: &str) -> Option<Self> {
        is_valid_id(candidate).then(|| Self(candidate.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for VideoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

fn is_valid_id(candidate: &str) -> bool {
    candidate.len() == VIDEO_ID_LEN
        && candidate
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Takes the first 11 characters of a path remainder and validates them, so
/// trailing path segments or junk after the id do not matter.
fn leading_id(rest: &str) -> Option<VideoId> {
    let candidate: String = rest
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .take(VIDEO_ID_LEN)
        .collect();
    VideoId::new(&candidate)
}

/// Extracts the video id from a user-supplied URL string, or returns `None`
/// when the input matches no recognized shape. Bare ids are rejected; the
/// input must look like a YouTube URL.
pub fn extract_video_id(input: &str) -> Option<VideoId> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    // Users paste URLs without a scheme often enough to tolerate it.
    let with_scheme;
    let url_str = if input.contains("://") {
        input
    } else {
        with_scheme = format!("https://{input}");
        &with_scheme
    };

    let parsed = Url::parse(url_str).ok()?;
    let host = parsed.host_str()?;

    if host == "youtu.be" {
        return leading_id(parsed.path().trim_start_matches('/'));
    }

    if !(host == "youtube.com" || host.ends_with(".youtube.com")) {
        return None;
    }

    let path = parsed.path();

    // watch?v=ID and any other shape carrying a v= query parameter.
    if let Some((_, value)) = parsed.query_pairs().find(|(k, _)| k == "v") {
        return leading_id(&value);
    }

    // Path shapes: /watch/ID, /shorts/ID, /live/ID, /embed/ID, /v/ID, /e/ID.
    for prefix in VIDEO_PATH_PREFIXES {
        if let Some(rest) = path.strip_prefix(prefix) {
            return leading_id(rest);
        }
    }

    // Channel-style paths ending in the id, e.g. /user/name/ID.
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if segments.len() >= 3 {
        return VideoId::new(segments[segments.len() - 1]);
    }

    None
}
