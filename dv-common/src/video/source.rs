//! Pasted-URL classification
//!
//! Marker order matters: the short-link host and the shorts path are checked
//! before the generic `v=` parameter, since redirect chains through a short
//! link can carry a `v=`-looking substring. `v` only counts as a query
//! parameter name, and never on a recognized social host (Facebook watch
//! links use `?v=` too).

use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::{Error, Result};

const SHORT_LINK_MARKER: &str = "youtu.be/";
const SHORTS_MARKER: &str = "shorts/";
const WATCH_PARAM: &str = "v";
const LONG_PATH_MARKERS: &[&str] = &["youtube.com/embed/", "youtube.com/live/"];

/// Where a pasted URL points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    /// `youtu.be/<id>` short link
    #[serde(rename = "youtube_link")]
    YouTubeLink,
    /// `youtube.com/shorts/<id>`
    #[serde(rename = "youtube_short")]
    YouTubeShort,
    /// `youtube.com/watch?v=<id>`
    #[serde(rename = "youtube_watch")]
    YouTubeWatch,
    /// `youtube.com/embed/<id>` or `youtube.com/live/<id>`
    #[serde(rename = "youtube_long")]
    YouTubeLong,
    /// Post on a recognized social network; no embeddable id
    SocialPost(SocialNetwork),
    Unknown,
}

impl Platform {
    /// True for every YouTube variant
    pub fn is_youtube(&self) -> bool {
        matches!(
            self,
            Platform::YouTubeLink
                | Platform::YouTubeShort
                | Platform::YouTubeWatch
                | Platform::YouTubeLong
        )
    }
}

/// Social networks whose posts are linked out rather than embedded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SocialNetwork {
    X,
    Instagram,
    #[serde(rename = "tiktok")]
    TikTok,
    Facebook,
}

impl SocialNetwork {
    /// Match a bare host (already lowercased, without `www.`-style prefixes)
    fn from_host(host: &str) -> Option<Self> {
        match host {
            "x.com" | "twitter.com" => Some(SocialNetwork::X),
            "instagram.com" => Some(SocialNetwork::Instagram),
            "tiktok.com" | "vm.tiktok.com" => Some(SocialNetwork::TikTok),
            "facebook.com" | "fb.watch" => Some(SocialNetwork::Facebook),
            _ => None,
        }
    }

    /// Human-readable network name for link labels
    pub fn display_name(&self) -> &'static str {
        match self {
            SocialNetwork::X => "X",
            SocialNetwork::Instagram => "Instagram",
            SocialNetwork::TikTok => "TikTok",
            SocialNetwork::Facebook => "Facebook",
        }
    }
}

impl std::fmt::Display for SocialNetwork {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Structured view of a pasted URL
///
/// `id` is `Some` only for YouTube platforms whose id was extracted; social
/// posts and unknown inputs never carry one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoSource {
    platform: Platform,
    id: Option<String>,
    original_url: String,
}

impl VideoSource {
    fn youtube(platform: Platform, id: &str, original_url: &str) -> Self {
        Self {
            platform,
            id: Some(id.to_string()),
            original_url: original_url.to_string(),
        }
    }

    fn without_id(platform: Platform, original_url: &str) -> Self {
        Self {
            platform,
            id: None,
            original_url: original_url.to_string(),
        }
    }

    /// Unknown source keeping the (trimmed) input for an outbound link
    pub fn unknown(original_url: &str) -> Self {
        Self::without_id(Platform::Unknown, original_url)
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn original_url(&self) -> &str {
        &self.original_url
    }
}

/// Classify a pasted URL
///
/// Never fails: anything that cannot be classified becomes
/// [`Platform::Unknown`] with the input preserved.
pub fn resolve(url: &str) -> VideoSource {
    let url = url.trim();
    if url.is_empty() {
        return VideoSource::unknown("");
    }

    match classify(url) {
        Ok(source) => source,
        Err(e) => {
            debug!("{}", e);
            VideoSource::unknown(url)
        }
    }
}

fn classify(url: &str) -> Result<VideoSource> {
    if let Some(rest) = after_marker(url, SHORT_LINK_MARKER) {
        return youtube_from_segment(Platform::YouTubeLink, rest, url);
    }

    if let Some(rest) = after_marker(url, SHORTS_MARKER) {
        return youtube_from_segment(Platform::YouTubeShort, rest, url);
    }

    let social = social_network(url);

    if social.is_none() {
        if let Some(id) = watch_param(url) {
            return validated_id(id, url)
                .map(|id| VideoSource::youtube(Platform::YouTubeWatch, id, url));
        }
    }

    for marker in LONG_PATH_MARKERS {
        if let Some(rest) = after_marker(url, marker) {
            return youtube_from_segment(Platform::YouTubeLong, rest, url);
        }
    }

    if let Some(network) = social {
        return Ok(VideoSource::without_id(Platform::SocialPost(network), url));
    }

    Err(Error::UnrecognizedSource(url.to_string()))
}

/// Everything after the first occurrence of `marker`
fn after_marker<'a>(url: &'a str, marker: &str) -> Option<&'a str> {
    url.find(marker).map(|pos| &url[pos + marker.len()..])
}

/// Value of the `v` query parameter, up to the next `&` or `#`
fn watch_param(url: &str) -> Option<&str> {
    let (_, query) = url.split_once('?')?;
    let query = query.split('#').next().unwrap_or_default();
    query
        .split('&')
        .find_map(|pair| pair.strip_prefix(WATCH_PARAM)?.strip_prefix('='))
}

fn youtube_from_segment(platform: Platform, rest: &str, url: &str) -> Result<VideoSource> {
    let segment = rest.split(['/', '?', '&', '#']).next().unwrap_or_default();
    validated_id(segment, url).map(|id| VideoSource::youtube(platform, id, url))
}

fn validated_id<'a>(id: &'a str, url: &str) -> Result<&'a str> {
    let valid = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

    if valid {
        Ok(id)
    } else {
        Err(Error::UnrecognizedSource(format!(
            "no usable video id in {}",
            url
        )))
    }
}

fn social_network(url: &str) -> Option<SocialNetwork> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?.to_ascii_lowercase();
    let bare = ["www.", "mobile.", "m."]
        .iter()
        .find_map(|prefix| host.strip_prefix(prefix))
        .unwrap_or(host.as_str());
    SocialNetwork::from_host(bare)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_is_unknown() {
        for input in ["", "   ", "\n"] {
            let source = resolve(input);
            assert_eq!(source.platform(), Platform::Unknown);
            assert_eq!(source.id(), None);
            assert_eq!(source.original_url(), "");
        }
    }

    #[test]
    fn test_short_link_strips_query() {
        let source = resolve("https://youtu.be/abc123?x=1");
        assert_eq!(source.platform(), Platform::YouTubeLink);
        assert_eq!(source.id(), Some("abc123"));
        assert_eq!(source.original_url(), "https://youtu.be/abc123?x=1");
    }

    #[test]
    fn test_shorts_path() {
        let source = resolve("https://www.youtube.com/shorts/s97VTmWW8uU");
        assert_eq!(source.platform(), Platform::YouTubeShort);
        assert_eq!(source.id(), Some("s97VTmWW8uU"));

        let source = resolve("https://youtube.com/shorts/RQhwNwBKOSM?feature=share");
        assert_eq!(source.id(), Some("RQhwNwBKOSM"));
    }

    #[test]
    fn test_watch_param_stops_at_ampersand() {
        let source = resolve("https://www.youtube.com/watch?v=XYZ&t=5");
        assert_eq!(source.platform(), Platform::YouTubeWatch);
        assert_eq!(source.id(), Some("XYZ"));

        let source = resolve("https://www.youtube.com/watch?feature=share&v=oVif9j-DyrQ#t=3");
        assert_eq!(source.platform(), Platform::YouTubeWatch);
        assert_eq!(source.id(), Some("oVif9j-DyrQ"));
    }

    #[test]
    fn test_v_suffix_in_other_params_is_not_watch() {
        for url in [
            "https://example.com/page?nav=main",
            "https://vimeo.com/123?rev=2",
            "https://example.com/dev=1/page",
        ] {
            let source = resolve(url);
            assert_eq!(source.platform(), Platform::Unknown, "{}", url);
            assert_eq!(source.id(), None);
        }
    }

    #[test]
    fn test_facebook_watch_link_is_social() {
        let source = resolve("https://www.facebook.com/watch/?v=1234567890");
        assert_eq!(
            source.platform(),
            Platform::SocialPost(SocialNetwork::Facebook)
        );
        assert_eq!(source.id(), None);
    }

    #[test]
    fn test_short_link_wins_over_watch_param() {
        let source = resolve("https://youtu.be/abc123?redirect=watch%3Fv=other");
        assert_eq!(source.platform(), Platform::YouTubeLink);
        assert_eq!(source.id(), Some("abc123"));
    }

    #[test]
    fn test_embed_and_live_paths() {
        let source = resolve("https://www.youtube.com/embed/oVif9j-DyrQ");
        assert_eq!(source.platform(), Platform::YouTubeLong);
        assert_eq!(source.id(), Some("oVif9j-DyrQ"));

        let source = resolve("https://www.youtube.com/live/GmuX2Q4SbyU?si=abc");
        assert_eq!(source.platform(), Platform::YouTubeLong);
        assert_eq!(source.id(), Some("GmuX2Q4SbyU"));
    }

    #[test]
    fn test_social_post_has_no_id() {
        let source = resolve("https://x.com/user/status/123");
        assert_eq!(source.platform(), Platform::SocialPost(SocialNetwork::X));
        assert_eq!(source.id(), None);
        assert_eq!(source.original_url(), "https://x.com/user/status/123");

        let source = resolve("https://www.instagram.com/p/Cabc/");
        assert_eq!(
            source.platform(),
            Platform::SocialPost(SocialNetwork::Instagram)
        );
    }

    #[test]
    fn test_status_link_is_not_youtube() {
        // x.com status links must never be taken for a YouTube id
        let source = resolve("https://twitter.com/FNCompetitive/status/1790000000000000000");
        assert!(!source.platform().is_youtube());
    }

    #[test]
    fn test_lookalike_host_is_unknown() {
        let source = resolve("https://netflix.com/title/123");
        assert_eq!(source.platform(), Platform::Unknown);
        assert_eq!(source.original_url(), "https://netflix.com/title/123");
    }

    #[test]
    fn test_missing_or_invalid_id_degrades() {
        let source = resolve("https://youtu.be/");
        assert_eq!(source.platform(), Platform::Unknown);
        assert_eq!(source.id(), None);
        assert_eq!(source.original_url(), "https://youtu.be/");

        let source = resolve("https://www.youtube.com/watch?v=<script>");
        assert_eq!(source.platform(), Platform::Unknown);
    }

    #[test]
    fn test_garbage_is_unknown() {
        let source = resolve("not a url at all");
        assert_eq!(source.platform(), Platform::Unknown);
        assert_eq!(source.original_url(), "not a url at all");
    }
}
