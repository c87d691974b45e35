//! Renderable descriptors for resolved video sources

use serde::{Deserialize, Serialize};

use super::source::{Platform, VideoSource};

/// Canonical embed endpoint; the id is appended as the final path segment
pub const YOUTUBE_EMBED_BASE: &str = "https://www.youtube.com/embed/";

const PLACEHOLDER_LABEL: &str = "Coming soon";
const GENERIC_LINK_LABEL: &str = "Open link";

/// What the page should render for a source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmbedKind {
    /// Inline player with a ready embed URI
    Playable,
    /// Outbound link with a call-to-action label
    ExternalLink,
    /// "Coming soon" tile; the work has no URL yet
    Placeholder,
}

/// Resolved, renderable form of a pasted URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedDescriptor {
    pub kind: EmbedKind,
    pub uri: Option<String>,
    pub label: String,
}

impl EmbedDescriptor {
    fn placeholder() -> Self {
        Self {
            kind: EmbedKind::Placeholder,
            uri: None,
            label: PLACEHOLDER_LABEL.to_string(),
        }
    }

    fn external(uri: &str, label: String) -> Self {
        Self {
            kind: EmbedKind::ExternalLink,
            uri: Some(uri.to_string()),
            label,
        }
    }
}

/// Map a source to exactly one descriptor
///
/// Autoplay and mute flags are deliberately absent from the embed URI; the
/// presentation layer appends whatever preview policy it wants.
pub fn build(source: &VideoSource, title: &str) -> EmbedDescriptor {
    match (source.platform(), source.id()) {
        (platform, Some(id)) if platform.is_youtube() => EmbedDescriptor {
            kind: EmbedKind::Playable,
            uri: Some(format!("{}{}", YOUTUBE_EMBED_BASE, id)),
            label: title.to_string(),
        },
        (Platform::SocialPost(network), _) => {
            EmbedDescriptor::external(source.original_url(), format!("View on {}", network))
        }
        _ if source.original_url().is_empty() => EmbedDescriptor::placeholder(),
        _ => EmbedDescriptor::external(source.original_url(), GENERIC_LINK_LABEL.to_string()),
    }
}
