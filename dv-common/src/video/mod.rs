//! Video source resolution and embed descriptors
//!
//! A pasted URL goes through [`resolve`] to become a [`VideoSource`], then
//! through [`build`] to become an [`EmbedDescriptor`] the page can render.
//! Both steps are pure and total: unrecognized input degrades to an
//! outbound link or a placeholder, never to an error.

pub mod embed;
pub mod source;

pub use embed::{build, EmbedDescriptor, EmbedKind, YOUTUBE_EMBED_BASE};
pub use source::{resolve, Platform, SocialNetwork, VideoSource};

/// Resolve a raw URL and build its descriptor in one step
pub fn describe(url: &str, title: &str) -> EmbedDescriptor {
    build(&resolve(url), title)
}
