//! # DoubleVisuals Common Library
//!
//! Browser-boundary logic for the DoubleVisuals portfolio site:
//! - Video source resolution and embed descriptors
//! - Cookie consent persistence and the consent banner lifecycle
//! - Gesture-gated audio feedback tones
//! - Storage backends (durable key-value store, cookies)
//! - Theme preference, page list and portfolio catalogue
//! - Configuration loading

pub mod audio;
pub mod config;
pub mod consent;
pub mod content;
pub mod cookie;
pub mod error;
pub mod session;
pub mod storage;
pub mod theme;
pub mod video;

pub use error::{Error, Result};
pub use session::BrowserSession;
