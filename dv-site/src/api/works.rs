//! Portfolio endpoints
//!
//! The catalogue is resolved on every request; it is small and static.

use axum::{
    extract::Query,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use dv_common::content::{self, Page, ResolvedWork, WorkCategory};
use dv_common::video::{self, EmbedDescriptor, EmbedKind, VideoSource};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

/// Longest URL accepted by `/api/resolve`
pub const MAX_URL_LEN: usize = 2048;

/// A catalogue entry with its inline-preview URIs
#[derive(Debug, Serialize)]
pub struct WorkView {
    #[serde(flatten)]
    pub work: ResolvedWork,
    /// Muted, paused, looping preview for the card
    pub preview_uri: Option<String>,
    /// Same preview, autoplaying while the card is hovered
    pub hover_uri: Option<String>,
}

impl From<ResolvedWork> for WorkView {
    fn from(work: ResolvedWork) -> Self {
        Self {
            preview_uri: preview_uri(&work.embed, false),
            hover_uri: preview_uri(&work.embed, true),
            work,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SectionView {
    pub category: WorkCategory,
    pub name: &'static str,
    pub works: Vec<WorkView>,
}

#[derive(Debug, Serialize)]
pub struct PageView {
    pub slug: &'static str,
    pub title: &'static str,
}

/// Response for GET /api/works
#[derive(Debug, Serialize)]
pub struct WorksResponse {
    pub pages: Vec<PageView>,
    pub featured: Vec<WorkView>,
    pub sections: Vec<SectionView>,
}

/// Embed URI with preview parameters, for playable descriptors only
pub fn preview_uri(embed: &EmbedDescriptor, autoplay: bool) -> Option<String> {
    if embed.kind != EmbedKind::Playable {
        return None;
    }
    embed.uri.as_ref().map(|uri| {
        format!(
            "{}?autoplay={}&mute=1&controls=0&loop=1",
            uri,
            if autoplay { 1 } else { 0 }
        )
    })
}

/// GET /api/works
pub async fn get_works() -> Json<WorksResponse> {
    let sections = content::resolved_sections()
        .into_iter()
        .map(|section| SectionView {
            category: section.category,
            name: section.name,
            works: section.works.into_iter().map(WorkView::from).collect(),
        })
        .collect();

    Json(WorksResponse {
        pages: Page::all()
            .iter()
            .map(|page| PageView {
                slug: page.slug(),
                title: page.title(),
            })
            .collect(),
        featured: content::resolved_featured()
            .into_iter()
            .map(WorkView::from)
            .collect(),
        sections,
    })
}

#[derive(Debug, Deserialize)]
pub struct ResolveQuery {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub title: Option<String>,
}

/// Response for GET /api/resolve
#[derive(Debug, Serialize)]
pub struct ResolveResponse {
    pub source: VideoSource,
    pub embed: EmbedDescriptor,
    pub preview_uri: Option<String>,
}

/// GET /api/resolve?url=..&title=..
///
/// Classifies an arbitrary pasted URL and returns how it would render.
pub async fn resolve_url(Query(query): Query<ResolveQuery>) -> Response {
    if query.url.len() > MAX_URL_LEN {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": format!("url exceeds {} bytes", MAX_URL_LEN)
            })),
        )
            .into_response();
    }

    let source = video::resolve(&query.url);
    let embed = video::build(&source, query.title.as_deref().unwrap_or_default());
    debug!("Resolved {:?} as {:?}", query.url, source.platform());

    Json(ResolveResponse {
        preview_uri: preview_uri(&embed, false),
        source,
        embed,
    })
    .into_response()
}
