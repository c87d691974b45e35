//! Theme preference endpoints

use std::collections::BTreeMap;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{AppendHeaders, IntoResponse, Json, Response},
};
use dv_common::theme::Theme;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::client_state::ClientState;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct ThemeResponse {
    pub theme: Theme,
    /// Only populated on writes
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub storage: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
pub struct ThemeUpdate {
    pub theme: String,
}

/// GET /api/theme
pub async fn get_theme(State(state): State<AppState>, headers: HeaderMap) -> Json<ThemeResponse> {
    let client = ClientState::from_headers(&headers, state.config.cookie_attributes());
    Json(ThemeResponse {
        theme: client.theme().load(),
        storage: BTreeMap::new(),
    })
}

/// PUT /api/theme
pub async fn put_theme(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(update): Json<ThemeUpdate>,
) -> Response {
    let Some(theme) = Theme::from_str(&update.theme) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": format!("Unknown theme: {}", update.theme)
            })),
        )
            .into_response();
    };

    let client = ClientState::from_headers(&headers, state.config.cookie_attributes());
    client.theme().save(theme);

    let body = ThemeResponse {
        theme,
        storage: client.storage_entries(),
    };
    (AppendHeaders(client.set_cookie_headers()), Json(body)).into_response()
}
