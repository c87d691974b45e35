//! Cookie consent endpoints
//!
//! Both handlers read the visitor's consent from the request cookies and the
//! local-storage snapshot; see [`crate::client_state`].

use std::collections::BTreeMap;

use axum::{
    extract::State,
    http::HeaderMap,
    response::{AppendHeaders, IntoResponse, Json, Response},
};
use serde::Serialize;
use tracing::info;

use crate::client_state::ClientState;
use crate::AppState;

/// Response for GET /api/consent
#[derive(Debug, Serialize)]
pub struct ConsentStatus {
    pub accepted: bool,
    pub storage_available: bool,
}

/// Response for POST /api/consent/accept
#[derive(Debug, Serialize)]
pub struct ConsentAccepted {
    pub accepted: bool,
    /// Backends that recorded the acceptance; zero still hides the banner
    pub backends_written: usize,
    /// Local-storage entries the client should persist
    pub storage: BTreeMap<String, String>,
    /// How long the client keeps the closing animation before hiding
    pub close_delay_ms: u64,
}

/// GET /api/consent
pub async fn get_consent(State(state): State<AppState>, headers: HeaderMap) -> Json<ConsentStatus> {
    let client = ClientState::from_headers(&headers, state.config.cookie_attributes());
    Json(ConsentStatus {
        accepted: client.consent().has_accepted(),
        storage_available: client.storage_available(),
    })
}

/// POST /api/consent/accept
///
/// Always succeeds. Backends that refuse the write are skipped and the
/// response simply carries fewer writes.
pub async fn accept_consent(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let client = ClientState::from_headers(&headers, state.config.cookie_attributes());
    let backends_written = client.consent().mark_accepted();
    info!("Consent accepted ({} backends written)", backends_written);

    let body = ConsentAccepted {
        accepted: true,
        backends_written,
        storage: client.storage_entries(),
        close_delay_ms: state.config.banner.close_delay_ms,
    };

    (AppendHeaders(client.set_cookie_headers()), Json(body)).into_response()
}
