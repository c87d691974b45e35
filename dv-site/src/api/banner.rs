//! Consent banner settings for the page shell

use axum::{extract::State, response::Json};
use dv_common::audio::Tone;
use dv_common::consent::CONSENT_KEY;
use serde::Serialize;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct BannerSettings {
    pub consent_key: &'static str,
    pub close_delay_ms: u64,
    pub frame_interval_ms: u64,
    pub notify_tone: Tone,
    pub click_tone: Tone,
}

/// GET /api/banner
pub async fn get_banner_settings(State(state): State<AppState>) -> Json<BannerSettings> {
    let config = &state.config;
    Json(BannerSettings {
        consent_key: CONSENT_KEY,
        close_delay_ms: config.banner.close_delay_ms,
        frame_interval_ms: config.banner.frame_interval_ms,
        notify_tone: config.audio.notify,
        click_tone: config.audio.click,
    })
}
