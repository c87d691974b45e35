//! Integration tests for a visitor session
//!
//! Tests cover:
//! - Theme seeding from either backend and persistence on toggle
//! - Consent banner shown once per visitor across sessions
//! - Gesture-gated navigation and notification tones
//! - Serialized shape of embed descriptors consumed by the page shell

use std::sync::{Arc, Mutex};
use std::time::Duration;

use dv_common::audio::{GestureGatedAudio, InputEvent, OfflineAudio};
use dv_common::config::SiteConfig;
use dv_common::consent::{BannerPhase, CONSENT_KEY};
use dv_common::content::Page;
use dv_common::cookie::{CookieAttributes, CookieJar, CookieStore};
use dv_common::storage::{KeyValueStore, MemoryStore};
use dv_common::theme::Theme;
use dv_common::{video, BrowserSession};

struct Visitor {
    durable: Arc<MemoryStore>,
    jar: Arc<Mutex<CookieJar>>,
}

impl Visitor {
    fn new() -> Self {
        Self {
            durable: Arc::new(MemoryStore::new()),
            jar: Arc::new(Mutex::new(CookieJar::new())),
        }
    }

    fn session(&self, audio: Arc<GestureGatedAudio>) -> BrowserSession {
        let cookies = Arc::new(CookieStore::new(
            Arc::clone(&self.jar),
            CookieAttributes::default(),
        ));
        BrowserSession::new(self.durable.clone(), cookies, audio, &SiteConfig::default())
    }
}

#[test]
fn test_theme_seeded_once_and_persisted() {
    let visitor = Visitor::new();
    let mut session = visitor.session(Arc::new(GestureGatedAudio::silent()));
    assert_eq!(session.theme(), Theme::Light);

    assert_eq!(session.toggle_theme(), Theme::Dark);
    assert_eq!(visitor.durable.get("dv_theme").unwrap().as_deref(), Some("dark"));
    assert_eq!(
        visitor.jar.lock().unwrap().get("dv_theme").unwrap(),
        Some("dark")
    );

    let next = visitor.session(Arc::new(GestureGatedAudio::silent()));
    assert_eq!(next.theme(), Theme::Dark);
}

#[test]
fn test_theme_from_cookie_when_storage_cleared() {
    let jar = Arc::new(Mutex::new(CookieJar::parse("dv_theme=dark")));
    let cookies = Arc::new(CookieStore::new(jar, CookieAttributes::default()));
    let session = BrowserSession::new(
        Arc::new(MemoryStore::new()),
        cookies,
        Arc::new(GestureGatedAudio::silent()),
        &SiteConfig::default(),
    );
    assert_eq!(session.theme(), Theme::Dark);
}

#[tokio::test(start_paused = true)]
async fn test_banner_shows_once_per_visitor() {
    let visitor = Visitor::new();

    let session = visitor.session(Arc::new(GestureGatedAudio::silent()));
    assert!(!session.consent().has_accepted());

    let driver = session.mount_banner();
    let mut phases = driver.subscribe();
    phases.wait_for(|p| *p == BannerPhase::Visible).await.unwrap();
    driver.accept();
    phases.wait_for(|p| *p == BannerPhase::Closing).await.unwrap();
    phases.wait_for(|p| *p == BannerPhase::Hidden).await.unwrap();
    drop(driver);

    assert_eq!(
        visitor.durable.get(CONSENT_KEY).unwrap().as_deref(),
        Some("true")
    );
    let set_cookies = visitor.jar.lock().unwrap().drain_set_cookies();
    assert!(set_cookies
        .iter()
        .any(|c| c.header_value() == "dv_cookies_accepted=true; Max-Age=31536000; Path=/; SameSite=Lax"));

    // Next visit: banner never appears
    let session = visitor.session(Arc::new(GestureGatedAudio::silent()));
    let driver = session.mount_banner();
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(driver.phase(), BannerPhase::Hidden);
}

#[tokio::test(start_paused = true)]
async fn test_banner_survives_cleared_cookies() {
    let visitor = Visitor::new();
    visitor.durable.set(CONSENT_KEY, "true").unwrap();

    let session = visitor.session(Arc::new(GestureGatedAudio::silent()));
    let driver = session.mount_banner();
    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(driver.phase(), BannerPhase::Hidden);
}

#[tokio::test(start_paused = true)]
async fn test_remount_does_not_replay_notification() {
    let output = OfflineAudio::default();
    let audio = Arc::new(GestureGatedAudio::new(Box::new(output.clone())));
    audio.on_input(InputEvent::PointerDown);

    let visitor = Visitor::new();
    let session = visitor.session(audio);

    let first = session.mount_banner();
    first.subscribe().wait_for(|p| *p == BannerPhase::Visible).await.unwrap();
    first.teardown();

    let second = session.mount_banner();
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(second.phase(), BannerPhase::Visible);
    assert_eq!(output.played_count(), 1);
}

#[test]
fn test_navigation_tone_is_gated() {
    let output = OfflineAudio::default();
    let audio = Arc::new(GestureGatedAudio::new(Box::new(output.clone())));
    let visitor = Visitor::new();
    let mut session = visitor.session(audio);

    session.navigate(Page::About);
    assert_eq!(session.page(), Page::About);
    assert_eq!(output.played_count(), 0);

    session.on_input(InputEvent::PointerDown);
    session.navigate(Page::Experience);
    assert_eq!(output.played_count(), 1);
    assert!(session.audio().is_available());
}

#[test]
fn test_descriptor_json_shape() {
    let descriptor = video::describe("https://x.com/user/status/123", "Clip");
    let json = serde_json::to_value(&descriptor).unwrap();
    assert_eq!(json["kind"], "external_link");
    assert_eq!(json["uri"], "https://x.com/user/status/123");
    assert_eq!(json["label"], "View on X");

    let json = serde_json::to_value(video::describe("", "Soon")).unwrap();
    assert_eq!(json["kind"], "placeholder");
    assert!(json["uri"].is_null());
}
