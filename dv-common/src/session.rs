//! One visitor's browsing session
//!
//! Wires the two storage backends, consent, theme, audio and the single
//! banner controller together the way the page shell uses them.

use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::audio::{GestureGatedAudio, InputEvent, Tone};
use crate::config::SiteConfig;
use crate::consent::{BannerController, BannerDriver, BannerPhase, ConsentStore};
use crate::content::Page;
use crate::storage::KeyValueStore;
use crate::theme::{Theme, ThemePreference};

/// Session state shared by the page's views
pub struct BrowserSession {
    consent: ConsentStore,
    theme_pref: ThemePreference,
    audio: Arc<GestureGatedAudio>,
    banner: Arc<Mutex<BannerController>>,
    click_tone: Tone,
    theme: Theme,
    page: Page,
}

impl BrowserSession {
    /// Start a session over a durable store and a cookie store
    ///
    /// The theme is read here, once, and only written back on toggle.
    pub fn new(
        durable: Arc<dyn KeyValueStore>,
        cookies: Arc<dyn KeyValueStore>,
        audio: Arc<GestureGatedAudio>,
        config: &SiteConfig,
    ) -> Self {
        let consent = ConsentStore::dual(Arc::clone(&durable), Arc::clone(&cookies));
        let theme_pref = ThemePreference::new(vec![durable, cookies]);
        let theme = theme_pref.load();
        let banner = BannerController::new(consent.clone(), Arc::clone(&audio), config.banner_timing());

        Self {
            consent,
            theme_pref,
            audio,
            banner: Arc::new(Mutex::new(banner)),
            click_tone: config.audio.click,
            theme,
            page: Page::default(),
        }
    }

    pub fn consent(&self) -> &ConsentStore {
        &self.consent
    }

    pub fn audio(&self) -> &Arc<GestureGatedAudio> {
        &self.audio
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn page(&self) -> Page {
        self.page
    }

    /// Forward a raw input event to the audio gate
    pub fn on_input(&self, event: InputEvent) {
        self.audio.on_input(event);
    }

    /// Switch pages, with a click tone when audio is unlocked
    pub fn navigate(&mut self, page: Page) {
        if page != self.page {
            debug!("Navigate {} -> {}", self.page.slug(), page.slug());
        }
        self.page = page;
        self.audio.play(self.click_tone);
    }

    /// Flip and persist the theme
    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        self.theme_pref.save(self.theme);
        self.theme
    }

    /// Mount the consent banner view
    ///
    /// Every mount shares the session's one controller, so remounting the
    /// view never replays the entry animation or the notification tone.
    pub fn mount_banner(&self) -> BannerDriver {
        BannerDriver::spawn(Arc::clone(&self.banner))
    }

    pub fn banner_phase(&self) -> BannerPhase {
        self.banner
            .lock()
            .map(|b| b.phase())
            .unwrap_or(BannerPhase::Hidden)
    }
}

impl std::fmt::Debug for BrowserSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrowserSession")
            .field("theme", &self.theme)
            .field("page", &self.page)
            .field("banner", &self.banner_phase())
            .finish()
    }
}
