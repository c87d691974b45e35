//! Light/dark theme preference
//!
//! Stored like the consent flag: the same key in the durable store and in a
//! cookie. Read once when a session starts, written on every toggle.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::storage::KeyValueStore;

/// Key used in every backend
pub const THEME_KEY: &str = "dv_theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Theme persistence over ordered backends
///
/// Reads take the first backend holding a valid value, so the durable store
/// wins over the cookie when both are present.
#[derive(Clone)]
pub struct ThemePreference {
    backends: Vec<Arc<dyn KeyValueStore>>,
}

impl ThemePreference {
    pub fn new(backends: Vec<Arc<dyn KeyValueStore>>) -> Self {
        Self { backends }
    }

    /// Stored theme, or the default when nothing valid is stored
    pub fn load(&self) -> Theme {
        for backend in &self.backends {
            match backend.get(THEME_KEY) {
                Ok(Some(value)) => match Theme::from_str(&value) {
                    Some(theme) => return theme,
                    None => debug!("Ignoring theme value {:?} in {}", value, backend.name()),
                },
                Ok(None) => {}
                Err(e) => debug!("Theme read skipped {}: {}", backend.name(), e),
            }
        }
        Theme::default()
    }

    /// Write to every backend, ignoring individual failures
    pub fn save(&self, theme: Theme) {
        for backend in &self.backends {
            if let Err(e) = backend.set(THEME_KEY, theme.as_str()) {
                warn!("Theme write to {} failed: {}", backend.name(), e);
            }
        }
    }
}

impl std::fmt::Debug for ThemePreference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.backends.iter().map(|b| b.name()).collect();
        f.debug_struct("ThemePreference").field("backends", &names).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cookie::{CookieAttributes, CookieJar, CookieStore};
    use crate::storage::MemoryStore;
    use std::sync::Mutex;

    fn cookies(header: &str) -> Arc<CookieStore> {
        Arc::new(CookieStore::new(
            Arc::new(Mutex::new(CookieJar::parse(header))),
            CookieAttributes::default(),
        ))
    }

    #[test]
    fn test_default_is_light() {
        let pref = ThemePreference::new(vec![Arc::new(MemoryStore::new()), cookies("")]);
        assert_eq!(pref.load(), Theme::Light);
    }

    #[test]
    fn test_durable_store_wins() {
        let pref = ThemePreference::new(vec![
            Arc::new(MemoryStore::with_entries([(THEME_KEY, "dark")])),
            cookies("dv_theme=light"),
        ]);
        assert_eq!(pref.load(), Theme::Dark);
    }

    #[test]
    fn test_falls_back_to_cookie() {
        let pref = ThemePreference::new(vec![
            Arc::new(MemoryStore::unavailable()),
            cookies("dv_theme=dark"),
        ]);
        assert_eq!(pref.load(), Theme::Dark);

        let pref = ThemePreference::new(vec![
            Arc::new(MemoryStore::with_entries([(THEME_KEY, "purple")])),
            cookies("dv_theme=dark"),
        ]);
        assert_eq!(pref.load(), Theme::Dark);
    }

    #[test]
    fn test_save_then_load() {
        let durable = Arc::new(MemoryStore::new());
        let pref = ThemePreference::new(vec![durable.clone(), cookies("")]);
        pref.save(Theme::Dark);
        assert_eq!(pref.load(), Theme::Dark);
        assert_eq!(durable.get(THEME_KEY).unwrap().as_deref(), Some("dark"));
    }

    #[test]
    fn test_toggle() {
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert_eq!(Theme::Dark.toggled().toggled(), Theme::Dark);
    }
}
