//! Cookie jar and cookie-backed key-value store
//!
//! Mirrors `document.cookie` semantics: a write is immediately visible to
//! later reads, and every write is also recorded as a `Set-Cookie` line so a
//! server can hand it back to the browser.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::storage::KeyValueStore;
use crate::{Error, Result};

/// One year, the lifetime of the consent cookie
pub const DEFAULT_MAX_AGE_SECS: u64 = 31_536_000;

/// SameSite attribute values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SameSite {
    Strict,
    #[default]
    Lax,
    None,
}

impl SameSite {
    /// Parse a config value, case-insensitively
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "strict" => Some(SameSite::Strict),
            "lax" => Some(SameSite::Lax),
            "none" => Some(SameSite::None),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }
}

/// Attributes attached to every cookie written through a [`CookieStore`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieAttributes {
    pub max_age_secs: u64,
    pub path: String,
    pub same_site: SameSite,
}

impl Default for CookieAttributes {
    fn default() -> Self {
        Self {
            max_age_secs: DEFAULT_MAX_AGE_SECS,
            path: "/".to_string(),
            same_site: SameSite::Lax,
        }
    }
}

/// A cookie write waiting to be sent to the browser
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetCookie {
    pub name: String,
    pub value: String,
    pub attributes: CookieAttributes,
}

impl SetCookie {
    /// Render as a `Set-Cookie` header value
    pub fn header_value(&self) -> String {
        format!(
            "{}={}; Max-Age={}; Path={}; SameSite={}",
            self.name,
            self.value,
            self.attributes.max_age_secs,
            self.attributes.path,
            self.attributes.same_site.as_str()
        )
    }
}

/// Name/value cookie set plus the writes made since it was loaded
#[derive(Debug, Clone)]
pub struct CookieJar {
    values: BTreeMap<String, String>,
    pending: Vec<SetCookie>,
    enabled: bool,
}

impl CookieJar {
    pub fn new() -> Self {
        Self {
            values: BTreeMap::new(),
            pending: Vec::new(),
            enabled: true,
        }
    }

    /// Parse a `Cookie` header / `document.cookie` string (`a=1; b=2`)
    ///
    /// Malformed pairs are skipped; the first occurrence of a name wins.
    pub fn parse(header: &str) -> Self {
        let mut jar = Self::new();
        for pair in header.split(';') {
            let Some((name, value)) = pair.split_once('=') else {
                continue;
            };
            let name = name.trim();
            if name.is_empty() {
                continue;
            }
            jar.values
                .entry(name.to_string())
                .or_insert_with(|| value.trim().to_string());
        }
        jar
    }

    /// Jar for a client with cookies turned off
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::new()
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn get(&self, name: &str) -> Result<Option<&str>> {
        if !self.enabled {
            return Err(Error::storage("cookies", "cookies are disabled"));
        }
        Ok(self.values.get(name).map(String::as_str))
    }

    pub fn set(&mut self, name: &str, value: &str, attributes: CookieAttributes) -> Result<()> {
        if !self.enabled {
            return Err(Error::storage("cookies", "cookies are disabled"));
        }
        if name.is_empty() || name.contains(['=', ';', ' ']) || value.contains([';', ' ']) {
            return Err(Error::InvalidInput(format!("invalid cookie {}={}", name, value)));
        }

        self.values.insert(name.to_string(), value.to_string());
        self.pending.push(SetCookie {
            name: name.to_string(),
            value: value.to_string(),
            attributes,
        });
        Ok(())
    }

    /// Take the writes recorded since the jar was created or last drained
    pub fn drain_set_cookies(&mut self) -> Vec<SetCookie> {
        std::mem::take(&mut self.pending)
    }
}

impl Default for CookieJar {
    fn default() -> Self {
        Self::new()
    }
}

/// [`KeyValueStore`] over a shared [`CookieJar`]
#[derive(Debug, Clone)]
pub struct CookieStore {
    jar: Arc<Mutex<CookieJar>>,
    attributes: CookieAttributes,
}

impl CookieStore {
    pub fn new(jar: Arc<Mutex<CookieJar>>, attributes: CookieAttributes) -> Self {
        Self { jar, attributes }
    }

    /// Handle to the underlying jar, for draining `Set-Cookie` lines
    pub fn jar(&self) -> Arc<Mutex<CookieJar>> {
        Arc::clone(&self.jar)
    }
}

impl KeyValueStore for CookieStore {
    fn name(&self) -> &str {
        "cookies"
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        let jar = self
            .jar
            .lock()
            .map_err(|_| Error::storage(self.name(), "lock poisoned"))?;
        Ok(jar.get(key)?.map(str::to_string))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut jar = self
            .jar
            .lock()
            .map_err(|_| Error::storage(self.name(), "lock poisoned"))?;
        jar.set(key, value, self.attributes.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cookie_header() {
        let jar = CookieJar::parse("theme=dark; dv_cookies_accepted=true;bad; =x; theme=light");
        assert_eq!(jar.get("theme").unwrap(), Some("dark"));
        assert_eq!(jar.get("dv_cookies_accepted").unwrap(), Some("true"));
        assert_eq!(jar.get("bad").unwrap(), None);
    }

    #[test]
    fn test_set_is_visible_and_recorded() {
        let mut jar = CookieJar::new();
        jar.set("dv_cookies_accepted", "true", CookieAttributes::default())
            .unwrap();
        assert_eq!(jar.get("dv_cookies_accepted").unwrap(), Some("true"));

        let pending = jar.drain_set_cookies();
        assert_eq!(pending.len(), 1);
        assert_eq!(
            pending[0].header_value(),
            "dv_cookies_accepted=true; Max-Age=31536000; Path=/; SameSite=Lax"
        );
        assert!(jar.drain_set_cookies().is_empty());
    }

    #[test]
    fn test_disabled_jar_fails() {
        let mut jar = CookieJar::disabled();
        assert!(jar.get("x").is_err());
        assert!(jar.set("x", "1", CookieAttributes::default()).is_err());
        assert!(jar.drain_set_cookies().is_empty());
    }

    #[test]
    fn test_rejects_header_injection() {
        let mut jar = CookieJar::new();
        assert!(matches!(
            jar.set("a", "1; Path=/evil", CookieAttributes::default()),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_cookie_store_shares_jar() {
        let jar = Arc::new(Mutex::new(CookieJar::new()));
        let store = CookieStore::new(Arc::clone(&jar), CookieAttributes::default());
        store.set("dv_theme", "dark").unwrap();
        assert_eq!(store.get("dv_theme").unwrap().as_deref(), Some("dark"));
        assert_eq!(jar.lock().unwrap().drain_set_cookies().len(), 1);
    }

    #[test]
    fn test_same_site_parse() {
        assert_eq!(SameSite::from_str("LAX"), Some(SameSite::Lax));
        assert_eq!(SameSite::from_str("strict"), Some(SameSite::Strict));
        assert_eq!(SameSite::from_str("sometimes"), None);
    }
}
