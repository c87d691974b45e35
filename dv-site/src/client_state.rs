//! Per-request view of the visitor's browser storage
//!
//! The server keeps no visitor state. Each request carries the visitor's
//! cookies in `Cookie` and a snapshot of the relevant local-storage keys in
//! the `x-dv-storage` header (`key=value; key=value`, or `unavailable` when
//! the browser blocks storage). Handlers run the `dv-common` stores over
//! those two backends, then hand writes back as `Set-Cookie` headers and a
//! `storage` object the page shell copies into local storage.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use axum::http::{header, HeaderMap};
use dv_common::consent::ConsentStore;
use dv_common::cookie::{CookieAttributes, CookieJar, CookieStore};
use dv_common::storage::MemoryStore;
use dv_common::theme::ThemePreference;
use tracing::warn;

/// Header carrying the local-storage snapshot
pub const STORAGE_HEADER: &str = "x-dv-storage";

/// Snapshot value meaning the browser refuses local storage
pub const STORAGE_UNAVAILABLE: &str = "unavailable";

/// Both backends reconstructed from one request
#[derive(Debug)]
pub struct ClientState {
    durable: Arc<MemoryStore>,
    cookies: Arc<CookieStore>,
    jar: Arc<Mutex<CookieJar>>,
}

impl ClientState {
    pub fn from_headers(headers: &HeaderMap, attributes: CookieAttributes) -> Self {
        let cookie_header = headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect::<Vec<_>>()
            .join("; ");
        let jar = Arc::new(Mutex::new(CookieJar::parse(&cookie_header)));

        let durable = match headers.get(STORAGE_HEADER).map(|v| v.to_str()) {
            None => MemoryStore::new(),
            Some(Ok(value)) if value.trim().eq_ignore_ascii_case(STORAGE_UNAVAILABLE) => {
                MemoryStore::unavailable()
            }
            Some(Ok(value)) => MemoryStore::with_entries(parse_pairs(value)),
            Some(Err(_)) => {
                warn!("Ignoring non-ASCII {} header", STORAGE_HEADER);
                MemoryStore::new()
            }
        };

        Self {
            durable: Arc::new(durable),
            cookies: Arc::new(CookieStore::new(Arc::clone(&jar), attributes)),
            jar,
        }
    }

    pub fn consent(&self) -> ConsentStore {
        ConsentStore::dual(self.durable.clone(), self.cookies.clone())
    }

    pub fn theme(&self) -> ThemePreference {
        ThemePreference::new(vec![self.durable.clone(), self.cookies.clone()])
    }

    pub fn storage_available(&self) -> bool {
        self.durable.is_available()
    }

    /// Local-storage entries after the request's writes
    pub fn storage_entries(&self) -> BTreeMap<String, String> {
        self.durable.entries().into_iter().collect()
    }

    /// `Set-Cookie` values for every cookie written during the request
    pub fn set_cookie_headers(&self) -> Vec<(header::HeaderName, String)> {
        self.jar
            .lock()
            .map(|mut jar| jar.drain_set_cookies())
            .unwrap_or_default()
            .into_iter()
            .map(|cookie| (header::SET_COOKIE, cookie.header_value()))
            .collect()
    }
}

fn parse_pairs(value: &str) -> Vec<(String, String)> {
    value
        .split(';')
        .filter_map(|pair| pair.split_once('='))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .filter(|(k, _)| !k.is_empty())
        .collect()
}
