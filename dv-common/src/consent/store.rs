//! Consent flag mirrored across persistence backends
//!
//! Reads OR the backends together so acceptance survives the visitor
//! clearing any one of them. Writes go to every backend independently; a
//! failing backend is logged and skipped.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::storage::KeyValueStore;

/// Key used in every backend
pub const CONSENT_KEY: &str = "dv_cookies_accepted";

/// The only value that counts as accepted
pub const CONSENT_VALUE: &str = "true";

/// Acceptance flag over pluggable backends
#[derive(Clone)]
pub struct ConsentStore {
    backends: Vec<Arc<dyn KeyValueStore>>,
}

impl ConsentStore {
    pub fn new(backends: Vec<Arc<dyn KeyValueStore>>) -> Self {
        Self { backends }
    }

    /// Usual two-backend setup: durable store plus cookies
    pub fn dual(durable: Arc<dyn KeyValueStore>, cookies: Arc<dyn KeyValueStore>) -> Self {
        Self::new(vec![durable, cookies])
    }

    /// True if any backend holds the acceptance flag
    ///
    /// An unreadable backend counts as "not accepted" for that backend.
    pub fn has_accepted(&self) -> bool {
        self.backends.iter().any(|backend| match backend.get(CONSENT_KEY) {
            Ok(value) => value.as_deref() == Some(CONSENT_VALUE),
            Err(e) => {
                debug!("Consent read skipped {}: {}", backend.name(), e);
                false
            }
        })
    }

    /// Write the flag to every backend, ignoring individual failures
    ///
    /// Returns the number of backends that accepted the write.
    pub fn mark_accepted(&self) -> usize {
        let mut written = 0;
        for backend in &self.backends {
            match backend.set(CONSENT_KEY, CONSENT_VALUE) {
                Ok(()) => written += 1,
                Err(e) => warn!("Consent write to {} failed: {}", backend.name(), e),
            }
        }
        info!(
            "Consent recorded in {}/{} backends",
            written,
            self.backends.len()
        );
        written
    }
}

impl std::fmt::Debug for ConsentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.backends.iter().map(|b| b.name()).collect();
        f.debug_struct("ConsentStore").field("backends", &names).finish()
    }
}
