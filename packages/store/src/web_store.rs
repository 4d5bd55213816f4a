//! # localStorage session store for the browser
//!
//! [`WebStore`] is the [`SessionStore`] implementation used on the **web
//! platform**. It keeps the session record under a single localStorage key
//! (`"lightbox.session"`), which is how the hosted backend's own JavaScript
//! client persists sessions in the browser.
//!
//! ## Error handling
//!
//! All trait methods silently swallow errors (returning `None` for reads,
//! doing nothing for writes). A blocked or unavailable localStorage degrades
//! to "signed out" rather than crashing; the authoritative session always
//! lives with the backend.

use crate::models::SessionRecord;
use crate::SessionStore;

const SESSION_KEY: &str = "lightbox.session";

/// localStorage-backed SessionStore for the web platform.
#[derive(Clone, Debug, Default)]
pub struct WebStore;

impl WebStore {
    pub fn new() -> Self {
        Self
    }

    /// Reachable only when the page runs in a browsing context that exposes
    /// localStorage (private-mode browsers may refuse).
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }
}

impl SessionStore for WebStore {
    async fn load(&self) -> Option<SessionRecord> {
        let text = Self::storage()?.get_item(SESSION_KEY).ok()??;
        SessionRecord::from_toml(&text).ok()
    }

    async fn save(&self, record: &SessionRecord) {
        let Ok(text) = record.to_toml() else {
            return;
        };
        if let Some(storage) = Self::storage() {
            let _ = storage.set_item(SESSION_KEY, &text);
        }
    }

    async fn clear(&self) {
        if let Some(storage) = Self::storage() {
            let _ = storage.remove_item(SESSION_KEY);
        }
    }
}
