//! # App-level configuration (`lightbox.toml`)
//!
//! Defines the TOML configuration file that tells a Lightbox client which
//! hosted backend project to talk to (filename: [`AppConfig::filename`] =
//! `"lightbox.toml"`). On native platforms the file lives in the Lightbox
//! data directory; on the web there is no filesystem and the built-in
//! defaults plus compile-time overrides apply.
//!
//! ## Structure
//!
//! ```toml
//! [backend]
//! url = "http://localhost:54321"   # project base URL (no trailing slash)
//! publishable_key = "..."          # anonymous API key sent with every request
//! ```
//!
//! ## Precedence
//!
//! Environment variables `LIGHTBOX_BACKEND_URL` and `LIGHTBOX_PUBLISHABLE_KEY`
//! override the file, which overrides the defaults. A missing or empty config
//! file is equivalent to the default configuration.

use serde::{Deserialize, Serialize};

/// Top-level configuration stored in `lightbox.toml`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub backend: BackendConfig,
}

/// Connection details for the hosted data service.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Project base URL, without a trailing slash.
    #[serde(default = "default_backend_url")]
    pub url: String,
    /// Anonymous (publishable) API key. A signed-in bearer token supersedes
    /// it for authorization but the key header is always sent.
    #[serde(default = "default_publishable_key")]
    pub publishable_key: String,
}

fn default_backend_url() -> String {
    // Local development stack default.
    "http://localhost:54321".to_string()
}

fn default_publishable_key() -> String {
    "lightbox-local-dev".to_string()
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: default_backend_url(),
            publishable_key: default_publishable_key(),
        }
    }
}

impl AppConfig {
    /// Create a config pointing at the given backend project.
    pub fn new(url: String, publishable_key: String) -> Self {
        Self {
            backend: BackendConfig {
                url,
                publishable_key,
            },
        }
    }

    /// The well-known filename for the config file.
    pub fn filename() -> &'static str {
        "lightbox.toml"
    }

    /// Parse from TOML string.
    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Serialize to TOML string.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Apply `LIGHTBOX_BACKEND_URL` / `LIGHTBOX_PUBLISHABLE_KEY` overrides.
    /// No-op on wasm, where process environments do not exist.
    pub fn with_env_overrides(mut self) -> Self {
        #[cfg(not(target_arch = "wasm32"))]
        {
            if let Ok(url) = std::env::var("LIGHTBOX_BACKEND_URL") {
                if !url.is_empty() {
                    self.backend.url = url;
                }
            }
            if let Ok(key) = std::env::var("LIGHTBOX_PUBLISHABLE_KEY") {
                if !key.is_empty() {
                    self.backend.publishable_key = key;
                }
            }
        }
        self
    }

    /// Load the effective configuration for this platform: data-dir file if
    /// present, then environment overrides.
    pub fn load() -> Self {
        #[cfg(not(target_arch = "wasm32"))]
        let base = crate::data_dir()
            .map(|dir| dir.join(Self::filename()))
            .and_then(|path| std::fs::read_to_string(path).ok())
            .and_then(|text| Self::from_toml(&text).ok())
            .unwrap_or_default();
        #[cfg(target_arch = "wasm32")]
        let base = Self::default();

        base.with_env_overrides()
    }
}
