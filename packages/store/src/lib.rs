//! # Local persistence for the Lightbox client
//!
//! Everything Lightbox keeps on the device lives behind this crate: the
//! `lightbox.toml` backend configuration and the resumable auth session.
//! All remote data (profiles, posts, likes, comments, follows) belongs to
//! the hosted backend and is never cached here.
//!
//! The [`SessionStore`] trait abstracts where the session record goes, so the
//! same auth flow works against the filesystem (desktop), localStorage (web),
//! or memory (tests and fallback).

pub mod config;
pub mod models;

mod memory;
pub use memory::MemoryStore;

#[cfg(not(target_arch = "wasm32"))]
mod file_store;
#[cfg(not(target_arch = "wasm32"))]
pub use file_store::FileStore;

#[cfg(all(target_arch = "wasm32", feature = "web"))]
mod web_store;
#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub use web_store::WebStore;

pub use config::AppConfig;
pub use models::SessionRecord;

/// Async interface for persisting the auth session.
pub trait SessionStore {
    fn load(&self) -> impl std::future::Future<Output = Option<SessionRecord>>;
    fn save(
        &self,
        record: &SessionRecord,
    ) -> impl std::future::Future<Output = ()>;
    fn clear(&self) -> impl std::future::Future<Output = ()>;
}

/// The store implementation appropriate for the compile target.
#[cfg(not(target_arch = "wasm32"))]
pub type PlatformStore = FileStore;
#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub type PlatformStore = WebStore;
#[cfg(all(target_arch = "wasm32", not(feature = "web")))]
pub type PlatformStore = MemoryStore;

/// Platform data directory for Lightbox (`<data_dir>/lightbox/`).
/// `None` when the platform exposes no data directory.
#[cfg(not(target_arch = "wasm32"))]
pub fn data_dir() -> Option<std::path::PathBuf> {
    dirs::data_dir().map(|dir| dir.join("lightbox"))
}
