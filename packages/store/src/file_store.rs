//! # Filesystem-backed session store
//!
//! [`FileStore`] is a [`SessionStore`] implementation that persists the
//! session record to the local filesystem. It is used on desktop platforms
//! so sign-in survives app restarts.
//!
//! ## Layout
//!
//! ```text
//! <base_dir>/
//! ├── lightbox.toml          # backend configuration (read by AppConfig)
//! └── session.toml           # SessionRecord, present only while signed in
//! ```
//!
//! ## Platform data directories
//!
//! [`crate::data_dir()`] resolves the platform-appropriate base:
//!
//! | Platform | Path |
//! |----------|------|
//! | macOS | `~/Library/Application Support/lightbox/` |
//! | Linux | `~/.local/share/lightbox/` |
//! | Windows | `C:\Users\<user>\AppData\Roaming\lightbox\` |

use std::path::PathBuf;

use crate::models::SessionRecord;
use crate::SessionStore;

const SESSION_FILE: &str = "session.toml";

/// Filesystem-backed SessionStore for desktop persistence.
#[derive(Clone, Debug)]
pub struct FileStore {
    base: PathBuf,
}

impl FileStore {
    pub fn new(base: PathBuf) -> Self {
        Self { base }
    }

    /// Open the store at the platform data directory, falling back to the
    /// temp dir when the platform exposes none.
    pub fn open_default() -> Self {
        let base = crate::data_dir().unwrap_or_else(|| std::env::temp_dir().join("lightbox"));
        Self::new(base)
    }

    fn session_path(&self) -> PathBuf {
        self.base.join(SESSION_FILE)
    }
}

impl Default for FileStore {
    fn default() -> Self {
        Self::open_default()
    }
}

impl SessionStore for FileStore {
    async fn load(&self) -> Option<SessionRecord> {
        let text = std::fs::read_to_string(self.session_path()).ok()?;
        SessionRecord::from_toml(&text).ok()
    }

    async fn save(&self, record: &SessionRecord) {
        let Ok(text) = record.to_toml() else {
            return;
        };
        let _ = std::fs::create_dir_all(&self.base);
        let _ = std::fs::write(self.session_path(), text);
    }

    async fn clear(&self) {
        let _ = std::fs::remove_file(self.session_path());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_file_store_roundtrip() {
        let dir = std::env::temp_dir().join(format!("lightbox_test_{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);

        let store = FileStore::new(dir.clone());
        assert!(store.load().await.is_none());

        let record = SessionRecord {
            access_token: "tok".to_string(),
            refresh_token: String::new(),
            user_id: "user-1".to_string(),
            email: "ada@example.com".to_string(),
            expires_at: Some(1),
        };
        store.save(&record).await;

        // Re-open from the same directory
        let store2 = FileStore::new(dir.clone());
        assert_eq!(store2.load().await.unwrap(), record);

        store2.clear().await;
        assert!(store.load().await.is_none());

        // Cleanup
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_corrupt_session_file_is_ignored() {
        let dir = std::env::temp_dir().join(format!("lightbox_corrupt_{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(SESSION_FILE), "not [valid toml").unwrap();

        let store = FileStore::new(dir.clone());
        assert!(store.load().await.is_none());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
