use std::sync::{Arc, Mutex};

use crate::models::SessionRecord;
use crate::SessionStore;

/// In-memory SessionStore for testing and headless fallback.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    session: Arc<Mutex<Option<SessionRecord>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemoryStore {
    async fn load(&self) -> Option<SessionRecord> {
        self.session.lock().unwrap().clone()
    }

    async fn save(&self, record: &SessionRecord) {
        *self.session.lock().unwrap() = Some(record.clone());
    }

    async fn clear(&self) {
        *self.session.lock().unwrap() = None;
    }
}
