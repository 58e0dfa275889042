use super::handle::Session;
use super::types::SessionId;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Process-wide map of published sessions.
///
/// One reader/writer lock guards membership: lookups and enumeration share the
/// read lock, insert and remove take the write lock. The lock is only held for
/// the map operation itself, never across I/O. Clones share the same map.
#[derive(Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<SessionId, Arc<Session>>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite by id. Ids are fresh per session, so overwrite does
    /// not happen in practice.
    pub async fn insert(&self, session: Arc<Session>) {
        let id = session.id().to_string();
        self.sessions.write().await.insert(id.clone(), session);
        debug!("Registered session {}", id);
    }

    /// Evict a session. Removing an absent id is a no-op; the evicted handle
    /// is returned so the caller knows whether it did the eviction.
    pub async fn remove(&self, session_id: &str) -> Option<Arc<Session>> {
        self.sessions.write().await.remove(session_id)
    }

    pub async fn lookup(&self, session_id: &str) -> Option<Arc<Session>> {
        self.sessions.read().await.get(session_id).cloned()
    }

    pub async fn contains(&self, session_id: &str) -> bool {
        self.sessions.read().await.contains_key(session_id)
    }

    /// Snapshot of the live session ids, in no particular order
    pub async fn list_all(&self) -> Vec<SessionId> {
        self.sessions.read().await.keys().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
