use super::interview::InterviewSession;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// Shared handle to one loaded session. Holding the lock serializes every
/// operation on that session.
pub type SessionHandle = Arc<Mutex<InterviewSession>>;

/// In-memory cache of loaded sessions, keyed by session id.
///
/// Only sessions that can still change are kept. Sessions that reached a
/// terminal status are removed and read back from the store on demand.
///
/// The map lock is only held for lookups and inserts, never across a session
/// operation, so different sessions proceed concurrently.
pub struct SessionCache {
    sessions: Arc<RwLock<HashMap<String, SessionHandle>>>,
}

impl SessionCache {
    /// Creates a new empty SessionCache.
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Gets a cached session by id.
    pub async fn get(&self, session_id: &str) -> Option<SessionHandle> {
        let sessions = self.sessions.read().await;
        sessions.get(session_id).cloned()
    }

    /// Caches `session` unless another handle for the same id got there
    /// first, and returns whichever handle is now cached.
    ///
    /// Two callers racing to load the same id therefore end up sharing one
    /// mutex.
    pub async fn insert_if_absent(&self, session: InterviewSession) -> SessionHandle {
        let mut sessions = self.sessions.write().await;
        sessions
            .entry(session.id().to_string())
            .or_insert_with(|| Arc::new(Mutex::new(session)))
            .clone()
    }

    /// Drops the cached handle for `session_id`. Callers still holding the
    /// handle keep a working session.
    pub async fn remove(&self, session_id: &str) {
        let mut sessions = self.sessions.write().await;
        sessions.remove(session_id);
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

impl Default for SessionCache {
    fn default() -> Self {
        Self::new()
    }
}
