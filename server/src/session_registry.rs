use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use common::{SessionId, trace};

use crate::games::kalah::GameSession;

/// Live sessions keyed by id. Clones share the same map.
#[derive(Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<Mutex<HashMap<SessionId, Arc<GameSession>>>>,
}

impl std::fmt::Debug for SessionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionRegistry").finish()
    }
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, session: Arc<GameSession>) {
        let mut sessions = self.sessions.lock().await;
        sessions.insert(session.id().clone(), session);
    }

    /// Removing an id that is no longer registered is a no-op.
    pub async fn remove(&self, session_id: &SessionId) -> Option<Arc<GameSession>> {
        let removed = self.sessions.lock().await.remove(session_id);
        if removed.is_none() {
            trace!("Session {} already removed", session_id);
        }
        removed
    }

    pub async fn get(&self, session_id: &SessionId) -> Option<Arc<GameSession>> {
        self.sessions.lock().await.get(session_id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
