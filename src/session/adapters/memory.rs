use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::session::store::{Session, SessionStore, SessionStoreError};

/// Process-local session store. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<Uuid, Session>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn load(&self, id: &Uuid) -> Result<Option<Session>, SessionStoreError> {
        let sessions = self.sessions.read().await;
        Ok(sessions.get(id).filter(|s| !s.is_expired()).cloned())
    }

    async fn save(&self, session: &Session) -> Result<(), SessionStoreError> {
        let mut sessions = self.sessions.write().await;
        sessions.insert(session.id, session.clone());
        Ok(())
    }

    async fn delete(&self, id: &Uuid) -> Result<(), SessionStoreError> {
        let mut sessions = self.sessions.write().await;
        if sessions.remove(id).is_some() {
            debug!(session_id = %id, "deleted session");
        }
        Ok(())
    }

    async fn cleanup_expired(&self) -> Result<usize, SessionStoreError> {
        let mut sessions = self.sessions.write().await;
        let now = Utc::now();
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired_at(now));
        Ok(before - sessions.len())
    }

    async fn count(&self) -> Result<usize, SessionStoreError> {
        let sessions = self.sessions.read().await;
        let now = Utc::now();
        Ok(sessions.values().filter(|s| !s.is_expired_at(now)).count())
    }
}
