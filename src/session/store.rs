use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Errors raised by session store backends
#[derive(Error, Debug)]
pub enum SessionStoreError {
    #[error("session storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("session '{id}' is corrupt: {source}")]
    Corrupt {
        id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode session '{id}': {source}")]
    Encode {
        id: Uuid,
        #[source]
        source: serde_json::Error,
    },
}

/// One browser session's server-side state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Opaque identifier carried in the session cookie
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    /// Last time the session was written back to the store
    pub updated_at: DateTime<Utc>,
    /// Sessions without an expiry never expire
    pub expires_at: Option<DateTime<Utc>>,
    /// Values keyed by name, each stored as JSON text
    pub data: HashMap<String, String>,
}

impl Session {
    /// Create an empty session with a fresh random id
    pub fn new() -> Self {
        Self::with_id(Uuid::new_v4())
    }

    pub fn with_id(id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id,
            created_at: now,
            updated_at: now,
            expires_at: None,
            data: HashMap::new(),
        }
    }

    /// Stored text for `key`, if any
    pub fn get(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(String::as_str)
    }

    /// Store text under `key`, replacing any previous value
    pub fn set(&mut self, key: impl Into<String>, value: String) {
        self.data.insert(key.into(), value);
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.data.remove(key)
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| expires_at <= now)
    }

    /// Slide the expiry window forward from now
    pub fn touch(&mut self, idle_timeout: Duration) {
        let now = Utc::now();
        self.updated_at = now;
        self.expires_at = Some(now + idle_timeout);
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Storage backend for sessions.
///
/// Backends hand out copies: callers load a session, mutate it locally and
/// save the whole record back. Concurrent saves of one session are last
/// write wins.
#[async_trait]
pub trait SessionStore: Send + Sync + Debug {
    /// Load a live session. Missing and expired sessions both yield `None`.
    async fn load(&self, id: &Uuid) -> Result<Option<Session>, SessionStoreError>;

    /// Insert or replace a session
    async fn save(&self, session: &Session) -> Result<(), SessionStoreError>;

    /// Delete a session. Deleting an unknown id is not an error.
    async fn delete(&self, id: &Uuid) -> Result<(), SessionStoreError>;

    /// Remove expired sessions, returning how many were removed
    async fn cleanup_expired(&self) -> Result<usize, SessionStoreError>;

    /// Number of live sessions
    async fn count(&self) -> Result<usize, SessionStoreError>;
}

/// Shared handle to a session store backend
pub type SessionStoreRef = Arc<dyn SessionStore>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_creation() {
        let session = Session::new();
        assert!(session.data.is_empty());
        assert_eq!(session.expires_at, None);
        assert!(!session.is_expired());
    }

    #[test]
    fn test_session_data_operations() {
        let mut session = Session::new();

        session.set("key1", "\"value1\"".to_string());
        assert_eq!(session.get("key1"), Some("\"value1\""));
        assert_eq!(session.get("missing"), None);

        session.set("key1", "\"updated\"".to_string());
        assert_eq!(session.get("key1"), Some("\"updated\""));

        assert_eq!(session.remove("key1"), Some("\"updated\"".to_string()));
        assert_eq!(session.remove("key1"), None);
    }

    #[test]
    fn test_touch_slides_expiry() {
        let mut session = Session::new();
        session.touch(Duration::minutes(20));

        let expires_at = session.expires_at.unwrap();
        assert!(expires_at > Utc::now() + Duration::minutes(19));
        assert!(!session.is_expired());
        assert!(session.is_expired_at(expires_at));
    }

    #[test]
    fn test_past_expiry_is_expired() {
        let mut session = Session::new();
        session.expires_at = Some(Utc::now() - Duration::seconds(1));
        assert!(session.is_expired());
    }

    #[test]
    fn test_session_json_shape() {
        let mut session = Session::new();
        session.set("FirstName", "\"Ada\"".to_string());

        let json = serde_json::to_string(&session).unwrap();
        let parsed: Session = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, session);
    }
}
