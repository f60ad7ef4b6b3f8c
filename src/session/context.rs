//! Request-scoped typed access to the current session.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::{async_trait, extract::FromRequestParts, http::request::Parts, http::StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::session::error::SessionError;
use crate::session::store::Session;

#[derive(Debug)]
struct ContextInner {
    session: Session,
    is_new: bool,
    modified: bool,
}

/// Handle to the session of the request being served.
///
/// Values are stored as JSON text. The session middleware creates one
/// context per request and writes it back after the handler returns, so
/// handlers only ever see their own copy.
#[derive(Debug, Clone)]
pub struct SessionContext {
    inner: Arc<Mutex<ContextInner>>,
}

impl SessionContext {
    /// Wrap a session loaded from (or about to be added to) a store
    pub fn new(session: Session, is_new: bool) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ContextInner {
                session,
                is_new,
                modified: false,
            })),
        }
    }

    /// Fresh, empty session
    pub fn fresh() -> Self {
        Self::new(Session::new(), true)
    }

    fn lock(&self) -> MutexGuard<'_, ContextInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn id(&self) -> Uuid {
        self.lock().session.id
    }

    /// True when the session did not exist in the store before this request
    pub fn is_new(&self) -> bool {
        self.lock().is_new
    }

    /// True once any value was set, removed or cleared
    pub fn is_modified(&self) -> bool {
        self.lock().modified
    }

    /// Copy of the underlying session record
    pub fn snapshot(&self) -> Session {
        self.lock().session.clone()
    }

    /// Raw stored text for `key`
    pub fn get_text(&self, key: &str) -> Option<String> {
        self.lock().session.get(key).map(str::to_owned)
    }

    /// Store raw text under `key`
    pub fn set_text(&self, key: &str, text: String) {
        let mut inner = self.lock();
        inner.session.set(key, text);
        inner.modified = true;
    }

    /// Read and decode the value at `key`. An unset key is `Ok(None)`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, SessionError> {
        let Some(text) = self.get_text(key) else {
            return Ok(None);
        };

        serde_json::from_str(&text)
            .map(Some)
            .map_err(|source| SessionError::Deserialization {
                key: key.to_string(),
                source,
            })
    }

    /// Encode `value` and store it under `key`, overwriting any prior value
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), SessionError> {
        let text = serde_json::to_string(value).map_err(|source| SessionError::Serialization {
            key: key.to_string(),
            source,
        })?;
        debug!(key, bytes = text.len(), "session value stored");
        self.set_text(key, text);
        Ok(())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.lock().session.data.contains_key(key)
    }

    pub fn remove(&self, key: &str) -> bool {
        let mut inner = self.lock();
        let removed = inner.session.remove(key).is_some();
        inner.modified |= removed;
        removed
    }

    /// Drop every stored value
    pub fn clear(&self) {
        let mut inner = self.lock();
        if !inner.session.data.is_empty() {
            inner.session.data.clear();
            inner.modified = true;
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for SessionContext
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<SessionContext>().cloned().ok_or((
            StatusCode::INTERNAL_SERVER_ERROR,
            "session middleware is not installed",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserData;
    use std::collections::HashMap;

    #[test]
    fn test_get_on_fresh_session_is_none() {
        let ctx = SessionContext::fresh();
        let name: Option<String> = ctx.get("FirstName").unwrap();
        assert_eq!(name, None);
        assert!(!ctx.is_modified());
    }

    #[test]
    fn test_user_data_roundtrip() {
        let ctx = SessionContext::fresh();
        let data = UserData {
            first_name: "Ada".to_string(),
            city: "Boston".to_string(),
            ..UserData::default()
        };

        ctx.set("UserDataValues", &data).unwrap();
        let loaded: Option<UserData> = ctx.get("UserDataValues").unwrap();
        assert_eq!(loaded, Some(data));
        assert!(ctx.is_modified());
    }

    #[test]
    fn test_set_overwrites() {
        let ctx = SessionContext::fresh();
        ctx.set("FirstName", "Ada").unwrap();
        ctx.set("FirstName", "Grace").unwrap();
        assert_eq!(ctx.get::<String>("FirstName").unwrap().as_deref(), Some("Grace"));
    }

    #[test]
    fn test_values_stored_as_json_text() {
        let ctx = SessionContext::fresh();
        ctx.set("FirstName", "Ada").unwrap();
        assert_eq!(ctx.get_text("FirstName").as_deref(), Some("\"Ada\""));
    }

    #[test]
    fn test_shape_mismatch_is_deserialization_error() {
        let ctx = SessionContext::fresh();
        ctx.set_text("UserDataValues", "42".to_string());

        let result = ctx.get::<UserData>("UserDataValues");
        match result {
            Err(SessionError::Deserialization { key, .. }) => assert_eq!(key, "UserDataValues"),
            other => panic!("expected deserialization error, got {other:?}"),
        }
    }

    #[test]
    fn test_unencodable_value_is_serialization_error() {
        let ctx = SessionContext::fresh();
        let mut value = HashMap::new();
        value.insert(vec![1u8, 2], "non-string map key");

        let result = ctx.set("Bad", &value);
        assert!(matches!(result, Err(SessionError::Serialization { .. })));
        assert!(!ctx.contains("Bad"));
        assert!(!ctx.is_modified());
    }

    #[test]
    fn test_remove_and_clear() {
        let ctx = SessionContext::fresh();
        assert!(!ctx.remove("FirstName"));
        assert!(!ctx.is_modified());

        ctx.set("FirstName", "Ada").unwrap();
        ctx.set("Other", &1).unwrap();
        assert!(ctx.remove("FirstName"));
        assert!(!ctx.contains("FirstName"));

        ctx.clear();
        assert!(ctx.snapshot().data.is_empty());
    }

    #[test]
    fn test_clones_share_state() {
        let ctx = SessionContext::fresh();
        let other = ctx.clone();
        other.set("FirstName", "Ada").unwrap();
        assert_eq!(ctx.get::<String>("FirstName").unwrap().as_deref(), Some("Ada"));
        assert_eq!(ctx.id(), other.id());
    }
}
