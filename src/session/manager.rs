//! Cookie-to-session resolution and write-back.

use std::sync::Arc;

use axum::http::{header, HeaderMap};
use chrono::Duration;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::SessionConfig;
use crate::session::context::SessionContext;
use crate::session::store::{Session, SessionStoreError, SessionStoreRef};

/// Cookie and expiry policy for sessions
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSettings {
    pub cookie_name: String,
    /// Sliding idle timeout, refreshed on every request that carries the session
    pub idle_timeout: Duration,
    /// Add the `Secure` attribute to the session cookie
    pub secure_cookie: bool,
}

impl SessionSettings {
    pub fn from_config(config: &SessionConfig) -> anyhow::Result<Self> {
        let name = config.cookie_name.trim();
        if name.is_empty() || !name.bytes().all(is_cookie_name_byte) {
            anyhow::bail!("invalid session cookie name '{}'", config.cookie_name);
        }
        if config.idle_timeout_minutes == 0 {
            anyhow::bail!("session idle timeout must be at least one minute");
        }

        Ok(Self {
            cookie_name: name.to_string(),
            idle_timeout: Duration::minutes(i64::from(config.idle_timeout_minutes)),
            secure_cookie: config.secure_cookie,
        })
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            cookie_name: "formflow.session".to_string(),
            idle_timeout: Duration::minutes(20),
            secure_cookie: false,
        }
    }
}

/// RFC 6265 token characters
fn is_cookie_name_byte(b: u8) -> bool {
    b.is_ascii_graphic() && !b"()<>@,;:\\\"/[]?={}".contains(&b)
}

/// Resolves the session for a request and persists it afterwards
#[derive(Debug, Clone)]
pub struct SessionManager {
    store: SessionStoreRef,
    settings: Arc<SessionSettings>,
}

impl SessionManager {
    pub fn new(store: SessionStoreRef, settings: SessionSettings) -> Self {
        Self {
            store,
            settings: Arc::new(settings),
        }
    }

    pub fn store(&self) -> &SessionStoreRef {
        &self.store
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    /// Session id carried by the request's cookies.
    ///
    /// Values that are not UUIDs are ignored so a client can never address
    /// anything outside the store's key space.
    pub fn session_id_from_headers(&self, headers: &HeaderMap) -> Option<Uuid> {
        headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == self.settings.cookie_name)
            .and_then(|(_, value)| Uuid::parse_str(value.trim().trim_matches('"')).ok())
    }

    /// Load the request's session, or start a new one when the cookie is
    /// missing, malformed, unknown, expired or names a corrupt record.
    pub async fn resolve(&self, headers: &HeaderMap) -> Result<SessionContext, SessionStoreError> {
        if let Some(id) = self.session_id_from_headers(headers) {
            match self.store.load(&id).await {
                Ok(Some(session)) => {
                    debug!(session_id = %id, "resumed session");
                    return Ok(SessionContext::new(session, false));
                }
                Ok(None) => {
                    debug!(session_id = %id, "session cookie refers to unknown or expired session");
                }
                Err(e @ SessionStoreError::Corrupt { .. }) => {
                    warn!(session_id = %id, error = %e, "discarding corrupt session");
                    self.store.delete(&id).await?;
                }
                Err(e) => return Err(e),
            }
        }

        Ok(SessionContext::fresh())
    }

    /// Write the session back to the store.
    ///
    /// Returns the `Set-Cookie` value to send when the client does not hold
    /// the cookie yet. New sessions nothing was written to are discarded.
    pub async fn commit(&self, ctx: &SessionContext) -> Result<Option<String>, SessionStoreError> {
        let is_new = ctx.is_new();
        if is_new && !ctx.is_modified() {
            return Ok(None);
        }

        let mut session: Session = ctx.snapshot();
        session.touch(self.settings.idle_timeout);
        self.store.save(&session).await?;
        debug!(session_id = %session.id, is_new, "session saved");

        Ok(is_new.then(|| self.set_cookie_value(session.id)))
    }

    /// `Set-Cookie` header value for a session id. The cookie has no
    /// `Max-Age`, so it lasts for the browser session only.
    pub fn set_cookie_value(&self, id: Uuid) -> String {
        let mut cookie = format!(
            "{}={id}; Path=/; HttpOnly; SameSite=Lax",
            self.settings.cookie_name
        );
        if self.settings.secure_cookie {
            cookie.push_str("; Secure");
        }
        cookie
    }
}
