//! Shared state for the web handlers.

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::config::Config;
use crate::session::{adapters, SessionManager, SessionSettings, SessionStoreRef};
use crate::web::pages::Pages;

/// State shared by all routes
#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionManager,
    pub pages: Arc<Pages>,
}

impl AppState {
    pub fn new(sessions: SessionManager, pages: Pages) -> Self {
        Self {
            sessions,
            pages: Arc::new(pages),
        }
    }

    /// Build state with the session backend selected in `config`
    pub fn from_config(config: &Config) -> Result<Self> {
        let store = adapters::build_store(&config.session);
        Self::with_store(config, store)
    }

    /// Build state around an existing store
    pub fn with_store(config: &Config, store: SessionStoreRef) -> Result<Self> {
        let settings = SessionSettings::from_config(&config.session)?;
        let pages = Pages::new().context("Failed to load page templates")?;
        Ok(Self::new(SessionManager::new(store, settings), pages))
    }
}
