//! Session store backends.

use std::sync::Arc;

use tracing::info;

use crate::config::{SessionBackend, SessionConfig};
use crate::session::store::SessionStoreRef;

pub mod file;
pub mod memory;

pub use file::FileSessionStore;
pub use memory::InMemorySessionStore;

/// Create the backend selected in the session configuration
pub fn build_store(config: &SessionConfig) -> SessionStoreRef {
    match config.backend {
        SessionBackend::Memory => {
            info!("using in-memory session store");
            Arc::new(InMemorySessionStore::new())
        }
        SessionBackend::File => {
            info!(dir = %config.dir, "using file session store");
            Arc::new(FileSessionStore::new(&config.dir))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_build_file_store() {
        let temp_dir = TempDir::new().unwrap();
        let config = SessionConfig {
            backend: SessionBackend::File,
            dir: temp_dir.path().to_string_lossy().to_string(),
            ..SessionConfig::default()
        };

        let store = build_store(&config);
        let session = crate::session::Session::new();
        store.save(&session).await.unwrap();

        assert!(temp_dir.path().join(format!("{}.json", session.id)).exists());
    }

    #[tokio::test]
    async fn test_build_memory_store_starts_empty() {
        let store = build_store(&SessionConfig::default());
        assert_eq!(store.count().await.unwrap(), 0);
    }
}
