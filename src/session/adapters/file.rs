use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use tokio::fs;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::session::store::{Session, SessionStore, SessionStoreError};

/// Durable session store keeping one JSON file per session.
///
/// Layout:
/// ```text
/// <dir>/
/// ├── 6f1c...e2.json
/// └── 9a04...7b.json
/// ```
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    dir: PathBuf,
}

impl FileSessionStore {
    /// Open a store rooted at `dir`. The directory is created on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, id: &Uuid) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }

    async fn read_session(path: &Path) -> Result<Option<Session>, SessionStoreError> {
        let text = match fs::read_to_string(path).await {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        serde_json::from_str(&text)
            .map(Some)
            .map_err(|source| SessionStoreError::Corrupt {
                id: path
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                source,
            })
    }

    /// Every `*.json` file in the store directory
    async fn session_files(&self) -> Result<Vec<PathBuf>, SessionStoreError> {
        let mut entries = match fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                files.push(path);
            }
        }
        Ok(files)
    }
}

async fn remove_if_present(path: &Path) -> Result<(), SessionStoreError> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn load(&self, id: &Uuid) -> Result<Option<Session>, SessionStoreError> {
        let path = self.path_for(id);
        match Self::read_session(&path).await? {
            Some(session) if session.is_expired() => {
                debug!(session_id = %id, "dropping expired session on load");
                remove_if_present(&path).await?;
                Ok(None)
            }
            other => Ok(other),
        }
    }

    async fn save(&self, session: &Session) -> Result<(), SessionStoreError> {
        fs::create_dir_all(&self.dir).await?;

        let json =
            serde_json::to_string(session).map_err(|source| SessionStoreError::Encode {
                id: session.id,
                source,
            })?;

        // Write-then-rename so readers never observe a half-written file
        let path = self.path_for(&session.id);
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, json).await?;
        fs::rename(&tmp_path, &path).await?;
        Ok(())
    }

    async fn delete(&self, id: &Uuid) -> Result<(), SessionStoreError> {
        remove_if_present(&self.path_for(id)).await
    }

    async fn cleanup_expired(&self) -> Result<usize, SessionStoreError> {
        let now = Utc::now();
        let mut removed = 0;

        for path in self.session_files().await? {
            match Self::read_session(&path).await {
                Ok(Some(session)) if session.is_expired_at(now) => {
                    remove_if_present(&path).await?;
                    removed += 1;
                }
                Ok(_) => {}
                Err(e) => warn!(path = %path.display(), error = %e, "skipping unreadable session file"),
            }
        }

        Ok(removed)
    }

    async fn count(&self) -> Result<usize, SessionStoreError> {
        let now = Utc::now();
        let mut live = 0;

        for path in self.session_files().await? {
            if let Ok(Some(session)) = Self::read_session(&path).await {
                if !session.is_expired_at(now) {
                    live += 1;
                }
            }
        }

        Ok(live)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_save_and_load_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileSessionStore::new(temp_dir.path().join("sessions"));

        let mut session = Session::new();
        session.set("FirstName", "\"Ada\"".to_string());
        session.touch(Duration::minutes(20));
        store.save(&session).await.unwrap();

        let loaded = store.load(&session.id).await.unwrap().unwrap();
        assert_eq!(loaded, session);
    }

    #[tokio::test]
    async fn test_sessions_survive_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let session = Session::new();

        FileSessionStore::new(temp_dir.path())
            .save(&session)
            .await
            .unwrap();

        let reopened = FileSessionStore::new(temp_dir.path());
        assert!(reopened.load(&session.id).await.unwrap().is_some());
        assert_eq!(reopened.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_missing_dir_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileSessionStore::new(temp_dir.path().join("never-created"));

        assert!(store.load(&Uuid::new_v4()).await.unwrap().is_none());
        assert_eq!(store.count().await.unwrap(), 0);
        assert_eq!(store.cleanup_expired().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_delete_removes_file() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileSessionStore::new(temp_dir.path());
        let session = Session::new();
        store.save(&session).await.unwrap();

        store.delete(&session.id).await.unwrap();
        assert!(!store.path_for(&session.id).exists());
        store.delete(&session.id).await.unwrap();
    }

    #[tokio::test]
    async fn test_expired_sessions_are_pruned() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileSessionStore::new(temp_dir.path());

        let mut expired = Session::new();
        expired.expires_at = Some(Utc::now() - Duration::seconds(5));
        store.save(&expired).await.unwrap();

        let mut live = Session::new();
        live.touch(Duration::minutes(20));
        store.save(&live).await.unwrap();

        assert_eq!(store.count().await.unwrap(), 1);
        assert_eq!(store.cleanup_expired().await.unwrap(), 1);
        assert!(!store.path_for(&expired.id).exists());
        assert!(store.path_for(&live.id).exists());
    }

    #[tokio::test]
    async fn test_corrupt_file_reports_error() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileSessionStore::new(temp_dir.path());
        let id = Uuid::new_v4();
        std::fs::write(store.path_for(&id), "not json").unwrap();

        let result = store.load(&id).await;
        assert!(matches!(result, Err(SessionStoreError::Corrupt { .. })));

        // Cleanup skips it rather than failing
        assert_eq!(store.cleanup_expired().await.unwrap(), 0);
    }
}
