//! In-memory session store with optional JSON snapshots on disk.
//!
//! Sessions live in a `HashMap` behind a `tokio::sync::RwLock`. When a data
//! directory is configured, every mutation also writes a `<id>.json`
//! snapshot in the background; a failed write logs a warning and the
//! conversation carries on.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::warn;
use uuid::Uuid;

use crate::conversation::session::ConversationSession;

#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, ConversationSession>>>,
    data_dir: Option<PathBuf>,
}

impl SessionStore {
    pub fn new(data_dir: Option<PathBuf>) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            data_dir,
        }
    }

    /// Rehydrates sessions from `data_dir` snapshots. Unreadable files are
    /// skipped with a warning.
    pub async fn load_snapshots(&self) {
        let Some(dir) = &self.data_dir else { return };
        let mut entries = match tokio::fs::read_dir(dir).await {
            Ok(e) => e,
            Err(e) => {
                warn!("could not read data dir {}: {e}", dir.display());
                return;
            }
        };
        let mut sessions = self.sessions.write().await;
        while let Ok(Some(entry)) = entries.next_entry().await {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match tokio::fs::read_to_string(&path).await {
                Ok(contents) => match serde_json::from_str::<ConversationSession>(&contents) {
                    Ok(session) => {
                        sessions.insert(session.id, session);
                    }
                    Err(e) => warn!("skipping snapshot {}: {e}", path.display()),
                },
                Err(e) => warn!("skipping snapshot {}: {e}", path.display()),
            }
        }
        tracing::info!("loaded {} session snapshot(s)", sessions.len());
    }

    pub async fn insert(&self, session: ConversationSession) {
        self.spawn_snapshot(&session);
        self.sessions.write().await.insert(session.id, session);
    }

    pub async fn get(&self, id: Uuid) -> Option<ConversationSession> {
        self.sessions.read().await.get(&id).cloned()
    }

    /// Runs `f` against the session under the write lock, then snapshots the
    /// result. Returns `None` when the session does not exist.
    pub async fn update<T>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut ConversationSession) -> T,
    ) -> Option<T> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&id)?;
        let out = f(session);
        self.spawn_snapshot(session);
        Some(out)
    }

    fn spawn_snapshot(&self, session: &ConversationSession) {
        let Some(dir) = &self.data_dir else { return };
        let path = snapshot_path(dir, session.id);
        match serde_json::to_vec_pretty(session) {
            Ok(bytes) => {
                tokio::spawn(async move {
                    if let Err(e) = write_snapshot(&path, &bytes).await {
                        warn!("session snapshot {} failed: {e}", path.display());
                    }
                });
            }
            Err(e) => warn!("session {} did not serialize: {e}", session.id),
        }
    }
}

fn snapshot_path(dir: &Path, id: Uuid) -> PathBuf {
    dir.join(format!("{id}.json"))
}

/// Writes via a temp file and rename so a crash mid-write never leaves a
/// truncated snapshot.
async fn write_snapshot(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, bytes).await?;
    tokio::fs::rename(&tmp, path).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::session::Mode;

    #[tokio::test]
    async fn test_insert_and_get() {
        let store = SessionStore::new(None);
        let session = ConversationSession::new(Mode::Guided, "en");
        let id = session.id;
        store.insert(session).await;
        assert!(store.get(id).await.is_some());
        assert!(store.get(Uuid::new_v4()).await.is_none());
    }

    #[tokio::test]
    async fn test_update_mutates_in_place() {
        let store = SessionStore::new(None);
        let session = ConversationSession::new(Mode::Assisted, "en");
        let id = session.id;
        store.insert(session).await;

        let seq = store.update(id, |s| s.next_seq()).await;
        assert_eq!(seq, Some(1));
        assert_eq!(store.get(id).await.unwrap().message_seq, 1);
    }

    #[tokio::test]
    async fn test_update_missing_session_is_none() {
        let store = SessionStore::new(None);
        assert!(store.update(Uuid::new_v4(), |_| ()).await.is_none());
    }

    #[tokio::test]
    async fn test_snapshot_roundtrip_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let session = ConversationSession::new(Mode::Guided, "es");
        let id = session.id;

        let path = snapshot_path(dir.path(), id);
        let bytes = serde_json::to_vec_pretty(&session).unwrap();
        write_snapshot(&path, &bytes).await.unwrap();

        let store = SessionStore::new(Some(dir.path().to_path_buf()));
        store.load_snapshots().await;
        let loaded = store.get(id).await.unwrap();
        assert_eq!(loaded.record.language(), "es");
    }

    #[tokio::test]
    async fn test_load_skips_malformed_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        tokio::fs::write(dir.path().join("garbage.json"), b"not json")
            .await
            .unwrap();

        let store = SessionStore::new(Some(dir.path().to_path_buf()));
        store.load_snapshots().await;
        // nothing loaded, nothing panicked
        assert!(store.get(Uuid::new_v4()).await.is_none());
    }
}
