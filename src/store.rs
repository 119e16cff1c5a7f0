//! Checkpoint stores for interview sessions.
//!
//! The engine externalizes all live state into the [`Session`] record and
//! persists it through the [`CheckpointStore`] trait at every committed
//! transition, so resumption never depends on an in-memory call stack.
//! Two backends are provided: a process-local [`MemoryStore`] (the default)
//! and a [`FileStore`] that survives process restarts.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::debug;

use crate::errors::StoreError;
use crate::session::Session;

/// Persistence contract between the engine and its host.
///
/// `save` must replace the stored session atomically: a later `load` sees
/// either the previous checkpoint or the new one, never a partial state.
pub trait CheckpointStore: Send + Sync {
    /// Store a fresh session; fails with `DuplicateSession` if the id exists.
    fn create(&self, session: &Session) -> Result<(), StoreError>;

    /// Return the stored session; fails with `SessionNotFound` if absent.
    fn load(&self, session_id: &str) -> Result<Session, StoreError>;

    /// Atomically replace a previously created session.
    fn save(&self, session: &Session) -> Result<(), StoreError>;
}

/// Non-durable store keyed by session id; sessions vanish with the process.
#[derive(Default)]
pub struct MemoryStore {
    sessions: Mutex<HashMap<String, Session>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Session>> {
        self.sessions
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl CheckpointStore for MemoryStore {
    fn create(&self, session: &Session) -> Result<(), StoreError> {
        let mut sessions = self.lock();
        if sessions.contains_key(&session.id) {
            return Err(StoreError::DuplicateSession {
                session_id: session.id.clone(),
            });
        }
        debug!(session_id = %session.id, "creating in-memory checkpoint");
        sessions.insert(session.id.clone(), session.clone());
        Ok(())
    }

    fn load(&self, session_id: &str) -> Result<Session, StoreError> {
        self.lock()
            .get(session_id)
            .cloned()
            .ok_or_else(|| StoreError::SessionNotFound {
                session_id: session_id.to_string(),
            })
    }

    fn save(&self, session: &Session) -> Result<(), StoreError> {
        let mut sessions = self.lock();
        if !sessions.contains_key(&session.id) {
            return Err(StoreError::SessionNotFound {
                session_id: session.id.clone(),
            });
        }
        sessions.insert(session.id.clone(), session.clone());
        Ok(())
    }
}

/// Durable store keeping one JSON checkpoint per session under a directory.
///
/// `save` writes to a sibling temporary file and renames it over the old
/// checkpoint, so a concurrent reader never observes a half-written session.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create a file store rooted at `dir`, creating the directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|source| StoreError::WriteFailed {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir })
    }

    fn checkpoint_path(&self, session_id: &str) -> PathBuf {
        self.dir.join(format!("{session_id}.json"))
    }

    fn read_checkpoint(&self, path: &Path, session_id: &str) -> Result<Session, StoreError> {
        let data = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                StoreError::SessionNotFound {
                    session_id: session_id.to_string(),
                }
            } else {
                StoreError::ReadFailed {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        serde_json::from_str(&data).map_err(|source| StoreError::CorruptCheckpoint {
            path: path.to_path_buf(),
            source,
        })
    }

    fn write_checkpoint(&self, path: &Path, session: &Session) -> Result<(), StoreError> {
        let json =
            serde_json::to_string_pretty(session).map_err(|e| StoreError::WriteFailed {
                path: path.to_path_buf(),
                source: std::io::Error::other(e),
            })?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(|source| StoreError::WriteFailed {
            path: tmp.clone(),
            source,
        })?;
        std::fs::rename(&tmp, path).map_err(|source| StoreError::WriteFailed {
            path: path.to_path_buf(),
            source,
        })
    }

    /// All checkpointed sessions, newest update first. Used by `parley sessions`.
    pub fn list(&self) -> Result<Vec<Session>, StoreError> {
        let entries = std::fs::read_dir(&self.dir).map_err(|source| StoreError::ReadFailed {
            path: self.dir.clone(),
            source,
        })?;

        let mut sessions = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            // Skip files that are not parseable checkpoints rather than
            // failing the whole listing.
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if let Ok(session) = self.read_checkpoint(&path, stem) {
                sessions.push(session);
            }
        }
        sessions.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(sessions)
    }
}

impl CheckpointStore for FileStore {
    fn create(&self, session: &Session) -> Result<(), StoreError> {
        let path = self.checkpoint_path(&session.id);
        if path.exists() {
            return Err(StoreError::DuplicateSession {
                session_id: session.id.clone(),
            });
        }
        debug!(session_id = %session.id, path = %path.display(), "creating file checkpoint");
        self.write_checkpoint(&path, session)
    }

    fn load(&self, session_id: &str) -> Result<Session, StoreError> {
        let path = self.checkpoint_path(session_id);
        self.read_checkpoint(&path, session_id)
    }

    fn save(&self, session: &Session) -> Result<(), StoreError> {
        let path = self.checkpoint_path(&session.id);
        if !path.exists() {
            return Err(StoreError::SessionNotFound {
                session_id: session.id.clone(),
            });
        }
        self.write_checkpoint(&path, session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn make_session(id: &str) -> Session {
        Session::new(id, "Backend Engineer", "Resume text.", 1, 1)
    }

    #[test]
    fn test_memory_store_create_and_load_roundtrip() {
        let store = MemoryStore::new();
        store.create(&make_session("s1")).unwrap();
        let loaded = store.load("s1").unwrap();
        assert_eq!(loaded.id, "s1");
        assert_eq!(loaded.role, "Backend Engineer");
    }

    #[test]
    fn test_memory_store_duplicate_create_fails() {
        let store = MemoryStore::new();
        store.create(&make_session("s1")).unwrap();
        let err = store.create(&make_session("s1")).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateSession { .. }));
    }

    #[test]
    fn test_memory_store_load_missing_fails() {
        let store = MemoryStore::new();
        let err = store.load("nope").unwrap_err();
        assert!(matches!(err, StoreError::SessionNotFound { .. }));
    }

    #[test]
    fn test_memory_store_save_replaces_session() {
        let store = MemoryStore::new();
        let mut session = make_session("s1");
        store.create(&session).unwrap();

        session.record_primary_question("Q1");
        store.save(&session).unwrap();

        let loaded = store.load("s1").unwrap();
        assert_eq!(loaded.questions_asked, 1);
        assert_eq!(loaded.pending_question.as_deref(), Some("Q1"));
    }

    #[test]
    fn test_memory_store_save_without_create_fails() {
        let store = MemoryStore::new();
        let err = store.save(&make_session("s1")).unwrap_err();
        assert!(matches!(err, StoreError::SessionNotFound { .. }));
    }

    #[test]
    fn test_file_store_roundtrip() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path()).unwrap();
        let mut session = make_session("s1");
        store.create(&session).unwrap();

        session.record_primary_question("Q1");
        store.save(&session).unwrap();

        let loaded = store.load("s1").unwrap();
        assert_eq!(loaded.pending_question.as_deref(), Some("Q1"));
    }

    #[test]
    fn test_file_store_duplicate_create_fails() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path()).unwrap();
        store.create(&make_session("s1")).unwrap();
        let err = store.create(&make_session("s1")).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateSession { .. }));
    }

    #[test]
    fn test_file_store_recovery_after_restart() {
        let dir = tempdir().unwrap();

        {
            let store = FileStore::new(dir.path()).unwrap();
            let mut session = make_session("s1");
            store.create(&session).unwrap();
            session.record_primary_question("Q1");
            store.save(&session).unwrap();
        }

        {
            let store = FileStore::new(dir.path()).unwrap();
            let loaded = store.load("s1").unwrap();
            assert_eq!(loaded.questions_asked, 1);
            assert_eq!(loaded.pending_question.as_deref(), Some("Q1"));
        }
    }

    #[test]
    fn test_file_store_corrupt_checkpoint_is_reported() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path()).unwrap();
        std::fs::write(dir.path().join("bad.json"), "{not json").unwrap();
        let err = store.load("bad").unwrap_err();
        assert!(matches!(err, StoreError::CorruptCheckpoint { .. }));
    }

    #[test]
    fn test_file_store_list_sorted_by_recency() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path()).unwrap();

        let older = make_session("older");
        store.create(&older).unwrap();

        let mut newer = make_session("newer");
        newer.updated_at = older.updated_at + chrono::Duration::seconds(5);
        store.create(&newer).unwrap();

        let listed = store.list().unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, "newer");
        assert_eq!(listed[1].id, "older");
    }

    #[test]
    fn test_file_store_list_skips_non_checkpoint_files() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path()).unwrap();
        store.create(&make_session("s1")).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "not a checkpoint").unwrap();
        std::fs::write(dir.path().join("bad.json"), "{").unwrap();

        let listed = store.list().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, "s1");
    }
}
