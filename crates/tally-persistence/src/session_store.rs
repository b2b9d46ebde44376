//! Session store: snapshots and timestamped exports.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::{debug, warn};

use tally_models::SessionState;

use crate::atomic::{atomic_write, atomic_write_json, read_json};
use crate::error::{PersistenceError, Result};

/// Snapshot filename inside a session directory.
pub const SNAPSHOT_FILE: &str = "saved_state.json";

/// Filename timestamp format; sorts lexicographically.
const EXPORT_TIMESTAMP: &str = "%Y-%m-%d_%H-%M-%S";

/// Manages on-disk state for grading sessions.
///
/// Layout under the base directory:
/// ```text
/// base_path/
/// └── {session_id}/
///     ├── saved_state.json
///     ├── scores_2026-08-30_14-01-55.csv
///     └── scores_2026-08-30_14-09-12.csv
/// ```
///
/// The session directory's existence is the sole signal distinguishing
/// "resume" from "create". The snapshot is overwritten atomically on
/// every checkpoint; exports are never overwritten.
pub struct SessionStore {
    base_path: PathBuf,
}

impl SessionStore {
    /// Creates a new SessionStore with the given base path.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Returns the directory owned by a session.
    pub fn session_dir(&self, session_id: &str) -> PathBuf {
        self.base_path.join(session_id)
    }

    /// True if the session directory already exists, i.e. the session
    /// should resume rather than start fresh.
    pub fn exists(&self, session_id: &str) -> bool {
        self.session_dir(session_id).is_dir()
    }

    fn snapshot_path(&self, session_id: &str) -> PathBuf {
        self.session_dir(session_id).join(SNAPSHOT_FILE)
    }

    /// Saves the full session snapshot, replacing any prior one.
    pub fn save_snapshot(&self, state: &SessionState) -> Result<()> {
        let path = self.snapshot_path(&state.session_id);
        atomic_write_json(&path, state)?;
        debug!(path = %path.display(), "snapshot saved");
        Ok(())
    }

    /// Loads the snapshot for a session.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::SnapshotNotFound`] when the snapshot
    /// file is absent; callers treat this as fatal rather than
    /// fabricating a fresh session under a resumed identifier.
    pub fn load_snapshot(&self, session_id: &str) -> Result<SessionState> {
        let path = self.snapshot_path(session_id);
        if !path.exists() {
            return Err(PersistenceError::SnapshotNotFound {
                session_id: session_id.to_string(),
            });
        }
        read_json(&path)
    }

    /// Writes a freshly timestamped export for a session and returns
    /// its path. Prior exports are left in place as a history across
    /// resumes.
    pub fn write_export(&self, state: &SessionState, report: &str) -> Result<PathBuf> {
        let timestamp = Local::now().format(EXPORT_TIMESTAMP);
        let filename = format!("{}_{}.csv", state.output_prefix, timestamp);
        let path = self.session_dir(&state.session_id).join(filename);
        atomic_write(&path, report.as_bytes())?;
        debug!(path = %path.display(), "export written");
        Ok(path)
    }

    /// One checkpoint: snapshot plus a fresh export, as a single
    /// logical unit. Returns the export path.
    pub fn checkpoint(&self, state: &SessionState, report: &str) -> Result<PathBuf> {
        self.save_snapshot(state)?;
        self.write_export(state, report)
    }

    /// Lists the ids of every session with a readable snapshot,
    /// sorted. Directories without a snapshot are skipped with a
    /// warning.
    pub fn list_sessions(&self) -> Result<Vec<String>> {
        if !self.base_path.is_dir() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&self.base_path).map_err(|source| {
            PersistenceError::ReadError {
                path: self.base_path.clone(),
                source,
            }
        })?;

        let mut sessions = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| PersistenceError::ReadError {
                path: self.base_path.clone(),
                source,
            })?;
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            if !path.join(SNAPSHOT_FILE).exists() {
                warn!(path = %path.display(), "skipping directory without a snapshot");
                continue;
            }
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                sessions.push(name.to_string());
            }
        }
        sessions.sort();
        Ok(sessions)
    }

    /// Base path this store was created with.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_models::{DeductionEntry, QuestionKey, SessionConfig};
    use tempfile::tempdir;

    fn sample(id: &str) -> SessionState {
        SessionState::new(
            id,
            vec!["Alice".into(), "Bob".into()],
            SessionConfig::new(vec![2], 10),
            "names.csv",
            "scores",
        )
    }

    #[test]
    fn test_snapshot_roundtrip() {
        let dir = tempdir().unwrap();
        let store = SessionStore::new(dir.path());

        let mut state = sample("hw3");
        state.library.add_option(QuestionKey::new(1, 0), "minor error", 2);
        state.records[0].record(
            QuestionKey::new(1, 0),
            vec![DeductionEntry::new("minor error", 2)],
        );
        state.subjects_done = 1;

        store.save_snapshot(&state).unwrap();
        let loaded = store.load_snapshot("hw3").unwrap();
        assert_eq!(loaded, state);
    }

    #[test]
    fn test_exists_tracks_session_dir() {
        let dir = tempdir().unwrap();
        let store = SessionStore::new(dir.path());
        assert!(!store.exists("hw3"));

        store.save_snapshot(&sample("hw3")).unwrap();
        assert!(store.exists("hw3"));
    }

    #[test]
    fn test_load_missing_snapshot_is_not_found() {
        let dir = tempdir().unwrap();
        let store = SessionStore::new(dir.path());

        let result = store.load_snapshot("nope");
        assert!(matches!(
            result,
            Err(PersistenceError::SnapshotNotFound { .. })
        ));
    }

    #[test]
    fn test_write_export_uses_prefix_and_session_dir() {
        let dir = tempdir().unwrap();
        let store = SessionStore::new(dir.path());
        let state = sample("hw3");

        let path = store.write_export(&state, "Subject,Final Score\n").unwrap();

        assert!(path.starts_with(store.session_dir("hw3")));
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("scores_"));
        assert!(name.ends_with(".csv"));
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "Subject,Final Score\n"
        );
    }

    #[test]
    fn test_checkpoint_writes_both() {
        let dir = tempdir().unwrap();
        let store = SessionStore::new(dir.path());
        let state = sample("hw3");

        let export = store.checkpoint(&state, "report").unwrap();

        assert!(export.exists());
        assert!(store.session_dir("hw3").join(SNAPSHOT_FILE).exists());
    }

    #[test]
    fn test_list_sessions_skips_snapshotless_dirs() {
        let dir = tempdir().unwrap();
        let store = SessionStore::new(dir.path());

        store.save_snapshot(&sample("hw3")).unwrap();
        store.save_snapshot(&sample("hw1")).unwrap();
        fs::create_dir(dir.path().join("scratch")).unwrap();

        assert_eq!(store.list_sessions().unwrap(), vec!["hw1", "hw3"]);
    }

    #[test]
    fn test_list_sessions_empty_base() {
        let dir = tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("never-created"));
        assert!(store.list_sessions().unwrap().is_empty());
    }
}
