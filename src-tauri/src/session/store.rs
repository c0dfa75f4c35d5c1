//! File-backed store for session history and the saved API key.
//!
//! The on-disk format is one JSON document with two string entries:
//! `tennis_sessions` holds the JSON-encoded session array as a string,
//! `tennis_api_key` holds the key verbatim. Every mutation rewrites the
//! whole file; there is no partial update path.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::types::Session;
use crate::error::CoachError;

/// Callback invoked after every change to the session list.
pub type Subscriber = Box<dyn Fn(&[Session]) + Send>;

#[derive(Default, Serialize, Deserialize)]
struct PersistedState {
    #[serde(default)]
    tennis_sessions: String,
    #[serde(default)]
    tennis_api_key: String,
}

/// In-memory session store with write-through persistence.
///
/// Newest session first. The selection is runtime-only state and is not
/// written to disk.
pub struct SessionStore {
    path: PathBuf,
    sessions: Vec<Session>,
    api_key: String,
    selected: Option<i64>,
    subscribers: Vec<Subscriber>,
}

impl SessionStore {
    /// Open the store at `path`, creating parent directories as needed.
    ///
    /// A missing file yields an empty store. A file that exists but
    /// fails to parse also yields an empty store rather than an error;
    /// the damage is logged and the next write replaces the file.
    pub fn open(path: &Path) -> Result<Self, CoachError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| CoachError::Store(format!("failed to create {:?}: {}", parent, e)))?;
        }

        let state = match fs::read_to_string(path) {
            Ok(raw) => match serde_json::from_str::<PersistedState>(&raw) {
                Ok(state) => state,
                Err(e) => {
                    warn!("Session file {:?} is unreadable, starting empty: {}", path, e);
                    PersistedState::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => PersistedState::default(),
            Err(e) => {
                return Err(CoachError::Store(format!(
                    "failed to read {:?}: {}",
                    path, e
                )));
            }
        };

        let sessions = if state.tennis_sessions.is_empty() {
            Vec::new()
        } else {
            match serde_json::from_str::<Vec<Session>>(&state.tennis_sessions) {
                Ok(sessions) => sessions,
                Err(e) => {
                    warn!("Stored session list is unreadable, starting empty: {}", e);
                    Vec::new()
                }
            }
        };

        info!("Opened session store at {:?} with {} sessions", path, sessions.len());
        Ok(Self {
            path: path.to_path_buf(),
            sessions,
            api_key: state.tennis_api_key,
            selected: None,
            subscribers: Vec::new(),
        })
    }

    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn set_api_key(&mut self, key: &str) -> Result<(), CoachError> {
        self.api_key = key.to_string();
        self.persist()
    }

    /// Prepend a session, making it the newest entry. Selecting it is
    /// left to the caller. Subscribers run after the write succeeds.
    pub fn add(&mut self, session: Session) -> Result<(), CoachError> {
        self.sessions.insert(0, session);
        self.persist()?;
        self.notify();
        Ok(())
    }

    /// Mark a session as the active one. Returns false when no session
    /// has that id, leaving the current selection untouched.
    pub fn select(&mut self, id: i64) -> bool {
        if self.sessions.iter().any(|s| s.id == id) {
            self.selected = Some(id);
            true
        } else {
            false
        }
    }

    pub fn selected(&self) -> Option<&Session> {
        let id = self.selected?;
        self.sessions.iter().find(|s| s.id == id)
    }

    /// Pick an id for a new session. Wall-clock millis, bumped past the
    /// current maximum so two uploads landing in the same millisecond
    /// still get distinct ids.
    pub fn allocate_id(&self, now_millis: i64) -> i64 {
        let max_id = self.sessions.iter().map(|s| s.id).max().unwrap_or(0);
        now_millis.max(max_id + 1)
    }

    pub fn subscribe(&mut self, subscriber: impl Fn(&[Session]) + Send + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    /// Drop all sessions. Selection is cleared; the API key survives.
    pub fn clear(&mut self) -> Result<(), CoachError> {
        self.sessions.clear();
        self.selected = None;
        self.persist()?;
        self.notify();
        Ok(())
    }

    fn persist(&self) -> Result<(), CoachError> {
        let sessions_json = serde_json::to_string(&self.sessions)
            .map_err(|e| CoachError::Store(format!("failed to encode sessions: {}", e)))?;
        let state = PersistedState {
            tennis_sessions: sessions_json,
            tennis_api_key: self.api_key.clone(),
        };
        let document = serde_json::to_string(&state)
            .map_err(|e| CoachError::Store(format!("failed to encode store: {}", e)))?;
        fs::write(&self.path, document)
            .map_err(|e| CoachError::Store(format!("failed to write {:?}: {}", self.path, e)))
    }

    fn notify(&self) {
        for subscriber in &self.subscribers {
            subscriber(&self.sessions);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use tempfile::TempDir;

    use super::*;

    fn session(id: i64, date: &str) -> Session {
        Session {
            id,
            date: date.to_string(),
            video_data: format!("data:video/mp4;base64,clip{}", id),
            forehand: None,
            backhand: None,
            analysis: "ok".to_string(),
            tips: vec![],
        }
    }

    fn store_path(dir: &TempDir) -> PathBuf {
        dir.path().join("sessions.json")
    }

    #[test]
    fn test_open_missing_file_starts_empty() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::open(&store_path(&dir)).unwrap();
        assert!(store.sessions().is_empty());
        assert!(store.api_key().is_empty());
    }

    #[test]
    fn test_open_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("deep").join("sessions.json");
        let mut store = SessionStore::open(&path).unwrap();
        store.add(session(1, "2026-08-29")).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_add_prepends_newest_first() {
        let dir = TempDir::new().unwrap();
        let mut store = SessionStore::open(&store_path(&dir)).unwrap();
        store.add(session(1, "2026-08-27")).unwrap();
        store.add(session(2, "2026-08-28")).unwrap();
        store.add(session(3, "2026-08-29")).unwrap();

        let ids: Vec<i64> = store.sessions().iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[test]
    fn test_reopen_round_trips_sessions_and_key() {
        let dir = TempDir::new().unwrap();
        let path = store_path(&dir);

        let mut store = SessionStore::open(&path).unwrap();
        store.set_api_key("secret-key").unwrap();
        store.add(session(1, "2026-08-28")).unwrap();
        store.add(session(2, "2026-08-29")).unwrap();
        let before = store.sessions().to_vec();

        let reopened = SessionStore::open(&path).unwrap();
        assert_eq!(reopened.sessions(), before.as_slice());
        assert_eq!(reopened.api_key(), "secret-key");
    }

    #[test]
    fn test_sessions_entry_is_an_encoded_string() {
        // The document holds the session array as one JSON-encoded
        // string entry, not as a nested array.
        let dir = TempDir::new().unwrap();
        let path = store_path(&dir);

        let mut store = SessionStore::open(&path).unwrap();
        store.add(session(1, "2026-08-29")).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        let document: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let inner = document["tennis_sessions"].as_str().unwrap();
        assert_eq!(inner, serde_json::to_string(store.sessions()).unwrap());
    }

    #[test]
    fn test_tampered_document_starts_empty() {
        let dir = TempDir::new().unwrap();
        let path = store_path(&dir);
        fs::write(&path, "{not json at all").unwrap();

        let store = SessionStore::open(&path).unwrap();
        assert!(store.sessions().is_empty());
    }

    #[test]
    fn test_tampered_session_list_starts_empty_but_keeps_key() {
        let dir = TempDir::new().unwrap();
        let path = store_path(&dir);
        fs::write(
            &path,
            r#"{"tennis_sessions":"[{broken","tennis_api_key":"still-here"}"#,
        )
        .unwrap();

        let store = SessionStore::open(&path).unwrap();
        assert!(store.sessions().is_empty());
        assert_eq!(store.api_key(), "still-here");
    }

    #[test]
    fn test_select_unknown_id_is_rejected() {
        let dir = TempDir::new().unwrap();
        let mut store = SessionStore::open(&store_path(&dir)).unwrap();
        store.add(session(1, "2026-08-29")).unwrap();

        assert!(store.select(1));
        assert!(!store.select(999));
        // The failed select did not clobber the previous selection.
        assert_eq!(store.selected().unwrap().id, 1);
    }

    #[test]
    fn test_selected_none_until_selected() {
        let dir = TempDir::new().unwrap();
        let mut store = SessionStore::open(&store_path(&dir)).unwrap();
        store.add(session(1, "2026-08-29")).unwrap();
        assert!(store.selected().is_none());

        store.select(1);
        assert_eq!(store.selected().unwrap().id, 1);
    }

    #[test]
    fn test_allocate_id_bumps_past_existing_max() {
        let dir = TempDir::new().unwrap();
        let mut store = SessionStore::open(&store_path(&dir)).unwrap();
        assert_eq!(store.allocate_id(1000), 1000);

        store.add(session(1000, "2026-08-29")).unwrap();
        // Same millisecond as the existing session: the id still moves.
        assert_eq!(store.allocate_id(1000), 1001);
        // A later clock wins over the bump.
        assert_eq!(store.allocate_id(5000), 5000);
    }

    #[test]
    fn test_clear_removes_sessions_keeps_key() {
        let dir = TempDir::new().unwrap();
        let path = store_path(&dir);
        let mut store = SessionStore::open(&path).unwrap();
        store.set_api_key("keep-me").unwrap();
        store.add(session(1, "2026-08-29")).unwrap();
        store.select(1);

        store.clear().unwrap();
        assert!(store.sessions().is_empty());
        assert!(store.selected().is_none());

        let reopened = SessionStore::open(&path).unwrap();
        assert!(reopened.sessions().is_empty());
        assert_eq!(reopened.api_key(), "keep-me");
    }

    #[test]
    fn test_subscriber_runs_on_add_and_clear() {
        let dir = TempDir::new().unwrap();
        let mut store = SessionStore::open(&store_path(&dir)).unwrap();

        let calls = Arc::new(AtomicUsize::new(0));
        let calls_seen = calls.clone();
        store.subscribe(move |_| {
            calls_seen.fetch_add(1, Ordering::SeqCst);
        });

        store.add(session(1, "2026-08-29")).unwrap();
        store.clear().unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
