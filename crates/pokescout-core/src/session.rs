//! Session-scoped key/value storage.
//!
//! Models browser sessionStorage: string values under string keys, writes
//! that never fail from the caller's point of view, contents that live for
//! one machine session and no longer. The favorites store persists its
//! snapshot through this seam, which also keeps it trivial to test.

use std::{
    collections::HashMap,
    fs,
    path::PathBuf,
    sync::Mutex,
};

use tracing::warn;

/// Storage key for the favorites snapshot
pub const FAVORITES_KEY: &str = "pokescout.favorites";

pub trait SessionStore: Send + Sync {
    /// Read the value under `key`, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Write `value` under `key`. A failed write is logged and swallowed;
    /// session storage has no error channel to the caller.
    fn set(&self, key: &str, value: &str);
}

/// In-memory store, used by tests and as a fallback when no session
/// directory can be created.
#[derive(Default)]
pub struct MemorySessionStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values
            .lock()
            .expect("session map poisoned")
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.values
            .lock()
            .expect("session map poisoned")
            .insert(key.to_string(), value.to_string());
    }
}

/// File-backed store: one file per key under a per-user directory inside
/// the OS temp dir. Temp contents disappear with the machine session,
/// which is the closest native analog of a browsing session.
pub struct FileSessionStore {
    root: PathBuf,
}

impl FileSessionStore {
    /// Create a store rooted at the provided directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Default per-user session directory under the OS temp dir.
    pub fn session_default() -> Self {
        let root = std::env::temp_dir().join(format!("pokescout-{}", whoami::username()));
        Self::new(root)
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", sanitize_key(key)))
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.key_path(key)).ok()
    }

    fn set(&self, key: &str, value: &str) {
        if let Err(err) = fs::create_dir_all(&self.root) {
            warn!("Failed to create session dir {:?}: {err}", self.root);
            return;
        }
        let path = self.key_path(key);
        if let Err(err) = fs::write(&path, value) {
            warn!("Failed to write session value {:?}: {err}", path);
        }
    }
}

fn sanitize_key(key: &str) -> String {
    let mut result = String::with_capacity(key.len());
    for ch in key.chars() {
        if ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.') {
            result.push(ch);
        } else {
            result.push('_');
        }
    }
    if result.is_empty() {
        "session".to_string()
    } else {
        result
    }
}
