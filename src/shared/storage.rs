//! Client-local key/value storage.
//!
//! Mirrors the browser's local/session storage: string keys, string values.
//! `MemoryStorage` backs session storage and tests; `FileStorage` persists a
//! JSON map on disk for the command-line tools.
//!
//! The auth artifacts a signed-in client leaves behind live under the fixed
//! keys in [`AUTH_ARTIFACT_KEYS`]. Their absence is what "logged out" means
//! for client-side checks, so logout must remove every one of them.

use crate::shared::error::SharedError;
use crate::shared::session::Session;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, RwLock};

/// Access token
pub const TOKEN_KEY: &str = "token";
/// Refresh token
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";
/// Access token expiry (RFC 3339)
pub const TOKEN_EXPIRY_KEY: &str = "token_expiry";
/// Cached user object (JSON)
pub const USER_KEY: &str = "user";
/// Email remembered by the login form
pub const REMEMBERED_EMAIL_KEY: &str = "remembered_email";

/// Every persisted auth artifact, removed together on logout
pub const AUTH_ARTIFACT_KEYS: [&str; 5] = [
    TOKEN_KEY,
    REFRESH_TOKEN_KEY,
    TOKEN_EXPIRY_KEY,
    USER_KEY,
    REMEMBERED_EMAIL_KEY,
];

/// String key/value store with browser storage semantics
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), SharedError>;
    fn remove(&self, key: &str) -> Result<(), SharedError>;
    fn clear(&self) -> Result<(), SharedError>;
    fn keys(&self) -> Vec<String>;

    fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    fn is_empty(&self) -> bool {
        self.keys().is_empty()
    }
}

/// Remove every persisted auth artifact
pub fn clear_auth_artifacts(store: &dyn KeyValueStore) -> Result<(), SharedError> {
    for key in AUTH_ARTIFACT_KEYS {
        store.remove(key)?;
    }
    Ok(())
}

/// Persist a fresh session the way the login page does
pub fn store_session_artifacts(
    store: &dyn KeyValueStore,
    session: &Session,
    remember_email: bool,
) -> Result<(), SharedError> {
    store.set(TOKEN_KEY, &session.access_token)?;
    store.set(REFRESH_TOKEN_KEY, &session.refresh_token)?;
    match session.expires_at {
        Some(expiry) => store.set(TOKEN_EXPIRY_KEY, &expiry.to_rfc3339())?,
        None => store.remove(TOKEN_EXPIRY_KEY)?,
    }
    store.set(USER_KEY, &serde_json::to_string(&session.user)?)?;
    if remember_email {
        store.set(REMEMBERED_EMAIL_KEY, &session.user.email)?;
    }
    Ok(())
}

/// Rebuild the session a previous sign-in left in `store`.
///
/// Needs the access token and the cached user; a missing refresh token reads
/// as empty and an unparseable expiry as none.
pub fn load_session_artifacts(store: &dyn KeyValueStore) -> Option<Session> {
    let access_token = store.get(TOKEN_KEY)?;
    let user = read_json(store, USER_KEY)?;
    let expires_at = store.get(TOKEN_EXPIRY_KEY).and_then(|raw| {
        DateTime::parse_from_rfc3339(&raw)
            .map(|expiry| expiry.with_timezone(&Utc))
            .map_err(|e| tracing::warn!("Ignoring stored token expiry '{}': {}", raw, e))
            .ok()
    });
    Some(Session {
        access_token,
        refresh_token: store.get(REFRESH_TOKEN_KEY).unwrap_or_default(),
        user,
        expires_at,
    })
}

/// True when none of the auth artifacts are present
pub fn is_logged_out(store: &dyn KeyValueStore) -> bool {
    AUTH_ARTIFACT_KEYS.iter().all(|key| !store.contains(key))
}

/// Read a JSON value stored under `key`.
///
/// Malformed JSON is logged and treated as absent.
pub fn read_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    let raw = store.get(key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("Ignoring malformed JSON stored under '{}': {}", key, e);
            None
        }
    }
}

/// In-memory store
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<BTreeMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `entries`
    pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let map = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            entries: RwLock::new(map),
        }
    }
}

impl KeyValueStore for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SharedError> {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), SharedError> {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.remove(key);
        Ok(())
    }

    fn clear(&self) -> Result<(), SharedError> {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.clear();
        Ok(())
    }

    fn keys(&self) -> Vec<String> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.keys().cloned().collect()
    }
}

/// JSON-file backed store.
///
/// The whole map is rewritten on every mutation; it holds a handful of
/// short entries.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStorage {
    /// Open (or lazily create) the store at `path`.
    ///
    /// A missing file is an empty store. An unreadable or malformed file is
    /// logged and also treated as empty; it is overwritten on the next write.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let entries = match std::fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!("Local storage at {} is corrupt, starting empty: {}", path.display(), e);
                BTreeMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                tracing::warn!("Failed to read local storage at {}: {}", path.display(), e);
                BTreeMap::new()
            }
        };
        Self {
            path,
            entries: Mutex::new(entries),
        }
    }

    /// Default location: `<data dir>/trashdrop/local_storage.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_local_dir().map(|dir| dir.join("trashdrop").join("local_storage.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), SharedError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(entries)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }

    /// Apply `f` to a copy of the map and adopt it only once it is on disk
    fn mutate<F>(&self, f: F) -> Result<(), SharedError>
    where
        F: FnOnce(&mut BTreeMap<String, String>),
    {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let mut next = entries.clone();
        f(&mut next);
        self.persist(&next)?;
        *entries = next;
        Ok(())
    }
}

impl KeyValueStore for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SharedError> {
        self.mutate(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<(), SharedError> {
        self.mutate(|entries| {
            entries.remove(key);
        })
    }

    fn clear(&self) -> Result<(), SharedError> {
        self.mutate(|entries| entries.clear())
    }

    fn keys(&self) -> Vec<String> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.keys().cloned().collect()
    }
}
