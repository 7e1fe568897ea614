//! Client-side storage
//!
//! A small key/value store in the shape of browser local storage. The
//! handlers keep exactly one thing in it: the signed-in user under
//! [`USER_KEY`].
//!
//! [`FileStorage`] keeps every key in a single JSON document and writes it
//! through on each change. [`MemoryStorage`] is the in-process variant.
//! [`SessionCookies`] persists the client's cookie store next to it so the
//! backend session survives between runs.

use reqwest::cookie::{CookieStore, Jar};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::client::User;

/// Key the signed-in user is stored under
pub const USER_KEY: &str = "studymind_user";

/// Errors from client-side storage
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result alias for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Key/value storage with the local-storage surface
pub trait LocalStorage {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>>;

    fn set_item(&mut self, key: &str, value: &str) -> StorageResult<()>;

    fn remove_item(&mut self, key: &str) -> StorageResult<()>;

    /// Remove every key.
    fn clear(&mut self) -> StorageResult<()>;

    /// Cached user, if one was stored and still parses.
    fn load_user(&self) -> StorageResult<Option<User>> {
        match self.get_item(USER_KEY)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Replace the cached user.
    fn save_user(&mut self, user: &User) -> StorageResult<()> {
        let raw = serde_json::to_string(user)?;
        self.set_item(USER_KEY, &raw)
    }
}

/// In-memory storage
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: BTreeMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl LocalStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> StorageResult<()> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> StorageResult<()> {
        self.items.remove(key);
        Ok(())
    }

    fn clear(&mut self) -> StorageResult<()> {
        self.items.clear();
        Ok(())
    }
}

/// Storage backed by one JSON file
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    items: BTreeMap<String, String>,
}

impl FileStorage {
    /// Open the storage file, starting empty when it does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> StorageResult<Self> {
        let path = path.into();
        let items = match std::fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => BTreeMap::new(),
            Ok(content) => serde_json::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(StorageError::Io { path, source }),
        };
        Ok(Self { path, items })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> StorageResult<()> {
        let content = serde_json::to_string_pretty(&self.items)?;
        write_atomic(&self.path, content.as_bytes())
    }
}

impl LocalStorage for FileStorage {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> StorageResult<()> {
        self.items.insert(key.to_string(), value.to_string());
        self.persist()
    }

    fn remove_item(&mut self, key: &str) -> StorageResult<()> {
        if self.items.remove(key).is_some() {
            self.persist()?;
        }
        Ok(())
    }

    fn clear(&mut self) -> StorageResult<()> {
        self.items.clear();
        self.persist()
    }
}

/// Write via a temp file in the same directory, then rename over `path`.
fn write_atomic(path: &Path, content: &[u8]) -> StorageResult<()> {
    let io_err = |source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, content).map_err(io_err)?;
    std::fs::rename(&tmp, path).map_err(io_err)
}

/// Session cookies saved between runs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionCookies {
    /// URL the cookies were captured for
    pub url: String,
    /// `name=value` pairs as sent in a `Cookie` header
    pub cookies: Vec<String>,
}

impl SessionCookies {
    /// Snapshot the cookies `jar` would send to `url`.
    pub fn capture(jar: &Jar, url: &Url) -> Self {
        let cookies = jar
            .cookies(url)
            .and_then(|header| header.to_str().ok().map(str::to_string))
            .map(|header| {
                header
                    .split(';')
                    .map(str::trim)
                    .filter(|pair| !pair.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Self {
            url: url.to_string(),
            cookies,
        }
    }

    /// Put the saved cookies back into `jar`, scoped to `url`.
    pub fn restore(&self, jar: &Jar, url: &Url) {
        if self.url != url.as_str() {
            tracing::debug!(saved = %self.url, current = %url, "ignoring cookies saved for another backend");
            return;
        }
        for pair in &self.cookies {
            jar.add_cookie_str(pair, url);
        }
    }

    pub fn load(path: &Path) -> StorageResult<Option<Self>> {
        match std::fs::read_to_string(path) {
            Ok(content) => Ok(Some(serde_json::from_str(&content)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    pub fn save(&self, path: &Path) -> StorageResult<()> {
        let content = serde_json::to_string_pretty(self)?;
        write_atomic(path, content.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn sample_user() -> User {
        serde_json::from_value(json!({
            "id": 3,
            "email": "ada@example.com",
            "first_name": "Ada",
            "last_name": "Lovelace",
            "streak": 4
        }))
        .unwrap()
    }

    #[test]
    fn test_memory_storage_user_roundtrip() {
        let mut storage = MemoryStorage::new();
        assert!(storage.load_user().unwrap().is_none());

        storage.save_user(&sample_user()).unwrap();
        assert_eq!(storage.load_user().unwrap(), Some(sample_user()));

        let raw = storage.get_item(USER_KEY).unwrap().unwrap();
        assert!(raw.contains("\"streak\":4"));
    }

    #[test]
    fn test_file_storage_persists_between_opens() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("storage.json");

        let mut storage = FileStorage::open(&path).unwrap();
        storage.save_user(&sample_user()).unwrap();
        storage.set_item("theme", "dark").unwrap();

        let reopened = FileStorage::open(&path).unwrap();
        assert_eq!(reopened.load_user().unwrap(), Some(sample_user()));
        assert_eq!(reopened.get_item("theme").unwrap().as_deref(), Some("dark"));
    }

    #[test]
    fn test_file_storage_clear() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("storage.json");

        let mut storage = FileStorage::open(&path).unwrap();
        storage.save_user(&sample_user()).unwrap();
        storage.clear().unwrap();

        let reopened = FileStorage::open(&path).unwrap();
        assert!(reopened.load_user().unwrap().is_none());
    }

    #[test]
    fn test_corrupt_user_is_an_error() {
        let mut storage = MemoryStorage::new();
        storage.set_item(USER_KEY, "{not json").unwrap();
        assert!(matches!(
            storage.load_user(),
            Err(StorageError::Serialization(_))
        ));
    }

    #[test]
    fn test_session_cookies_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cookies.json");
        let url = Url::parse("http://localhost:5000/api/").unwrap();

        let jar = Jar::default();
        jar.add_cookie_str("session=abc123; Path=/", &url);

        let saved = SessionCookies::capture(&jar, &url);
        assert_eq!(saved.cookies, vec!["session=abc123".to_string()]);
        saved.save(&path).unwrap();

        let restored_jar = Jar::default();
        SessionCookies::load(&path)
            .unwrap()
            .unwrap()
            .restore(&restored_jar, &url);

        let header = restored_jar.cookies(&url).unwrap();
        assert_eq!(header.to_str().unwrap(), "session=abc123");
    }

    #[test]
    fn test_cookies_for_other_backend_are_ignored() {
        let saved = SessionCookies {
            url: "http://old-host:5000/api/".to_string(),
            cookies: vec!["session=stale".to_string()],
        };
        let url = Url::parse("http://localhost:5000/api/").unwrap();
        let jar = Jar::default();
        saved.restore(&jar, &url);
        assert!(jar.cookies(&url).is_none());
    }
}
