//! Persisted client state. Tokens live in a small key-value record under the
//! `auth` key so they survive restarts; other keys in the record are preserved.
//! Files are written owner-only since they hold bearer credentials.

use super::error::StorageError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
    sync::{Mutex, PoisonError},
};
use tracing::{debug, warn};

pub const STORAGE_KEY: &str = "auth";

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredTokens {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

impl StoredTokens {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.token.is_none() && self.refresh_token.is_none()
    }

    /// Exactly one of the two tokens is present.
    #[must_use]
    pub fn is_partial(&self) -> bool {
        self.token.is_some() != self.refresh_token.is_some()
    }
}

pub trait TokenStorage: Send + Sync {
    /// # Errors
    /// Returns an error if the record exists but cannot be read or decoded.
    fn load(&self) -> Result<StoredTokens, StorageError>;

    /// # Errors
    /// Returns an error if the record cannot be written.
    fn save(&self, tokens: &StoredTokens) -> Result<(), StorageError>;
}

/// JSON file holding the key-value record.
#[derive(Clone, Debug)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_record(&self) -> Result<Map<String, Value>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(Map::new()),
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Map::new()),
            Err(err) => Err(err.into()),
        }
    }

    fn write_record(&self, record: &Map<String, Value>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let payload = serde_json::to_vec_pretty(record)?;
        let tmp_path = self.path.with_extension("tmp");

        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options.open(&tmp_path)?;
        file.write_all(&payload)?;
        file.sync_all()?;
        fs::rename(&tmp_path, &self.path)?;

        Ok(())
    }
}

impl TokenStorage for FileStorage {
    fn load(&self) -> Result<StoredTokens, StorageError> {
        let record = self.read_record()?;
        let tokens = match record.get(STORAGE_KEY) {
            Some(value) => serde_json::from_value(value.clone())?,
            None => StoredTokens::default(),
        };

        debug!(path = %self.path.display(), empty = tokens.is_empty(), "loaded session record");

        Ok(tokens)
    }

    fn save(&self, tokens: &StoredTokens) -> Result<(), StorageError> {
        let mut record = self.read_record().unwrap_or_else(|err| {
            warn!(path = %self.path.display(), error = %err, "replacing unreadable session record");
            Map::new()
        });
        record.insert(STORAGE_KEY.to_string(), serde_json::to_value(tokens)?);

        self.write_record(&record)
    }
}

/// In-process storage for embedding and tests; nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    tokens: Mutex<StoredTokens>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new(tokens: StoredTokens) -> Self {
        Self {
            tokens: Mutex::new(tokens),
        }
    }

    #[must_use]
    pub fn tokens(&self) -> StoredTokens {
        self.tokens
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl TokenStorage for MemoryStorage {
    fn load(&self) -> Result<StoredTokens, StorageError> {
        Ok(self.tokens())
    }

    fn save(&self, tokens: &StoredTokens) -> Result<(), StorageError> {
        *self.tokens.lock().unwrap_or_else(PoisonError::into_inner) = tokens.clone();
        Ok(())
    }
}
