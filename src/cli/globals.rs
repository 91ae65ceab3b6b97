use crate::api::{ApiClient, ApiConfig};
use crate::session::{FileStorage, SessionStore};
use anyhow::{Context, Result};
use std::{path::PathBuf, sync::Arc};

#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub api: ApiConfig,
    pub session_file: PathBuf,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(api: ApiConfig, session_file: PathBuf) -> Self {
        Self { api, session_file }
    }

    /// Opens the session store backed by the configured session file.
    ///
    /// # Errors
    /// Returns an error if the API base is invalid or the session file is unreadable.
    pub fn open_session(&self) -> Result<Arc<SessionStore>> {
        let api = ApiClient::new(&self.api).context("invalid API configuration")?;
        let storage = Arc::new(FileStorage::new(&self.session_file));
        let store = SessionStore::open(api, storage).with_context(|| {
            format!(
                "failed to open session file {}",
                self.session_file.display()
            )
        })?;

        Ok(Arc::new(store))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_global_args() {
        let args = GlobalArgs::new(ApiConfig::default(), PathBuf::from("/tmp/session.json"));
        assert_eq!(args.api.api_base, "/api");
        assert_eq!(args.session_file, PathBuf::from("/tmp/session.json"));
    }

    #[test]
    fn open_session_reads_persisted_tokens() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("session.json");
        fs::write(
            &path,
            r#"{"auth": {"token": "access-1", "refreshToken": "refresh-1"}}"#,
        )
        .unwrap();

        let store = GlobalArgs::new(ApiConfig::default(), path)
            .open_session()
            .unwrap();
        assert!(store.is_signed_in());
        assert!(!store.needs_login());
    }

    #[test]
    fn open_session_rejects_corrupt_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("session.json");
        fs::write(&path, "{broken").unwrap();

        let err = GlobalArgs::new(ApiConfig::default(), path)
            .open_session()
            .err()
            .unwrap();
        assert!(err.to_string().contains("failed to open session file"));
    }
}
