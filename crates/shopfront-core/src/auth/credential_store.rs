use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::config::ConfigLocator;

use super::{AuthError, AuthTokens};

/// Persistence abstraction for the access/refresh token pair.
///
/// The provided accessors swallow storage failures into absence: the request
/// pipeline attaches a token when one can be read and sends the request
/// unauthenticated otherwise, so a broken or missing store must never fail a
/// presence check.
pub trait CredentialStore: Send + Sync {
    fn load(&self) -> Result<Option<AuthTokens>, AuthError>;
    fn save(&self, tokens: &AuthTokens) -> Result<(), AuthError>;
    /// Remove any stored tokens. Clearing an empty store is not an error.
    fn clear(&self) -> Result<(), AuthError>;

    fn access_token(&self) -> Option<String> {
        self.load()
            .ok()
            .flatten()
            .map(|tokens| tokens.access_token)
            .filter(|token| !token.is_empty())
    }

    fn refresh_token(&self) -> Option<String> {
        self.load()
            .ok()
            .flatten()
            .map(|tokens| tokens.refresh_token)
            .filter(|token| !token.is_empty())
    }

    fn has_access_token(&self) -> bool {
        self.access_token().is_some()
    }
}

/// Filesystem-backed credential storage located in the user configuration directory.
pub struct FileCredentialStore {
    locator: ConfigLocator,
}

impl FileCredentialStore {
    pub fn new(locator: ConfigLocator) -> Self {
        Self { locator }
    }

    pub fn with_default_locator() -> Result<Self, AuthError> {
        Ok(Self::new(ConfigLocator::new()?))
    }

    fn write_file(path: &Path, payload: &str) -> Result<(), AuthError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;
        file.write_all(payload.as_bytes())?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perm = file.metadata()?.permissions();
            perm.set_mode(0o600);
            fs::set_permissions(path, perm)?;
        }

        Ok(())
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Result<Option<AuthTokens>, AuthError> {
        let path = self.locator.credentials_file();
        if !path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(path)?;
        let envelope: TokenEnvelope = serde_json::from_str(&raw)?;
        Ok(Some(envelope.tokens))
    }

    fn save(&self, tokens: &AuthTokens) -> Result<(), AuthError> {
        let path = self.locator.credentials_file();
        let envelope = TokenEnvelope {
            version: 1,
            tokens: tokens.clone(),
        };
        let payload = serde_json::to_string_pretty(&envelope)?;
        Self::write_file(&path, &payload)
    }

    fn clear(&self) -> Result<(), AuthError> {
        let path = self.locator.credentials_file();
        match fs::remove_file(path) {
            Ok(_) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// In-memory credential storage, substitutable anywhere the file store is
/// used. Front-ends without a persistent home (and tests) inject this.
#[derive(Default)]
pub struct MemoryCredentialStore {
    inner: Mutex<Option<AuthTokens>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tokens(tokens: AuthTokens) -> Self {
        Self {
            inner: Mutex::new(Some(tokens)),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> Result<Option<AuthTokens>, AuthError> {
        let guard = self.inner.lock().unwrap_or_else(|err| err.into_inner());
        Ok(guard.clone())
    }

    fn save(&self, tokens: &AuthTokens) -> Result<(), AuthError> {
        let mut guard = self.inner.lock().unwrap_or_else(|err| err.into_inner());
        *guard = Some(tokens.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), AuthError> {
        let mut guard = self.inner.lock().unwrap_or_else(|err| err.into_inner());
        *guard = None;
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct TokenEnvelope {
    version: u32,
    tokens: AuthTokens,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn file_store(temp_dir: &TempDir) -> FileCredentialStore {
        let locator = ConfigLocator::from_root_for_tests(temp_dir.path().to_path_buf());
        FileCredentialStore::new(locator)
    }

    #[test]
    fn round_trip_persistence() {
        let temp_dir = TempDir::new().unwrap();
        let store = file_store(&temp_dir);
        let tokens = AuthTokens::new("access-1", "refresh-1");
        store.save(&tokens).unwrap();
        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded, tokens);
        assert!(store.has_access_token());
    }

    #[test]
    fn save_overwrites_both_tokens() {
        let temp_dir = TempDir::new().unwrap();
        let store = file_store(&temp_dir);
        store.save(&AuthTokens::new("old-access", "old-refresh")).unwrap();
        store.save(&AuthTokens::new("new-access", "new-refresh")).unwrap();
        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.access_token, "new-access");
        assert_eq!(loaded.refresh_token, "new-refresh");
    }

    #[test]
    fn clear_missing_is_ok() {
        let temp_dir = TempDir::new().unwrap();
        let store = file_store(&temp_dir);
        store.clear().unwrap();
        store.save(&AuthTokens::new("a", "r")).unwrap();
        store.clear().unwrap();
        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
        assert!(!store.has_access_token());
    }

    #[test]
    fn empty_access_token_counts_as_absent() {
        let store = MemoryCredentialStore::with_tokens(AuthTokens::new("", "refresh-1"));
        assert!(!store.has_access_token());
        assert!(store.access_token().is_none());
        assert_eq!(store.refresh_token().as_deref(), Some("refresh-1"));
    }

    #[test]
    fn memory_store_swaps_tokens() {
        let store = MemoryCredentialStore::new();
        assert!(!store.has_access_token());
        store.save(&AuthTokens::new("access-1", "refresh-1")).unwrap();
        assert_eq!(store.access_token().as_deref(), Some("access-1"));
        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }
}
