use std::env;
use std::fs;
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use thiserror::Error;
use url::Url;

/// Environment variable overriding the backend base URL.
pub const BASE_URL_ENV: &str = "SHOPFRONT_API_URL";

/// Default backend base URL used when no override is set.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Backend endpoint configuration shared by the auth client and API client.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: Url,
}

impl ApiConfig {
    pub fn new(base_url: Url) -> Self {
        Self { base_url }
    }

    /// Resolve the base URL from `SHOPFRONT_API_URL`, falling back to the
    /// local development backend.
    pub fn from_env() -> Result<Self, ConfigError> {
        match env::var(BASE_URL_ENV) {
            Ok(raw) if !raw.trim().is_empty() => {
                let url = Url::parse(raw.trim()).map_err(|source| ConfigError::InvalidBaseUrl {
                    value: raw,
                    source,
                })?;
                Ok(Self::new(url))
            }
            _ => Ok(Self::default()),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(Url::parse(DEFAULT_BASE_URL).expect("default base URL parses"))
    }
}

/// Application-specific configuration helpers.
#[derive(Debug, Clone)]
pub struct ConfigLocator {
    root: PathBuf,
}

impl ConfigLocator {
    /// Attempt to discover the persistent configuration directory, creating it if needed.
    pub fn new() -> Result<Self, ConfigError> {
        let dirs = ProjectDirs::from("app", "shopfront", "shopfront-rs")
            .ok_or(ConfigError::MissingProjectDirs)?;
        let config_dir = dirs.config_dir();
        fs::create_dir_all(config_dir).map_err(ConfigError::CreateDir)?;
        set_user_only_permissions(config_dir)?;
        Ok(Self {
            root: config_dir.to_path_buf(),
        })
    }

    /// Path to the stored credentials file.
    pub fn credentials_file(&self) -> PathBuf {
        self.root.join("credentials.json")
    }

    #[cfg(test)]
    pub(crate) fn from_root_for_tests(root: PathBuf) -> Self {
        Self { root }
    }
}

fn set_user_only_permissions(path: &Path) -> Result<(), ConfigError> {
    #[cfg(unix)]
    {
        let metadata = fs::metadata(path)?;
        let mut permissions = metadata.permissions();
        permissions.set_mode(0o700);
        fs::set_permissions(path, permissions)?;
        Ok(())
    }
    #[cfg(not(unix))]
    {
        let _ = path;
        Ok(())
    }
}

/// Errors that can occur when resolving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unable to determine configuration directory for shopfront-rs")]
    MissingProjectDirs,
    #[error("failed to create configuration directory: {0}")]
    CreateDir(#[source] std::io::Error),
    #[error("filesystem error: {0}")]
    Io(#[source] std::io::Error),
    #[error("invalid base URL '{value}': {source}")]
    InvalidBaseUrl {
        value: String,
        source: url::ParseError,
    },
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Io(err)
    }
}
