//! Configuration service implementation.
//!
//! This module provides a ConfigService that loads the client configuration
//! from the configuration file (~/.config/blogdesk/config.toml).

use blogdesk_core::config::ClientConfig;
use blogdesk_core::error::{BlogError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// Configuration service that loads and caches the client configuration.
///
/// A missing or empty file yields the default configuration. A file that
/// exists but does not parse is reported as `BlogError::Config`.
#[derive(Debug, Clone)]
pub struct ConfigService {
    /// Explicit config path; `None` resolves the platform default
    path: Option<PathBuf>,
    /// Cached configuration loaded from file.
    /// Uses RwLock for thread-safe lazy loading.
    config: Arc<RwLock<Option<ClientConfig>>>,
}

impl ConfigService {
    /// Creates a ConfigService reading the platform default path.
    ///
    /// The configuration is loaded lazily on first access.
    pub fn new() -> Self {
        Self {
            path: None,
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Creates a ConfigService reading `path`.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Gets the client configuration, loading from file if not cached.
    pub fn get_config(&self) -> Result<ClientConfig> {
        // Check if already cached
        {
            let read_lock = self.config.read().unwrap_or_else(|e| e.into_inner());
            if let Some(ref cached) = *read_lock {
                return Ok(cached.clone());
            }
        }

        let loaded = match self.config_path() {
            Some(path) => Self::load_from(&path)?,
            None => {
                tracing::warn!("[ConfigService] No config directory, using defaults");
                ClientConfig::default()
            }
        };

        // Cache it
        {
            let mut write_lock = self.config.write().unwrap_or_else(|e| e.into_inner());
            *write_lock = Some(loaded.clone());
        }

        Ok(loaded)
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        let mut write_lock = self.config.write().unwrap_or_else(|e| e.into_inner());
        *write_lock = None;
    }

    /// Path the configuration is read from.
    pub fn config_path(&self) -> Option<PathBuf> {
        self.path.clone().or_else(Self::default_config_path)
    }

    /// `<config_dir>/blogdesk/config.toml`
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("blogdesk").join("config.toml"))
    }

    fn load_from(path: &Path) -> Result<ClientConfig> {
        if !path.exists() {
            tracing::debug!("[ConfigService] {:?} not found, using defaults", path);
            return Ok(ClientConfig::default());
        }

        let content = fs::read_to_string(path).map_err(|e| {
            BlogError::config(format!("Failed to read config file at {:?}: {}", path, e))
        })?;

        if content.trim().is_empty() {
            return Ok(ClientConfig::default());
        }

        toml::from_str(&content).map_err(|e| {
            BlogError::config(format!("Failed to parse TOML from {:?}: {}", path, e))
        })
    }
}

impl Default for ConfigService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let service = ConfigService::with_path(dir.path().join("config.toml"));

        assert_eq!(service.get_config().unwrap(), ClientConfig::default());
    }

    #[test]
    fn test_reads_overrides_and_caches() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "collection = \"posts\"\nmin_password_length = 10\n").unwrap();
        let service = ConfigService::with_path(&path);

        let config = service.get_config().unwrap();
        assert_eq!(config.collection, "posts");
        assert_eq!(config.min_password_length, 10);
        assert_eq!(config.entry_view, "/login");

        // Cached until invalidated
        fs::write(&path, "collection = \"other\"\n").unwrap();
        assert_eq!(service.get_config().unwrap().collection, "posts");
        service.invalidate_cache();
        assert_eq!(service.get_config().unwrap().collection, "other");
    }

    #[test]
    fn test_unparsable_file_is_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "collection = [unterminated").unwrap();
        let service = ConfigService::with_path(&path);

        let result = service.get_config();
        assert!(matches!(result, Err(BlogError::Config(_))));
    }
}
