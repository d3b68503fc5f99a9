//! Application configuration.
//!
//! The exam catalog, the offline cache version, and the asset manifest are
//! read once at startup into an immutable `AppConfig` that is handed to the
//! calculator and the offline worker. Every field is optional in the file;
//! missing values fall back to the built-in defaults.
//!
//! Configuration is stored at `~/.config/rvutrack/config.json`, or wherever
//! `RVUTRACK_CONFIG` points.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;
use crate::models::ExamCatalog;

/// Application name used for config/cache directory paths
const APP_NAME: &str = "rvutrack";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Subdirectory of the cache directory holding asset cache generations
const ASSET_CACHE_DIR: &str = "assets";

/// Environment variable overriding the config file location
pub const CONFIG_PATH_ENV: &str = "RVUTRACK_CONFIG";

/// Bumping this is the only way to invalidate the offline cache.
pub const DEFAULT_CACHE_VERSION: &str = "rvu-app-cache-v1";

/// Assets needed to run the web front-end offline.
pub const DEFAULT_ASSET_MANIFEST: [&str; 7] = [
    "/",
    "index.html",
    "style.css",
    "script.js",
    "manifest.json",
    "icons/icon-192x192.png",
    "icons/icon-512x512.png",
];

/// On-disk config file. Everything is optional.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub catalog: Option<ExamCatalog>,
    pub cache_version: Option<String>,
    pub asset_manifest: Option<Vec<String>>,
    pub asset_origin: Option<String>,
    pub cache_dir: Option<PathBuf>,
}

impl Config {
    /// Load from the default location. A missing file yields the defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "Config loaded");
        Ok(config)
    }

    pub fn config_path() -> Result<PathBuf, ConfigError> {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            if !path.trim().is_empty() {
                return Ok(PathBuf::from(path));
            }
        }
        let config_dir = dirs::config_dir().ok_or(ConfigError::MissingDirectory("config"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Directory holding persisted cache generations.
    pub fn cache_dir(&self) -> Result<PathBuf, ConfigError> {
        if let Some(ref dir) = self.cache_dir {
            return Ok(dir.clone());
        }
        let cache_dir = dirs::cache_dir().ok_or(ConfigError::MissingDirectory("cache"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    /// Validate and freeze into the runtime configuration.
    pub fn into_app_config(self) -> Result<AppConfig, ConfigError> {
        let storage_dir = self.cache_dir().ok().map(|dir| dir.join(ASSET_CACHE_DIR));

        let version = self
            .cache_version
            .unwrap_or_else(|| DEFAULT_CACHE_VERSION.to_string());
        if version.trim().is_empty() {
            return Err(ConfigError::EmptyCacheVersion);
        }

        let manifest = self
            .asset_manifest
            .unwrap_or_else(|| DEFAULT_ASSET_MANIFEST.iter().map(|s| s.to_string()).collect());
        if manifest.is_empty() {
            return Err(ConfigError::EmptyManifest);
        }

        Ok(AppConfig {
            catalog: Arc::new(self.catalog.unwrap_or_default()),
            cache: CacheSettings {
                version,
                manifest,
                origin: self.asset_origin,
                storage_dir,
            },
        })
    }
}

/// Offline cache settings.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheSettings {
    pub version: String,
    pub manifest: Vec<String>,
    /// Origin the web front-end is served from, e.g. `https://rvu.example.org`.
    pub origin: Option<String>,
    /// Where cache generations are persisted; `None` keeps them in memory.
    pub storage_dir: Option<PathBuf>,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            version: DEFAULT_CACHE_VERSION.to_string(),
            manifest: DEFAULT_ASSET_MANIFEST.iter().map(|s| s.to_string()).collect(),
            origin: None,
            storage_dir: None,
        }
    }
}

/// Runtime configuration, created once at startup and never mutated.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub catalog: Arc<ExamCatalog>,
    pub cache: CacheSettings,
}

impl AppConfig {
    /// Load the config file and validate it.
    pub fn load() -> Result<Self, ConfigError> {
        Config::load()?.into_app_config()
    }
}
