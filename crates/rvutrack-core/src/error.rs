use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Exam catalog must contain at least one exam")]
    EmptyCatalog,

    #[error("Exam catalog entry has an empty name")]
    UnnamedExam,

    #[error("Exam '{exam}' has invalid RVU value {units} (must be a positive number)")]
    InvalidUnits { exam: String, units: f64 },

    #[error("Asset manifest must list at least one asset")]
    EmptyManifest,

    #[error("Cache version must not be empty")]
    EmptyCacheVersion,

    #[error("Could not find {0} directory")]
    MissingDirectory(&'static str),

    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum FormError {
    #[error("No exam at index {index} (catalog has {len} exams)")]
    IndexOutOfRange { index: usize, len: usize },
}

/// A fetch that produced no response at all.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Network unavailable: {0}")]
    Offline(String),

    #[error("Invalid asset URL: {0}")]
    InvalidUrl(String),

    #[error("Unsupported request method: {0}")]
    InvalidMethod(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Failed to fetch asset {asset}: {source}")]
    AssetUnavailable {
        asset: String,
        #[source]
        source: FetchError,
    },

    #[error("Asset {asset} returned status {status}: {body}")]
    BadStatus {
        asset: String,
        status: u16,
        body: String,
    },

    #[error("Cannot {action} while worker is {state}")]
    InvalidState {
        action: &'static str,
        state: &'static str,
    },

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Cache storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cache storage is corrupt: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Maximum length for response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 200;

impl CacheError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &[u8]) -> String {
        let text = String::from_utf8_lossy(body);
        if text.len() <= MAX_ERROR_BODY_LENGTH {
            text.into_owned()
        } else {
            let cut: String = text.chars().take(MAX_ERROR_BODY_LENGTH).collect();
            format!("{}... (truncated, {} total bytes)", cut, body.len())
        }
    }

    pub fn from_status(asset: &str, status: u16, body: &[u8]) -> Self {
        CacheError::BadStatus {
            asset: asset.to_string(),
            status,
            body: Self::truncate_body(body),
        }
    }
}
