//! Named cache storage.
//!
//! Holds one map of request key -> response per cache name. When created
//! with a directory, each cache generation is also written to
//! `<dir>/<name>.json` after every change and read back on startup, so an
//! installed generation survives restarts.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, warn};

use super::request::{AssetRequest, AssetResponse};
use crate::error::CacheError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedData<T> {
    pub data: T,
    pub cached_at: DateTime<Utc>,
}

impl<T> CachedData<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            cached_at: Utc::now(),
        }
    }

    pub fn age_minutes(&self) -> i64 {
        (Utc::now() - self.cached_at).num_minutes()
    }

    pub fn age_display(&self) -> String {
        let minutes = self.age_minutes();
        if minutes < 1 {
            // Also covers clock skew
            "just now".to_string()
        } else if minutes < 60 {
            format!("{}m ago", minutes)
        } else if minutes < 1440 {
            format!("{}h ago", minutes / 60)
        } else {
            format!("{}d ago", minutes / 1440)
        }
    }
}

/// One cache generation as read back from disk.
#[derive(Debug, Default, Deserialize)]
struct StoredCache {
    name: String,
    entries: Generation,
}

/// One cache generation as written to disk.
#[derive(Serialize)]
struct StoredCacheRef<'a> {
    name: &'a str,
    entries: &'a Generation,
}

type Generation = BTreeMap<String, CachedData<AssetResponse>>;
type NamedCaches = BTreeMap<String, Generation>;

/// Shared handle to all named caches. Clone is cheap.
///
/// Writers build the new generation from a snapshot, write it out, and only
/// then swap it into the map, so a failed write leaves memory untouched.
/// The map lock is never held across file I/O.
#[derive(Debug, Clone, Default)]
pub struct CacheStorage {
    caches: Arc<RwLock<NamedCaches>>,
    /// Serializes writers so the file on disk always matches the map.
    writer: Arc<Mutex<()>>,
    root: Option<PathBuf>,
}

impl CacheStorage {
    /// Storage that lives only as long as the process.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Storage persisted under `root`, loading any generations already there.
    pub fn open_dir(root: impl Into<PathBuf>) -> Result<Self, CacheError> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;

        let mut caches = NamedCaches::new();
        for entry in std::fs::read_dir(&root)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match Self::read_cache_file(&path) {
                Ok(stored) => {
                    debug!(cache = %stored.name, entries = stored.entries.len(), "Loaded cache generation");
                    caches.insert(stored.name, stored.entries);
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Skipping unreadable cache file");
                }
            }
        }

        Ok(Self {
            caches: Arc::new(RwLock::new(caches)),
            writer: Arc::new(Mutex::new(())),
            root: Some(root),
        })
    }

    fn read_cache_file(path: &Path) -> Result<StoredCache, CacheError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// File name for a cache, with anything outside `[A-Za-z0-9._-]` replaced.
    fn cache_path(root: &Path, name: &str) -> PathBuf {
        let safe: String = name
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        root.join(format!("{}.json", safe))
    }

    /// Write a generation to disk, or remove its file when `entries` is `None`.
    /// The file is replaced by rename so readers never see half a generation.
    async fn persist(&self, name: &str, entries: Option<&Generation>) -> Result<(), CacheError> {
        let Some(ref root) = self.root else {
            return Ok(());
        };
        let path = Self::cache_path(root, name);
        match entries {
            Some(entries) => {
                let json = serde_json::to_vec_pretty(&StoredCacheRef { name, entries })?;
                let tmp = path.with_extension("json.tmp");
                tokio::fs::write(&tmp, json).await?;
                tokio::fs::rename(&tmp, &path).await?;
            }
            None => match tokio::fs::remove_file(&path).await {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            },
        }
        Ok(())
    }

    async fn snapshot(&self, name: &str) -> Option<Generation> {
        self.caches.read().await.get(name).cloned()
    }

    /// Persist `generation`, then make it visible. Caller holds `writer`.
    async fn commit(&self, name: &str, generation: Generation) -> Result<(), CacheError> {
        self.persist(name, Some(&generation)).await?;
        self.caches.write().await.insert(name.to_string(), generation);
        Ok(())
    }

    /// Create the named cache if it does not exist yet.
    pub async fn open(&self, name: &str) -> Result<(), CacheError> {
        let _writer = self.writer.lock().await;
        if self.caches.read().await.contains_key(name) {
            return Ok(());
        }
        self.commit(name, Generation::new()).await
    }

    /// All cache names, sorted.
    pub async fn keys(&self) -> Vec<String> {
        self.caches.read().await.keys().cloned().collect()
    }

    /// Remove a whole cache. Returns whether it existed.
    pub async fn delete(&self, name: &str) -> Result<bool, CacheError> {
        let _writer = self.writer.lock().await;
        self.persist(name, None).await?;
        Ok(self.caches.write().await.remove(name).is_some())
    }

    /// Look a request up across every cache.
    pub async fn match_request(&self, request: &AssetRequest) -> Option<AssetResponse> {
        let key = request.cache_key();
        let caches = self.caches.read().await;
        caches
            .values()
            .find_map(|entries| entries.get(&key))
            .map(|cached| cached.data.clone())
    }

    /// Look a request up in a single cache, including when it was stored.
    pub async fn entry(&self, name: &str, request: &AssetRequest) -> Option<CachedData<AssetResponse>> {
        let caches = self.caches.read().await;
        caches.get(name)?.get(&request.cache_key()).cloned()
    }

    /// Store one response, creating the cache if needed. Last write wins.
    pub async fn put(
        &self,
        name: &str,
        request: &AssetRequest,
        response: AssetResponse,
    ) -> Result<(), CacheError> {
        let _writer = self.writer.lock().await;
        let mut generation = self.snapshot(name).await.unwrap_or_default();
        generation.insert(request.cache_key(), CachedData::new(response));
        self.commit(name, generation).await
    }

    /// Store a batch of responses, creating the cache if needed. Readers see
    /// either none or all of them, and nothing is kept if the write fails.
    pub async fn put_all(
        &self,
        name: &str,
        entries: Vec<(AssetRequest, AssetResponse)>,
    ) -> Result<(), CacheError> {
        let _writer = self.writer.lock().await;
        let mut generation = self.snapshot(name).await.unwrap_or_default();
        for (request, response) in entries {
            generation.insert(request.cache_key(), CachedData::new(response));
        }
        self.commit(name, generation).await
    }

    /// Request keys stored in a cache, sorted. Empty if the cache is absent.
    pub async fn entries(&self, name: &str) -> Vec<String> {
        let caches = self.caches.read().await;
        caches
            .get(name)
            .map(|entries| entries.keys().cloned().collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_cached_data_age_display() {
        let fresh = CachedData::new(1);
        assert_eq!(fresh.age_display(), "just now");

        let mut old = CachedData::new(1);
        old.cached_at = Utc::now() - Duration::minutes(90);
        assert_eq!(old.age_display(), "1h ago");

        old.cached_at = Utc::now() - Duration::days(3);
        assert_eq!(old.age_display(), "3d ago");
    }

    #[test]
    fn test_cache_path_is_sanitized() {
        let path = CacheStorage::cache_path(Path::new("/tmp"), "rvu/app cache:v1");
        assert_eq!(path, PathBuf::from("/tmp/rvu_app_cache_v1.json"));
    }

    #[tokio::test]
    async fn test_put_and_match() {
        let storage = CacheStorage::in_memory();
        storage.open("v1").await.expect("open");
        assert_eq!(storage.keys().await, vec!["v1".to_string()]);

        let request = AssetRequest::get("style.css");
        storage
            .put("v1", &request, AssetResponse::basic("body{}", Some("text/css")))
            .await
            .expect("put");

        let hit = storage.match_request(&AssetRequest::get("/style.css")).await;
        assert_eq!(hit.map(|r| r.body), Some(b"body{}".to_vec()));
        assert!(storage.match_request(&AssetRequest::get("/missing.js")).await.is_none());
        assert_eq!(storage.entries("v1").await, vec!["GET /style.css".to_string()]);
    }

    #[tokio::test]
    async fn test_delete_cache() {
        let storage = CacheStorage::in_memory();
        storage.open("v1").await.expect("open");
        storage.open("v2").await.expect("open");
        assert_eq!(storage.keys().await, vec!["v1".to_string(), "v2".to_string()]);

        assert!(storage.delete("v1").await.expect("delete"));
        assert!(!storage.delete("v1").await.expect("delete"));
        assert_eq!(storage.keys().await, vec!["v2".to_string()]);
    }

    #[tokio::test]
    async fn test_disk_storage_survives_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");
        {
            let storage = CacheStorage::open_dir(dir.path()).expect("open dir");
            storage
                .put_all(
                    "rvu-app-cache-v1",
                    vec![
                        (AssetRequest::get("/"), AssetResponse::basic("<html>", Some("text/html"))),
                        (AssetRequest::get("script.js"), AssetResponse::basic("(()=>{})()", None)),
                    ],
                )
                .await
                .expect("put_all");
            storage.open("stale").await.expect("open");
            storage.delete("stale").await.expect("delete");
        }

        let reopened = CacheStorage::open_dir(dir.path()).expect("reopen");
        assert_eq!(reopened.keys().await, vec!["rvu-app-cache-v1".to_string()]);
        assert_eq!(
            reopened.entries("rvu-app-cache-v1").await,
            vec!["GET /".to_string(), "GET /script.js".to_string()]
        );
        let root = reopened.match_request(&AssetRequest::get("/")).await.expect("cached root");
        assert_eq!(root.body, b"<html>".to_vec());
    }

    #[tokio::test]
    async fn test_failed_write_leaves_memory_unchanged() {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = dir.path().join("assets");
        let storage = CacheStorage::open_dir(&root).expect("open dir");
        storage
            .put("v1", &AssetRequest::get("/"), AssetResponse::basic("<html>", None))
            .await
            .expect("put");

        std::fs::remove_dir_all(&root).expect("remove dir");

        assert!(storage
            .put("v1", &AssetRequest::get("/style.css"), AssetResponse::basic("body{}", None))
            .await
            .is_err());
        assert!(storage
            .put_all("v2", vec![(AssetRequest::get("/"), AssetResponse::basic("new", None))])
            .await
            .is_err());
        assert!(storage.open("v3").await.is_err());

        assert_eq!(storage.keys().await, vec!["v1".to_string()]);
        assert_eq!(storage.entries("v1").await, vec!["GET /".to_string()]);
        assert!(storage.match_request(&AssetRequest::get("/style.css")).await.is_none());
    }

    #[tokio::test]
    async fn test_readers_not_blocked_by_pending_writer() {
        let storage = CacheStorage::in_memory();
        storage
            .put("v1", &AssetRequest::get("/"), AssetResponse::basic("root", None))
            .await
            .expect("put");

        // A writer waiting on disk holds only the writer mutex, never the map.
        let _pending = storage.writer.lock().await;
        let hit = storage.match_request(&AssetRequest::get("/")).await;
        assert_eq!(hit.map(|r| r.body), Some(b"root".to_vec()));
        assert_eq!(storage.keys().await, vec!["v1".to_string()]);
    }

    #[tokio::test]
    async fn test_entry_reports_cached_time() {
        let storage = CacheStorage::in_memory();
        let request = AssetRequest::get("index.html");
        storage
            .put("v1", &request, AssetResponse::basic("<html>", None))
            .await
            .expect("put");

        let entry = storage.entry("v1", &request).await.expect("cached");
        assert_eq!(entry.age_display(), "just now");
        assert!(storage.entry("v2", &request).await.is_none());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_skipped() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("broken.json"), "{not json").expect("write");
        let storage = CacheStorage::open_dir(dir.path()).expect("open dir");
        assert!(storage.keys().await.is_empty());
    }
}
