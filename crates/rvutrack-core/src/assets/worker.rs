//! Offline worker lifecycle and request interception.

use futures::future::try_join_all;
use tracing::{debug, info, warn};

use super::fetcher::Fetcher;
use super::request::{AssetRequest, AssetResponse};
use super::storage::CacheStorage;
use crate::config::CacheSettings;
use crate::error::CacheError;

/// Path of the document served when the network is unreachable.
const OFFLINE_FALLBACK_PATH: &str = "/";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Uninstalled,
    Installing,
    Installed,
    Activating,
    Active,
}

impl Lifecycle {
    pub fn name(&self) -> &'static str {
        match self {
            Lifecycle::Uninstalled => "uninstalled",
            Lifecycle::Installing => "installing",
            Lifecycle::Installed => "installed",
            Lifecycle::Activating => "activating",
            Lifecycle::Active => "active",
        }
    }
}

/// Where a response handed back by `handle_fetch` came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseSource {
    Cache,
    Network,
    /// Network failed; the cached root document was served instead.
    OfflineFallback,
}

pub struct OfflineWorker<F> {
    fetcher: F,
    storage: CacheStorage,
    version: String,
    manifest: Vec<AssetRequest>,
    state: Lifecycle,
}

impl<F: Fetcher> OfflineWorker<F> {
    pub fn new(settings: &CacheSettings, fetcher: F, storage: CacheStorage) -> Self {
        Self {
            fetcher,
            storage,
            version: settings.version.clone(),
            manifest: settings.manifest.iter().map(AssetRequest::get).collect(),
            state: Lifecycle::Uninstalled,
        }
    }

    pub fn state(&self) -> Lifecycle {
        self.state
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn storage(&self) -> &CacheStorage {
        &self.storage
    }

    /// Fetch every manifest asset and commit them to the current cache
    /// generation. Any failure aborts the install with nothing stored and
    /// leaves the worker uninstalled so the install can be retried.
    pub async fn install(&mut self) -> Result<(), CacheError> {
        if self.state != Lifecycle::Uninstalled {
            return Err(CacheError::InvalidState {
                action: "install",
                state: self.state.name(),
            });
        }
        self.state = Lifecycle::Installing;
        info!(version = %self.version, assets = self.manifest.len(), "Installing offline cache");

        let installed = match self.fetch_manifest().await {
            Ok(entries) => self.storage.put_all(&self.version, entries).await,
            Err(e) => Err(e),
        };
        match installed {
            Ok(()) => {
                self.state = Lifecycle::Installed;
                info!(version = %self.version, "Offline cache installed");
                Ok(())
            }
            Err(e) => {
                warn!(version = %self.version, error = %e, "Offline cache install failed");
                self.state = Lifecycle::Uninstalled;
                Err(e)
            }
        }
    }

    async fn fetch_manifest(&self) -> Result<Vec<(AssetRequest, AssetResponse)>, CacheError> {
        let fetches = self.manifest.iter().map(|request| async move {
            let response = self
                .fetcher
                .fetch(request)
                .await
                .map_err(|source| CacheError::AssetUnavailable {
                    asset: request.normalized_url(),
                    source,
                })?;
            if !response.is_ok() {
                return Err(CacheError::from_status(
                    &request.normalized_url(),
                    response.status,
                    &response.body,
                ));
            }
            Ok((request.clone(), response))
        });
        try_join_all(fetches).await
    }

    /// Drop every cache generation other than the current one.
    pub async fn activate(&mut self) -> Result<(), CacheError> {
        if self.state != Lifecycle::Installed {
            return Err(CacheError::InvalidState {
                action: "activate",
                state: self.state.name(),
            });
        }
        self.state = Lifecycle::Activating;

        for name in self.storage.keys().await {
            if name != self.version {
                match self.storage.delete(&name).await {
                    Ok(_) => info!(cache = %name, "Deleted stale cache generation"),
                    Err(e) => {
                        self.state = Lifecycle::Installed;
                        return Err(e);
                    }
                }
            }
        }

        self.state = Lifecycle::Active;
        info!(version = %self.version, "Offline cache active");
        Ok(())
    }

    /// Install then activate.
    pub async fn start(&mut self) -> Result<(), CacheError> {
        self.install().await?;
        self.activate().await
    }

    /// Serve an intercepted request.
    pub async fn handle_fetch(&self, request: &AssetRequest) -> Result<AssetResponse, CacheError> {
        self.handle_fetch_with_source(request)
            .await
            .map(|(response, _)| response)
    }

    /// Like `handle_fetch`, also reporting where the response came from.
    ///
    /// Until the worker is active every request goes straight to the
    /// network. Once active: cache hits are returned verbatim; misses are
    /// fetched and, if they are plain 200 same-origin responses, stored
    /// first; a failed fetch falls back to the cached root document.
    pub async fn handle_fetch_with_source(
        &self,
        request: &AssetRequest,
    ) -> Result<(AssetResponse, ResponseSource), CacheError> {
        if self.state != Lifecycle::Active {
            let response = self.fetcher.fetch(request).await?;
            return Ok((response, ResponseSource::Network));
        }

        if let Some(cached) = self.storage.match_request(request).await {
            debug!(key = %request.cache_key(), "Cache hit");
            return Ok((cached, ResponseSource::Cache));
        }

        match self.fetcher.fetch(request).await {
            Ok(response) => {
                if request.is_get() && response.is_cacheable() {
                    if let Err(e) = self.storage.put(&self.version, request, response.clone()).await {
                        warn!(key = %request.cache_key(), error = %e, "Failed to cache response");
                    }
                } else {
                    debug!(
                        key = %request.cache_key(),
                        status = response.status,
                        kind = ?response.kind,
                        "Passing response through uncached"
                    );
                }
                Ok((response, ResponseSource::Network))
            }
            Err(e) => {
                let fallback = AssetRequest::get(OFFLINE_FALLBACK_PATH);
                match self.storage.match_request(&fallback).await {
                    Some(root) => {
                        warn!(key = %request.cache_key(), error = %e, "Network failed, serving cached root");
                        Ok((root, ResponseSource::OfflineFallback))
                    }
                    None => Err(CacheError::Fetch(e)),
                }
            }
        }
    }
}
