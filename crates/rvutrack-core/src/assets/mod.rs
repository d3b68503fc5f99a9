//! Offline asset cache for the web front-end.
//!
//! This module provides the `OfflineWorker`, which pre-caches a fixed asset
//! manifest into a versioned cache generation and then serves intercepted
//! requests cache-first, falling back to the network and, when offline, to
//! the cached root document.
//!
//! - `request`: request identity and response types
//! - `storage`: named cache generations, in memory or on disk
//! - `fetcher`: the `Fetcher` seam and its reqwest implementation
//! - `worker`: install/activate lifecycle and request interception

pub mod fetcher;
pub mod request;
pub mod storage;
pub mod worker;

pub use fetcher::{Fetcher, HttpFetcher};
pub use request::{AssetRequest, AssetResponse, ResponseKind};
pub use storage::{CacheStorage, CachedData};
pub use worker::{Lifecycle, OfflineWorker, ResponseSource};
