//! Network access for the offline worker.

use std::future::Future;
use std::time::Duration;

use reqwest::{header, Client, Method};
use tracing::debug;

use super::request::{AssetRequest, AssetResponse, ResponseKind};
use crate::error::FetchError;

/// HTTP request timeout in seconds.
/// 30s allows for slow responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Performs the real network request behind a cache miss.
pub trait Fetcher: Send + Sync {
    /// Resolve with whatever response the network gave, including error
    /// statuses. Only a missing response is an `Err`.
    fn fetch(
        &self,
        request: &AssetRequest,
    ) -> impl Future<Output = Result<AssetResponse, FetchError>> + Send;
}

/// Fetches assets from the origin the web front-end is served from.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
    origin: String,
}

impl HttpFetcher {
    pub fn new(origin: &str) -> Result<Self, FetchError> {
        let origin = origin.trim().trim_end_matches('/').to_string();
        if !(origin.starts_with("http://") || origin.starts_with("https://")) {
            return Err(FetchError::InvalidUrl(origin));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self { client, origin })
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Absolute URL for a request; relative paths resolve against the origin.
    pub fn resolve(&self, request: &AssetRequest) -> String {
        let url = request.normalized_url();
        if url.contains("://") {
            url
        } else {
            format!("{}{}", self.origin, url)
        }
    }

    fn kind_for(&self, url: &str) -> ResponseKind {
        let same_origin = url
            .strip_prefix(&self.origin)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'));
        if same_origin {
            ResponseKind::Basic
        } else {
            ResponseKind::Cors
        }
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch(&self, request: &AssetRequest) -> Result<AssetResponse, FetchError> {
        let method = Method::from_bytes(request.method.as_bytes())
            .map_err(|_| FetchError::InvalidMethod(request.method.clone()))?;
        let url = self.resolve(request);

        let response = self.client.request(method, &url).send().await?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());
        let body = response.bytes().await?.to_vec();

        debug!(url = %url, status, bytes = body.len(), "Fetched asset");

        Ok(AssetResponse {
            status,
            kind: self.kind_for(&url),
            content_type,
            body,
        })
    }
}
