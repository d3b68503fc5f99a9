use serde::{Deserialize, Serialize};

/// An intercepted asset request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssetRequest {
    pub method: String,
    pub url: String,
}

impl AssetRequest {
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: method.into().to_ascii_uppercase(),
            url: url.into(),
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new("GET", url)
    }

    pub fn is_get(&self) -> bool {
        self.method == "GET"
    }

    /// The request path with a leading slash; absolute URLs are kept as-is.
    /// `index.html` and `/index.html` name the same asset.
    pub fn normalized_url(&self) -> String {
        let url = self.url.trim();
        if url.contains("://") {
            url.to_string()
        } else if url.starts_with('/') {
            url.to_string()
        } else {
            format!("/{}", url)
        }
    }

    /// Identity used as the cache key.
    pub fn cache_key(&self) -> String {
        format!("{} {}", self.method, self.normalized_url())
    }
}

/// How the response relates to the page's origin, mirroring fetch's
/// response types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseKind {
    /// Same-origin response with readable body
    Basic,
    /// Cross-origin response allowed by CORS
    Cors,
    /// Cross-origin response with hidden status and body
    Opaque,
    /// Network error surfaced as a response
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetResponse {
    pub status: u16,
    pub kind: ResponseKind,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl AssetResponse {
    /// A 200 same-origin response.
    pub fn basic(body: impl Into<Vec<u8>>, content_type: Option<&str>) -> Self {
        Self {
            status: 200,
            kind: ResponseKind::Basic,
            content_type: content_type.map(|s| s.to_string()),
            body: body.into(),
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    pub fn with_kind(mut self, kind: ResponseKind) -> Self {
        self.kind = kind;
        self
    }

    /// Status in the 2xx range.
    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Only plain 200 same-origin responses are stored when intercepting.
    pub fn is_cacheable(&self) -> bool {
        self.status == 200 && self.kind == ResponseKind::Basic
    }
}
