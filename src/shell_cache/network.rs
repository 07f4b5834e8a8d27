use reqwest::Url;
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Result, ShellCacheError};

/// A GET for one shell asset, addressed by absolute URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRequest {
    pub url: String,
}

impl AssetRequest {
    /// Resolve `raw` (a path like `/index.html` or an absolute URL) against `origin`.
    pub fn resolve(origin: &Url, raw: &str) -> Result<Self> {
        let url = origin.join(raw).map_err(|e| ShellCacheError::InvalidUrl {
            url: raw.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            url: url.to_string(),
        })
    }
}

/// How a response relates to the requesting origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseKind {
    /// Same-origin.
    Basic,
    /// Cross-origin with readable body.
    Cors,
    /// Cross-origin, body withheld.
    Opaque,
    /// Network-level failure surfaced as a response.
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetResponse {
    pub status: u16,
    pub kind: ResponseKind,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl AssetResponse {
    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Only complete, readable responses are stored.
    pub fn is_cacheable(&self) -> bool {
        self.status == 200 && matches!(self.kind, ResponseKind::Basic | ResponseKind::Cors)
    }
}

/// Network primitive used on cache misses.
pub trait Fetcher {
    fn fetch(&self, request: &AssetRequest) -> Result<AssetResponse>;
}

/// Blocking HTTP fetcher. Responses from `origin` are `Basic`, others `Cors`.
pub struct HttpFetcher {
    client: Client,
    origin: Url,
}

impl HttpFetcher {
    pub fn new(origin: Url) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("aura/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, origin })
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, request: &AssetRequest) -> Result<AssetResponse> {
        let url = Url::parse(&request.url).map_err(|e| ShellCacheError::InvalidUrl {
            url: request.url.clone(),
            reason: e.to_string(),
        })?;
        let kind = if url.origin() == self.origin.origin() {
            ResponseKind::Basic
        } else {
            ResponseKind::Cors
        };

        let response = self.client.get(url).send()?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.bytes()?.to_vec();

        debug!(url = %request.url, status, ?kind, bytes = body.len(), "fetched asset");
        Ok(AssetResponse {
            status,
            kind,
            content_type,
            body,
        })
    }
}
