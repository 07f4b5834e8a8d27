use reqwest::Url;
use tracing::{debug, info, warn};

use crate::config::ShellCacheSettings;

use super::network::{AssetRequest, AssetResponse, Fetcher};
use super::store::CacheStorage;
use super::{Result, ShellCacheError};

/// Cache-first lookup over one live cache version.
pub struct ShellCache<S: CacheStorage, F: Fetcher> {
    storage: S,
    fetcher: F,
    version: String,
    origin: Url,
    assets: Vec<String>,
}

impl<S: CacheStorage, F: Fetcher> ShellCache<S, F> {
    pub fn new(storage: S, fetcher: F, settings: &ShellCacheSettings) -> Result<Self> {
        let origin = parse_origin(&settings.origin)?;
        Ok(Self {
            storage,
            fetcher,
            version: settings.version.clone(),
            origin,
            assets: settings.assets.clone(),
        })
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    #[cfg(test)]
    pub(crate) fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Build a request for a manifest path or absolute URL.
    pub fn request(&self, raw: &str) -> Result<AssetRequest> {
        AssetRequest::resolve(&self.origin, raw)
    }

    /// Pre-cache every manifest asset into the live version.
    ///
    /// All assets are fetched before anything is stored: a single failed or
    /// non-2xx fetch aborts the install and leaves the cache untouched.
    pub fn install(&self) -> Result<usize> {
        self.storage.open(&self.version)?;

        let mut fetched = Vec::with_capacity(self.assets.len());
        for raw in &self.assets {
            let request = self.request(raw)?;
            let response = self.fetcher.fetch(&request)?;
            if !response.is_ok() {
                return Err(ShellCacheError::BadStatus {
                    url: request.url,
                    status: response.status,
                });
            }
            fetched.push((request, response));
        }

        for (request, response) in &fetched {
            self.storage.put(&self.version, request, response)?;
        }
        info!(version = %self.version, assets = fetched.len(), "shell cache installed");
        Ok(fetched.len())
    }

    /// Serve from any cache version, falling back to the network.
    ///
    /// Fresh `200` responses of kind `Basic` or `Cors` are stored in the live
    /// version before being returned; everything else passes through.
    pub fn fetch(&self, request: &AssetRequest) -> Result<AssetResponse> {
        match self.storage.match_any(request) {
            Ok(Some(hit)) => {
                debug!(url = %request.url, "shell cache hit");
                return Ok(hit);
            }
            Ok(None) => {}
            Err(e) => warn!(url = %request.url, error = %e, "shell cache lookup failed"),
        }

        let response = self.fetcher.fetch(request)?;
        if response.is_cacheable() {
            if let Err(e) = self.storage.put(&self.version, request, &response) {
                warn!(url = %request.url, error = %e, "failed to store shell asset");
            }
        } else {
            debug!(
                url = %request.url,
                status = response.status,
                kind = ?response.kind,
                "passing uncacheable response through"
            );
        }
        Ok(response)
    }

    /// Delete every cache version other than the live one. Returns the deleted names.
    pub fn activate(&self) -> Result<Vec<String>> {
        let mut deleted = Vec::new();
        for name in self.storage.keys()? {
            if name == self.version {
                continue;
            }
            if self.storage.delete(&name)? {
                info!(version = %name, "evicted stale shell cache");
                deleted.push(name);
            }
        }
        Ok(deleted)
    }
}

pub fn parse_origin(raw: &str) -> Result<Url> {
    Url::parse(raw).map_err(|e| ShellCacheError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })
}
