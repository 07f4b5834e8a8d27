//! Offline cache for the application shell.
//!
//! Shell assets are pre-cached into a named cache version at install time,
//! served cache-first afterwards, and stale versions are evicted on activate.
//!
//! - `store`: named cache versions on disk (`CacheStorage`, `DiskCacheStorage`)
//! - `network`: the fetch primitive (`Fetcher`, `HttpFetcher`)
//! - `strategy`: the lifecycle and lookup policy (`ShellCache`)

use std::io;
use std::path::PathBuf;

use thiserror::Error;

mod network;
mod store;
mod strategy;

pub use network::{AssetRequest, AssetResponse, Fetcher, HttpFetcher, ResponseKind};
pub use store::{CacheStorage, DiskCacheStorage};
pub use strategy::{ShellCache, parse_origin};

#[derive(Debug, Error)]
pub enum ShellCacheError {
    #[error("cache i/o error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("corrupt cache entry {path}: {source}")]
    Entry {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to encode cache entry: {0}")]
    Encode(#[from] toml::ser::Error),

    #[error("invalid cache name {0:?}")]
    InvalidName(String),

    #[error("invalid asset url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("{url} answered with status {status}")]
    BadStatus { url: String, status: u16 },
}

pub type Result<T> = std::result::Result<T, ShellCacheError>;

#[cfg(test)]
mod tests;
