use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::network::{AssetRequest, AssetResponse, ResponseKind};
use super::{Result, ShellCacheError};

/// Named cache versions holding request/response pairs.
pub trait CacheStorage {
    /// Names of every existing cache version.
    fn keys(&self) -> Result<Vec<String>>;
    /// Create the named version if it does not exist yet.
    fn open(&self, name: &str) -> Result<()>;
    /// Remove the named version. Returns `false` if there was nothing to remove.
    fn delete(&self, name: &str) -> Result<bool>;
    fn put(&self, name: &str, request: &AssetRequest, response: &AssetResponse) -> Result<()>;
    /// Look `request` up across all versions.
    fn match_any(&self, request: &AssetRequest) -> Result<Option<AssetResponse>>;
}

#[derive(Debug, Serialize, Deserialize)]
struct EntryMeta {
    url: String,
    status: u16,
    kind: ResponseKind,
    content_type: Option<String>,
}

/// One directory per version under `root`. Each entry is `<sha256>.body`
/// plus `<sha256>.toml`; the metadata file is written last and marks the
/// entry complete.
#[derive(Debug, Clone)]
pub struct DiskCacheStorage {
    root: PathBuf,
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> ShellCacheError {
    move |source| ShellCacheError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn entry_key(url: &str) -> String {
    hex::encode(Sha256::digest(url.as_bytes()))
}

impl DiskCacheStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn version_dir(&self, name: &str) -> Result<PathBuf> {
        let bad = name.is_empty()
            || name == "."
            || name == ".."
            || name.contains(['/', '\\']);
        if bad {
            return Err(ShellCacheError::InvalidName(name.to_string()));
        }
        Ok(self.root.join(name))
    }

    fn read_entry(dir: &Path, request: &AssetRequest) -> Result<Option<AssetResponse>> {
        let key = entry_key(&request.url);
        let meta_path = dir.join(format!("{key}.toml"));
        if !meta_path.is_file() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&meta_path).map_err(io_error(&meta_path))?;
        let meta: EntryMeta = toml::from_str(&raw).map_err(|source| ShellCacheError::Entry {
            path: meta_path.clone(),
            source,
        })?;
        if meta.url != request.url {
            return Ok(None);
        }
        let body_path = dir.join(format!("{key}.body"));
        let body = fs::read(&body_path).map_err(io_error(&body_path))?;
        Ok(Some(AssetResponse {
            status: meta.status,
            kind: meta.kind,
            content_type: meta.content_type,
            body,
        }))
    }
}

impl CacheStorage for DiskCacheStorage {
    fn keys(&self) -> Result<Vec<String>> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(io_error(&self.root)(e)),
        };
        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(io_error(&self.root))?;
            if !entry.path().is_dir() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    fn open(&self, name: &str) -> Result<()> {
        let dir = self.version_dir(name)?;
        fs::create_dir_all(&dir).map_err(io_error(&dir))
    }

    fn delete(&self, name: &str) -> Result<bool> {
        let dir = self.version_dir(name)?;
        match fs::remove_dir_all(&dir) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(io_error(&dir)(e)),
        }
    }

    fn put(&self, name: &str, request: &AssetRequest, response: &AssetResponse) -> Result<()> {
        let dir = self.version_dir(name)?;
        fs::create_dir_all(&dir).map_err(io_error(&dir))?;

        let key = entry_key(&request.url);
        let body_path = dir.join(format!("{key}.body"));
        fs::write(&body_path, &response.body).map_err(io_error(&body_path))?;

        let meta = EntryMeta {
            url: request.url.clone(),
            status: response.status,
            kind: response.kind,
            content_type: response.content_type.clone(),
        };
        let meta_path = dir.join(format!("{key}.toml"));
        fs::write(&meta_path, toml::to_string(&meta)?).map_err(io_error(&meta_path))
    }

    fn match_any(&self, request: &AssetRequest) -> Result<Option<AssetResponse>> {
        for name in self.keys()? {
            let dir = self.version_dir(&name)?;
            if let Some(hit) = Self::read_entry(&dir, request)? {
                return Ok(Some(hit));
            }
        }
        Ok(None)
    }
}
