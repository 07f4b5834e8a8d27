use thiserror::Error;

use crate::player::MediaError;
use crate::shell_cache::ShellCacheError;

/// Errors that end a command.
#[derive(Debug, Error)]
pub enum AuraError {
    #[error("terminal i/o failed: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Media(#[from] MediaError),

    #[error(transparent)]
    ShellCache(#[from] ShellCacheError),

    #[error("no cache directory: set shell_cache.directory or HOME")]
    NoCacheDir,

    #[error("usage: {0}")]
    Usage(String),
}

pub type Result<T> = std::result::Result<T, AuraError>;
