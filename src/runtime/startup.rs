use std::io::{self, Write};
use std::path::PathBuf;
use std::thread::{self, JoinHandle};

use tracing::{info, warn};

use crate::app::App;
use crate::config::{self, LibrarySettings, ShellCacheSettings};
use crate::error::{AuraError, Result};
use crate::library::scan_selection;
use crate::player::{Controller, FadeTiming, MediaElement};
use crate::shell_cache::{
    DiskCacheStorage, HttpFetcher, ShellCache, ShellCacheError, parse_origin,
};

pub fn build_controller<M: MediaElement>(media: M, settings: &config::Settings) -> Controller<M> {
    Controller::new(media, FadeTiming::from(&settings.audio))
        .with_playback_defaults(&settings.playback)
}

/// Replace the playlist with the audio found under `paths` and report it.
pub fn open_paths<M: MediaElement>(
    player: &mut Controller<M>,
    app: &mut App,
    paths: &[PathBuf],
    library: &LibrarySettings,
) {
    let files = scan_selection(paths, library);
    player.load_files(files);
    app.follow_playback_on();

    let count = player.tracks().len();
    if count == 0 {
        app.set_status("No audio files found");
    } else {
        app.set_status(format!("Loaded {count} track{}", if count == 1 { "" } else { "s" }));
    }
}

fn shell_cache_dir(settings: &ShellCacheSettings) -> Result<PathBuf> {
    settings
        .directory
        .clone()
        .or_else(|| config::default_cache_dir().map(|d| d.join("shell")))
        .ok_or(AuraError::NoCacheDir)
}

pub fn open_shell_cache(
    settings: &ShellCacheSettings,
) -> Result<ShellCache<DiskCacheStorage, HttpFetcher>> {
    let storage = DiskCacheStorage::new(shell_cache_dir(settings)?);
    let fetcher = HttpFetcher::new(parse_origin(&settings.origin)?)?;
    Ok(ShellCache::new(storage, fetcher, settings)?)
}

/// Install and activate the shell cache on a helper thread. Failures are logged.
pub fn spawn_shell_cache(settings: &ShellCacheSettings) -> Option<JoinHandle<()>> {
    if !settings.enabled {
        return None;
    }
    let settings = settings.clone();
    let spawned = thread::Builder::new()
        .name("shell-cache".to_string())
        .spawn(move || {
            let cache = match open_shell_cache(&settings) {
                Ok(cache) => cache,
                Err(e) => {
                    warn!(error = %e, "shell cache unavailable");
                    return;
                }
            };
            info!(
                version = %cache.version(),
                dir = %cache.storage().root().display(),
                "installing shell cache"
            );
            if let Err(e) = cache.install() {
                warn!(version = %cache.version(), error = %e, "shell cache install failed");
            }
            match cache.activate() {
                Ok(deleted) => info!(?deleted, "shell cache activated"),
                Err(e) => warn!(error = %e, "shell cache activation failed"),
            }
        });

    match spawned {
        Ok(handle) => Some(handle),
        Err(e) => {
            warn!(error = %e, "failed to spawn shell cache thread");
            None
        }
    }
}

/// `aura shell-fetch`: resolve one asset cache-first and write its body to stdout.
pub fn shell_fetch(settings: &ShellCacheSettings, target: &str) -> Result<()> {
    let cache = open_shell_cache(settings)?;
    let request = cache.request(target)?;
    let response = cache.fetch(&request)?;
    if !response.is_ok() {
        return Err(ShellCacheError::BadStatus {
            url: request.url,
            status: response.status,
        }
        .into());
    }

    let mut stdout = io::stdout().lock();
    stdout.write_all(&response.body)?;
    stdout.flush()?;
    Ok(())
}
