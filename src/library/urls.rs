//! Session-scoped playable URLs.
//!
//! A `PlayableUrl` stands in for the bytes of a selected file. URLs are
//! issued one generation at a time: replacing the playlist revokes every URL
//! of the previous generation before the new ones are minted.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

const SCHEME: &str = "aura-blob";

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PlayableUrl(String);

impl fmt::Display for PlayableUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Owner of every live `PlayableUrl`.
#[derive(Debug, Default)]
pub struct UrlRegistry {
    generation: u64,
    next_id: u64,
    live: HashMap<PlayableUrl, PathBuf>,
}

impl UrlRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Revoke the current generation and mint one URL per path, in order.
    pub fn replace_generation<'a, I>(&mut self, paths: I) -> Vec<PlayableUrl>
    where
        I: IntoIterator<Item = &'a Path>,
    {
        let released = self.revoke_all();
        self.generation += 1;
        self.next_id = 0;
        let urls: Vec<PlayableUrl> = paths.into_iter().map(|p| self.issue(p)).collect();
        debug!(
            generation = self.generation,
            released,
            issued = urls.len(),
            "replaced playable url generation"
        );
        urls
    }

    fn issue(&mut self, path: &Path) -> PlayableUrl {
        let url = PlayableUrl(format!(
            "{SCHEME}:{}/{}",
            self.generation, self.next_id
        ));
        self.next_id += 1;
        self.live.insert(url.clone(), path.to_path_buf());
        url
    }

    /// Release one URL. Returns `false` if it was not live (already revoked
    /// or never issued).
    pub fn revoke(&mut self, url: &PlayableUrl) -> bool {
        if self.live.remove(url).is_some() {
            true
        } else {
            warn!(%url, "revoke of a url that is not live");
            false
        }
    }

    /// Release every live URL. Returns how many were released.
    pub fn revoke_all(&mut self) -> usize {
        let urls: Vec<PlayableUrl> = self.live.keys().cloned().collect();
        urls.iter().filter(|url| self.revoke(url)).count()
    }

    pub fn resolve(&self, url: &PlayableUrl) -> Option<&Path> {
        self.live.get(url).map(PathBuf::as_path)
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}
