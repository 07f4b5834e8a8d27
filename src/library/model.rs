use std::path::PathBuf;

use super::urls::PlayableUrl;

/// One entry produced by the file/folder picker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    /// Display name including the extension, e.g. `Artist - Song.mp3`.
    pub name: String,
    /// Guessed media type, e.g. `audio/mpeg`.
    pub media_type: String,
}

impl SourceFile {
    pub fn is_audio(&self) -> bool {
        self.media_type.starts_with("audio/")
    }
}

/// A playable playlist entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Track {
    pub name: String,
    pub artist: String,
    /// Resolved back to the file through the `UrlRegistry` while live.
    pub url: PlayableUrl,
}
