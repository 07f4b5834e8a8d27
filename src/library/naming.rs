//! Derive track name and artist from a file's display name.

pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

const SEPARATOR: &str = " - ";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrackName {
    pub artist: String,
    pub name: String,
}

/// Strip the last extension (`.mp3`, `.flac`, ...) from `file_name`.
///
/// A trailing dot or a dot followed by a path separator is not an extension.
pub fn strip_extension(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(dot) => {
            let ext = &file_name[dot + 1..];
            if ext.is_empty() || ext.contains('/') {
                file_name
            } else {
                &file_name[..dot]
            }
        }
        _ => file_name,
    }
}

/// Split `Artist - Song.ext` into its parts. Only the first separator counts,
/// so `A - B - C.mp3` is artist `A`, name `B - C`.
pub fn parse_file_name(file_name: &str) -> TrackName {
    let cleaned = strip_extension(file_name);
    match cleaned.split_once(SEPARATOR) {
        Some((artist, name)) => TrackName {
            artist: artist.trim().to_string(),
            name: name.trim().to_string(),
        },
        None => TrackName {
            artist: UNKNOWN_ARTIST.to_string(),
            name: cleaned.trim().to_string(),
        },
    }
}
