use std::path::Path;

use crate::config::MediaTypeOverride;

pub const FALLBACK_MEDIA_TYPE: &str = "application/octet-stream";

/// Guess a media type from the file extension (case-insensitive).
///
/// `overrides` win over the built-in table.
pub fn media_type_for(path: &Path, overrides: &[MediaTypeOverride]) -> String {
    let Some(ext) = path
        .extension()
        .and_then(|s| s.to_str())
        .map(str::to_ascii_lowercase)
    else {
        return FALLBACK_MEDIA_TYPE.to_string();
    };

    if let Some(o) = overrides
        .iter()
        .find(|o| o.extension.trim().trim_start_matches('.').eq_ignore_ascii_case(&ext))
    {
        return o.media_type.clone();
    }

    let builtin = match ext.as_str() {
        "mp3" => "audio/mpeg",
        "flac" => "audio/flac",
        "wav" => "audio/wav",
        "ogg" | "oga" => "audio/ogg",
        "opus" => "audio/opus",
        "m4a" | "aac" => "audio/aac",
        "webm" => "audio/webm",
        "mp4" => "video/mp4",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "txt" => "text/plain",
        _ => FALLBACK_MEDIA_TYPE,
    };
    builtin.to_string()
}
