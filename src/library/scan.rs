use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::LibrarySettings;

use super::media_type::media_type_for;
use super::model::SourceFile;

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

fn source_file(path: &Path, settings: &LibrarySettings) -> SourceFile {
    let name = path
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    SourceFile {
        path: path.to_path_buf(),
        name,
        media_type: media_type_for(path, &settings.media_types),
    }
}

/// Turn the user's selection (files and/or folders) into picker entries.
///
/// Explicit files are kept in the order given, whatever their type; the
/// playlist filters on media type later. Folders expand to their files sorted
/// by path. Missing paths are logged and skipped.
pub fn scan_selection(paths: &[PathBuf], settings: &LibrarySettings) -> Vec<SourceFile> {
    let mut out: Vec<SourceFile> = Vec::new();

    for path in paths {
        if path.is_file() {
            out.push(source_file(path, settings));
        } else if path.is_dir() {
            out.extend(scan_dir(path, settings));
        } else {
            warn!(path = %path.display(), "selected path does not exist, skipping");
        }
    }

    debug!(selected = paths.len(), entries = out.len(), "scanned selection");
    out
}

fn scan_dir(dir: &Path, settings: &LibrarySettings) -> Vec<SourceFile> {
    let mut walker = WalkDir::new(dir)
        .follow_links(settings.follow_links)
        .sort_by_file_name();

    // Non-recursive = only the root directory.
    if !settings.recursive {
        walker = walker.max_depth(1);
    }

    walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| source_file(e.path(), settings))
        .collect()
}
