use super::*;
use crate::config::{LibrarySettings, MediaTypeOverride};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

#[test]
fn parse_file_name_splits_artist_and_song() {
    assert_eq!(
        parse_file_name("Artist - Song.mp3"),
        TrackName {
            artist: "Artist".into(),
            name: "Song".into(),
        }
    );
}

#[test]
fn parse_file_name_without_separator_uses_unknown_artist() {
    assert_eq!(
        parse_file_name("Song.mp3"),
        TrackName {
            artist: UNKNOWN_ARTIST.into(),
            name: "Song".into(),
        }
    );
}

#[test]
fn parse_file_name_splits_on_first_separator_only() {
    assert_eq!(
        parse_file_name("A - B - C.mp3"),
        TrackName {
            artist: "A".into(),
            name: "B - C".into(),
        }
    );
}

#[test]
fn parse_file_name_trims_and_keeps_inner_dots() {
    let parsed = parse_file_name("  Mr. Big  -  Take.Cover .flac");
    assert_eq!(parsed.artist, "Mr. Big");
    assert_eq!(parsed.name, "Take.Cover");

    // Only the last extension goes.
    assert_eq!(parse_file_name("mix.tar.ogg").name, "mix.tar");
    // No extension at all.
    assert_eq!(parse_file_name("Untitled").name, "Untitled");
}

#[test]
fn media_type_for_uses_extension_case_insensitively() {
    let none: &[MediaTypeOverride] = &[];
    assert_eq!(media_type_for(Path::new("/tmp/a.mp3"), none), "audio/mpeg");
    assert_eq!(media_type_for(Path::new("/tmp/a.MP3"), none), "audio/mpeg");
    assert_eq!(media_type_for(Path::new("/tmp/a.flac"), none), "audio/flac");
    assert_eq!(media_type_for(Path::new("/tmp/a.txt"), none), "text/plain");
    assert_eq!(
        media_type_for(Path::new("/tmp/a"), none),
        "application/octet-stream"
    );
}

#[test]
fn media_type_overrides_win_over_builtin_table() {
    let overrides = vec![MediaTypeOverride {
        extension: ".TXT".into(),
        media_type: "audio/x-spoken".into(),
    }];
    assert_eq!(
        media_type_for(Path::new("/tmp/notes.txt"), &overrides),
        "audio/x-spoken"
    );
}

#[test]
fn scan_selection_keeps_explicit_files_in_given_order() {
    let dir = tempdir().unwrap();
    let b = dir.path().join("b.ogg");
    let a = dir.path().join("a.mp3");
    let c = dir.path().join("cover.png");
    fs::write(&b, b"x").unwrap();
    fs::write(&a, b"x").unwrap();
    fs::write(&c, b"x").unwrap();

    let picked = scan_selection(
        &[b.clone(), a.clone(), c.clone(), dir.path().join("missing.mp3")],
        &LibrarySettings::default(),
    );
    let names: Vec<&str> = picked.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["b.ogg", "a.mp3", "cover.png"]);
    assert_eq!(picked[0].media_type, "audio/ogg");
    assert!(!picked[2].is_audio());
}

#[test]
fn scan_selection_expands_folders_sorted_and_skips_hidden() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("b.mp3"), b"x").unwrap();
    fs::write(dir.path().join("a.mp3"), b"x").unwrap();
    fs::write(dir.path().join(".hidden.mp3"), b"x").unwrap();
    let sub = dir.path().join("sub");
    fs::create_dir_all(&sub).unwrap();
    fs::write(sub.join("c.mp3"), b"x").unwrap();

    let settings = LibrarySettings::default();
    let picked = scan_selection(&[dir.path().to_path_buf()], &settings);
    let names: Vec<&str> = picked.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["a.mp3", "b.mp3", "c.mp3"]);

    let flat = LibrarySettings {
        recursive: false,
        include_hidden: true,
        ..LibrarySettings::default()
    };
    let picked = scan_selection(&[dir.path().to_path_buf()], &flat);
    let names: Vec<&str> = picked.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec![".hidden.mp3", "a.mp3", "b.mp3"]);
}

#[test]
fn url_registry_issues_unique_urls_per_generation() {
    let mut reg = UrlRegistry::new();
    let paths = [PathBuf::from("/m/a.mp3"), PathBuf::from("/m/b.mp3")];
    let first = reg.replace_generation(paths.iter().map(PathBuf::as_path));
    assert_eq!(first.len(), 2);
    assert_ne!(first[0], first[1]);
    assert_eq!(reg.live_count(), 2);
    assert_eq!(reg.resolve(&first[1]), Some(Path::new("/m/b.mp3")));

    let second = reg.replace_generation([Path::new("/m/c.mp3")]);
    assert_eq!(reg.live_count(), 1);
    assert_eq!(reg.generation(), 2);
    assert!(reg.resolve(&first[0]).is_none());
    assert!(!first.contains(&second[0]));
}

#[test]
fn url_registry_revokes_exactly_once() {
    let mut reg = UrlRegistry::new();
    let urls = reg.replace_generation([Path::new("/m/a.mp3")]);
    assert!(reg.revoke(&urls[0]));
    assert!(!reg.revoke(&urls[0]));
    assert_eq!(reg.live_count(), 0);
    assert_eq!(reg.revoke_all(), 0);
}
