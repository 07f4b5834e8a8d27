use std::cell::RefCell;
use std::collections::HashMap;
use std::io;
use std::path::PathBuf;

use super::*;
use crate::config::ShellCacheSettings;

/// Serves canned responses and records every URL it was asked for.
#[derive(Default)]
struct FakeFetcher {
    responses: HashMap<String, AssetResponse>,
    calls: RefCell<Vec<String>>,
}

impl FakeFetcher {
    fn serve(mut self, url: &str, status: u16, kind: ResponseKind, body: &str) -> Self {
        self.responses.insert(
            url.to_string(),
            AssetResponse {
                status,
                kind,
                content_type: Some("text/plain".to_string()),
                body: body.as_bytes().to_vec(),
            },
        );
        self
    }

    fn calls(&self) -> usize {
        self.calls.borrow().len()
    }
}

impl Fetcher for FakeFetcher {
    fn fetch(&self, request: &AssetRequest) -> Result<AssetResponse> {
        self.calls.borrow_mut().push(request.url.clone());
        self.responses
            .get(&request.url)
            .cloned()
            .ok_or_else(|| ShellCacheError::Io {
                path: PathBuf::from(&request.url),
                source: io::Error::new(io::ErrorKind::ConnectionRefused, "offline"),
            })
    }
}

fn settings(assets: &[&str]) -> ShellCacheSettings {
    ShellCacheSettings {
        enabled: true,
        version: "aura-music-player-v1".to_string(),
        origin: "http://shell.test".to_string(),
        assets: assets.iter().map(|s| s.to_string()).collect(),
        directory: None,
    }
}

fn full_shell() -> FakeFetcher {
    FakeFetcher::default()
        .serve("http://shell.test/", 200, ResponseKind::Basic, "<html>")
        .serve("http://shell.test/app.js", 200, ResponseKind::Basic, "main()")
        .serve(
            "https://cdn.example.com/lib.js",
            200,
            ResponseKind::Cors,
            "lib()",
        )
}

#[test]
fn requests_resolve_against_origin() {
    let dir = tempfile::tempdir().unwrap();
    let cache = ShellCache::new(
        DiskCacheStorage::new(dir.path()),
        FakeFetcher::default(),
        &settings(&[]),
    )
    .unwrap();

    assert_eq!(cache.request("/index.html").unwrap().url, "http://shell.test/index.html");
    assert_eq!(
        cache.request("https://cdn.example.com/x.css").unwrap().url,
        "https://cdn.example.com/x.css"
    );
}

#[test]
fn invalid_origin_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let mut s = settings(&[]);
    s.origin = "not a url".to_string();
    let err = ShellCache::new(DiskCacheStorage::new(dir.path()), FakeFetcher::default(), &s);
    assert!(matches!(err, Err(ShellCacheError::InvalidUrl { .. })));
}

#[test]
fn install_precaches_the_manifest() {
    let dir = tempfile::tempdir().unwrap();
    let cache = ShellCache::new(
        DiskCacheStorage::new(dir.path()),
        full_shell(),
        &settings(&["/", "/app.js", "https://cdn.example.com/lib.js"]),
    )
    .unwrap();

    assert_eq!(cache.install().unwrap(), 3);
    assert_eq!(cache.storage().keys().unwrap(), vec!["aura-music-player-v1".to_string()]);

    let hit = cache.fetch(&cache.request("/app.js").unwrap()).unwrap();
    assert_eq!(hit.body, b"main()");
    assert_eq!(hit.kind, ResponseKind::Basic);
    assert_eq!(hit.content_type.as_deref(), Some("text/plain"));
    // Served from the cache: only the three install fetches hit the network.
    assert_eq!(cache.fetcher_calls(), 3);
}

#[test]
fn install_stores_nothing_when_one_asset_fails() {
    let dir = tempfile::tempdir().unwrap();
    let fetcher = full_shell().serve("http://shell.test/missing.js", 404, ResponseKind::Basic, "");
    let cache = ShellCache::new(
        DiskCacheStorage::new(dir.path()),
        fetcher,
        &settings(&["/", "/missing.js", "/app.js"]),
    )
    .unwrap();

    let err = cache.install().unwrap_err();
    assert!(matches!(err, ShellCacheError::BadStatus { status: 404, .. }));
    let root = cache.request("/").unwrap();
    assert_eq!(cache.storage().match_any(&root).unwrap(), None);
}

#[test]
fn install_fails_when_offline() {
    let dir = tempfile::tempdir().unwrap();
    let cache = ShellCache::new(
        DiskCacheStorage::new(dir.path()),
        FakeFetcher::default(),
        &settings(&["/"]),
    )
    .unwrap();

    assert!(matches!(cache.install(), Err(ShellCacheError::Io { .. })));
}

#[test]
fn fetch_miss_goes_to_network_and_stores_success() {
    let dir = tempfile::tempdir().unwrap();
    let cache = ShellCache::new(
        DiskCacheStorage::new(dir.path()),
        full_shell(),
        &settings(&[]),
    )
    .unwrap();
    let request = cache.request("https://cdn.example.com/lib.js").unwrap();

    let first = cache.fetch(&request).unwrap();
    let second = cache.fetch(&request).unwrap();
    assert_eq!(first, second);
    assert_eq!(cache.fetcher_calls(), 1);
}

#[test]
fn uncacheable_responses_pass_through_unstored() {
    let dir = tempfile::tempdir().unwrap();
    let fetcher = FakeFetcher::default()
        .serve("http://shell.test/gone", 404, ResponseKind::Basic, "nope")
        .serve("https://other.test/opaque", 200, ResponseKind::Opaque, "");
    let cache =
        ShellCache::new(DiskCacheStorage::new(dir.path()), fetcher, &settings(&[])).unwrap();

    let gone = cache.request("/gone").unwrap();
    assert_eq!(cache.fetch(&gone).unwrap().status, 404);
    assert_eq!(cache.fetch(&gone).unwrap().status, 404);

    let opaque = cache.request("https://other.test/opaque").unwrap();
    assert_eq!(cache.fetch(&opaque).unwrap().kind, ResponseKind::Opaque);
    cache.fetch(&opaque).unwrap();

    assert_eq!(cache.fetcher_calls(), 4);
    assert_eq!(cache.storage().match_any(&gone).unwrap(), None);
}

#[test]
fn network_errors_reach_the_caller() {
    let dir = tempfile::tempdir().unwrap();
    let cache = ShellCache::new(
        DiskCacheStorage::new(dir.path()),
        FakeFetcher::default(),
        &settings(&[]),
    )
    .unwrap();
    let request = cache.request("/index.html").unwrap();
    assert!(cache.fetch(&request).is_err());
}

#[test]
fn activate_deletes_exactly_the_stale_versions() {
    let dir = tempfile::tempdir().unwrap();
    let storage = DiskCacheStorage::new(dir.path());
    storage.open("aura-music-player-v0").unwrap();
    storage.open("aura-music-player-v1").unwrap();

    let cache = ShellCache::new(storage, FakeFetcher::default(), &settings(&[])).unwrap();
    assert_eq!(cache.activate().unwrap(), vec!["aura-music-player-v0".to_string()]);
    assert_eq!(cache.storage().keys().unwrap(), vec!["aura-music-player-v1".to_string()]);
    assert!(cache.activate().unwrap().is_empty());
}

#[test]
fn entries_from_older_versions_match_until_activation() {
    let dir = tempfile::tempdir().unwrap();
    let storage = DiskCacheStorage::new(dir.path());
    let request = AssetRequest {
        url: "http://shell.test/".to_string(),
    };
    let response = AssetResponse {
        status: 200,
        kind: ResponseKind::Basic,
        content_type: None,
        body: b"old shell".to_vec(),
    };
    storage.put("aura-music-player-v0", &request, &response).unwrap();

    let cache = ShellCache::new(storage, FakeFetcher::default(), &settings(&[])).unwrap();
    assert_eq!(cache.fetch(&request).unwrap().body, b"old shell");

    cache.activate().unwrap();
    assert!(cache.fetch(&request).is_err());
}

#[test]
fn disk_storage_rejects_path_like_names() {
    let dir = tempfile::tempdir().unwrap();
    let storage = DiskCacheStorage::new(dir.path());
    for name in ["", ".", "..", "a/b", "a\\b"] {
        assert!(
            matches!(storage.open(name), Err(ShellCacheError::InvalidName(_))),
            "{name:?} accepted"
        );
    }
}

#[test]
fn disk_storage_without_root_has_no_versions() {
    let dir = tempfile::tempdir().unwrap();
    let storage = DiskCacheStorage::new(dir.path().join("missing"));
    assert!(storage.keys().unwrap().is_empty());
    assert!(!storage.delete("aura-music-player-v1").unwrap());
}

impl<S: CacheStorage> ShellCache<S, FakeFetcher> {
    fn fetcher_calls(&self) -> usize {
        self.fetcher().calls()
    }
}
