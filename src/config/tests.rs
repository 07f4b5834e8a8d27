use super::load::{default_cache_dir, default_config_path, resolve_config_path};
use super::load::SettingsError;
use super::schema::*;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

#[test]
fn resolve_config_path_prefers_aura_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("AURA_CONFIG_PATH", "/tmp/aura-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/aura-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/xdg-config-home")
            .join("aura")
            .join("config.toml")
    );
}

#[test]
fn default_cache_dir_falls_back_to_home_dot_cache() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_CACHE_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    assert_eq!(
        default_cache_dir().unwrap(),
        std::path::PathBuf::from("/tmp/home-dir")
            .join(".cache")
            .join("aura")
    );
}

#[test]
fn defaults_match_player_startup_state() {
    let s = Settings::default();
    assert_eq!(s.audio.transition_ms, 500);
    assert_eq!(s.audio.fade_steps, 50);
    assert_eq!(s.playback.volume, 1.0);
    assert!(!s.playback.shuffle);
    assert_eq!(s.playback.repeat, RepeatSetting::None);
    assert!(s.shell_cache.enabled);
    assert_eq!(s.shell_cache.version, "aura-music-player-v1");
    assert_eq!(s.shell_cache.assets.len(), 7);
    assert!(s.validate().is_ok());
}

#[test]
fn settings_load_from_config_file_and_parse_repeat_aliases() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[playback]
shuffle = true
repeat = "repeat-one"
volume = 0.4

[audio]
transition_ms = 200
fade_steps = 10
quit_fade_out_ms = 0

[controls]
volume_step = 0.1
scrub_seconds = 9

[library]
recursive = false
include_hidden = true
media_types = [{ extension = "mka", media_type = "audio/x-matroska" }]

[ui]
header_text = "hello"

[shell_cache]
enabled = false
version = "aura-music-player-v2"
origin = "https://aura.example"
assets = ["/index.html"]

[logging]
enabled = false
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("AURA_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("AURA__AUDIO__TRANSITION_MS");

    let s = Settings::load().unwrap();
    assert!(s.playback.shuffle);
    assert_eq!(s.playback.repeat, RepeatSetting::One);
    assert_eq!(s.playback.volume, 0.4);
    assert_eq!(s.audio.transition_ms, 200);
    assert_eq!(s.audio.fade_steps, 10);
    assert_eq!(s.audio.quit_fade_out_ms, 0);
    assert_eq!(s.controls.volume_step, 0.1);
    assert_eq!(s.controls.scrub_seconds, 9);
    assert!(!s.library.recursive);
    assert!(s.library.include_hidden);
    assert_eq!(
        s.library.media_types,
        vec![MediaTypeOverride {
            extension: "mka".into(),
            media_type: "audio/x-matroska".into(),
        }]
    );
    assert_eq!(s.ui.header_text, "hello");
    assert!(!s.shell_cache.enabled);
    assert_eq!(s.shell_cache.version, "aura-music-player-v2");
    assert_eq!(s.shell_cache.assets, vec!["/index.html".to_string()]);
    assert!(!s.logging.enabled);
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[audio]
transition_ms = 250
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("AURA_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("AURA__AUDIO__TRANSITION_MS", "0");

    let s = Settings::load().unwrap();
    assert_eq!(s.audio.transition_ms, 0);
}

#[test]
fn validate_rejects_zero_fade_steps_and_out_of_range_volume() {
    let mut s = Settings::default();
    s.audio.fade_steps = 0;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.playback.volume = 1.5;
    assert!(matches!(
        s.validate(),
        Err(SettingsError::Invalid {
            field: "playback.volume",
            ..
        })
    ));
}

#[test]
fn validate_rejects_cache_versions_that_are_not_plain_names() {
    for version in ["", "  ", "a/b", "..\\up"] {
        let mut s = Settings::default();
        s.shell_cache.version = version.to_string();
        assert!(s.validate().is_err(), "{version:?} accepted");
    }
}

#[test]
fn load_validates_what_it_read() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(&cfg_path, "[audio]\nfade_steps = 0\n").unwrap();
    let _g1 = EnvGuard::set("AURA_CONFIG_PATH", cfg_path.to_str().unwrap());

    let err = Settings::load().unwrap_err();
    assert!(matches!(
        err,
        SettingsError::Invalid {
            field: "audio.fade_steps",
            ..
        }
    ));
    assert_eq!(
        err.to_string(),
        "invalid config: audio.fade_steps must be at least 1"
    );
}
