use std::path::PathBuf;

use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/aura/config.toml` or `~/.config/aura/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `AURA__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub audio: AudioSettings,
    pub playback: PlaybackSettings,
    pub controls: ControlsSettings,
    pub library: LibrarySettings,
    pub ui: UiSettings,
    pub shell_cache: ShellCacheSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Length of the fade used for track changes, pause and resume (milliseconds).
    pub transition_ms: u64,
    /// Number of discrete volume steps in one fade.
    pub fade_steps: u32,
    /// Fade-out duration when quitting (milliseconds).
    /// Set to 0 to stop immediately.
    pub quit_fade_out_ms: u64,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            transition_ms: 500,
            fade_steps: 50,
            quit_fade_out_ms: 500,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Initial volume in `[0, 1]`.
    pub volume: f32,
    /// Whether shuffle starts enabled.
    pub shuffle: bool,
    /// Initial repeat mode.
    pub repeat: RepeatSetting,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            volume: 1.0,
            shuffle: false,
            repeat: RepeatSetting::None,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RepeatSetting {
    #[serde(alias = "off", alias = "no-repeat", alias = "no_repeat")]
    None,
    #[serde(alias = "repeat-all", alias = "repeat_all", alias = "loop-all")]
    All,
    #[serde(alias = "repeat-one", alias = "repeat_one", alias = "loop-one")]
    One,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ControlsSettings {
    /// Volume change applied by `+` / `-`.
    pub volume_step: f32,
    /// Number of seconds to scrub when pressing `H` / `L`.
    pub scrub_seconds: u64,
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self {
            volume_step: 0.05,
            scrub_seconds: 5,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// Whether to follow symlinks when a folder is selected.
    pub follow_links: bool,
    /// Whether to include hidden files/directories (dotfiles).
    pub include_hidden: bool,
    /// Whether to recurse into subdirectories of a selected folder.
    pub recursive: bool,
    /// Extra `extension = "media/type"` pairs consulted before the built-in table.
    pub media_types: Vec<MediaTypeOverride>,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            follow_links: true,
            include_hidden: false,
            recursive: true,
            media_types: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MediaTypeOverride {
    pub extension: String,
    pub media_type: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: "AURA".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ShellCacheSettings {
    /// Whether install/activate run at startup. Failures are only logged.
    pub enabled: bool,
    /// Name of the live cache version; every other version is evicted on activate.
    pub version: String,
    /// Origin that relative asset paths are resolved against.
    pub origin: String,
    /// Shell manifest: relative paths and absolute URLs.
    pub assets: Vec<String>,
    /// Storage root. Defaults to `$XDG_CACHE_HOME/aura/shell`.
    pub directory: Option<PathBuf>,
}

impl Default for ShellCacheSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            version: "aura-music-player-v1".to_string(),
            origin: "http://localhost:8080".to_string(),
            assets: vec![
                "/".into(),
                "/index.html".into(),
                "/index.tsx".into(),
                "/App.tsx".into(),
                "/types.ts".into(),
                "https://cdn.tailwindcss.com".into(),
                "https://fonts.googleapis.com/css2?family=Poppins:wght@400;500;600;700&display=swap"
                    .into(),
            ],
            directory: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub enabled: bool,
    /// Log file. Defaults to `$XDG_CACHE_HOME/aura/aura.log`.
    pub file: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            file: None,
        }
    }
}
