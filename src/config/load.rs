use std::{
    env,
    path::{Path, PathBuf},
};

use ::config::{Config, ConfigError, Environment, File};
use thiserror::Error;

use super::schema::Settings;

/// Why a config could not be used.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to load config: {0}")]
    Load(#[from] ConfigError),
    #[error("invalid config: {field} {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

impl Settings {
    /// Layer struct defaults, the optional config file and `AURA__*`
    /// environment overrides (highest wins), then validate the result.
    pub fn load() -> Result<Self, SettingsError> {
        let settings = Self::from_sources(resolve_config_path().as_deref())?;
        settings.validate()?;
        Ok(settings)
    }

    fn from_sources(file: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = file {
            builder = builder.add_source(File::from(path).required(false));
        }
        builder
            .add_source(
                Environment::with_prefix("AURA")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Reject values the player cannot run with.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let version = self.shell_cache.version.trim();
        let checks = [
            (
                self.audio.fade_steps >= 1,
                "audio.fade_steps",
                "must be at least 1",
            ),
            (
                (0.0..=1.0).contains(&self.playback.volume),
                "playback.volume",
                "must be within [0, 1]",
            ),
            (
                self.controls.volume_step > 0.0 && self.controls.volume_step <= 1.0,
                "controls.volume_step",
                "must be within (0, 1]",
            ),
            (
                !version.is_empty() && !version.contains(['/', '\\']),
                "shell_cache.version",
                "must be a plain directory name",
            ),
        ];

        match checks.into_iter().find(|(ok, _, _)| !ok) {
            Some((_, field, reason)) => Err(SettingsError::Invalid { field, reason }),
            None => Ok(()),
        }
    }
}

/// `AURA_CONFIG_PATH`, else `<config home>/aura/config.toml`.
pub fn resolve_config_path() -> Option<PathBuf> {
    env::var_os("AURA_CONFIG_PATH")
        .map(PathBuf::from)
        .or_else(default_config_path)
}

pub fn default_config_path() -> Option<PathBuf> {
    xdg_home("XDG_CONFIG_HOME", ".config").map(|d| d.join("aura").join("config.toml"))
}

/// `$XDG_CACHE_HOME/aura` or `~/.cache/aura`.
pub fn default_cache_dir() -> Option<PathBuf> {
    xdg_home("XDG_CACHE_HOME", ".cache").map(|d| d.join("aura"))
}

fn xdg_home(var: &str, fallback: &str) -> Option<PathBuf> {
    env::var_os(var)
        .map(PathBuf::from)
        .or_else(|| env::var_os("HOME").map(|home| PathBuf::from(home).join(fallback)))
}
