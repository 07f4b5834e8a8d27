use crate::config::{Settings, SettingsError};

/// The settings to run with, plus the reason the config was set aside, if it was.
pub struct LoadedSettings {
    pub settings: Settings,
    pub fallback: Option<SettingsError>,
}

pub fn load_settings() -> LoadedSettings {
    settle_settings(Settings::load())
}

/// Config is optional: any problem falls back to defaults. Logging is not up
/// yet, so the problem goes to stderr here and to the log once it exists.
pub(super) fn settle_settings(loaded: Result<Settings, SettingsError>) -> LoadedSettings {
    match loaded {
        Ok(settings) => LoadedSettings {
            settings,
            fallback: None,
        },
        Err(e) => {
            eprintln!("aura: {e}; using defaults");
            LoadedSettings {
                settings: Settings::default(),
                fallback: Some(e),
            }
        }
    }
}
