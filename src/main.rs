use std::env;
use std::fs::{self, File};
use std::sync::Arc;

use tracing::warn;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod app;
mod audio;
mod config;
mod error;
mod library;
mod player;
mod runtime;
mod shell_cache;
mod ui;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let runtime::LoadedSettings { settings, fallback } = runtime::load_settings();
    init_tracing(&settings.logging);
    if let Some(reason) = fallback {
        warn!(
            %reason,
            path = ?config::resolve_config_path(),
            "running with default settings"
        );
    }
    runtime::run(settings, env::args().skip(1))?;
    Ok(())
}

/// Log to a file; the terminal belongs to the UI. Disabled logging installs nothing.
fn init_tracing(logging: &config::LoggingSettings) {
    if !logging.enabled {
        return;
    }
    let Some(log_path) = logging
        .file
        .clone()
        .or_else(|| config::default_cache_dir().map(|d| d.join("aura.log")))
    else {
        return;
    };

    if let Some(parent) = log_path.parent() {
        let _ = fs::create_dir_all(parent);
    }

    match File::options().create(true).append(true).open(&log_path) {
        Ok(file) => {
            let env_filter =
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
            let file_layer = tracing_subscriber::fmt::layer()
                .with_writer(Arc::new(file))
                .with_ansi(false);

            tracing_subscriber::registry()
                .with(env_filter)
                .with(file_layer)
                .init();
        }
        Err(e) => {
            eprintln!("aura: failed to open log file {}: {e}", log_path.display());
        }
    }
}
