//! The media element boundary: one addressable audio-rendering primitive.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::library::PlayableUrl;

/// What the controller asks the element to load.
#[derive(Debug, Clone, Copy)]
pub struct MediaSource<'a> {
    pub url: &'a PlayableUrl,
    pub path: &'a Path,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaEvent {
    /// Playback position moved.
    TimeUpdate,
    /// Duration of the loaded source is known.
    LoadedMetadata,
    /// The loaded source played to its end.
    Ended,
}

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("no source loaded")]
    NoSource,

    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {path}: {reason}")]
    Decode { path: PathBuf, reason: String },

    #[error("audio output unavailable: {0}")]
    Output(String),
}

/// Playback primitive driven by the controller.
///
/// Events are queued by the element and collected by the host loop through
/// `drain_events`, which forwards them to the controller in order.
pub trait MediaElement {
    fn load(&mut self, source: MediaSource<'_>);
    fn unload(&mut self);
    /// Start or resume playback. Fire-and-forget for the caller: failures are
    /// reported but must leave the element usable.
    fn play(&mut self) -> Result<(), MediaError>;
    fn pause(&mut self);
    fn current_time(&self) -> f64;
    fn set_current_time(&mut self, seconds: f64);
    fn duration(&self) -> Option<f64>;
    fn volume(&self) -> f32;
    fn set_volume(&mut self, volume: f32);
    fn drain_events(&mut self) -> Vec<MediaEvent>;
}
