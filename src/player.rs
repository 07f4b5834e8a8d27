//! Player module: the playback controller and what it drives.
//!
//! `Controller` owns the playlist and `PlayerState`, and talks to a single
//! `MediaElement`. Track changes, pause and resume all go through a volume
//! fade (`fade`) so transitions never cut abruptly.

mod controller;
mod fade;
mod media;
mod seek;
mod state;

pub use controller::{Controller, FadeTiming};
pub use media::{MediaElement, MediaError, MediaEvent, MediaSource};
pub use seek::{angular_fraction, format_time};
pub use state::{PlayerPhase, PlayerState, RepeatMode};
