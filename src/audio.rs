//! Audio output: a `MediaElement` that renders through `rodio`.
//!
//! `element` holds the device-backed implementation; `sink` opens and
//! decodes files into paused sinks.

mod element;
mod sink;

pub use element::RodioElement;
