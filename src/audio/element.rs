use std::path::PathBuf;
use std::time::{Duration, Instant};

use rodio::{OutputStream, OutputStreamBuilder, Sink};
use tracing::{debug, warn};

use crate::library::PlayableUrl;
use crate::player::{MediaElement, MediaError, MediaEvent, MediaSource};

use super::sink::create_sink_at;

/// Minimum spacing between `TimeUpdate` events while playing.
const TIME_UPDATE_INTERVAL: Duration = Duration::from_millis(250);

struct Loaded {
    url: PlayableUrl,
    path: PathBuf,
    sink: Sink,
    duration: Option<Duration>,
}

/// `MediaElement` backed by the default `rodio` output device.
///
/// Position is tracked with wall-clock accounting: time accumulated across
/// pauses plus the time since the last resume.
pub struct RodioElement {
    stream: OutputStream,
    loaded: Option<Loaded>,
    volume: f32,
    playing: bool,
    started_at: Option<Instant>,
    accumulated: Duration,
    last_time_update: Option<Instant>,
    events: Vec<MediaEvent>,
}

impl RodioElement {
    /// Open the default output device.
    pub fn open() -> Result<Self, MediaError> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| MediaError::Output(e.to_string()))?;
        // rodio logs to stderr when OutputStream is dropped, which tears the TUI.
        stream.log_on_drop(false);

        Ok(Self {
            stream,
            loaded: None,
            volume: 1.0,
            playing: false,
            started_at: None,
            accumulated: Duration::ZERO,
            last_time_update: None,
            events: Vec::new(),
        })
    }

    fn elapsed(&self) -> Duration {
        self.accumulated + self.started_at.map_or(Duration::ZERO, |st| st.elapsed())
    }

    fn stop_clock(&mut self) {
        self.accumulated = self.elapsed();
        self.started_at = None;
    }

    fn reset_clock(&mut self, at: Duration) {
        self.accumulated = at;
        self.started_at = self.playing.then(Instant::now);
        self.last_time_update = None;
    }

    /// A drained sink cannot be resumed; decode the file again from the top.
    fn rewind_if_ended(&mut self) -> Result<(), MediaError> {
        let Some(loaded) = self.loaded.as_mut() else {
            return Err(MediaError::NoSource);
        };
        if !loaded.sink.empty() {
            return Ok(());
        }
        let (sink, _) = create_sink_at(&self.stream, &loaded.path, Duration::ZERO, self.volume)?;
        debug!(url = %loaded.url, "restarting ended source");
        loaded.sink = sink;
        self.playing = false;
        self.reset_clock(Duration::ZERO);
        Ok(())
    }
}

impl MediaElement for RodioElement {
    fn load(&mut self, source: MediaSource<'_>) {
        if let Some(old) = self.loaded.take() {
            old.sink.stop();
        }
        self.playing = false;
        self.reset_clock(Duration::ZERO);

        match create_sink_at(&self.stream, source.path, Duration::ZERO, self.volume) {
            Ok((sink, duration)) => {
                debug!(url = %source.url, ?duration, "loaded source");
                self.loaded = Some(Loaded {
                    url: source.url.clone(),
                    path: source.path.to_path_buf(),
                    sink,
                    duration,
                });
                self.events.push(MediaEvent::LoadedMetadata);
            }
            Err(e) => warn!(url = %source.url, error = %e, "failed to load source"),
        }
    }

    fn unload(&mut self) {
        if let Some(old) = self.loaded.take() {
            debug!(url = %old.url, "unloading source");
            old.sink.stop();
        }
        self.playing = false;
        self.reset_clock(Duration::ZERO);
        self.events.clear();
    }

    fn play(&mut self) -> Result<(), MediaError> {
        self.rewind_if_ended()?;
        let loaded = self.loaded.as_ref().ok_or(MediaError::NoSource)?;
        loaded.sink.play();
        if !self.playing {
            self.playing = true;
            self.started_at = Some(Instant::now());
        }
        Ok(())
    }

    fn pause(&mut self) {
        if let Some(loaded) = self.loaded.as_ref() {
            loaded.sink.pause();
        }
        if self.playing {
            self.playing = false;
            self.stop_clock();
        }
    }

    fn current_time(&self) -> f64 {
        let elapsed = self.elapsed().as_secs_f64();
        self.duration().map_or(elapsed, |total| elapsed.min(total))
    }

    fn set_current_time(&mut self, seconds: f64) {
        let Some(loaded) = self.loaded.as_ref() else {
            return;
        };
        if !seconds.is_finite() {
            return;
        }
        let target = Duration::from_secs_f64(seconds.max(0.0));

        // Rebuild the sink and skip into the file.
        match create_sink_at(&self.stream, &loaded.path, target, self.volume) {
            Ok((sink, _)) => {
                loaded.sink.stop();
                if self.playing {
                    sink.play();
                }
                if let Some(loaded) = self.loaded.as_mut() {
                    loaded.sink = sink;
                }
                self.reset_clock(target);
            }
            Err(e) => warn!(url = %loaded.url, error = %e, "seek failed"),
        }
    }

    fn duration(&self) -> Option<f64> {
        self.loaded
            .as_ref()
            .and_then(|l| l.duration)
            .map(|d| d.as_secs_f64())
    }

    fn volume(&self) -> f32 {
        self.volume
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        if let Some(loaded) = self.loaded.as_ref() {
            loaded.sink.set_volume(self.volume);
        }
    }

    fn drain_events(&mut self) -> Vec<MediaEvent> {
        if self.playing {
            let finished = self.loaded.as_ref().is_some_and(|l| l.sink.empty());
            if finished {
                self.playing = false;
                self.stop_clock();
                self.events.push(MediaEvent::TimeUpdate);
                self.events.push(MediaEvent::Ended);
            } else {
                let now = Instant::now();
                let due = self
                    .last_time_update
                    .is_none_or(|last| now.duration_since(last) >= TIME_UPDATE_INTERVAL);
                if due {
                    self.last_time_update = Some(now);
                    self.events.push(MediaEvent::TimeUpdate);
                }
            }
        }
        std::mem::take(&mut self.events)
    }
}
