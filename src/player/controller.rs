use std::time::{Duration, Instant};

use rand::Rng;
use tracing::{debug, info, warn};

use crate::config::{AudioSettings, PlaybackSettings};
use crate::library::{SourceFile, Track, TrackName, UrlRegistry, parse_file_name};

use super::fade::{AfterFade, Fade, FadeProgress, NEGLIGIBLE_DELTA};
use super::media::{MediaElement, MediaEvent, MediaSource};
use super::seek::angular_fraction;
use super::state::{PlayerPhase, PlayerState, RepeatMode};

/// Fade timing shared by every transition.
#[derive(Debug, Clone, Copy)]
pub struct FadeTiming {
    pub transition: Duration,
    pub steps: u32,
}

impl Default for FadeTiming {
    fn default() -> Self {
        Self {
            transition: Duration::from_millis(500),
            steps: 50,
        }
    }
}

impl From<&AudioSettings> for FadeTiming {
    fn from(s: &AudioSettings) -> Self {
        Self {
            transition: Duration::from_millis(s.transition_ms),
            steps: s.fade_steps.max(1),
        }
    }
}

/// Single owner of the playlist and playback state.
///
/// Every mutation goes through the methods below; presentation code reads
/// `state()`, `tracks()` and `current_track()`.
pub struct Controller<M: MediaElement> {
    media: M,
    urls: UrlRegistry,
    tracks: Vec<Track>,
    state: PlayerState,
    timing: FadeTiming,
    fade: Option<Fade>,
}

impl<M: MediaElement> Controller<M> {
    pub fn new(media: M, timing: FadeTiming) -> Self {
        Self {
            media,
            urls: UrlRegistry::new(),
            tracks: Vec::new(),
            state: PlayerState::default(),
            timing,
            fade: None,
        }
    }

    /// Apply startup defaults for volume, shuffle and repeat.
    pub fn with_playback_defaults(mut self, settings: &PlaybackSettings) -> Self {
        self.state.shuffled = settings.shuffle;
        self.state.repeat = settings.repeat.into();
        self.set_volume(settings.volume);
        self
    }

    pub fn state(&self) -> &PlayerState {
        &self.state
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.state.current.and_then(|i| self.tracks.get(i))
    }

    pub fn phase(&self) -> PlayerPhase {
        self.state.phase()
    }

    pub fn is_fading(&self) -> bool {
        self.fade.is_some()
    }

    /// How long the host loop may wait before the active fade's next step.
    pub fn next_fade_step_in(&self, now: Instant) -> Option<Duration> {
        self.fade
            .as_ref()
            .map(|fade| fade.next_step_at(now).saturating_duration_since(now))
    }

    #[cfg(test)]
    pub(crate) fn media(&self) -> &M {
        &self.media
    }

    #[cfg(test)]
    pub(crate) fn media_mut(&mut self) -> &mut M {
        &mut self.media
    }

    #[cfg(test)]
    pub(crate) fn live_urls(&self) -> usize {
        self.urls.live_count()
    }

    /// Replace the playlist with the audio entries of `files`.
    ///
    /// The previous generation of playable URLs is revoked first. A non-empty
    /// playlist selects its first track and requests playback; an empty one
    /// leaves the controller idle.
    pub fn load_files(&mut self, files: Vec<SourceFile>) {
        let offered = files.len();
        let audio: Vec<SourceFile> = files.into_iter().filter(SourceFile::is_audio).collect();

        // A pending swap would point into the old playlist.
        self.fade = None;

        let urls = self
            .urls
            .replace_generation(audio.iter().map(|f| f.path.as_path()));
        self.tracks = audio
            .into_iter()
            .zip(urls)
            .map(|(file, url)| {
                let TrackName { artist, name } = parse_file_name(&file.name);
                Track { name, artist, url }
            })
            .collect();

        info!(
            offered,
            accepted = self.tracks.len(),
            generation = self.urls.generation(),
            "loaded playlist"
        );

        if self.tracks.is_empty() {
            self.media.unload();
            self.state.current = None;
            self.state.is_playing = false;
            self.state.current_time = 0.0;
            self.state.duration = None;
        } else {
            self.switch_to(0);
            self.set_playing(true);
        }
    }

    /// Request a transition to `index`.
    pub fn select_track(&mut self, index: usize) {
        if index >= self.tracks.len() {
            debug!(index, len = self.tracks.len(), "ignoring out-of-range track selection");
            return;
        }
        if self.state.current == Some(index) {
            return;
        }

        if self.state.is_playing && self.state.current.is_some() {
            self.fade_to(0.0, self.timing.transition, Some(AfterFade::SwitchTo(index)));
        } else {
            self.switch_to(index);
            self.set_playing(true);
        }
    }

    pub fn play_next(&mut self) {
        let len = self.tracks.len();
        if len == 0 {
            return;
        }
        let next = if self.state.shuffled {
            let mut rng = rand::thread_rng();
            loop {
                let candidate = rng.gen_range(0..len);
                if len == 1 || Some(candidate) != self.state.current {
                    break candidate;
                }
            }
        } else {
            self.state.current.map_or(0, |i| (i + 1) % len)
        };
        self.select_track(next);
    }

    pub fn play_previous(&mut self) {
        let len = self.tracks.len();
        if len == 0 {
            return;
        }
        let prev = self.state.current.map_or(0, |i| (i + len - 1) % len);
        self.select_track(prev);
    }

    pub fn toggle_play_pause(&mut self) {
        match self.state.current {
            None if !self.tracks.is_empty() => {
                self.switch_to(0);
                self.set_playing(true);
            }
            None => {}
            Some(_) => self.set_playing(!self.state.is_playing),
        }
    }

    pub fn toggle_shuffle(&mut self) {
        self.state.shuffled = !self.state.shuffled;
    }

    pub fn cycle_repeat_mode(&mut self) {
        self.state.repeat = self.state.repeat.cycled();
    }

    /// Set the target volume and apply it immediately, without a fade.
    pub fn set_volume(&mut self, volume: f32) {
        if volume.is_nan() {
            return;
        }
        let volume = volume.clamp(0.0, 1.0);
        self.state.volume = volume;
        self.media.set_volume(volume);
    }

    /// Seek to `fraction` of the track. Ignored while the duration is unknown.
    pub fn seek(&mut self, fraction: f64) {
        let Some(duration) = self.state.duration.filter(|d| d.is_finite() && *d > 0.0) else {
            return;
        };
        let seconds = fraction * duration;
        if !seconds.is_finite() {
            return;
        }
        self.media.set_current_time(seconds);
        self.state.current_time = seconds;
    }

    /// Seek relative to the current position, clamped to the track.
    pub fn seek_by(&mut self, delta_seconds: f64) {
        let Some(duration) = self.state.duration.filter(|d| d.is_finite() && *d > 0.0) else {
            return;
        };
        let target = (self.state.current_time + delta_seconds).clamp(0.0, duration);
        self.seek(target / duration);
    }

    /// Seek from a pointer position on a circular scrubber centred at `center`.
    pub fn seek_to_pointer(&mut self, pointer: (f64, f64), center: (f64, f64)) {
        self.seek(angular_fraction(pointer, center));
    }

    /// Advance the active fade. Called by the host loop as the fade timer.
    pub fn tick(&mut self, now: Instant) {
        let Some(fade) = self.fade.as_mut() else {
            return;
        };
        match fade.advance(now) {
            FadeProgress::Running(volume) => self.media.set_volume(volume),
            FadeProgress::Finished { volume, then } => {
                self.fade = None;
                self.media.set_volume(volume);
                if let Some(action) = then {
                    self.run_after_fade(action);
                }
            }
        }
    }

    /// Forward every queued media event to its transition.
    pub fn pump_events(&mut self) {
        for event in self.media.drain_events() {
            self.handle_event(event);
        }
    }

    pub fn handle_event(&mut self, event: MediaEvent) {
        match event {
            MediaEvent::TimeUpdate => self.on_time_update(),
            MediaEvent::LoadedMetadata => self.on_loaded_metadata(),
            MediaEvent::Ended => self.on_track_ended(),
        }
    }

    fn on_time_update(&mut self) {
        self.state.current_time = self.media.current_time();
    }

    fn on_loaded_metadata(&mut self) {
        self.state.duration = self.media.duration();
        debug!(duration = ?self.state.duration, "metadata loaded");
        if self.state.is_playing {
            self.media.set_volume(0.0);
            self.request_play();
            self.fade_to(self.state.volume, self.timing.transition, None);
        }
    }

    pub fn on_track_ended(&mut self) {
        let last = self.tracks.len().checked_sub(1);
        if self.state.repeat == RepeatMode::One {
            self.media.set_current_time(0.0);
            self.state.current_time = 0.0;
            self.request_play();
        } else if self.state.current.is_some()
            && self.state.current == last
            && self.state.repeat == RepeatMode::None
            && !self.state.shuffled
        {
            self.set_playing(false);
        } else {
            self.play_next();
        }
    }

    /// Fade out over `fade_out` and pause; used before quitting.
    pub fn begin_quit(&mut self, fade_out: Duration) {
        if self.state.is_playing && self.state.current.is_some() && !fade_out.is_zero() {
            self.fade_to(0.0, fade_out, Some(AfterFade::Pause));
        } else {
            self.fade = None;
            self.media.pause();
        }
    }

    /// Release everything the session holds.
    pub fn shutdown(&mut self) {
        self.fade = None;
        self.media.unload();
        let released = self.urls.revoke_all();
        self.tracks.clear();
        self.state.current = None;
        self.state.is_playing = false;
        info!(released, "player shut down");
    }

    fn switch_to(&mut self, index: usize) {
        let Some(track) = self.tracks.get(index) else {
            return;
        };
        let Some(path) = self.urls.resolve(&track.url) else {
            warn!(index, url = %track.url, "track url is no longer live");
            return;
        };
        debug!(index, url = %track.url, "switching track");
        self.media.load(MediaSource {
            url: &track.url,
            path,
        });
        self.state.current = Some(index);
        self.state.current_time = 0.0;
        self.state.duration = None;
    }

    /// Flip the desired play state and run its side effect: resume with a
    /// fade-in, or fade out and pause.
    fn set_playing(&mut self, playing: bool) {
        if self.state.is_playing == playing {
            return;
        }
        self.state.is_playing = playing;
        if self.state.current.is_none() {
            return;
        }
        if playing {
            self.request_play();
            self.fade_to(self.state.volume, self.timing.transition, None);
        } else {
            self.fade_to(0.0, self.timing.transition, Some(AfterFade::Pause));
        }
    }

    fn request_play(&mut self) {
        if let Err(e) = self.media.play() {
            warn!(error = %e, "play request failed");
        }
    }

    /// Start a fade from the element's current volume, replacing any fade in flight.
    fn fade_to(&mut self, target: f32, duration: Duration, then: Option<AfterFade>) {
        self.fade = None;
        let from = self.media.volume();
        if (target - from).abs() < NEGLIGIBLE_DELTA {
            self.media.set_volume(target);
            if let Some(action) = then {
                self.run_after_fade(action);
            }
            return;
        }
        self.fade = Some(Fade::new(
            from,
            target,
            duration,
            self.timing.steps,
            Instant::now(),
            then,
        ));
    }

    fn run_after_fade(&mut self, action: AfterFade) {
        match action {
            AfterFade::Pause => self.media.pause(),
            AfterFade::SwitchTo(index) => self.switch_to(index),
        }
    }
}
