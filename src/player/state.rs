//! Playback state owned by the controller.

use crate::config::RepeatSetting;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum RepeatMode {
    /// Stop after the last track.
    #[default]
    None,
    /// Wrap around to the first track.
    All,
    /// Restart the current track when it ends.
    One,
}

impl RepeatMode {
    /// `None -> All -> One -> None`.
    pub fn cycled(self) -> Self {
        match self {
            Self::None => Self::All,
            Self::All => Self::One,
            Self::One => Self::None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::None => "off",
            Self::All => "all",
            Self::One => "one",
        }
    }
}

impl From<RepeatSetting> for RepeatMode {
    fn from(s: RepeatSetting) -> Self {
        match s {
            RepeatSetting::None => Self::None,
            RepeatSetting::All => Self::All,
            RepeatSetting::One => Self::One,
        }
    }
}

/// Coarse lifecycle, derived from `PlayerState` for display.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PlayerPhase {
    Idle,
    Loading,
    Playing,
    Paused,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerState {
    pub current: Option<usize>,
    pub is_playing: bool,
    /// Seconds into the current track.
    pub current_time: f64,
    /// Seconds; `None` until the element reports metadata.
    pub duration: Option<f64>,
    /// Target volume in `[0, 1]`; fades ramp towards it.
    pub volume: f32,
    pub shuffled: bool,
    pub repeat: RepeatMode,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            current: None,
            is_playing: false,
            current_time: 0.0,
            duration: None,
            volume: 1.0,
            shuffled: false,
            repeat: RepeatMode::None,
        }
    }
}

impl PlayerState {
    pub fn phase(&self) -> PlayerPhase {
        match (self.current, self.is_playing, self.duration) {
            (None, _, _) => PlayerPhase::Idle,
            (Some(_), true, None) => PlayerPhase::Loading,
            (Some(_), true, Some(_)) => PlayerPhase::Playing,
            (Some(_), false, _) => PlayerPhase::Paused,
        }
    }

    /// Fraction of the track played, in `[0, 1]`. Zero when the duration is unknown.
    pub fn progress(&self) -> f64 {
        match self.duration {
            Some(d) if d.is_finite() && d > 0.0 => (self.current_time / d).clamp(0.0, 1.0),
            _ => 0.0,
        }
    }
}
