//! Stepped linear volume ramps.
//!
//! A fade runs as a fixed number of evenly spaced steps. The host loop acts as
//! the repeating timer by calling `advance` with the current instant; every
//! step that is due by then is applied at once.

use std::time::{Duration, Instant};

/// Deltas below this complete without stepping.
pub const NEGLIGIBLE_DELTA: f32 = 0.01;

/// Work to run once a fade reaches its target.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AfterFade {
    /// Pause the media element.
    Pause,
    /// Swap the active track to this playlist index.
    SwitchTo(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub enum FadeProgress {
    Running(f32),
    Finished {
        volume: f32,
        then: Option<AfterFade>,
    },
}

#[derive(Debug, Clone)]
pub struct Fade {
    from: f32,
    to: f32,
    steps: u32,
    step_interval: Duration,
    started_at: Instant,
    then: Option<AfterFade>,
}

impl Fade {
    pub fn new(
        from: f32,
        to: f32,
        duration: Duration,
        steps: u32,
        started_at: Instant,
        then: Option<AfterFade>,
    ) -> Self {
        let steps = steps.max(1);
        Self {
            from,
            to,
            steps,
            step_interval: duration / steps,
            started_at,
            then,
        }
    }

    fn due_steps(&self, now: Instant) -> u32 {
        if self.step_interval.is_zero() {
            return self.steps;
        }
        let elapsed = now.saturating_duration_since(self.started_at);
        let due = elapsed.as_nanos() / self.step_interval.as_nanos();
        due.min(u128::from(self.steps)) as u32
    }

    /// Instant at which the step after those due by `now` falls due.
    pub fn next_step_at(&self, now: Instant) -> Instant {
        self.started_at + self.step_interval * (self.due_steps(now) + 1)
    }

    /// Volume after `step` of `steps`, clamped to `[0, 1]`.
    pub fn volume_at(&self, step: u32) -> f32 {
        let per_step = (self.to - self.from) / self.steps as f32;
        (self.from + per_step * step as f32).clamp(0.0, 1.0)
    }

    /// Apply every step due by `now`. On the last step the exact target is
    /// reported and the completion action is handed out (once).
    pub fn advance(&mut self, now: Instant) -> FadeProgress {
        let due = self.due_steps(now);
        if due >= self.steps {
            FadeProgress::Finished {
                volume: self.to,
                then: self.then.take(),
            }
        } else {
            FadeProgress::Running(self.volume_at(due))
        }
    }
}
