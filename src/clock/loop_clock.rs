//! Loop time engine.
//!
//! The clock keeps two notions of time apart: an *accumulator* of speed-scaled elapsed
//! milliseconds, which only moves forward unless reset or seeked, and the *loop time* shown to
//! the renderer, which is the accumulator folded into `[0, duration]`.

use crate::clock::time_source::{MonotonicTime, TimeSource};
use crate::foundation::math::clamp_finite;

pub const MIN_DURATION_MS: f64 = 1.0;
pub const MIN_SPEED: f64 = 0.1;
pub const MAX_SPEED: f64 = 3.0;

/// Playback direction of the folded loop time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

impl Direction {
    pub fn sign(self) -> f64 {
        match self {
            Self::Forward => 1.0,
            Self::Backward => -1.0,
        }
    }
}

/// Loop time plus the direction it is travelling in.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Folded {
    pub time: f64,
    pub direction: Direction,
}

/// Fold an absolute elapsed time into the loop.
///
/// Without ping-pong the result is `elapsed mod duration`. With ping-pong the loop plays
/// forward over `[0, duration]` and back over `(duration, 2 * duration)`.
pub fn fold_loop_time(elapsed_ms: f64, duration_ms: f64, ping_pong: bool) -> Folded {
    let forward = |time| Folded {
        time,
        direction: Direction::Forward,
    };
    let clean = if elapsed_ms.is_finite() {
        elapsed_ms.max(0.0)
    } else {
        0.0
    };
    let full = if ping_pong {
        duration_ms * 2.0
    } else {
        duration_ms
    };
    if !(full > 0.0) {
        return forward(0.0);
    }

    let raw = clean % full;
    if !ping_pong || raw <= duration_ms {
        return forward(raw);
    }
    Folded {
        time: full - raw,
        direction: Direction::Backward,
    }
}

/// Temporal context of a single frame.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoopState {
    pub time: f64,
    pub duration: f64,
    /// `time / duration` clamped to `[0, 1]`.
    pub progress: f64,
    pub direction: Direction,
    pub paused: bool,
    pub ping_pong: bool,
}

/// Result of [`LoopClock::set_duration`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DurationChange {
    pub previous: f64,
    pub next: f64,
}

impl DurationChange {
    pub fn ratio(self) -> f64 {
        if self.previous > 0.0 {
            self.next / self.previous
        } else {
            1.0
        }
    }
}

pub struct LoopClock {
    duration: f64,
    speed: f64,
    paused: bool,
    ping_pong: bool,

    last_tick: f64,
    accumulator: f64,
    current: f64,
    direction: Direction,

    time: Box<dyn TimeSource>,
}

impl std::fmt::Debug for LoopClock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoopClock")
            .field("duration", &self.duration)
            .field("speed", &self.speed)
            .field("paused", &self.paused)
            .field("ping_pong", &self.ping_pong)
            .field("accumulator", &self.accumulator)
            .field("current", &self.current)
            .field("direction", &self.direction)
            .finish()
    }
}

impl LoopClock {
    pub fn new(duration_ms: f64) -> Self {
        Self::with_time_source(duration_ms, Box::new(MonotonicTime::new()))
    }

    pub fn with_time_source(duration_ms: f64, time: Box<dyn TimeSource>) -> Self {
        let duration = clamp_finite(duration_ms, MIN_DURATION_MS, f64::MAX).unwrap_or(10_000.0);
        let now = time.now_ms();
        Self {
            duration,
            speed: 1.0,
            paused: false,
            ping_pong: false,
            last_tick: now,
            accumulator: 0.0,
            current: 0.0,
            direction: Direction::Forward,
            time,
        }
    }

    /// Fold `elapsed_ms` with the clock's current duration and ping-pong setting.
    pub fn compute_time(&self, elapsed_ms: f64) -> Folded {
        fold_loop_time(elapsed_ms, self.duration, self.ping_pong)
    }

    /// Loop time for a simulated elapsed wall-clock time, e.g. from the export sampler.
    ///
    /// Pure with respect to the live accumulator.
    pub fn map_elapsed_to_loop_time(&self, elapsed_ms: f64) -> f64 {
        self.compute_time(elapsed_ms * self.speed).time
    }

    fn update(&mut self) -> f64 {
        let now = self.time.now_ms();
        let delta = now - self.last_tick;
        self.last_tick = now;

        if !self.paused && delta.is_finite() {
            self.accumulator += delta * self.speed;
        }

        let folded = self.compute_time(self.accumulator);
        self.current = folded.time;
        self.direction = folded.direction;
        self.current
    }

    /// Advance the clock to "now" and report the frame's loop state.
    pub fn loop_state(&mut self) -> LoopState {
        let time = self.update();
        LoopState {
            time,
            duration: self.duration,
            progress: (time / self.duration).clamp(0.0, 1.0),
            direction: self.direction,
            paused: self.paused,
            ping_pong: self.ping_pong,
        }
    }

    fn set_position(&mut self, ms: f64) {
        self.accumulator = ms;
        self.current = ms;
        self.last_tick = self.time.now_ms();
    }

    /// Absolute seek in milliseconds, clamped to `[0, duration]`.
    pub fn seek(&mut self, ms: f64) {
        let Some(clamped) = clamp_finite(ms, 0.0, self.duration) else {
            tracing::debug!(ms, "ignoring non-finite seek");
            return;
        };
        self.set_position(clamped);
        self.direction = Direction::Forward;
    }

    /// Normalized seek, `progress` in `[0, 1]`.
    pub fn seek_progress(&mut self, progress: f64) {
        self.seek(progress * self.duration);
    }

    /// Frame-by-frame scrubbing; only honoured while paused.
    pub fn step(&mut self, delta_ms: f64) {
        if !self.paused {
            return;
        }
        let Some(next) = clamp_finite(self.current + delta_ms, 0.0, self.duration) else {
            tracing::debug!(delta_ms, "ignoring non-finite step");
            return;
        };
        self.set_position(next);
    }

    pub fn reset(&mut self) {
        self.set_position(0.0);
        self.direction = Direction::Forward;
    }

    /// Change the loop length, keeping the proportional position within the loop.
    ///
    /// Non-finite input is ignored and returns `None`.
    pub fn set_duration(&mut self, duration_ms: f64) -> Option<DurationChange> {
        let Some(next) = clamp_finite(duration_ms, MIN_DURATION_MS, f64::MAX) else {
            tracing::warn!(duration_ms, "ignoring non-finite loop duration");
            return None;
        };
        let change = DurationChange {
            previous: self.duration,
            next,
        };
        self.duration = next;
        self.accumulator *= change.ratio();
        let folded = self.compute_time(self.accumulator);
        self.current = folded.time;
        self.direction = folded.direction;
        self.last_tick = self.time.now_ms();
        Some(change)
    }

    pub fn set_speed(&mut self, speed: f64) -> f64 {
        self.update();
        match clamp_finite(speed, MIN_SPEED, MAX_SPEED) {
            Some(s) => self.speed = s,
            None => tracing::warn!(speed, "ignoring non-finite loop speed"),
        }
        self.speed
    }

    /// Set or toggle (`None`) the paused flag.
    pub fn set_paused(&mut self, paused: Option<bool>) -> bool {
        self.update();
        self.paused = paused.unwrap_or(!self.paused);
        self.paused
    }

    /// Set or toggle (`None`) ping-pong playback.
    ///
    /// The folded position becomes the new unfolded baseline so the visible time does not jump.
    pub fn set_ping_pong(&mut self, ping_pong: Option<bool>) -> bool {
        self.accumulator = self.update();
        self.ping_pong = ping_pong.unwrap_or(!self.ping_pong);
        self.direction = Direction::Forward;
        self.ping_pong
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_ping_pong(&self) -> bool {
        self.ping_pong
    }

    /// Speed-scaled elapsed milliseconds before folding.
    pub fn accumulator(&self) -> f64 {
        self.accumulator
    }

    /// Loop time computed by the most recent update, without advancing the clock.
    pub fn current_time(&self) -> f64 {
        self.current
    }
}

#[cfg(test)]
#[path = "../../tests/unit/clock/loop_clock.rs"]
mod tests;
