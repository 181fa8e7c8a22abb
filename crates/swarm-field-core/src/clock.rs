//! Play/pause state, speed multiplier and the wall-clock anchor used to turn
//! host timestamps into tick deltas.

use std::time::Instant;
use tracing::warn;

/// Speed used when the host passes a non-positive or non-finite multiplier.
/// The smallest speed the product's controls offer.
pub const FALLBACK_SPEED: f64 = 1.0;

/// Upper bound on decay cycles replayed by a single frame.
pub const MAX_DECAY_CATCHUP: u32 = 4;

/// Longest step, real or scaled, a single tick applies. Keeps positions and
/// running totals finite for absurd host deltas.
pub const MAX_TICK_SECONDS: f64 = 3600.0;

#[derive(Clone, Debug)]
pub struct SimulationClock {
    playing: bool,
    speed: f64,
    last_tick: Option<Instant>,
    /// Real seconds the clock has been running; drives the cosmetic bob.
    running_time: f64,
    decay_accumulator: f64,
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self {
            playing: false,
            speed: FALLBACK_SPEED,
            last_tick: None,
            running_time: 0.0,
            decay_accumulator: 0.0,
        }
    }
}

impl SimulationClock {
    pub fn is_running(&self) -> bool {
        self.playing
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn running_time(&self) -> f64 {
        self.running_time
    }

    /// Record the host's play state and speed for this tick boundary.
    pub fn set_state(&mut self, playing: bool, speed: f64) {
        self.playing = playing;
        self.speed = sanitize_speed(speed);
    }

    /// Real seconds since the previous call. The anchor is refreshed on every
    /// call, paused or not, so resuming never replays the paused interval.
    pub fn elapsed_since_last(&mut self, now: Instant, playing: bool) -> f64 {
        let previous = self.last_tick.replace(now);
        if !playing {
            return 0.0;
        }
        previous
            .map(|prev| now.saturating_duration_since(prev).as_secs_f64())
            .unwrap_or(0.0)
    }

    pub(crate) fn add_running_time(&mut self, real_delta: f64) {
        self.running_time += real_delta;
    }

    /// Feed real running time into the decay cadence and return how many
    /// cycles are due.
    pub fn take_decay_cycles(&mut self, real_delta: f64, interval: f64) -> u32 {
        if !self.playing || real_delta <= 0.0 || interval <= 0.0 {
            return 0;
        }
        self.decay_accumulator += real_delta;
        let due = (self.decay_accumulator / interval).floor();
        if due < 1.0 {
            return 0;
        }
        let cycles = (due as u32).min(MAX_DECAY_CATCHUP);
        if due as u32 > MAX_DECAY_CATCHUP {
            // Frame stalled for too long; drop the backlog.
            self.decay_accumulator = 0.0;
        } else {
            self.decay_accumulator -= due * interval;
        }
        cycles
    }

    pub(crate) fn reset_cadence(&mut self) {
        self.running_time = 0.0;
        self.decay_accumulator = 0.0;
    }
}

/// Negative, NaN and infinite deltas become zero.
pub fn sanitize_delta(delta: f64) -> f64 {
    if delta.is_finite() && delta >= 0.0 {
        return delta;
    }
    warn!(delta, "discarding invalid tick delta");
    0.0
}

/// Caps a sanitised (finite or `+inf`, non-negative) delta at
/// [`MAX_TICK_SECONDS`].
pub fn clamp_tick_delta(delta: f64) -> f64 {
    if delta <= MAX_TICK_SECONDS {
        return delta;
    }
    warn!(delta, max = MAX_TICK_SECONDS, "clamping oversized tick delta");
    MAX_TICK_SECONDS
}

/// Non-positive and non-finite multipliers fall back to [`FALLBACK_SPEED`].
pub fn sanitize_speed(speed: f64) -> f64 {
    if speed.is_finite() && speed > 0.0 {
        return speed;
    }
    warn!(speed, fallback = FALLBACK_SPEED, "replacing invalid speed multiplier");
    FALLBACK_SPEED
}
