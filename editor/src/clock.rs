//! Fixed-timestep simulation clock.
//!
//! DESIGN
//! ======
//! Wall time reported by the host is clamped, scaled by the playback speed and
//! poured into an accumulator. The accumulator is drained in whole `fixed_dt`
//! steps, so simulated time only ever advances in exact multiples of the
//! timestep and the render cadence never changes the physics outcome.

#[cfg(test)]
#[path = "clock_test.rs"]
mod clock_test;

use crate::consts::MAX_FRAME_DELTA_SECS;

/// Accumulator that converts host frame timestamps into fixed physics steps.
#[derive(Debug, Clone)]
pub struct SimulationClock {
    accumulator: f64,
    last_timestamp_ms: f64,
    simulation_time: f64,
    speed: f64,
    started: bool,
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self { accumulator: 0.0, last_timestamp_ms: 0.0, simulation_time: 0.0, speed: 1.0, started: false }
    }
}

impl SimulationClock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the playback speed multiplier. Does not change the step size.
    pub fn set_speed(&mut self, multiplier: f64) {
        self.speed = multiplier;
    }

    #[must_use]
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Total simulated seconds since the last reset.
    #[must_use]
    pub fn simulation_time(&self) -> f64 {
        self.simulation_time
    }

    /// Feed the current host timestamp (milliseconds) and return how many
    /// `fixed_dt` steps to run this frame.
    ///
    /// The first call after a start, pause or reset only records the timestamp.
    pub fn update(&mut self, now_ms: f64, fixed_dt: f64) -> u32 {
        if !self.started {
            self.last_timestamp_ms = now_ms;
            self.started = true;
            return 0;
        }

        let elapsed = ((now_ms - self.last_timestamp_ms) / 1000.0).clamp(0.0, MAX_FRAME_DELTA_SECS);
        self.last_timestamp_ms = now_ms;
        self.accumulator += elapsed * self.speed;

        let mut steps = 0;
        while self.accumulator >= fixed_dt {
            self.accumulator -= fixed_dt;
            self.simulation_time += fixed_dt;
            steps += 1;
        }
        steps
    }

    /// Stop tracking wall time; the next `update` re-synchronizes instead of
    /// injecting the paused interval.
    pub fn pause(&mut self) {
        self.started = false;
    }

    /// Zero the accumulator and simulated time.
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
        self.last_timestamp_ms = 0.0;
        self.simulation_time = 0.0;
        self.started = false;
    }
}
