//! Simulation-wide physics configuration.

use serde::{Deserialize, Serialize};

use crate::camera::Point;
use crate::consts::{DEFAULT_GRAVITY_Y, POSITION_ITERATIONS, TIMESTEP_DEFAULT, TIMESTEP_MAX, TIMESTEP_MIN, VELOCITY_ITERATIONS};

/// Gravity, timestep bounds, and solver effort for a [`crate::physics::PhysicsWorld`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// World gravity in m/s² (Y-up).
    pub gravity: Point,
    pub timestep_default: f64,
    pub timestep_min: f64,
    pub timestep_max: f64,
    pub velocity_iterations: usize,
    pub position_iterations: usize,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Point::new(0.0, DEFAULT_GRAVITY_Y),
            timestep_default: TIMESTEP_DEFAULT,
            timestep_min: TIMESTEP_MIN,
            timestep_max: TIMESTEP_MAX,
            velocity_iterations: VELOCITY_ITERATIONS,
            position_iterations: POSITION_ITERATIONS,
        }
    }
}

impl PhysicsConfig {
    /// Clamp a requested timestep into the configured range.
    #[must_use]
    pub fn clamp_timestep(&self, dt: f64) -> f64 {
        dt.clamp(self.timestep_min, self.timestep_max)
    }
}
