//! Play / pause / reset lifecycle.
//!
//! DESIGN
//! ======
//! The first `play` after editing captures every primitive's pose. `pause`
//! and a later `play` leave that capture alone. `reset` writes it back into
//! the model and the bodies, zeroes their velocities and wakes them, so the
//! scene returns exactly to where it was before the run. Reset while already
//! editing does nothing, which keeps a stale capture from undoing edits.

#[cfg(test)]
#[path = "lifecycle_test.rs"]
mod lifecycle_test;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::clock::SimulationClock;
use crate::doc::Pose;
use crate::events::Action;
use crate::ids::EntityId;
use crate::scene::Scene;

/// Simulation mode of the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimState {
    #[default]
    Editing,
    Playing,
    Paused,
}

/// Lifecycle state machine plus the fixed-step clock it drives.
#[derive(Debug, Default)]
pub struct Playback {
    state: SimState,
    clock: SimulationClock,
    snapshot: Vec<(EntityId, Pose)>,
}

impl Playback {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> SimState {
        self.state
    }

    #[must_use]
    pub fn is_editing(&self) -> bool {
        self.state == SimState::Editing
    }

    #[must_use]
    pub fn simulation_time(&self) -> f64 {
        self.clock.simulation_time()
    }

    #[must_use]
    pub fn speed(&self) -> f64 {
        self.clock.speed()
    }

    pub fn set_speed(&mut self, multiplier: f64) {
        self.clock.set_speed(multiplier);
    }

    /// Start or resume playback. Returns false if already playing.
    pub fn play(&mut self, scene: &mut Scene) -> bool {
        match self.state {
            SimState::Playing => return false,
            SimState::Editing => {
                self.snapshot = scene.poses();
                info!(primitives = self.snapshot.len(), "pose snapshot captured");
            }
            SimState::Paused => {}
        }
        self.transition(SimState::Playing, scene);
        true
    }

    /// Pause a running simulation. Returns false unless playing.
    pub fn pause(&mut self, scene: &mut Scene) -> bool {
        if self.state != SimState::Playing {
            return false;
        }
        self.clock.pause();
        self.transition(SimState::Paused, scene);
        true
    }

    /// Restore the captured poses and return to editing. Returns false if
    /// already editing.
    pub fn reset(&mut self, scene: &mut Scene) -> bool {
        if self.state == SimState::Editing {
            return false;
        }
        self.clock.reset();
        for (id, pose) in std::mem::take(&mut self.snapshot) {
            scene.restore_pose(&id, pose);
        }
        self.transition(SimState::Editing, scene);
        true
    }

    /// Drop back to editing without restoring anything. Used when the whole
    /// scene is replaced.
    pub fn force_editing(&mut self, scene: &mut Scene) {
        self.clock.reset();
        self.snapshot.clear();
        if self.state != SimState::Editing {
            self.transition(SimState::Editing, scene);
        }
    }

    /// Advance the simulation for a host frame at `now_ms`. Returns the
    /// number of fixed steps taken.
    pub fn tick(&mut self, now_ms: f64, scene: &mut Scene) -> u32 {
        if self.state != SimState::Playing {
            return 0;
        }
        let steps = self.clock.update(now_ms, scene.physics.fixed_timestep());
        for _ in 0..steps {
            scene.physics.step();
        }
        if steps > 0 {
            scene.sync_from_bodies();
        }
        steps
    }

    fn transition(&mut self, state: SimState, scene: &mut Scene) {
        info!(from = ?self.state, to = ?state, "simulation state changed");
        self.state = state;
        scene.notifier.push(Action::SimulationStateChanged { state });
    }
}
