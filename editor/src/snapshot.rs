//! Whole-scene snapshot for save and load.
//!
//! A snapshot holds every primitive and connection with their complete
//! property sets plus the simulation settings. Entities are sorted by id so
//! the same scene always serializes to the same JSON.

#[cfg(test)]
#[path = "snapshot_test.rs"]
mod snapshot_test;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::camera::Point;
use crate::config::PhysicsConfig;
use crate::doc::{Connection, Primitive};
use crate::scene::Scene;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneSnapshot {
    pub primitives: Vec<Primitive>,
    pub connections: Vec<Connection>,
    pub gravity: Point,
    pub fixed_timestep: f64,
}

impl Default for SceneSnapshot {
    fn default() -> Self {
        let config = PhysicsConfig::default();
        Self {
            primitives: Vec::new(),
            connections: Vec::new(),
            gravity: config.gravity,
            fixed_timestep: config.timestep_default,
        }
    }
}

impl SceneSnapshot {
    /// Capture the current model and settings of `scene`.
    #[must_use]
    pub fn capture(scene: &Scene) -> Self {
        let mut primitives: Vec<Primitive> = scene.doc.primitives().cloned().collect();
        let mut connections: Vec<Connection> = scene.doc.connections().cloned().collect();
        primitives.sort_by(|a, b| a.id.cmp(&b.id));
        connections.sort_by(|a, b| a.id.cmp(&b.id));
        Self {
            primitives,
            connections,
            gravity: scene.physics.gravity(),
            fixed_timestep: scene.physics.fixed_timestep(),
        }
    }

    /// Replace the contents of `scene` with this snapshot.
    ///
    /// Primitives go in before connections. A connection whose endpoints are
    /// missing is skipped with a warning. Returns the number of connections
    /// skipped.
    pub fn restore(&self, scene: &mut Scene) -> usize {
        scene.clear();
        scene.physics.set_gravity(self.gravity);
        scene.physics.set_fixed_timestep(self.fixed_timestep);

        for primitive in &self.primitives {
            scene.insert_primitive(primitive.clone());
        }
        let mut skipped = 0;
        for connection in &self.connections {
            if let Err(err) = scene.insert_connection(connection.clone()) {
                warn!(id = %connection.id, error = %err, "skipping connection on load");
                skipped += 1;
            }
        }
        info!(
            primitives = self.primitives.len(),
            connections = self.connections.len() - skipped,
            skipped,
            "scene loaded"
        );
        skipped
    }
}
