//! Scene aggregate: document, physics binding, selection, and notifier.
//!
//! DESIGN
//! ======
//! Every structural mutation lives here so that the entity model and the
//! backend change in lockstep: bodies are created right after the entity is
//! minted and destroyed right before it is dropped from the document. A
//! primitive deletion cascades to its connections, and deleted ids leave the
//! selection in the same call. Notifications queue on the notifier and are
//! drained by the engine once the call has finished.

#[cfg(test)]
#[path = "scene_test.rs"]
mod scene_test;

use tracing::{debug, warn};

use crate::camera::Point;
use crate::doc::{Connection, ConnectionKind, Pose, Primitive, PrimitiveKind, SceneDoc};
use crate::error::SceneError;
use crate::events::{Action, Notifier};
use crate::hit;
use crate::ids::EntityId;
use crate::physics::PhysicsWorld;
use crate::selection::Selection;

#[derive(Default)]
pub struct Scene {
    pub(crate) doc: SceneDoc,
    pub(crate) physics: PhysicsWorld,
    pub(crate) selection: Selection,
    pub(crate) notifier: Notifier,
}

impl Scene {
    #[must_use]
    pub fn new(physics: PhysicsWorld) -> Self {
        Self { doc: SceneDoc::new(), physics, selection: Selection::new(), notifier: Notifier::default() }
    }

    #[must_use]
    pub fn doc(&self) -> &SceneDoc {
        &self.doc
    }

    #[must_use]
    pub fn physics(&self) -> &PhysicsWorld {
        &self.physics
    }

    #[must_use]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    // =========================================================================
    // CREATION
    // =========================================================================

    /// Mint a primitive of `kind` at `position` and give it a body.
    pub fn add_primitive(&mut self, kind: PrimitiveKind, position: Point) -> EntityId {
        let primitive = self.doc.create_primitive(kind, position);
        let id = primitive.id.clone();
        self.insert_primitive(primitive);
        id
    }

    /// Register an already-built primitive, replacing any with the same id.
    ///
    /// Replacing a body drops its joints in the backend, so connections that
    /// reference `id` are rebuilt against the new body. A connection whose
    /// joint cannot be rebuilt is deleted.
    pub fn insert_primitive(&mut self, primitive: Primitive) {
        self.physics.add_primitive(&primitive);
        let id = primitive.id.clone();
        self.doc.insert_primitive(primitive);
        debug!(%id, "primitive added");
        self.notifier.push(Action::PrimitiveCreated { id: id.clone() });

        let mut deselected = false;
        for connection_id in self.doc.connections_for_body(&id) {
            let Some(connection) = self.doc.connection(&connection_id) else {
                continue;
            };
            if let Err(err) = self.physics.add_connection(connection) {
                warn!(id = %connection_id, error = %err, "joint rebind failed");
                deselected |= self.remove_connection_quietly(&connection_id).unwrap_or(false);
            }
        }
        if deselected {
            self.selection.notify(&mut self.notifier);
        }
    }

    /// Connect bodies `a` and `b` at the given world-space anchors.
    ///
    /// Anchors are stored in each body's local frame. The initial anchor
    /// distance seeds the rest length of spring and damper connections.
    pub fn connect(
        &mut self,
        kind: ConnectionKind,
        a: &EntityId,
        b: &EntityId,
        world_anchor_a: Point,
        world_anchor_b: Point,
    ) -> Result<EntityId, SceneError> {
        if a == b {
            return Err(SceneError::SelfConnection(a.clone()));
        }
        let local_a =
            self.physics.world_to_local(a, world_anchor_a).ok_or_else(|| SceneError::BodyNotFound(a.clone()))?;
        let local_b =
            self.physics.world_to_local(b, world_anchor_b).ok_or_else(|| SceneError::BodyNotFound(b.clone()))?;
        let distance = world_anchor_a.distance(world_anchor_b);

        let connection = self.doc.create_connection(kind, a.clone(), b.clone(), local_a, local_b, distance);
        let id = connection.id.clone();
        self.insert_connection(connection)?;
        Ok(id)
    }

    /// Register an already-built connection. Nothing is recorded if the joint
    /// cannot be created.
    pub fn insert_connection(&mut self, connection: Connection) -> Result<(), SceneError> {
        if self.doc.primitive(&connection.body_a).is_none() {
            return Err(SceneError::BodyNotFound(connection.body_a.clone()));
        }
        if self.doc.primitive(&connection.body_b).is_none() {
            return Err(SceneError::BodyNotFound(connection.body_b.clone()));
        }
        if let Err(err) = self.physics.add_connection(&connection) {
            warn!(id = %connection.id, error = %err, "joint creation failed");
            return Err(err);
        }
        let id = connection.id.clone();
        self.doc.insert_connection(connection);
        debug!(%id, "connection added");
        self.notifier.push(Action::ConnectionCreated { id });
        Ok(())
    }

    // =========================================================================
    // DELETION
    // =========================================================================

    /// Delete a primitive and every connection that references it.
    /// Returns false when `id` is not a primitive.
    pub fn delete_primitive(&mut self, id: &EntityId) -> bool {
        match self.remove_primitive_quietly(id) {
            None => false,
            Some(deselected) => {
                if deselected {
                    self.selection.notify(&mut self.notifier);
                }
                true
            }
        }
    }

    /// Delete a single connection. Returns false when `id` is not a connection.
    pub fn delete_connection(&mut self, id: &EntityId) -> bool {
        match self.remove_connection_quietly(id) {
            None => false,
            Some(deselected) => {
                if deselected {
                    self.selection.notify(&mut self.notifier);
                }
                true
            }
        }
    }

    /// Delete everything currently selected. Connections go first so a
    /// cascading primitive deletion never reports them twice.
    pub fn delete_selected(&mut self) -> usize {
        let selected = self.selection.selected_ids();
        if selected.is_empty() {
            return 0;
        }
        let mut deleted = 0;
        for id in &selected {
            if self.remove_connection_quietly(id).is_some() {
                deleted += 1;
            }
        }
        for id in &selected {
            if self.remove_primitive_quietly(id).is_some() {
                deleted += 1;
            }
        }
        self.selection.forget_all();
        self.selection.notify(&mut self.notifier);
        deleted
    }

    /// Remove a primitive and its connections, queueing deletion actions but
    /// not a selection change. Yields whether anything left the selection.
    fn remove_primitive_quietly(&mut self, id: &EntityId) -> Option<bool> {
        if self.doc.primitive(id).is_none() {
            return None;
        }
        let mut deselected = false;
        for connection_id in self.doc.connections_for_body(id) {
            deselected |= self.remove_connection_quietly(&connection_id).unwrap_or(false);
        }
        self.physics.remove_primitive(id);
        self.doc.remove_primitive(id);
        deselected |= self.selection.forget(id);
        debug!(%id, "primitive deleted");
        self.notifier.push(Action::PrimitiveDeleted { id: id.clone() });
        Some(deselected)
    }

    fn remove_connection_quietly(&mut self, id: &EntityId) -> Option<bool> {
        self.doc.connection(id)?;
        self.physics.remove_connection(id);
        self.doc.remove_connection(id);
        let deselected = self.selection.forget(id);
        debug!(%id, "connection deleted");
        self.notifier.push(Action::ConnectionDeleted { id: id.clone() });
        Some(deselected)
    }

    /// Drop every entity, reset the backend and the id sequence.
    pub fn clear(&mut self) {
        self.physics.reset();
        self.doc.clear();
        let had_selection = self.selection.has_selection();
        self.selection.forget_all();
        if had_selection {
            self.selection.notify(&mut self.notifier);
        }
        self.notifier.push(Action::SceneCleared);
    }

    // =========================================================================
    // POSES
    // =========================================================================

    /// Teleport a primitive, in the model and its body. Velocity is zeroed so
    /// a dragged body does not carry momentum into play.
    pub fn move_primitive(&mut self, id: &EntityId, pose: Pose) -> bool {
        let Some(primitive) = self.doc.primitive_mut(id) else {
            return false;
        };
        primitive.set_pose(pose);
        self.physics.set_body_pose(id, pose);
        self.physics.set_body_velocity(id, Point::default(), 0.0);
        true
    }

    /// Restore a captured pose with zero velocity and a woken body.
    pub fn restore_pose(&mut self, id: &EntityId, pose: Pose) -> bool {
        if !self.move_primitive(id, pose) {
            return false;
        }
        self.physics.wake(id);
        true
    }

    /// Copy every live body pose into the model.
    pub fn sync_from_bodies(&mut self) {
        let physics = &self.physics;
        for primitive in self.doc.primitives_mut() {
            if let Some(pose) = physics.body_pose(&primitive.id) {
                primitive.set_pose(pose);
            }
        }
    }

    /// Pose of every primitive, for snapshotting.
    #[must_use]
    pub fn poses(&self) -> Vec<(EntityId, Pose)> {
        self.doc.primitives().map(|p| (p.id.clone(), p.pose())).collect()
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    #[must_use]
    pub fn hit_test_point(&self, world: Point) -> Option<EntityId> {
        hit::hit_test_point(&self.doc, &self.physics, world)
    }

    #[must_use]
    pub fn hit_test_rect(&self, a: Point, b: Point) -> Vec<EntityId> {
        hit::hit_test_rect(&self.doc, &self.physics, a, b)
    }

    /// Take every queued notification.
    pub fn drain_events(&mut self) -> Vec<Action> {
        self.notifier.drain()
    }
}
