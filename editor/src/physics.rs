//! Physics binding layer.
//!
//! DESIGN
//! ======
//! `PhysicsWorld` owns the rapier sets and pipeline and keeps two maps: primitive
//! id to body/collider handles and connection id to joint handle. Every scene
//! mutation goes through here so the maps and the backend never disagree.
//!
//! Each body carries exactly one collider attached at its origin, so a body's
//! isometry is also its collider's isometry. Hit testing relies on that and asks
//! parry directly instead of maintaining a query pipeline, which would lag one
//! step behind edits made while the world is not stepping.
//!
//! Removing a body makes rapier drop every joint attached to it. The joint map
//! is pruned right after, so a later `remove_connection` for a cascaded joint is
//! a harmless no-op.

#[cfg(test)]
#[path = "physics_test.rs"]
mod physics_test;

use std::collections::HashMap;
use std::f64::consts::TAU;
use std::num::NonZeroUsize;

use rapier2d_f64::na::{Isometry2, Point2, UnitComplex, Vector2};
use rapier2d_f64::parry::bounding_volume::{Aabb, BoundingVolume};
use rapier2d_f64::prelude::{
    CCDSolver, Collider, ColliderBuilder, ColliderHandle, ColliderSet, DefaultBroadPhase, FixedJointBuilder,
    GenericJoint, GenericJointBuilder, ImpulseJointHandle, ImpulseJointSet, IntegrationParameters, IslandManager,
    JointAxesMask, JointAxis, LockedAxes, MotorModel, MultibodyJointSet, NarrowPhase, PhysicsPipeline,
    RevoluteJointBuilder, RigidBody, RigidBodyBuilder, RigidBodyHandle, RigidBodySet, RigidBodyType,
    SpringJointBuilder,
};
use serde::Serialize;
use tracing::{debug, warn};

use crate::camera::Point;
use crate::config::PhysicsConfig;
use crate::doc::{BodyType, Connection, JointParams, Pose, Primitive, Shape};
use crate::error::SceneError;
use crate::ids::EntityId;

/// Velocity-motor gain for revolute motors.
const MOTOR_DAMPING: f64 = 1.0;

/// Live kinematic state of a body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BodyState {
    pub position: Point,
    pub angle: f64,
    pub linear_velocity: Point,
    pub angular_velocity: f64,
}

#[derive(Debug, Clone, Copy)]
struct BodyBinding {
    body: RigidBodyHandle,
    collider: ColliderHandle,
}

/// Rapier world plus the id mappings that tie it to the scene document.
pub struct PhysicsWorld {
    config: PhysicsConfig,
    gravity: Vector2<f64>,
    params: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd: CCDSolver,
    bindings: HashMap<EntityId, BodyBinding>,
    joints: HashMap<EntityId, ImpulseJointHandle>,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new(PhysicsConfig::default())
    }
}

impl PhysicsWorld {
    /// Create an empty world using `config` for gravity and solver settings.
    #[must_use]
    pub fn new(config: PhysicsConfig) -> Self {
        let mut params = IntegrationParameters::default();
        params.dt = config.clamp_timestep(config.timestep_default);
        params.num_solver_iterations = NonZeroUsize::new(config.velocity_iterations).unwrap_or(NonZeroUsize::MIN);
        params.num_internal_pgs_iterations = config.position_iterations;

        Self {
            config,
            gravity: Vector2::new(config.gravity.x, config.gravity.y),
            params,
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd: CCDSolver::new(),
            bindings: HashMap::new(),
            joints: HashMap::new(),
        }
    }

    // =========================================================================
    // BODIES
    // =========================================================================

    /// Create the body and collider for `primitive`, replacing any previous
    /// binding for the same id.
    pub fn add_primitive(&mut self, primitive: &Primitive) {
        if self.bindings.contains_key(&primitive.id) {
            self.remove_primitive(&primitive.id);
        }

        let body = RigidBodyBuilder::new(rigid_body_type(primitive.body_type))
            .translation(Vector2::new(primitive.position.x, primitive.position.y))
            .rotation(primitive.angle)
            .linear_damping(primitive.linear_damping)
            .angular_damping(primitive.angular_damping)
            .locked_axes(locked_axes(primitive.fixed_rotation))
            .build();
        let body = self.bodies.insert(body);
        let collider = self.colliders.insert_with_parent(build_collider(primitive), body, &mut self.bodies);

        self.bindings.insert(primitive.id.clone(), BodyBinding { body, collider });
        debug!(id = %primitive.id, kind = ?primitive.kind(), "body created");
    }

    /// Destroy the body for `id`. Joints attached to it go with it.
    pub fn remove_primitive(&mut self, id: &EntityId) {
        let Some(binding) = self.bindings.remove(id) else {
            return;
        };
        self.bodies.remove(
            binding.body,
            &mut self.islands,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
        let joints = &self.impulse_joints;
        self.joints.retain(|_, handle| joints.get(*handle).is_some());
        debug!(%id, "body removed");
    }

    /// Recreate the collider after a shape or material edit.
    pub fn rebuild_collider(&mut self, primitive: &Primitive) {
        let Some(binding) = self.bindings.get_mut(&primitive.id) else {
            return;
        };
        self.colliders.remove(binding.collider, &mut self.islands, &mut self.bodies, true);
        binding.collider = self.colliders.insert_with_parent(build_collider(primitive), binding.body, &mut self.bodies);
        if let Some(body) = self.bodies.get_mut(binding.body) {
            body.recompute_mass_properties_from_colliders(&self.colliders);
            body.wake_up(true);
        }
    }

    pub fn set_damping(&mut self, id: &EntityId, linear: f64, angular: f64) {
        if let Some(body) = self.body_mut(id) {
            body.set_linear_damping(linear);
            body.set_angular_damping(angular);
        }
    }

    pub fn set_fixed_rotation(&mut self, id: &EntityId, fixed: bool) {
        if let Some(body) = self.body_mut(id) {
            body.lock_rotations(fixed, true);
        }
    }

    pub fn set_body_type(&mut self, id: &EntityId, body_type: BodyType) {
        if let Some(body) = self.body_mut(id) {
            body.set_body_type(rigid_body_type(body_type), true);
        }
    }

    /// Teleport the body for `id` to `pose`.
    pub fn set_body_pose(&mut self, id: &EntityId, pose: Pose) {
        if let Some(body) = self.body_mut(id) {
            body.set_position(Isometry2::new(Vector2::new(pose.position.x, pose.position.y), pose.angle), true);
        }
    }

    pub fn set_body_velocity(&mut self, id: &EntityId, linear: Point, angular: f64) {
        if let Some(body) = self.body_mut(id) {
            body.set_linvel(Vector2::new(linear.x, linear.y), true);
            body.set_angvel(angular, true);
        }
    }

    pub fn wake(&mut self, id: &EntityId) {
        if let Some(body) = self.body_mut(id) {
            body.wake_up(true);
        }
    }

    #[must_use]
    pub fn body_state(&self, id: &EntityId) -> Option<BodyState> {
        let body = self.body(id)?;
        let translation = body.translation();
        let linvel = body.linvel();
        Some(BodyState {
            position: Point::new(translation.x, translation.y),
            angle: body.rotation().angle(),
            linear_velocity: Point::new(linvel.x, linvel.y),
            angular_velocity: body.angvel(),
        })
    }

    #[must_use]
    pub fn body_pose(&self, id: &EntityId) -> Option<Pose> {
        self.body_state(id).map(|s| Pose { position: s.position, angle: s.angle })
    }

    /// Transform a world point into the local frame of body `id`.
    #[must_use]
    pub fn world_to_local(&self, id: &EntityId, world: Point) -> Option<Point> {
        let body = self.body(id)?;
        let local = body.position().inverse_transform_point(&Point2::new(world.x, world.y));
        Some(Point::new(local.x, local.y))
    }

    /// Transform a point in the local frame of body `id` into world space.
    #[must_use]
    pub fn local_to_world(&self, id: &EntityId, local: Point) -> Option<Point> {
        let body = self.body(id)?;
        let world = body.position() * Point2::new(local.x, local.y);
        Some(Point::new(world.x, world.y))
    }

    // =========================================================================
    // JOINTS
    // =========================================================================

    /// Create the joint for `connection`. Fails without touching the world if
    /// either endpoint has no body.
    pub fn add_connection(&mut self, connection: &Connection) -> Result<(), SceneError> {
        if connection.body_a == connection.body_b {
            return Err(SceneError::SelfConnection(connection.body_a.clone()));
        }
        let a = self
            .bindings
            .get(&connection.body_a)
            .ok_or_else(|| SceneError::BodyNotFound(connection.body_a.clone()))?
            .body;
        let b = self
            .bindings
            .get(&connection.body_b)
            .ok_or_else(|| SceneError::BodyNotFound(connection.body_b.clone()))?
            .body;
        let (Some(body_a), Some(body_b)) = (self.bodies.get(a), self.bodies.get(b)) else {
            return Err(SceneError::BodyNotFound(connection.body_a.clone()));
        };

        let joint = build_joint(connection, body_a.position(), body_b.position());
        if let Some(previous) = self.joints.remove(&connection.id) {
            self.impulse_joints.remove(previous, true);
        }
        let handle = self.impulse_joints.insert(a, b, joint, true);
        self.joints.insert(connection.id.clone(), handle);
        debug!(id = %connection.id, kind = ?connection.kind(), "joint created");
        Ok(())
    }

    /// Destroy the joint for `id`, if it is still live.
    pub fn remove_connection(&mut self, id: &EntityId) {
        if let Some(handle) = self.joints.remove(id) {
            self.impulse_joints.remove(handle, true);
            debug!(%id, "joint removed");
        }
    }

    // =========================================================================
    // STEPPING & SETTINGS
    // =========================================================================

    /// Advance the world by exactly one fixed timestep.
    pub fn step(&mut self) {
        self.pipeline.step(
            &self.gravity,
            &self.params,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd,
            None,
            &(),
            &(),
        );
    }

    /// Drop every joint, then every body, and start over with an empty world.
    /// Gravity and timestep settings survive.
    pub fn reset(&mut self) {
        let joint_count = self.joints.len();
        let body_count = self.bindings.len();
        for (_, handle) in self.joints.drain() {
            self.impulse_joints.remove(handle, false);
        }
        for (_, binding) in self.bindings.drain() {
            self.bodies.remove(
                binding.body,
                &mut self.islands,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                false,
            );
        }

        self.pipeline = PhysicsPipeline::new();
        self.islands = IslandManager::new();
        self.broad_phase = DefaultBroadPhase::new();
        self.narrow_phase = NarrowPhase::new();
        self.bodies = RigidBodySet::new();
        self.colliders = ColliderSet::new();
        self.impulse_joints = ImpulseJointSet::new();
        self.multibody_joints = MultibodyJointSet::new();
        self.ccd = CCDSolver::new();
        debug!(joint_count, body_count, "physics world reset");
    }

    #[must_use]
    pub fn gravity(&self) -> Point {
        Point::new(self.gravity.x, self.gravity.y)
    }

    pub fn set_gravity(&mut self, gravity: Point) {
        self.gravity = Vector2::new(gravity.x, gravity.y);
        for (_, body) in self.bodies.iter_mut() {
            body.wake_up(true);
        }
    }

    #[must_use]
    pub fn fixed_timestep(&self) -> f64 {
        self.params.dt
    }

    /// Set the fixed step, clamped to the configured range. Returns the value
    /// actually applied.
    pub fn set_fixed_timestep(&mut self, dt: f64) -> f64 {
        let clamped = self.config.clamp_timestep(dt);
        if (clamped - dt).abs() > f64::EPSILON {
            warn!(requested = dt, applied = clamped, "timestep clamped");
        }
        self.params.dt = clamped;
        clamped
    }

    #[must_use]
    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    /// Ids of every body whose collider bounding box overlaps `[min, max]`.
    #[must_use]
    pub fn query_aabb(&self, min: Point, max: Point) -> Vec<EntityId> {
        let query = Aabb::new(Point2::new(min.x, min.y), Point2::new(max.x, max.y));
        self.bindings
            .iter()
            .filter(|(_, binding)| self.collider_aabb(binding).is_some_and(|aabb| aabb.intersects(&query)))
            .map(|(id, _)| id.clone())
            .collect()
    }

    /// Whether the collider of body `id` contains `world`.
    #[must_use]
    pub fn contains_point(&self, id: &EntityId, world: Point) -> bool {
        let Some(binding) = self.bindings.get(id) else {
            return false;
        };
        let (Some(body), Some(collider)) = (self.bodies.get(binding.body), self.colliders.get(binding.collider)) else {
            return false;
        };
        collider.shape().contains_point(body.position(), &Point2::new(world.x, world.y))
    }

    #[must_use]
    pub fn has_body(&self, id: &EntityId) -> bool {
        self.bindings.contains_key(id)
    }

    #[must_use]
    pub fn has_joint(&self, id: &EntityId) -> bool {
        self.joints.contains_key(id)
    }

    /// Number of live backend bodies.
    #[must_use]
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Number of live backend joints.
    #[must_use]
    pub fn joint_count(&self) -> usize {
        self.impulse_joints.len()
    }

    /// Ids that currently own a body.
    pub fn body_ids(&self) -> impl Iterator<Item = &EntityId> {
        self.bindings.keys()
    }

    /// Ids that currently own a joint.
    pub fn joint_ids(&self) -> impl Iterator<Item = &EntityId> {
        self.joints.keys()
    }

    // --- internals ---

    fn body(&self, id: &EntityId) -> Option<&RigidBody> {
        self.bodies.get(self.bindings.get(id)?.body)
    }

    fn body_mut(&mut self, id: &EntityId) -> Option<&mut RigidBody> {
        self.bodies.get_mut(self.bindings.get(id)?.body)
    }

    fn collider_aabb(&self, binding: &BodyBinding) -> Option<Aabb> {
        let body = self.bodies.get(binding.body)?;
        let collider = self.colliders.get(binding.collider)?;
        Some(collider.shape().compute_aabb(body.position()))
    }
}

// =============================================================================
// BUILDERS
// =============================================================================

fn rigid_body_type(body_type: BodyType) -> RigidBodyType {
    match body_type {
        BodyType::Dynamic => RigidBodyType::Dynamic,
        BodyType::Static => RigidBodyType::Fixed,
        BodyType::Kinematic => RigidBodyType::KinematicVelocityBased,
    }
}

fn locked_axes(fixed_rotation: bool) -> LockedAxes {
    if fixed_rotation { LockedAxes::ROTATION_LOCKED } else { LockedAxes::empty() }
}

fn build_collider(primitive: &Primitive) -> Collider {
    let builder = match primitive.shape {
        Shape::Rectangle { width, height } => ColliderBuilder::cuboid(width / 2.0, height / 2.0),
        Shape::Circle { radius } => ColliderBuilder::ball(radius),
        Shape::Ground { width } => {
            ColliderBuilder::segment(Point2::new(-width / 2.0, 0.0), Point2::new(width / 2.0, 0.0))
        }
    };
    builder
        .density(primitive.material.density)
        .friction(primitive.material.friction)
        .restitution(primitive.material.restitution)
        .build()
}

/// Convert a natural frequency and damping ratio into acceleration-based
/// spring coefficients `(ω², 2ζω)`.
pub(crate) fn spring_coefficients(frequency_hz: f64, damping_ratio: f64) -> (f64, f64) {
    let omega = TAU * frequency_hz;
    (omega * omega, 2.0 * damping_ratio * omega)
}

/// Build the rapier joint for `connection` given the current endpoint poses.
///
/// Pin-style joints (revolute and weld) pivot at anchor A's world position;
/// anchor B is re-expressed in B's frame at that point so the constraint starts
/// satisfied. Distance joints keep both anchors as given.
fn build_joint(connection: &Connection, pose_a: &Isometry2<f64>, pose_b: &Isometry2<f64>) -> GenericJoint {
    let anchor_a = Point2::new(connection.local_anchor_a.x, connection.local_anchor_a.y);
    let anchor_b = Point2::new(connection.local_anchor_b.x, connection.local_anchor_b.y);
    let pivot_b = pose_b.inverse_transform_point(&(pose_a * anchor_a));

    match connection.joint {
        JointParams::Revolute { enable_limit, lower_angle, upper_angle, enable_motor, motor_speed, max_motor_torque } => {
            let mut builder = RevoluteJointBuilder::new()
                .local_anchor1(anchor_a)
                .local_anchor2(pivot_b)
                .contacts_enabled(false);
            if enable_limit {
                builder = builder.limits([lower_angle, upper_angle]);
            }
            if enable_motor {
                builder = builder.motor_velocity(motor_speed, MOTOR_DAMPING).motor_max_force(max_motor_torque);
            }
            builder.build().into()
        }
        JointParams::Weld { frequency_hz, damping_ratio } => {
            let reference = relative_angle(pose_a.rotation, pose_b.rotation);
            let frame_a = Isometry2::new(anchor_a.coords, 0.0);
            let frame_b = Isometry2::new(pivot_b.coords, reference);
            if frequency_hz > 0.0 {
                let (stiffness, damping) = spring_coefficients(frequency_hz, damping_ratio);
                GenericJointBuilder::new(JointAxesMask::LIN_X | JointAxesMask::LIN_Y)
                    .local_frame1(frame_a)
                    .local_frame2(frame_b)
                    .motor_model(JointAxis::AngX, MotorModel::AccelerationBased)
                    .motor_position(JointAxis::AngX, 0.0, stiffness, damping)
                    .contacts_enabled(false)
                    .build()
            } else {
                FixedJointBuilder::new()
                    .local_frame1(frame_a)
                    .local_frame2(frame_b)
                    .contacts_enabled(false)
                    .build()
                    .into()
            }
        }
        JointParams::Spring { rest_length, frequency_hz, damping_ratio }
        | JointParams::Damper { rest_length, frequency_hz, damping_ratio } => {
            let (stiffness, damping) = spring_coefficients(frequency_hz, damping_ratio);
            SpringJointBuilder::new(rest_length, stiffness, damping)
                .local_anchor1(anchor_a)
                .local_anchor2(anchor_b)
                .spring_model(MotorModel::AccelerationBased)
                .contacts_enabled(false)
                .build()
                .into()
        }
    }
}

/// Angle of A relative to B, so that `A = B * frame_b.rotation` holds at creation.
fn relative_angle(rot_a: UnitComplex<f64>, rot_b: UnitComplex<f64>) -> f64 {
    rot_a.angle() - rot_b.angle()
}
