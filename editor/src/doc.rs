//! Entity model: primitives, connections, and the in-memory scene document.
//!
//! This module defines the editable scene graph independently of the physics
//! backend. Kind-specific data lives in tagged unions (`Shape`, `JointParams`)
//! so every consumer dispatches with an exhaustive `match`. The `SceneDoc`
//! store owns every entity plus the id generator and color palette cursor used
//! by the factories.
//!
//! Every type here serializes to a complete, order-independent property set
//! that is sufficient to rebuild the entity exactly.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::camera::Point;
use crate::consts::{GROUND_COLOR, PALETTE};
use crate::ids::{EntityId, IdGenerator};

// =============================================================================
// PRIMITIVES
// =============================================================================

/// The kind of a placeable body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveKind {
    Rectangle,
    Circle,
    /// Zero-thickness horizontal span, always static.
    Ground,
}

impl PrimitiveKind {
    /// Prefix used when minting ids for this kind.
    #[must_use]
    pub fn id_prefix(self) -> &'static str {
        match self {
            Self::Rectangle => "rect",
            Self::Circle => "circle",
            Self::Ground => "ground",
        }
    }

    /// Default display label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Rectangle => "Rectangle",
            Self::Circle => "Circle",
            Self::Ground => "Ground",
        }
    }
}

/// Shape-specific extents, in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Shape {
    Rectangle { width: f64, height: f64 },
    Circle { radius: f64 },
    Ground { width: f64 },
}

impl Shape {
    #[must_use]
    pub fn kind(&self) -> PrimitiveKind {
        match self {
            Self::Rectangle { .. } => PrimitiveKind::Rectangle,
            Self::Circle { .. } => PrimitiveKind::Circle,
            Self::Ground { .. } => PrimitiveKind::Ground,
        }
    }
}

/// How the backend moves a body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyType {
    Dynamic,
    Static,
    Kinematic,
}

/// Surface and mass parameters applied to a body's collider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub density: f64,
    pub friction: f64,
    pub restitution: f64,
}

/// Position and rotation of a body in world space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose {
    pub position: Point,
    /// Counter-clockwise rotation in radians.
    pub angle: f64,
}

/// A placeable rigid body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Primitive {
    pub id: EntityId,
    pub label: String,
    #[serde(flatten)]
    pub shape: Shape,
    pub position: Point,
    pub angle: f64,
    pub body_type: BodyType,
    #[serde(flatten)]
    pub material: Material,
    pub linear_damping: f64,
    pub angular_damping: f64,
    pub fixed_rotation: bool,
    pub color: String,
}

impl Primitive {
    /// Build a primitive of `kind` at `position` with the factory defaults.
    #[must_use]
    pub fn new(kind: PrimitiveKind, id: EntityId, position: Point, color: String) -> Self {
        let (shape, material, body_type, fixed_rotation) = match kind {
            PrimitiveKind::Rectangle => (
                Shape::Rectangle { width: 1.0, height: 0.6 },
                Material { density: 1.0, friction: 0.3, restitution: 0.2 },
                BodyType::Dynamic,
                false,
            ),
            PrimitiveKind::Circle => (
                Shape::Circle { radius: 0.4 },
                Material { density: 1.0, friction: 0.3, restitution: 0.5 },
                BodyType::Dynamic,
                false,
            ),
            PrimitiveKind::Ground => (
                Shape::Ground { width: 20.0 },
                Material { density: 0.0, friction: 0.5, restitution: 0.1 },
                BodyType::Static,
                true,
            ),
        };
        Self {
            id,
            label: kind.label().to_string(),
            shape,
            position,
            angle: 0.0,
            body_type,
            material,
            linear_damping: 0.0,
            angular_damping: 0.0,
            fixed_rotation,
            color,
        }
    }

    #[must_use]
    pub fn kind(&self) -> PrimitiveKind {
        self.shape.kind()
    }

    #[must_use]
    pub fn pose(&self) -> Pose {
        Pose { position: self.position, angle: self.angle }
    }

    pub fn set_pose(&mut self, pose: Pose) {
        self.position = pose.position;
        self.angle = pose.angle;
    }

    /// Whether the shape has zero thickness and needs proximity hit-testing.
    #[must_use]
    pub fn is_edge(&self) -> bool {
        matches!(self.shape, Shape::Ground { .. })
    }
}

// =============================================================================
// CONNECTIONS
// =============================================================================

/// The kind of a constraint between two primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionKind {
    Revolute,
    Weld,
    Spring,
    Damper,
}

impl ConnectionKind {
    #[must_use]
    pub fn id_prefix(self) -> &'static str {
        match self {
            Self::Revolute => "revolute",
            Self::Weld => "weld",
            Self::Spring => "spring",
            Self::Damper => "damper",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Revolute => "Revolute",
            Self::Weld => "Weld",
            Self::Spring => "Spring",
            Self::Damper => "Damper",
        }
    }

    #[must_use]
    pub fn color(self) -> &'static str {
        match self {
            Self::Revolute => "#f59e0b",
            Self::Weld => "#6b7280",
            Self::Spring => "#22c55e",
            Self::Damper => "#ef4444",
        }
    }
}

/// Kind-specific joint parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum JointParams {
    /// Pin joint. Angles in radians, speed in rad/s.
    Revolute {
        enable_limit: bool,
        lower_angle: f64,
        upper_angle: f64,
        enable_motor: bool,
        motor_speed: f64,
        max_motor_torque: f64,
    },
    /// Rigid coupling; `frequency_hz == 0` means perfectly rigid.
    Weld { frequency_hz: f64, damping_ratio: f64 },
    /// Oscillating distance constraint.
    Spring { rest_length: f64, frequency_hz: f64, damping_ratio: f64 },
    /// Near-critically damped distance constraint.
    Damper { rest_length: f64, frequency_hz: f64, damping_ratio: f64 },
}

impl JointParams {
    /// Factory defaults for `kind`. `distance` seeds the rest length of
    /// distance-based joints.
    #[must_use]
    pub fn defaults(kind: ConnectionKind, distance: f64) -> Self {
        match kind {
            ConnectionKind::Revolute => Self::Revolute {
                enable_limit: false,
                lower_angle: 0.0,
                upper_angle: 0.0,
                enable_motor: false,
                motor_speed: 0.0,
                max_motor_torque: 0.0,
            },
            ConnectionKind::Weld => Self::Weld { frequency_hz: 0.0, damping_ratio: 0.0 },
            ConnectionKind::Spring => Self::Spring { rest_length: distance, frequency_hz: 4.0, damping_ratio: 0.5 },
            ConnectionKind::Damper => Self::Damper { rest_length: distance, frequency_hz: 2.0, damping_ratio: 1.0 },
        }
    }

    #[must_use]
    pub fn kind(&self) -> ConnectionKind {
        match self {
            Self::Revolute { .. } => ConnectionKind::Revolute,
            Self::Weld { .. } => ConnectionKind::Weld,
            Self::Spring { .. } => ConnectionKind::Spring,
            Self::Damper { .. } => ConnectionKind::Damper,
        }
    }
}

/// A constraint linking two primitives at body-local anchor points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub id: EntityId,
    pub label: String,
    pub body_a: EntityId,
    pub body_b: EntityId,
    /// Anchor in body A's local frame.
    pub local_anchor_a: Point,
    /// Anchor in body B's local frame.
    pub local_anchor_b: Point,
    #[serde(flatten)]
    pub joint: JointParams,
    pub color: String,
}

impl Connection {
    /// Build a connection of `kind` with the factory defaults.
    #[must_use]
    pub fn new(
        kind: ConnectionKind,
        id: EntityId,
        body_a: EntityId,
        body_b: EntityId,
        local_anchor_a: Point,
        local_anchor_b: Point,
        distance: f64,
    ) -> Self {
        Self {
            id,
            label: kind.label().to_string(),
            body_a,
            body_b,
            local_anchor_a,
            local_anchor_b,
            joint: JointParams::defaults(kind, distance),
            color: kind.color().to_string(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> ConnectionKind {
        self.joint.kind()
    }

    /// Whether either endpoint is `id`.
    #[must_use]
    pub fn involves(&self, id: &EntityId) -> bool {
        &self.body_a == id || &self.body_b == id
    }
}

// =============================================================================
// STORE
// =============================================================================

/// In-memory store of every primitive and connection in the scene.
#[derive(Debug, Default)]
pub struct SceneDoc {
    primitives: HashMap<EntityId, Primitive>,
    connections: HashMap<EntityId, Connection>,
    ids: IdGenerator,
    palette_cursor: usize,
}

impl SceneDoc {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Factories ---

    /// Mint a new primitive of `kind` at `position`. It is not inserted.
    pub fn create_primitive(&mut self, kind: PrimitiveKind, position: Point) -> Primitive {
        let id = self.ids.next(kind.id_prefix());
        let color = match kind {
            PrimitiveKind::Ground => GROUND_COLOR.to_string(),
            PrimitiveKind::Rectangle | PrimitiveKind::Circle => self.next_color(),
        };
        Primitive::new(kind, id, position, color)
    }

    /// Mint a new connection. It is not inserted.
    pub fn create_connection(
        &mut self,
        kind: ConnectionKind,
        body_a: EntityId,
        body_b: EntityId,
        local_anchor_a: Point,
        local_anchor_b: Point,
        distance: f64,
    ) -> Connection {
        let id = self.ids.next(kind.id_prefix());
        Connection::new(kind, id, body_a, body_b, local_anchor_a, local_anchor_b, distance)
    }

    fn next_color(&mut self) -> String {
        let color = PALETTE[self.palette_cursor % PALETTE.len()];
        self.palette_cursor += 1;
        color.to_string()
    }

    // --- Primitives ---

    /// Insert or replace a primitive.
    pub fn insert_primitive(&mut self, primitive: Primitive) {
        self.ids.observe(&primitive.id);
        self.primitives.insert(primitive.id.clone(), primitive);
    }

    /// Remove a primitive by id, returning it if it was present.
    pub fn remove_primitive(&mut self, id: &EntityId) -> Option<Primitive> {
        self.primitives.remove(id)
    }

    #[must_use]
    pub fn primitive(&self, id: &EntityId) -> Option<&Primitive> {
        self.primitives.get(id)
    }

    pub fn primitive_mut(&mut self, id: &EntityId) -> Option<&mut Primitive> {
        self.primitives.get_mut(id)
    }

    pub fn primitives(&self) -> impl Iterator<Item = &Primitive> {
        self.primitives.values()
    }

    pub fn primitives_mut(&mut self) -> impl Iterator<Item = &mut Primitive> {
        self.primitives.values_mut()
    }

    #[must_use]
    pub fn primitive_count(&self) -> usize {
        self.primitives.len()
    }

    // --- Connections ---

    /// Insert or replace a connection.
    pub fn insert_connection(&mut self, connection: Connection) {
        self.ids.observe(&connection.id);
        self.connections.insert(connection.id.clone(), connection);
    }

    /// Remove a connection by id, returning it if it was present.
    pub fn remove_connection(&mut self, id: &EntityId) -> Option<Connection> {
        self.connections.remove(id)
    }

    #[must_use]
    pub fn connection(&self, id: &EntityId) -> Option<&Connection> {
        self.connections.get(id)
    }

    pub fn connection_mut(&mut self, id: &EntityId) -> Option<&mut Connection> {
        self.connections.get_mut(id)
    }

    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.connections.values()
    }

    #[must_use]
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Ids of every connection with `body_id` as an endpoint.
    #[must_use]
    pub fn connections_for_body(&self, body_id: &EntityId) -> Vec<EntityId> {
        self.connections
            .values()
            .filter(|c| c.involves(body_id))
            .map(|c| c.id.clone())
            .collect()
    }

    // --- Whole document ---

    /// Whether `id` names a primitive or a connection.
    #[must_use]
    pub fn contains(&self, id: &EntityId) -> bool {
        self.primitives.contains_key(id) || self.connections.contains_key(id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty() && self.connections.is_empty()
    }

    /// Drop every entity and restart id and color sequences.
    pub fn clear(&mut self) {
        self.primitives.clear();
        self.connections.clear();
        self.ids.reset();
        self.palette_cursor = 0;
    }
}
