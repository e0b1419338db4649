//! Validated single-property writes for primitives and connections.
//!
//! DESIGN
//! ======
//! Values arrive as the raw strings a property panel produces. Each write is
//! applied to a clone of the entity first; only when parsing and every domain
//! check pass is the clone committed to the document and routed to the
//! backend. A rejected write therefore leaves the model, the bodies and the
//! joints exactly as they were.
//!
//! Routing follows what the backend can change in place. Shape and material
//! edits rebuild the collider, damping, rotation lock and body type are direct
//! body edits, pose fields teleport the body, and every joint parameter
//! rebuilds the joint. Labels and colors never reach the backend.
//!
//! Angles are entered in degrees and stored in radians.

#[cfg(test)]
#[path = "props_test.rs"]
mod props_test;

use std::str::FromStr;

use tracing::debug;

use crate::doc::{BodyType, JointParams, Primitive, PrimitiveKind, Shape};
use crate::error::PropertyError;
use crate::events::Action;
use crate::ids::EntityId;
use crate::scene::Scene;

// =============================================================================
// FIELDS
// =============================================================================

/// Editable property of a primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveField {
    Label,
    Color,
    PositionX,
    PositionY,
    /// Rotation in degrees.
    AngleDeg,
    Width,
    Height,
    Radius,
    Density,
    Friction,
    Restitution,
    LinearDamping,
    AngularDamping,
    FixedRotation,
    BodyType,
}

impl PrimitiveField {
    pub const ALL: [Self; 15] = [
        Self::Label,
        Self::Color,
        Self::PositionX,
        Self::PositionY,
        Self::AngleDeg,
        Self::Width,
        Self::Height,
        Self::Radius,
        Self::Density,
        Self::Friction,
        Self::Restitution,
        Self::LinearDamping,
        Self::AngularDamping,
        Self::FixedRotation,
        Self::BodyType,
    ];

    /// Wire name used by property panels and in notifications.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Label => "label",
            Self::Color => "color",
            Self::PositionX => "positionX",
            Self::PositionY => "positionY",
            Self::AngleDeg => "angle",
            Self::Width => "width",
            Self::Height => "height",
            Self::Radius => "radius",
            Self::Density => "density",
            Self::Friction => "friction",
            Self::Restitution => "restitution",
            Self::LinearDamping => "linearDamping",
            Self::AngularDamping => "angularDamping",
            Self::FixedRotation => "fixedRotation",
            Self::BodyType => "bodyType",
        }
    }
}

impl FromStr for PrimitiveField {
    type Err = PropertyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.name() == s)
            .ok_or_else(|| PropertyError::UnknownField(s.to_string()))
    }
}

/// Editable property of a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionField {
    Label,
    Color,
    RestLength,
    FrequencyHz,
    DampingRatio,
    EnableLimit,
    /// Lower revolute limit in degrees.
    LowerAngleDeg,
    /// Upper revolute limit in degrees.
    UpperAngleDeg,
    EnableMotor,
    /// Motor target speed in degrees per second.
    MotorSpeed,
    MaxMotorTorque,
}

impl ConnectionField {
    pub const ALL: [Self; 11] = [
        Self::Label,
        Self::Color,
        Self::RestLength,
        Self::FrequencyHz,
        Self::DampingRatio,
        Self::EnableLimit,
        Self::LowerAngleDeg,
        Self::UpperAngleDeg,
        Self::EnableMotor,
        Self::MotorSpeed,
        Self::MaxMotorTorque,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Label => "label",
            Self::Color => "color",
            Self::RestLength => "restLength",
            Self::FrequencyHz => "frequencyHz",
            Self::DampingRatio => "dampingRatio",
            Self::EnableLimit => "enableLimit",
            Self::LowerAngleDeg => "lowerAngle",
            Self::UpperAngleDeg => "upperAngle",
            Self::EnableMotor => "enableMotor",
            Self::MotorSpeed => "motorSpeed",
            Self::MaxMotorTorque => "maxMotorTorque",
        }
    }
}

impl FromStr for ConnectionField {
    type Err = PropertyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.name() == s)
            .ok_or_else(|| PropertyError::UnknownField(s.to_string()))
    }
}

// =============================================================================
// WRITES
// =============================================================================

/// Backend change needed after a primitive edit.
enum BodyEdit {
    ModelOnly,
    Pose,
    Collider,
    Damping,
    FixedRotation,
    BodyType,
}

/// Parse, validate and apply one primitive property.
///
/// # Errors
///
/// Returns [`PropertyError`] when `id` is not a primitive, `raw` does not
/// parse, the value is outside the field's domain, or the field does not
/// apply to the primitive's kind. Nothing changes on error.
pub fn set_primitive_property(
    scene: &mut Scene,
    id: &EntityId,
    field: PrimitiveField,
    raw: &str,
) -> Result<(), PropertyError> {
    let mut edited = scene.doc.primitive(id).cloned().ok_or_else(|| PropertyError::NotFound(id.clone()))?;
    let edit = apply_primitive_field(&mut edited, field, raw)?;

    match edit {
        BodyEdit::ModelOnly => {}
        BodyEdit::Pose => {
            scene.physics.set_body_pose(id, edited.pose());
            scene.physics.wake(id);
        }
        BodyEdit::Collider => scene.physics.rebuild_collider(&edited),
        BodyEdit::Damping => scene.physics.set_damping(id, edited.linear_damping, edited.angular_damping),
        BodyEdit::FixedRotation => scene.physics.set_fixed_rotation(id, edited.fixed_rotation),
        BodyEdit::BodyType => scene.physics.set_body_type(id, edited.body_type),
    }
    scene.doc.insert_primitive(edited);

    debug!(%id, property = field.name(), "primitive property changed");
    scene.notifier.push(Action::PropertyChanged { id: id.clone(), property: field.name() });
    Ok(())
}

/// Parse, validate and apply one connection property, rebuilding the joint
/// when a physical parameter changed.
///
/// # Errors
///
/// Returns [`PropertyError`] when `id` is not a connection, `raw` does not
/// parse or is out of range, the field does not apply to the connection's
/// kind, or the joint can no longer be built. Nothing changes on error.
pub fn set_connection_property(
    scene: &mut Scene,
    id: &EntityId,
    field: ConnectionField,
    raw: &str,
) -> Result<(), PropertyError> {
    let mut edited = scene.doc.connection(id).cloned().ok_or_else(|| PropertyError::NotFound(id.clone()))?;
    let rebuild = match field {
        ConnectionField::Label => {
            edited.label = raw.to_string();
            false
        }
        ConnectionField::Color => {
            edited.color = raw.trim().to_string();
            false
        }
        _ => {
            apply_joint_field(&mut edited.joint, field, raw)?;
            true
        }
    };

    if rebuild {
        scene.physics.add_connection(&edited)?;
    }
    scene.doc.insert_connection(edited);

    debug!(%id, property = field.name(), rebuild, "connection property changed");
    scene.notifier.push(Action::PropertyChanged { id: id.clone(), property: field.name() });
    Ok(())
}

fn apply_primitive_field(p: &mut Primitive, field: PrimitiveField, raw: &str) -> Result<BodyEdit, PropertyError> {
    let name = field.name();
    let kind = p.kind();
    let not_applicable = || PropertyError::NotApplicable { field: name, kind: kind.label() };
    let body_only = |edit: BodyEdit| if kind == PrimitiveKind::Ground { Err(not_applicable()) } else { Ok(edit) };

    match field {
        PrimitiveField::Label => {
            p.label = raw.to_string();
            Ok(BodyEdit::ModelOnly)
        }
        PrimitiveField::Color => {
            p.color = raw.trim().to_string();
            Ok(BodyEdit::ModelOnly)
        }
        PrimitiveField::PositionX => {
            p.position.x = parse_number(name, raw)?;
            Ok(BodyEdit::Pose)
        }
        PrimitiveField::PositionY => {
            p.position.y = parse_number(name, raw)?;
            Ok(BodyEdit::Pose)
        }
        PrimitiveField::AngleDeg => {
            p.angle = parse_number(name, raw)?.to_radians();
            Ok(BodyEdit::Pose)
        }
        PrimitiveField::Width => {
            let value = positive(name, parse_number(name, raw)?)?;
            match &mut p.shape {
                Shape::Rectangle { width, .. } | Shape::Ground { width } => *width = value,
                Shape::Circle { .. } => return Err(not_applicable()),
            }
            Ok(BodyEdit::Collider)
        }
        PrimitiveField::Height => {
            let value = positive(name, parse_number(name, raw)?)?;
            let Shape::Rectangle { height, .. } = &mut p.shape else {
                return Err(not_applicable());
            };
            *height = value;
            Ok(BodyEdit::Collider)
        }
        PrimitiveField::Radius => {
            let value = positive(name, parse_number(name, raw)?)?;
            let Shape::Circle { radius } = &mut p.shape else {
                return Err(not_applicable());
            };
            *radius = value;
            Ok(BodyEdit::Collider)
        }
        PrimitiveField::Density => {
            let edit = body_only(BodyEdit::Collider)?;
            p.material.density = non_negative(name, parse_number(name, raw)?)?;
            Ok(edit)
        }
        PrimitiveField::Friction => {
            p.material.friction = non_negative(name, parse_number(name, raw)?)?;
            Ok(BodyEdit::Collider)
        }
        PrimitiveField::Restitution => {
            p.material.restitution = in_range(name, parse_number(name, raw)?, 0.0, 1.0)?;
            Ok(BodyEdit::Collider)
        }
        PrimitiveField::LinearDamping => {
            let edit = body_only(BodyEdit::Damping)?;
            p.linear_damping = non_negative(name, parse_number(name, raw)?)?;
            Ok(edit)
        }
        PrimitiveField::AngularDamping => {
            let edit = body_only(BodyEdit::Damping)?;
            p.angular_damping = non_negative(name, parse_number(name, raw)?)?;
            Ok(edit)
        }
        PrimitiveField::FixedRotation => {
            let edit = body_only(BodyEdit::FixedRotation)?;
            p.fixed_rotation = parse_bool(name, raw)?;
            Ok(edit)
        }
        PrimitiveField::BodyType => {
            let edit = body_only(BodyEdit::BodyType)?;
            p.body_type = parse_body_type(raw)?;
            Ok(edit)
        }
    }
}

fn apply_joint_field(joint: &mut JointParams, field: ConnectionField, raw: &str) -> Result<(), PropertyError> {
    let name = field.name();
    let kind = joint.kind().label();
    let not_applicable = || PropertyError::NotApplicable { field: name, kind };

    match field {
        ConnectionField::RestLength => {
            let value = non_negative(name, parse_number(name, raw)?)?;
            match joint {
                JointParams::Spring { rest_length, .. } | JointParams::Damper { rest_length, .. } => {
                    *rest_length = value;
                }
                JointParams::Revolute { .. } | JointParams::Weld { .. } => return Err(not_applicable()),
            }
        }
        ConnectionField::FrequencyHz => {
            let value = non_negative(name, parse_number(name, raw)?)?;
            match joint {
                JointParams::Weld { frequency_hz, .. }
                | JointParams::Spring { frequency_hz, .. }
                | JointParams::Damper { frequency_hz, .. } => *frequency_hz = value,
                JointParams::Revolute { .. } => return Err(not_applicable()),
            }
        }
        ConnectionField::DampingRatio => {
            let value = in_range(name, parse_number(name, raw)?, 0.0, 1.0)?;
            match joint {
                JointParams::Weld { damping_ratio, .. }
                | JointParams::Spring { damping_ratio, .. }
                | JointParams::Damper { damping_ratio, .. } => *damping_ratio = value,
                JointParams::Revolute { .. } => return Err(not_applicable()),
            }
        }
        ConnectionField::EnableLimit
        | ConnectionField::LowerAngleDeg
        | ConnectionField::UpperAngleDeg
        | ConnectionField::EnableMotor
        | ConnectionField::MotorSpeed
        | ConnectionField::MaxMotorTorque => {
            let JointParams::Revolute {
                enable_limit,
                lower_angle,
                upper_angle,
                enable_motor,
                motor_speed,
                max_motor_torque,
            } = joint
            else {
                return Err(not_applicable());
            };
            match field {
                ConnectionField::EnableLimit => *enable_limit = parse_bool(name, raw)?,
                ConnectionField::LowerAngleDeg => {
                    let degrees = parse_number(name, raw)?;
                    if degrees.to_radians() > *upper_angle {
                        return Err(PropertyError::OutOfRange { field: name, value: degrees });
                    }
                    *lower_angle = degrees.to_radians();
                }
                ConnectionField::UpperAngleDeg => {
                    let degrees = parse_number(name, raw)?;
                    if degrees.to_radians() < *lower_angle {
                        return Err(PropertyError::OutOfRange { field: name, value: degrees });
                    }
                    *upper_angle = degrees.to_radians();
                }
                ConnectionField::EnableMotor => *enable_motor = parse_bool(name, raw)?,
                ConnectionField::MotorSpeed => *motor_speed = parse_number(name, raw)?.to_radians(),
                ConnectionField::MaxMotorTorque => {
                    *max_motor_torque = non_negative(name, parse_number(name, raw)?)?;
                }
                // Covered by the outer match.
                ConnectionField::Label
                | ConnectionField::Color
                | ConnectionField::RestLength
                | ConnectionField::FrequencyHz
                | ConnectionField::DampingRatio => {}
            }
        }
        ConnectionField::Label | ConnectionField::Color => {}
    }
    Ok(())
}

// =============================================================================
// PARSING
// =============================================================================

fn parse_number(field: &'static str, raw: &str) -> Result<f64, PropertyError> {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(PropertyError::NotANumber { field, raw: raw.to_string() }),
    }
}

fn parse_bool(field: &'static str, raw: &str) -> Result<bool, PropertyError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "on" => Ok(true),
        "false" | "0" | "off" => Ok(false),
        _ => Err(PropertyError::NotABool { field, raw: raw.to_string() }),
    }
}

fn parse_body_type(raw: &str) -> Result<BodyType, PropertyError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "dynamic" => Ok(BodyType::Dynamic),
        "static" => Ok(BodyType::Static),
        "kinematic" => Ok(BodyType::Kinematic),
        _ => Err(PropertyError::UnknownBodyType(raw.to_string())),
    }
}

fn in_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<f64, PropertyError> {
    if (min..=max).contains(&value) { Ok(value) } else { Err(PropertyError::OutOfRange { field, value }) }
}

fn non_negative(field: &'static str, value: f64) -> Result<f64, PropertyError> {
    in_range(field, value, 0.0, f64::INFINITY)
}

fn positive(field: &'static str, value: f64) -> Result<f64, PropertyError> {
    if value > 0.0 { Ok(value) } else { Err(PropertyError::OutOfRange { field, value }) }
}
