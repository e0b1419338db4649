//! Headless run: build or load a scene, play it, report final body states.
//!
//! DESIGN
//! ======
//! The harness stands in for a browser host. It drives `EngineCore::frame`
//! with a synthetic frame clock at the configured rate, so a run is fully
//! deterministic for a given scene and configuration.

use std::fs;

use editor::camera::Point;
use editor::doc::{ConnectionKind, PrimitiveKind};
use editor::error::PropertyError;
use editor::ids::EntityId;
use editor::physics::BodyState;
use editor::props::{ConnectionField, PrimitiveField};
use editor::{EngineCore, SceneSnapshot};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::HarnessConfig;

#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    #[error("failed to read scene: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid scene json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("scene setup rejected: {0}")]
    Setup(#[from] PropertyError),
}

/// Final state of one body.
#[derive(Debug, Serialize)]
pub struct BodyReport {
    pub id: EntityId,
    pub label: String,
    #[serde(flatten)]
    pub state: BodyState,
}

#[derive(Debug, Serialize)]
pub struct RunReport {
    pub frames: u32,
    pub steps: u64,
    pub simulation_time: f64,
    pub bodies: Vec<BodyReport>,
}

/// Load the configured snapshot, or build the demo scene when none is set.
///
/// # Errors
///
/// Returns an error if the snapshot cannot be read or parsed.
pub fn load_scene(engine: &mut EngineCore, config: &HarnessConfig) -> Result<(), HarnessError> {
    let Some(path) = &config.scene else {
        return build_demo(engine);
    };
    let json = fs::read_to_string(path)?;
    let snapshot: SceneSnapshot = serde_json::from_str(&json)?;
    engine.load_snapshot(&snapshot);
    info!(path = %path.display(), primitives = snapshot.primitives.len(), "snapshot loaded");
    Ok(())
}

/// Ground, a motor-driven crank on a static pivot with a sprung bob hanging
/// off its tip, and a loose box dropping onto the ground.
///
/// # Errors
///
/// Returns an error if the engine rejects any step of the setup.
pub fn build_demo(engine: &mut EngineCore) -> Result<(), HarnessError> {
    engine.add_primitive(PrimitiveKind::Ground, Point::new(0.0, -3.0))?;

    let (pivot, _) = engine.add_primitive(PrimitiveKind::Circle, Point::new(0.0, 2.0))?;
    engine.set_primitive_property(&pivot, PrimitiveField::Label, "Pivot")?;
    engine.set_primitive_property(&pivot, PrimitiveField::BodyType, "static")?;

    let (arm, _) = engine.add_primitive(PrimitiveKind::Rectangle, Point::new(0.5, 2.0))?;
    engine.set_primitive_property(&arm, PrimitiveField::Label, "Crank")?;
    let pin = Point::new(0.0, 2.0);
    let (crank, _) = engine.add_connection(ConnectionKind::Revolute, &pivot, &arm, pin, pin)?;
    engine.set_connection_property(&crank, ConnectionField::EnableMotor, "true")?;
    engine.set_connection_property(&crank, ConnectionField::MotorSpeed, "90")?;
    engine.set_connection_property(&crank, ConnectionField::MaxMotorTorque, "200")?;

    let (bob, _) = engine.add_primitive(PrimitiveKind::Circle, Point::new(1.0, 0.0))?;
    engine.set_primitive_property(&bob, PrimitiveField::Label, "Bob")?;
    engine.add_connection(ConnectionKind::Spring, &arm, &bob, Point::new(1.0, 2.0), Point::new(1.0, 0.0))?;

    engine.add_primitive(PrimitiveKind::Rectangle, Point::new(-3.0, 1.0))?;
    info!("demo scene built");
    Ok(())
}

/// Play the loaded scene for the configured duration.
///
/// # Errors
///
/// Returns an error if the configured speed is rejected.
pub fn run(engine: &mut EngineCore, config: &HarnessConfig) -> Result<RunReport, HarnessError> {
    engine.set_speed(config.speed)?;
    engine.play();

    let frame_ms = 1000.0 / f64::from(config.fps);
    let frames = config.frame_count();
    let mut steps = 0_u64;
    for frame in 0..frames {
        steps += u64::from(engine.frame(f64::from(frame) * frame_ms).steps);
        if frame > 0 && frame % config.fps == 0 {
            debug!(frame, steps, t = engine.simulation_time(), "progress");
        }
    }
    info!(frames, steps, t = engine.simulation_time(), "run finished");
    Ok(report(engine, frames, steps))
}

fn report(engine: &EngineCore, frames: u32, steps: u64) -> RunReport {
    let mut bodies: Vec<BodyReport> = engine
        .scene()
        .doc()
        .primitives()
        .filter_map(|p| {
            let state = engine.body_state(&p.id)?;
            Some(BodyReport { id: p.id.clone(), label: p.label.clone(), state })
        })
        .collect();
    bodies.sort_by(|a, b| a.id.cmp(&b.id));
    RunReport { frames, steps, simulation_time: engine.simulation_time(), bodies }
}

#[cfg(test)]
#[path = "harness_test.rs"]
mod tests;
