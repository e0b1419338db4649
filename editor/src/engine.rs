//! Engine facade: the single entry point a host drives.
//!
//! DESIGN
//! ======
//! `EngineCore` owns the camera, the scene, the interaction manager and the
//! playback lifecycle. Every host-facing operation runs to completion and then
//! returns the notifications it produced, oldest first. The host calls
//! [`EngineCore::frame`] once per display frame to advance the simulation and
//! collect what it needs to draw the editing overlay.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use serde::Serialize;
use tracing::info;

use crate::camera::{Camera, Point};
use crate::config::PhysicsConfig;
use crate::doc::{Connection, ConnectionKind, Primitive, PrimitiveKind};
use crate::error::PropertyError;
use crate::events::Action;
use crate::ids::EntityId;
use crate::input::{Button, Cursor, Key, Modifiers, PointerEvent, WheelDelta};
use crate::interaction::InteractionManager;
use crate::lifecycle::{Playback, SimState};
use crate::modes::{ModeContext, ModeName};
use crate::physics::{BodyState, PhysicsWorld};
use crate::props::{self, ConnectionField, PrimitiveField};
use crate::scene::Scene;
use crate::snapshot::SceneSnapshot;

/// Placement preview under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Ghost {
    pub position: Point,
    pub kind: PrimitiveKind,
}

/// Rubber line from the first connect endpoint to the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConnectLine {
    pub from: Point,
    pub to: Point,
    pub color: &'static str,
}

/// Transient editing feedback, all in world space.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Overlay {
    pub ghost: Option<Ghost>,
    pub marquee: Option<(Point, Point)>,
    pub connect_line: Option<ConnectLine>,
    /// Body under the pointer while connecting.
    pub hover: Option<EntityId>,
}

/// Result of one host frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    /// Fixed physics steps taken this frame.
    pub steps: u32,
    pub cursor: Cursor,
    pub overlay: Overlay,
}

/// Core engine state. Independent of any windowing or rendering backend.
#[derive(Default)]
pub struct EngineCore {
    camera: Camera,
    scene: Scene,
    interaction: InteractionManager,
    playback: Playback,
}

impl EngineCore {
    #[must_use]
    pub fn new(config: PhysicsConfig) -> Self {
        Self { scene: Scene::new(PhysicsWorld::new(config)), ..Self::default() }
    }

    // --- Viewport ---

    /// Update viewport dimensions in screen pixels.
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.camera.set_viewport(width, height);
    }

    /// Return to the default pan and zoom.
    pub fn reset_camera(&mut self) -> Vec<Action> {
        self.camera.reset();
        self.scene.notifier.push(Action::CameraChanged);
        self.scene.drain_events()
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, screen: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        let event = PointerEvent::new(screen, button, modifiers);
        let mut ctx = ModeContext { scene: &mut self.scene, sim: self.playback.state() };
        self.interaction.pointer_down(&self.camera, &mut ctx, &event);
        self.scene.drain_events()
    }

    pub fn on_pointer_move(&mut self, screen: Point, modifiers: Modifiers) -> Vec<Action> {
        let event = PointerEvent::new(screen, Button::Primary, modifiers);
        let mut ctx = ModeContext { scene: &mut self.scene, sim: self.playback.state() };
        self.interaction.pointer_move(&mut self.camera, &mut ctx, &event);
        self.scene.drain_events()
    }

    pub fn on_pointer_up(&mut self, screen: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        let event = PointerEvent::new(screen, button, modifiers);
        let mut ctx = ModeContext { scene: &mut self.scene, sim: self.playback.state() };
        self.interaction.pointer_up(&self.camera, &mut ctx, &event);
        self.scene.drain_events()
    }

    /// The pointer left the canvas or capture was lost.
    pub fn on_pointer_leave(&mut self) -> Vec<Action> {
        let mut ctx = ModeContext { scene: &mut self.scene, sim: self.playback.state() };
        self.interaction.pointer_leave(&mut ctx);
        self.scene.drain_events()
    }

    pub fn on_wheel(&mut self, screen: Point, delta: WheelDelta) -> Vec<Action> {
        self.interaction.wheel(&mut self.camera, screen, delta, &mut self.scene.notifier);
        self.scene.drain_events()
    }

    pub fn on_key_down(&mut self, key: &Key) -> Vec<Action> {
        let mut ctx = ModeContext { scene: &mut self.scene, sim: self.playback.state() };
        self.interaction.key_down(&mut ctx, key);
        self.scene.drain_events()
    }

    pub fn on_key_up(&mut self, key: &Key) -> Vec<Action> {
        let mut ctx = ModeContext { scene: &mut self.scene, sim: self.playback.state() };
        self.interaction.key_up(&mut ctx, key);
        self.scene.drain_events()
    }

    // --- Modes ---

    pub fn set_mode(&mut self, mode: ModeName) -> Vec<Action> {
        self.interaction.set_mode(mode, &mut self.scene.notifier);
        self.scene.drain_events()
    }

    /// Arm place mode with the primitive kind the next click creates.
    pub fn begin_place(&mut self, kind: PrimitiveKind) -> Vec<Action> {
        self.interaction.place_mode_mut().set_kind(kind);
        self.set_mode(ModeName::Place)
    }

    /// Arm connect mode with the connection kind the gesture creates.
    pub fn begin_connect(&mut self, kind: ConnectionKind) -> Vec<Action> {
        self.interaction.connect_mode_mut().set_kind(kind);
        self.set_mode(ModeName::Connect)
    }

    // --- Lifecycle ---

    pub fn play(&mut self) -> Vec<Action> {
        self.playback.play(&mut self.scene);
        self.scene.drain_events()
    }

    pub fn pause(&mut self) -> Vec<Action> {
        self.playback.pause(&mut self.scene);
        self.scene.drain_events()
    }

    pub fn reset(&mut self) -> Vec<Action> {
        self.playback.reset(&mut self.scene);
        self.scene.drain_events()
    }

    /// Advance the simulation for a host frame at `now_ms` and report what
    /// to draw on top of the scene.
    pub fn frame(&mut self, now_ms: f64) -> Frame {
        let steps = self.playback.tick(now_ms, &mut self.scene);
        Frame { steps, cursor: self.interaction.cursor(), overlay: self.overlay() }
    }

    // --- Edits ---

    /// Create a primitive directly, bypassing place mode. Used by scripted
    /// hosts that build scenes without pointer input.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError::NotEditing`] while a simulation is running.
    pub fn add_primitive(
        &mut self,
        kind: PrimitiveKind,
        position: Point,
    ) -> Result<(EntityId, Vec<Action>), PropertyError> {
        self.require_editing()?;
        let id = self.scene.add_primitive(kind, position);
        Ok((id, self.scene.drain_events()))
    }

    /// Connect two primitives at world-space anchors, bypassing connect mode.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError::NotEditing`] while a simulation is running and
    /// [`PropertyError::Joint`] when either endpoint is missing or both are
    /// the same body.
    pub fn add_connection(
        &mut self,
        kind: ConnectionKind,
        a: &EntityId,
        b: &EntityId,
        anchor_a: Point,
        anchor_b: Point,
    ) -> Result<(EntityId, Vec<Action>), PropertyError> {
        self.require_editing()?;
        let id = self.scene.connect(kind, a, b, anchor_a, anchor_b)?;
        Ok((id, self.scene.drain_events()))
    }

    /// Delete every selected primitive and connection.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError::NotEditing`] while a simulation is running.
    pub fn delete_selected(&mut self) -> Result<Vec<Action>, PropertyError> {
        self.require_editing()?;
        self.scene.delete_selected();
        Ok(self.scene.drain_events())
    }

    /// Write one primitive property from its panel string.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError`] when not editing or the write is rejected.
    pub fn set_primitive_property(
        &mut self,
        id: &EntityId,
        field: PrimitiveField,
        raw: &str,
    ) -> Result<Vec<Action>, PropertyError> {
        self.require_editing()?;
        props::set_primitive_property(&mut self.scene, id, field, raw)?;
        Ok(self.scene.drain_events())
    }

    /// Write one connection property from its panel string.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError`] when not editing or the write is rejected.
    pub fn set_connection_property(
        &mut self,
        id: &EntityId,
        field: ConnectionField,
        raw: &str,
    ) -> Result<Vec<Action>, PropertyError> {
        self.require_editing()?;
        props::set_connection_property(&mut self.scene, id, field, raw)?;
        Ok(self.scene.drain_events())
    }

    // --- Settings ---

    /// # Errors
    ///
    /// Returns [`PropertyError`] when not editing or a component is not finite.
    pub fn set_gravity(&mut self, gravity: Point) -> Result<Vec<Action>, PropertyError> {
        self.require_editing()?;
        for value in [gravity.x, gravity.y] {
            if !value.is_finite() {
                return Err(PropertyError::OutOfRange { field: "gravity", value });
            }
        }
        self.scene.physics.set_gravity(gravity);
        self.scene.notifier.push(Action::SettingsChanged);
        Ok(self.scene.drain_events())
    }

    /// Set the fixed timestep in seconds. Values outside the configured
    /// bounds are clamped.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError`] when not editing or `dt` is not a positive
    /// finite number.
    pub fn set_fixed_timestep(&mut self, dt: f64) -> Result<Vec<Action>, PropertyError> {
        self.require_editing()?;
        if !dt.is_finite() || dt <= 0.0 {
            return Err(PropertyError::OutOfRange { field: "timestep", value: dt });
        }
        self.scene.physics.set_fixed_timestep(dt);
        self.scene.notifier.push(Action::SettingsChanged);
        Ok(self.scene.drain_events())
    }

    /// Set the playback speed multiplier. Allowed in any state.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError::OutOfRange`] unless `multiplier` is positive
    /// and finite.
    pub fn set_speed(&mut self, multiplier: f64) -> Result<Vec<Action>, PropertyError> {
        if !multiplier.is_finite() || multiplier <= 0.0 {
            return Err(PropertyError::OutOfRange { field: "speed", value: multiplier });
        }
        self.playback.set_speed(multiplier);
        self.scene.notifier.push(Action::SettingsChanged);
        Ok(self.scene.drain_events())
    }

    // --- Whole scene ---

    /// Drop every entity and return to editing.
    pub fn clear_scene(&mut self) -> Vec<Action> {
        self.playback.force_editing(&mut self.scene);
        self.interaction.cancel();
        self.scene.clear();
        info!("scene cleared");
        self.scene.drain_events()
    }

    #[must_use]
    pub fn snapshot(&self) -> SceneSnapshot {
        SceneSnapshot::capture(&self.scene)
    }

    /// Replace the scene with `snapshot`. Always lands in editing state.
    pub fn load_snapshot(&mut self, snapshot: &SceneSnapshot) -> Vec<Action> {
        self.playback.force_editing(&mut self.scene);
        self.interaction.cancel();
        snapshot.restore(&mut self.scene);
        self.scene.drain_events()
    }

    // --- Queries ---

    #[must_use]
    pub fn primitive(&self, id: &EntityId) -> Option<&Primitive> {
        self.scene.doc.primitive(id)
    }

    #[must_use]
    pub fn connection(&self, id: &EntityId) -> Option<&Connection> {
        self.scene.doc.connection(id)
    }

    /// Selected ids, sorted.
    #[must_use]
    pub fn selection(&self) -> Vec<EntityId> {
        let mut ids = self.scene.selection.selected_ids();
        ids.sort();
        ids
    }

    #[must_use]
    pub fn camera(&self) -> Camera {
        self.camera
    }

    #[must_use]
    pub fn sim_state(&self) -> SimState {
        self.playback.state()
    }

    #[must_use]
    pub fn simulation_time(&self) -> f64 {
        self.playback.simulation_time()
    }

    #[must_use]
    pub fn body_state(&self, id: &EntityId) -> Option<BodyState> {
        self.scene.physics.body_state(id)
    }

    #[must_use]
    pub fn mode(&self) -> ModeName {
        self.interaction.active()
    }

    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    // --- internals ---

    fn require_editing(&self) -> Result<(), PropertyError> {
        if self.playback.is_editing() { Ok(()) } else { Err(PropertyError::NotEditing) }
    }

    fn overlay(&self) -> Overlay {
        let mut overlay = Overlay { marquee: self.interaction.select_mode().marquee(), ..Overlay::default() };
        match self.interaction.active() {
            ModeName::Select => {}
            ModeName::Place => {
                let place = self.interaction.place_mode();
                overlay.ghost = place.ghost().map(|position| Ghost { position, kind: place.kind() });
            }
            ModeName::Connect => {
                let connect = self.interaction.connect_mode();
                let state = connect.state();
                if let (Some((_, from)), Some(to)) = (&state.first, state.pointer) {
                    overlay.connect_line = Some(ConnectLine { from: *from, to, color: connect.kind().color() });
                }
                overlay.hover = state.hover;
            }
        }
        overlay
    }
}
