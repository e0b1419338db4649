//! Interaction manager: mode switching, panning, and event dispatch.
//!
//! DESIGN
//! ======
//! The manager owns one instance of every mode and tracks which one is
//! active. Panning (middle button, or primary button while Space is held) and
//! wheel zoom are handled here before any mode sees the event, so every mode
//! is pannable for free. Pointer positions are converted to world space once,
//! here, and handed to the mode with the raw event.

#[cfg(test)]
#[path = "interaction_test.rs"]
mod interaction_test;

use crate::camera::{Camera, Point};
use crate::events::{Action, Notifier};
use crate::input::{Button, Cursor, Key, PointerEvent, WheelDelta};
use crate::modes::{ConnectMode, InteractionMode, ModeContext, ModeName, ModeOutcome, PlaceMode, SelectMode};

#[derive(Debug, Default)]
pub struct InteractionManager {
    active: ModeName,
    select: SelectMode,
    place: PlaceMode,
    connect: ConnectMode,
    /// Last screen position while a pan is in progress.
    pan_from: Option<Point>,
    space_held: bool,
}

impl InteractionManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn active(&self) -> ModeName {
        self.active
    }

    #[must_use]
    pub fn select_mode(&self) -> &SelectMode {
        &self.select
    }

    #[must_use]
    pub fn place_mode(&self) -> &PlaceMode {
        &self.place
    }

    pub fn place_mode_mut(&mut self) -> &mut PlaceMode {
        &mut self.place
    }

    #[must_use]
    pub fn connect_mode(&self) -> &ConnectMode {
        &self.connect
    }

    pub fn connect_mode_mut(&mut self) -> &mut ConnectMode {
        &mut self.connect
    }

    #[must_use]
    pub fn is_panning(&self) -> bool {
        self.pan_from.is_some()
    }

    /// Switch to `name`, deactivating the current mode first. No-op if it is
    /// already active.
    pub fn set_mode(&mut self, name: ModeName, notifier: &mut Notifier) -> bool {
        if name == self.active {
            return false;
        }
        self.mode_mut().deactivate();
        self.active = name;
        self.mode_mut().activate();
        notifier.push(Action::ModeChanged { mode: name });
        true
    }

    /// Cursor hint for the host, accounting for pans in progress.
    #[must_use]
    pub fn cursor(&self) -> Cursor {
        match (self.space_held, self.is_panning()) {
            (_, true) => Cursor::Grabbing,
            (true, false) => Cursor::Grab,
            (false, false) => self.mode().cursor(),
        }
    }

    // =========================================================================
    // DISPATCH
    // =========================================================================

    pub fn pointer_down(&mut self, camera: &Camera, ctx: &mut ModeContext<'_>, event: &PointerEvent) {
        let pans = event.button == Button::Middle || (event.button == Button::Primary && self.space_held);
        if pans {
            self.pan_from = Some(event.screen);
            return;
        }
        let world = camera.screen_to_world(event.screen);
        let outcome = self.mode_mut().on_pointer_down(ctx, world, event);
        self.finish(outcome, ctx);
    }

    pub fn pointer_move(&mut self, camera: &mut Camera, ctx: &mut ModeContext<'_>, event: &PointerEvent) {
        if let Some(last) = self.pan_from {
            camera.pan(event.screen.x - last.x, event.screen.y - last.y);
            self.pan_from = Some(event.screen);
            ctx.scene.notifier.push(Action::CameraChanged);
            return;
        }
        let world = camera.screen_to_world(event.screen);
        let outcome = self.mode_mut().on_pointer_move(ctx, world, event);
        self.finish(outcome, ctx);
    }

    pub fn pointer_up(&mut self, camera: &Camera, ctx: &mut ModeContext<'_>, event: &PointerEvent) {
        if self.pan_from.is_some() && matches!(event.button, Button::Primary | Button::Middle) {
            self.pan_from = None;
            return;
        }
        let world = camera.screen_to_world(event.screen);
        let outcome = self.mode_mut().on_pointer_up(ctx, world, event);
        self.finish(outcome, ctx);
    }

    /// Pointer capture lost: end any pan and abandon the active gesture.
    pub fn pointer_leave(&mut self, ctx: &mut ModeContext<'_>) {
        self.pan_from = None;
        self.mode_mut().on_pointer_leave(ctx);
    }

    /// Zoom one notch around `screen`. Scrolling up zooms in.
    pub fn wheel(&mut self, camera: &mut Camera, screen: Point, delta: WheelDelta, notifier: &mut Notifier) {
        if delta.dy == 0.0 {
            return;
        }
        camera.zoom_at(screen, delta.dy < 0.0);
        notifier.push(Action::CameraChanged);
    }

    pub fn key_down(&mut self, ctx: &mut ModeContext<'_>, key: &Key) {
        if key.is_space() {
            self.space_held = true;
            return;
        }
        let outcome = self.mode_mut().on_key_down(ctx, key);
        self.finish(outcome, ctx);
    }

    pub fn key_up(&mut self, ctx: &mut ModeContext<'_>, key: &Key) {
        if key.is_space() {
            self.space_held = false;
            return;
        }
        let outcome = self.mode_mut().on_key_up(ctx, key);
        self.finish(outcome, ctx);
    }

    /// Drop any pan and every mode's gesture state. Used when the scene is
    /// replaced underneath the modes.
    pub fn cancel(&mut self) {
        self.pan_from = None;
        self.select.clear();
        self.place.clear();
        self.connect.clear();
    }

    // --- internals ---

    fn finish(&mut self, outcome: ModeOutcome, ctx: &mut ModeContext<'_>) {
        if outcome == ModeOutcome::Done {
            self.set_mode(ModeName::Select, &mut ctx.scene.notifier);
        }
    }

    fn mode(&self) -> &dyn InteractionMode {
        match self.active {
            ModeName::Select => &self.select,
            ModeName::Place => &self.place,
            ModeName::Connect => &self.connect,
        }
    }

    fn mode_mut(&mut self) -> &mut dyn InteractionMode {
        match self.active {
            ModeName::Select => &mut self.select,
            ModeName::Place => &mut self.place,
            ModeName::Connect => &mut self.connect,
        }
    }
}
