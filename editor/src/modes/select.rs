//! Select mode: click selection, group drag, marquee, and deletion.

use crate::camera::Point;
use crate::doc::Pose;
use crate::events::Action;
use crate::ids::EntityId;
use crate::input::{Button, Cursor, Key, PointerEvent};
use crate::scene::Scene;

use super::{InteractionMode, ModeContext, ModeName, ModeOutcome};

/// Gesture tracked between pointer-down and pointer-up.
#[derive(Debug, Clone, Default)]
enum Gesture {
    #[default]
    Idle,
    /// Dragging every selected primitive by the cumulative pointer delta.
    Moving { origin: Point, starts: Vec<(EntityId, Pose)>, moved: bool },
    /// Rubber-band selection. `end` is unset until the pointer moves.
    Marquee { start: Point, end: Option<Point> },
}

#[derive(Debug, Default)]
pub struct SelectMode {
    gesture: Gesture,
}

impl SelectMode {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current marquee corners in world space, once the pointer has moved.
    #[must_use]
    pub fn marquee(&self) -> Option<(Point, Point)> {
        match self.gesture {
            Gesture::Marquee { start, end: Some(end) } => Some((start, end)),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self.gesture, Gesture::Moving { .. })
    }
}

impl InteractionMode for SelectMode {
    fn name(&self) -> ModeName {
        ModeName::Select
    }

    fn cursor(&self) -> Cursor {
        match self.gesture {
            Gesture::Idle => Cursor::Default,
            Gesture::Moving { .. } => Cursor::Grabbing,
            Gesture::Marquee { .. } => Cursor::Crosshair,
        }
    }

    fn on_pointer_down(&mut self, ctx: &mut ModeContext<'_>, world: Point, event: &PointerEvent) -> ModeOutcome {
        if event.button != Button::Primary {
            return ModeOutcome::Continue;
        }
        let editing = ctx.editing();
        let shift = event.modifiers.shift;
        let scene = &mut *ctx.scene;

        let Some(hit) = scene.hit_test_point(world) else {
            if !shift {
                scene.selection.clear(&mut scene.notifier);
            }
            self.gesture = Gesture::Marquee { start: world, end: None };
            return ModeOutcome::Continue;
        };

        if shift {
            scene.selection.toggle(hit, &mut scene.notifier);
        } else if !scene.selection.contains(&hit) {
            scene.selection.select(hit, &mut scene.notifier);
        }

        if editing && scene.selection.has_selection() {
            let starts = scene
                .selection
                .selected_ids()
                .into_iter()
                .filter_map(|id| {
                    let pose = scene.doc.primitive(&id)?.pose();
                    Some((id, pose))
                })
                .collect();
            self.gesture = Gesture::Moving { origin: world, starts, moved: false };
        }
        ModeOutcome::Continue
    }

    fn on_pointer_move(&mut self, ctx: &mut ModeContext<'_>, world: Point, _event: &PointerEvent) -> ModeOutcome {
        match &mut self.gesture {
            Gesture::Idle => {}
            Gesture::Moving { origin, starts, moved } => {
                if !ctx.editing() {
                    return ModeOutcome::Continue;
                }
                let (dx, dy) = (world.x - origin.x, world.y - origin.y);
                for (id, start) in starts.iter() {
                    let pose = Pose {
                        position: Point::new(start.position.x + dx, start.position.y + dy),
                        angle: start.angle,
                    };
                    ctx.scene.move_primitive(id, pose);
                }
                *moved = true;
            }
            Gesture::Marquee { end, .. } => *end = Some(world),
        }
        ModeOutcome::Continue
    }

    fn on_pointer_up(&mut self, ctx: &mut ModeContext<'_>, _world: Point, event: &PointerEvent) -> ModeOutcome {
        let scene = &mut *ctx.scene;
        match std::mem::take(&mut self.gesture) {
            Gesture::Idle => {}
            Gesture::Moving { starts, moved, .. } => report_moved(scene, starts, moved),
            Gesture::Marquee { start, end } => {
                let ids = scene.hit_test_rect(start, end.unwrap_or(start));
                if event.modifiers.shift {
                    scene.selection.add(ids, &mut scene.notifier);
                } else {
                    scene.selection.replace(ids, &mut scene.notifier);
                }
            }
        }
        ModeOutcome::Continue
    }

    fn on_key_down(&mut self, ctx: &mut ModeContext<'_>, key: &Key) -> ModeOutcome {
        if key.is_escape() {
            // Moved bodies stay where they were dropped.
            if let Gesture::Moving { starts, moved, .. } = std::mem::take(&mut self.gesture) {
                report_moved(ctx.scene, starts, moved);
            }
            return ModeOutcome::Continue;
        }
        if key.is_delete() && ctx.editing() && ctx.scene.selection.has_selection() {
            self.gesture = Gesture::Idle;
            ctx.scene.delete_selected();
        }
        ModeOutcome::Continue
    }

    fn clear(&mut self) {
        self.gesture = Gesture::Idle;
    }
}

fn report_moved(scene: &mut Scene, starts: Vec<(EntityId, Pose)>, moved: bool) {
    if moved {
        for (id, _) in starts {
            scene.notifier.push(Action::PropertyChanged { id, property: "position" });
        }
    }
}
