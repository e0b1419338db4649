#![allow(clippy::float_cmp)]

use super::*;
use crate::doc::PrimitiveKind;
use crate::input::Modifiers;
use crate::lifecycle::SimState;
use crate::scene::Scene;

fn camera() -> Camera {
    let mut cam = Camera::default();
    cam.set_viewport(800.0, 600.0);
    cam
}

fn event(x: f64, y: f64, button: Button) -> PointerEvent {
    PointerEvent::new(Point::new(x, y), button, Modifiers::default())
}

#[test]
fn starts_in_select_mode() {
    let mgr = InteractionManager::new();
    assert_eq!(mgr.active(), ModeName::Select);
    assert_eq!(mgr.cursor(), Cursor::Default);
}

#[test]
fn set_mode_is_noop_when_already_active() {
    let mut mgr = InteractionManager::new();
    let mut notifier = Notifier::default();
    assert!(!mgr.set_mode(ModeName::Select, &mut notifier));
    assert!(notifier.is_empty());
    assert!(mgr.set_mode(ModeName::Place, &mut notifier));
    assert_eq!(notifier.drain(), vec![Action::ModeChanged { mode: ModeName::Place }]);
    assert_eq!(mgr.cursor(), Cursor::Crosshair);
}

#[test]
fn middle_button_pans_without_reaching_mode() {
    let mut mgr = InteractionManager::new();
    let mut cam = camera();
    let mut scene = Scene::default();
    let mut ctx = ModeContext { scene: &mut scene, sim: SimState::Editing };

    mgr.pointer_down(&cam, &mut ctx, &event(100.0, 100.0, Button::Middle));
    assert!(mgr.is_panning());
    assert_eq!(mgr.cursor(), Cursor::Grabbing);
    mgr.pointer_move(&mut cam, &mut ctx, &event(130.0, 90.0, Button::Middle));
    mgr.pointer_move(&mut cam, &mut ctx, &event(140.0, 95.0, Button::Middle));
    mgr.pointer_up(&cam, &mut ctx, &event(140.0, 95.0, Button::Middle));

    assert!(!mgr.is_panning());
    assert_eq!((cam.offset_x, cam.offset_y), (40.0, -5.0));
    assert!(mgr.select_mode().marquee().is_none());
    assert!(scene.drain_events().iter().all(|a| *a == Action::CameraChanged));
}

#[test]
fn space_plus_primary_pans() {
    let mut mgr = InteractionManager::new();
    let mut cam = camera();
    let mut scene = Scene::default();
    let mut ctx = ModeContext { scene: &mut scene, sim: SimState::Editing };

    mgr.key_down(&mut ctx, &Key::new(" "));
    assert_eq!(mgr.cursor(), Cursor::Grab);
    mgr.pointer_down(&cam, &mut ctx, &event(0.0, 0.0, Button::Primary));
    mgr.pointer_move(&mut cam, &mut ctx, &event(10.0, 20.0, Button::Primary));
    mgr.pointer_up(&cam, &mut ctx, &event(10.0, 20.0, Button::Primary));
    mgr.key_up(&mut ctx, &Key::new(" "));

    assert_eq!((cam.offset_x, cam.offset_y), (10.0, 20.0));
    assert_eq!(mgr.cursor(), Cursor::Default);
}

#[test]
fn pointer_leave_ends_pan_and_gesture() {
    let mut mgr = InteractionManager::new();
    let mut cam = camera();
    let mut scene = Scene::default();
    let mut ctx = ModeContext { scene: &mut scene, sim: SimState::Editing };

    mgr.pointer_down(&cam, &mut ctx, &event(10.0, 10.0, Button::Primary));
    mgr.pointer_move(&mut cam, &mut ctx, &event(60.0, 60.0, Button::Primary));
    assert!(mgr.select_mode().marquee().is_some());
    mgr.pointer_leave(&mut ctx);
    assert!(mgr.select_mode().marquee().is_none());

    mgr.pointer_down(&cam, &mut ctx, &event(10.0, 10.0, Button::Middle));
    mgr.pointer_leave(&mut ctx);
    assert!(!mgr.is_panning());
}

#[test]
fn wheel_zooms_around_pointer() {
    let mut mgr = InteractionManager::new();
    let mut cam = camera();
    let mut notifier = Notifier::default();
    let anchor = Point::new(600.0, 150.0);
    let before = cam.screen_to_world(anchor);

    mgr.wheel(&mut cam, anchor, WheelDelta { dx: 0.0, dy: -100.0 }, &mut notifier);
    assert!(cam.zoom > 50.0);
    let after = cam.screen_to_world(anchor);
    assert!((before.x - after.x).abs() < 1e-9 && (before.y - after.y).abs() < 1e-9);

    mgr.wheel(&mut cam, anchor, WheelDelta { dx: 0.0, dy: 100.0 }, &mut notifier);
    assert!((cam.zoom - 50.0).abs() < 1e-9);
    assert_eq!(notifier.drain().len(), 2);
}

#[test]
fn place_completes_back_to_select() {
    let mut mgr = InteractionManager::new();
    let cam = camera();
    let mut scene = Scene::default();
    let mut ctx = ModeContext { scene: &mut scene, sim: SimState::Editing };

    mgr.set_mode(ModeName::Place, &mut ctx.scene.notifier);
    mgr.place_mode_mut().set_kind(PrimitiveKind::Circle);
    mgr.pointer_down(&cam, &mut ctx, &event(400.0, 300.0, Button::Primary));

    assert_eq!(mgr.active(), ModeName::Select);
    assert_eq!(scene.doc.primitive_count(), 1);
    let placed = scene.doc.primitives().next().unwrap();
    assert_eq!(placed.kind(), PrimitiveKind::Circle);
    assert_eq!(placed.position, Point::new(0.0, 0.0));
    assert!(scene.selection.contains(&placed.id));
}

#[test]
fn escape_cancels_place() {
    let mut mgr = InteractionManager::new();
    let mut scene = Scene::default();
    let mut ctx = ModeContext { scene: &mut scene, sim: SimState::Editing };
    mgr.set_mode(ModeName::Place, &mut ctx.scene.notifier);
    mgr.key_down(&mut ctx, &Key::new("Escape"));
    assert_eq!(mgr.active(), ModeName::Select);
    assert_eq!(scene.doc.primitive_count(), 0);
}
