#![allow(clippy::float_cmp)]

use super::*;
use crate::doc::JointParams;

const FRAME_MS: f64 = 1000.0 / 60.0;

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn engine() -> EngineCore {
    let mut engine = EngineCore::default();
    engine.set_viewport(800.0, 600.0);
    engine
}

fn screen(engine: &EngineCore, world: Point) -> Point {
    engine.camera().world_to_screen(world)
}

/// Primary click at a world position, with optional shift.
fn click(engine: &mut EngineCore, world: Point, shift: bool) -> Vec<Action> {
    let at = screen(engine, world);
    let modifiers = Modifiers { shift };
    let mut actions = engine.on_pointer_down(at, Button::Primary, modifiers);
    actions.extend(engine.on_pointer_up(at, Button::Primary, modifiers));
    actions
}

fn drag(engine: &mut EngineCore, from: Point, to: Point) -> Vec<Action> {
    let (a, b) = (screen(engine, from), screen(engine, to));
    let mut actions = engine.on_pointer_down(a, Button::Primary, Modifiers::default());
    actions.extend(engine.on_pointer_move(b, Modifiers::default()));
    actions.extend(engine.on_pointer_up(b, Button::Primary, Modifiers::default()));
    actions
}

fn place(engine: &mut EngineCore, kind: PrimitiveKind, world: Point) -> EntityId {
    engine.begin_place(kind);
    let actions = click(engine, world, false);
    actions
        .into_iter()
        .find_map(|a| match a {
            Action::PrimitiveCreated { id } => Some(id),
            _ => None,
        })
        .expect("placement created nothing")
}

fn run_frames(engine: &mut EngineCore, start_ms: f64, frames: u32) -> f64 {
    let mut now = start_ms;
    for _ in 0..frames {
        engine.frame(now);
        now += FRAME_MS;
    }
    now
}

#[test]
fn place_and_connect_by_clicking() {
    let mut engine = engine();

    let actions = engine.begin_place(PrimitiveKind::Rectangle);
    assert_eq!(actions, vec![Action::ModeChanged { mode: ModeName::Place }]);
    let at = screen(&engine, pt(-1.0, 1.0));
    engine.on_pointer_move(at, Modifiers::default());
    let frame = engine.frame(0.0);
    assert_eq!(frame.cursor, Cursor::Crosshair);
    assert_eq!(frame.overlay.ghost, Some(Ghost { position: pt(-1.0, 1.0), kind: PrimitiveKind::Rectangle }));

    let actions = click(&mut engine, pt(-1.0, 1.0), false);
    let Some(Action::PrimitiveCreated { id: rect }) = actions.first().cloned() else {
        panic!("unexpected actions: {actions:?}");
    };
    assert!(actions.contains(&Action::SelectionChanged { selected: vec![rect.clone()] }));
    assert!(actions.contains(&Action::ModeChanged { mode: ModeName::Select }));
    assert_eq!(engine.mode(), ModeName::Select);
    assert_eq!(engine.primitive(&rect).unwrap().position, pt(-1.0, 1.0));

    let circle = place(&mut engine, PrimitiveKind::Circle, pt(1.5, 1.0));

    engine.begin_connect(ConnectionKind::Spring);
    click(&mut engine, pt(-1.0, 1.0), false);
    engine.on_pointer_move(screen(&engine, pt(1.5, 1.0)), Modifiers::default());
    let overlay = engine.frame(0.0).overlay;
    assert_eq!(overlay.connect_line, Some(ConnectLine { from: pt(-1.0, 1.0), to: pt(1.5, 1.0), color: "#22c55e" }));
    assert_eq!(overlay.hover, Some(circle.clone()));

    let actions = click(&mut engine, pt(1.5, 1.0), false);
    let connection_id = actions
        .iter()
        .find_map(|a| match a {
            Action::ConnectionCreated { id } => Some(id.clone()),
            _ => None,
        })
        .expect("no connection created");
    assert_eq!(engine.mode(), ModeName::Select);
    assert_eq!(engine.selection(), vec![connection_id.clone()]);

    let connection = engine.connection(&connection_id).unwrap();
    assert_eq!((&connection.body_a, &connection.body_b), (&rect, &circle));
    let JointParams::Spring { rest_length, .. } = connection.joint else {
        panic!("expected a spring");
    };
    assert!((rest_length - 2.5).abs() < 1e-9);
    assert!(engine.scene().physics().has_joint(&connection_id));
}

#[test]
fn marquee_selects_enclosed_bodies() {
    let mut engine = engine();
    let a = place(&mut engine, PrimitiveKind::Rectangle, pt(-2.0, 0.0));
    let b = place(&mut engine, PrimitiveKind::Circle, pt(0.0, 0.0));
    let c = place(&mut engine, PrimitiveKind::Circle, pt(4.0, 0.0));

    engine.on_pointer_down(screen(&engine, pt(-3.0, 1.0)), Button::Primary, Modifiers::default());
    engine.on_pointer_move(screen(&engine, pt(1.0, -1.0)), Modifiers::default());
    assert_eq!(engine.frame(0.0).overlay.marquee, Some((pt(-3.0, 1.0), pt(1.0, -1.0))));
    let actions = engine.on_pointer_up(screen(&engine, pt(1.0, -1.0)), Button::Primary, Modifiers::default());

    let mut expected = vec![a, b];
    expected.sort();
    assert_eq!(engine.selection(), expected);
    assert!(actions.iter().any(|a| matches!(a, Action::SelectionChanged { .. })));
    assert!(engine.frame(0.0).overlay.marquee.is_none());

    // Shift-marquee extends.
    let at = screen(&engine, pt(3.0, 1.0));
    let modifiers = Modifiers { shift: true };
    engine.on_pointer_down(at, Button::Primary, modifiers);
    engine.on_pointer_move(screen(&engine, pt(5.0, -1.0)), modifiers);
    engine.on_pointer_up(screen(&engine, pt(5.0, -1.0)), Button::Primary, modifiers);
    assert_eq!(engine.selection().len(), 3);
    assert!(engine.selection().contains(&c));
}

#[test]
fn dragging_moves_model_and_body() {
    let mut engine = engine();
    let id = place(&mut engine, PrimitiveKind::Rectangle, pt(0.0, 0.0));

    let actions = drag(&mut engine, pt(0.0, 0.0), pt(1.0, 2.0));
    assert!(actions.contains(&Action::PropertyChanged { id: id.clone(), property: "position" }));
    assert_eq!(engine.primitive(&id).unwrap().position, pt(1.0, 2.0));
    let body = engine.body_state(&id).unwrap();
    assert!((body.position.x - 1.0).abs() < 1e-9 && (body.position.y - 2.0).abs() < 1e-9);
}

#[test]
fn escape_ends_a_drag_in_place() {
    let mut engine = engine();
    let id = place(&mut engine, PrimitiveKind::Circle, pt(0.0, 0.0));

    engine.on_pointer_down(screen(&engine, pt(0.0, 0.0)), Button::Primary, Modifiers::default());
    engine.on_pointer_move(screen(&engine, pt(1.0, 0.0)), Modifiers::default());
    let actions = engine.on_key_down(&Key::new("Escape"));
    assert_eq!(actions, vec![Action::PropertyChanged { id: id.clone(), property: "position" }]);

    engine.on_pointer_move(screen(&engine, pt(3.0, 0.0)), Modifiers::default());
    assert_eq!(engine.primitive(&id).unwrap().position, pt(1.0, 0.0));
    assert_eq!(engine.frame(0.0).cursor, Cursor::Default);
}

#[test]
fn connect_ignores_repeat_clicks_misses_and_playback() {
    let mut engine = engine();
    let a = place(&mut engine, PrimitiveKind::Circle, pt(0.0, 0.0));
    place(&mut engine, PrimitiveKind::Circle, pt(2.0, 0.0));

    engine.begin_connect(ConnectionKind::Spring);
    click(&mut engine, pt(0.0, 0.0), false);
    let again = click(&mut engine, pt(0.0, 0.0), false);
    let missed = click(&mut engine, pt(1.0, 5.0), false);
    assert!(again.is_empty(), "{again:?}");
    assert!(missed.is_empty(), "{missed:?}");
    assert_eq!(engine.scene().doc().connection_count(), 0);
    assert_eq!(engine.mode(), ModeName::Connect);

    // Endpoint A is still armed.
    engine.on_pointer_move(screen(&engine, pt(1.0, 3.0)), Modifiers::default());
    let line = engine.frame(0.0).overlay.connect_line.unwrap();
    assert_eq!(line.from, pt(0.0, 0.0));

    let actions = engine.on_key_down(&Key::new("Escape"));
    assert_eq!(actions, vec![Action::ModeChanged { mode: ModeName::Select }]);
    assert!(engine.frame(0.0).overlay.connect_line.is_none());

    engine.play();
    engine.begin_connect(ConnectionKind::Spring);
    let first = click(&mut engine, pt(0.0, 0.0), false);
    let second = click(&mut engine, pt(2.0, 0.0), false);
    assert!(first.is_empty() && second.is_empty());
    assert_eq!(engine.scene().doc().connection_count(), 0);
    assert_eq!(engine.scene().physics().joint_count(), 0);
    assert_eq!(engine.mode(), ModeName::Connect);
    assert_eq!(engine.selection(), vec![a]);
}

#[test]
fn shift_click_toggles_selection() {
    let mut engine = engine();
    let a = place(&mut engine, PrimitiveKind::Circle, pt(-2.0, 0.0));
    let b = place(&mut engine, PrimitiveKind::Circle, pt(2.0, 0.0));

    click(&mut engine, pt(-2.0, 0.0), false);
    click(&mut engine, pt(2.0, 0.0), true);
    let mut both = vec![a.clone(), b.clone()];
    both.sort();
    assert_eq!(engine.selection(), both);

    click(&mut engine, pt(-2.0, 0.0), true);
    assert_eq!(engine.selection(), vec![b]);

    click(&mut engine, pt(0.0, 5.0), false);
    assert!(engine.selection().is_empty());
}

#[test]
fn delete_key_cascades() {
    let mut engine = engine();
    let a = place(&mut engine, PrimitiveKind::Circle, pt(0.0, 0.0));
    let b = place(&mut engine, PrimitiveKind::Circle, pt(2.0, 0.0));
    engine.begin_connect(ConnectionKind::Revolute);
    click(&mut engine, pt(0.0, 0.0), false);
    click(&mut engine, pt(2.0, 0.0), false);

    click(&mut engine, pt(0.0, 0.0), false);
    let actions = engine.on_key_down(&Key::new("Delete"));

    assert!(actions.contains(&Action::PrimitiveDeleted { id: a.clone() }));
    assert!(actions.iter().any(|a| matches!(a, Action::ConnectionDeleted { .. })));
    assert!(engine.primitive(&a).is_none());
    assert!(engine.primitive(&b).is_some());
    assert_eq!(engine.scene().doc().connection_count(), 0);
    assert_eq!(engine.scene().physics().joint_count(), 0);
    assert!(engine.selection().is_empty());
}

#[test]
fn play_pause_reset_round_trip() {
    let mut engine = engine();
    let id = place(&mut engine, PrimitiveKind::Circle, pt(0.0, 3.0));
    engine.set_primitive_property(&id, PrimitiveField::AngleDeg, "30").unwrap();
    let start = engine.primitive(&id).unwrap().pose();

    let actions = engine.play();
    assert_eq!(actions, vec![Action::SimulationStateChanged { state: SimState::Playing }]);
    let now = run_frames(&mut engine, 0.0, 45);
    assert!(engine.simulation_time() > 0.5);
    assert!(engine.primitive(&id).unwrap().position.y < 3.0);
    assert_eq!(engine.primitive(&id).unwrap().pose(), engine.scene().physics().body_pose(&id).unwrap());

    // Structural edits are locked while the simulation runs.
    assert_eq!(
        engine.set_primitive_property(&id, PrimitiveField::Radius, "1"),
        Err(PropertyError::NotEditing)
    );
    assert_eq!(engine.set_gravity(pt(0.0, 0.0)), Err(PropertyError::NotEditing));
    engine.begin_place(PrimitiveKind::Rectangle);
    click(&mut engine, pt(5.0, 5.0), false);
    assert_eq!(engine.scene().doc().primitive_count(), 1);
    engine.set_mode(ModeName::Select);

    engine.pause();
    let paused_at = engine.primitive(&id).unwrap().position;
    run_frames(&mut engine, now, 10);
    assert_eq!(engine.primitive(&id).unwrap().position, paused_at);

    let actions = engine.reset();
    assert_eq!(actions, vec![Action::SimulationStateChanged { state: SimState::Editing }]);
    assert_eq!(engine.sim_state(), SimState::Editing);
    assert_eq!(engine.simulation_time(), 0.0);
    assert_eq!(engine.primitive(&id).unwrap().pose(), start);
    let body = engine.body_state(&id).unwrap();
    assert!((body.position.y - 3.0).abs() < 1e-12);
    assert_eq!(body.linear_velocity, pt(0.0, 0.0));
}

#[test]
fn frame_reports_steps_only_while_playing() {
    let mut engine = engine();
    place(&mut engine, PrimitiveKind::Circle, pt(0.0, 0.0));
    assert_eq!(engine.frame(0.0).steps, 0);
    assert_eq!(engine.frame(100.0).steps, 0);

    engine.play();
    assert_eq!(engine.frame(1000.0).steps, 0);
    assert_eq!(engine.frame(1000.0 + 60.0).steps, 3);
}

#[test]
fn settings_are_validated() {
    let mut engine = engine();
    assert_eq!(engine.set_gravity(pt(0.0, -1.62)), Ok(vec![Action::SettingsChanged]));
    assert_eq!(engine.scene().physics().gravity(), pt(0.0, -1.62));
    assert!(engine.set_gravity(pt(f64::NAN, 0.0)).is_err());

    engine.set_fixed_timestep(1.0).unwrap();
    assert!((engine.scene().physics().fixed_timestep() - 0.1).abs() < 1e-12);
    assert!(engine.set_fixed_timestep(-0.01).is_err());

    assert!(engine.set_speed(0.0).is_err());
    engine.play();
    assert_eq!(engine.set_speed(0.5), Ok(vec![Action::SettingsChanged]));
}

#[test]
fn camera_pan_and_zoom() {
    let mut engine = engine();
    let anchor = pt(100.0, 100.0);
    let before = engine.camera().screen_to_world(anchor);
    let actions = engine.on_wheel(anchor, WheelDelta { dx: 0.0, dy: -1.0 });
    assert_eq!(actions, vec![Action::CameraChanged]);
    let after = engine.camera().screen_to_world(anchor);
    assert!((before.x - after.x).abs() < 1e-9 && (before.y - after.y).abs() < 1e-9);

    let offset = engine.camera().offset_x;
    engine.on_pointer_down(pt(0.0, 0.0), Button::Middle, Modifiers::default());
    assert_eq!(engine.frame(0.0).cursor, Cursor::Grabbing);
    engine.on_pointer_move(pt(30.0, 0.0), Modifiers::default());
    engine.on_pointer_up(pt(30.0, 0.0), Button::Middle, Modifiers::default());
    assert!((engine.camera().offset_x - offset - 30.0).abs() < 1e-9);
    assert_eq!(engine.frame(0.0).cursor, Cursor::Default);

    engine.reset_camera();
    assert_eq!(engine.camera().zoom, 50.0);
    assert_eq!(engine.camera().offset_x, 0.0);
}

#[test]
fn snapshot_load_forces_editing() {
    let mut engine = engine();
    let a = place(&mut engine, PrimitiveKind::Rectangle, pt(0.0, 2.0));
    let saved = engine.snapshot();

    engine.play();
    run_frames(&mut engine, 0.0, 20);
    assert!(engine.primitive(&a).unwrap().position.y < 2.0);

    let actions = engine.load_snapshot(&saved);
    assert!(actions.contains(&Action::SimulationStateChanged { state: SimState::Editing }));
    assert!(actions.contains(&Action::SceneCleared));
    assert_eq!(engine.sim_state(), SimState::Editing);
    assert_eq!(engine.snapshot(), saved);
    assert_eq!(engine.primitive(&a).unwrap().position, pt(0.0, 2.0));
}

#[test]
fn clear_scene_empties_everything() {
    let mut engine = engine();
    place(&mut engine, PrimitiveKind::Circle, pt(0.0, 0.0));
    engine.begin_place(PrimitiveKind::Rectangle);
    engine.on_pointer_move(pt(10.0, 10.0), Modifiers::default());

    let actions = engine.clear_scene();
    assert!(actions.contains(&Action::SceneCleared));
    assert!(engine.scene().doc().is_empty());
    assert_eq!(engine.scene().physics().body_count(), 0);
    assert!(engine.selection().is_empty());
    assert!(engine.frame(0.0).overlay.ghost.is_none());
}
