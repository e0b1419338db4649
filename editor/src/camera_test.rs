#![allow(clippy::clone_on_copy, clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON * a.abs().max(b.abs()).max(1.0)
}

fn point_approx_eq(a: Point, b: Point) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
}

fn sized_camera() -> Camera {
    let mut cam = Camera::default();
    cam.set_viewport(800.0, 600.0);
    cam
}

// --- Point ---

#[test]
fn point_distance() {
    assert!(approx_eq(Point::new(0.0, 0.0).distance(Point::new(3.0, 4.0)), 5.0));
}

// --- Camera defaults ---

#[test]
fn camera_default_pan_is_zero() {
    let cam = Camera::default();
    assert_eq!(cam.offset_x, 0.0);
    assert_eq!(cam.offset_y, 0.0);
}

#[test]
fn camera_default_zoom() {
    assert_eq!(Camera::default().zoom, DEFAULT_ZOOM);
}

// --- Conversions ---

#[test]
fn world_origin_maps_to_viewport_center() {
    let cam = sized_camera();
    let s = cam.world_to_screen(Point::new(0.0, 0.0));
    assert!(point_approx_eq(s, Point::new(400.0, 300.0)));
}

#[test]
fn world_y_up_is_screen_y_down() {
    let cam = sized_camera();
    let s = cam.world_to_screen(Point::new(1.0, 1.0));
    assert!(point_approx_eq(s, Point::new(450.0, 250.0)));
}

#[test]
fn screen_to_world_with_offset() {
    let mut cam = sized_camera();
    cam.pan(100.0, -50.0);
    let w = cam.screen_to_world(Point::new(500.0, 250.0));
    assert!(point_approx_eq(w, Point::new(0.0, 0.0)));
}

#[test]
fn screen_dist_to_world_divides_by_zoom() {
    let cam = sized_camera();
    assert!(approx_eq(cam.screen_dist_to_world(100.0), 2.0));
}

#[test]
fn transform_inverse_law_across_states() {
    let mut cam = sized_camera();
    let samples = [
        Point::new(0.0, 0.0),
        Point::new(13.5, 799.0),
        Point::new(-250.0, 42.0),
        Point::new(400.0, 300.0),
        Point::new(1e4, -3e3),
    ];
    let states: [(f64, f64, usize, bool); 4] = [(0.0, 0.0, 0, true), (37.0, -12.5, 3, true), (-400.0, 90.0, 7, false), (5.0, 5.0, 40, true)];

    for (dx, dy, steps, zoom_in) in states {
        cam.pan(dx, dy);
        for _ in 0..steps {
            cam.zoom_at(Point::new(123.0, 456.0), zoom_in);
        }
        for p in samples {
            let round = cam.world_to_screen(cam.screen_to_world(p));
            assert!(point_approx_eq(round, p), "{p:?} -> {round:?} at zoom {}", cam.zoom);
        }
    }
}

// --- Pan / zoom ---

#[test]
fn pan_accumulates() {
    let mut cam = Camera::default();
    cam.pan(10.0, 5.0);
    cam.pan(-3.0, 2.0);
    assert_eq!(cam.offset_x, 7.0);
    assert_eq!(cam.offset_y, 7.0);
}

#[test]
fn zoom_in_multiplies_by_factor() {
    let mut cam = sized_camera();
    cam.zoom_at(Point::new(400.0, 300.0), true);
    assert!(approx_eq(cam.zoom, DEFAULT_ZOOM * ZOOM_FACTOR));
}

#[test]
fn zoom_out_divides_by_factor() {
    let mut cam = sized_camera();
    cam.zoom_at(Point::new(400.0, 300.0), false);
    assert!(approx_eq(cam.zoom, DEFAULT_ZOOM / ZOOM_FACTOR));
}

#[test]
fn zoom_clamps_to_bounds() {
    let mut cam = sized_camera();
    for _ in 0..200 {
        cam.zoom_at(Point::new(10.0, 10.0), false);
    }
    assert_eq!(cam.zoom, MIN_ZOOM);
    for _ in 0..400 {
        cam.zoom_at(Point::new(10.0, 10.0), true);
    }
    assert_eq!(cam.zoom, MAX_ZOOM);
}

#[test]
fn zoom_preserves_world_point_under_anchor() {
    let anchors = [Point::new(0.0, 0.0), Point::new(400.0, 300.0), Point::new(731.0, 12.0), Point::new(-50.0, 900.0)];
    for anchor in anchors {
        let mut cam = sized_camera();
        cam.pan(-80.0, 33.0);
        for zoom_in in [true, true, false, true, false, false, false] {
            let before = cam.screen_to_world(anchor);
            cam.zoom_at(anchor, zoom_in);
            let after = cam.screen_to_world(anchor);
            assert!(point_approx_eq(before, after), "anchor {anchor:?}: {before:?} != {after:?}");
        }
    }
}

#[test]
fn zoom_at_clamped_bound_keeps_offset() {
    let mut cam = sized_camera();
    cam.zoom = MAX_ZOOM;
    cam.pan(12.0, 34.0);
    cam.zoom_at(Point::new(100.0, 100.0), true);
    assert_eq!(cam.zoom, MAX_ZOOM);
    assert!(approx_eq(cam.offset_x, 12.0));
    assert!(approx_eq(cam.offset_y, 34.0));
}

#[test]
fn reset_restores_defaults_but_keeps_viewport() {
    let mut cam = sized_camera();
    cam.pan(50.0, 50.0);
    cam.zoom_at(Point::new(0.0, 0.0), true);
    cam.reset();
    assert_eq!(cam.offset_x, 0.0);
    assert_eq!(cam.zoom, DEFAULT_ZOOM);
    assert_eq!(cam.viewport_width, 800.0);
}
