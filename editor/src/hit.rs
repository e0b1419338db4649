//! Hit testing: resolve world points and rectangles to entity ids.
//!
//! Solid shapes are resolved through the physics layer's collider geometry.
//! Ground spans have zero thickness, so a point test falls back to a proximity
//! check in the span's local frame and a rectangle test accepts spans whose
//! origin lies inside the rectangle.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::camera::Point;
use crate::consts::{EDGE_HIT_TOLERANCE, POINT_QUERY_HALF_EXTENT};
use crate::doc::{SceneDoc, Shape};
use crate::ids::EntityId;
use crate::physics::PhysicsWorld;

/// The primitive under `world`, if any.
///
/// Among several overlapping candidates the first one the physics layer
/// reports wins; ties are not broken further.
#[must_use]
pub fn hit_test_point(doc: &SceneDoc, physics: &PhysicsWorld, world: Point) -> Option<EntityId> {
    let min = Point::new(world.x - POINT_QUERY_HALF_EXTENT, world.y - POINT_QUERY_HALF_EXTENT);
    let max = Point::new(world.x + POINT_QUERY_HALF_EXTENT, world.y + POINT_QUERY_HALF_EXTENT);
    if let Some(id) = physics.query_aabb(min, max).into_iter().find(|id| physics.contains_point(id, world)) {
        return Some(id);
    }

    doc.primitives().find_map(|p| {
        let Shape::Ground { width } = p.shape else {
            return None;
        };
        let local = physics.world_to_local(&p.id, world)?;
        (local.y.abs() < EDGE_HIT_TOLERANCE && local.x.abs() <= width / 2.0).then(|| p.id.clone())
    })
}

/// Every primitive touched by the rectangle spanned by corners `a` and `b`.
/// Corner order does not matter; result order is not meaningful.
#[must_use]
pub fn hit_test_rect(doc: &SceneDoc, physics: &PhysicsWorld, a: Point, b: Point) -> Vec<EntityId> {
    let min = Point::new(a.x.min(b.x), a.y.min(b.y));
    let max = Point::new(a.x.max(b.x), a.y.max(b.y));

    let mut hits = physics.query_aabb(min, max);
    for p in doc.primitives().filter(|p| p.is_edge()) {
        let inside = (min.x..=max.x).contains(&p.position.x) && (min.y..=max.y).contains(&p.position.y);
        if inside && !hits.contains(&p.id) {
            hits.push(p.id.clone());
        }
    }
    hits
}
