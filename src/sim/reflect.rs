//! Velocity response to arena edges and collisions
//!
//! Edges reflect per axis. Shape/shape and shape/region hits invert the whole
//! velocity vector instead: there is no impulse exchange, the reversal is a
//! stylistic effect.

use glam::Vec2;

use super::shape::Entity;
use crate::clamp_axis;

/// Which arena edges an entity touched this frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EdgeHit {
    pub x: bool,
    pub y: bool,
}

impl EdgeHit {
    pub fn any(&self) -> bool {
        self.x || self.y
    }
}

/// Reflect one axis. Returns the new (position, velocity) and whether the edge was hit.
#[inline]
fn reflect_axis(pos: f32, vel: f32, radius: f32, extent: f32) -> (f32, f32, bool) {
    if pos - radius < 0.0 || pos + radius > extent {
        (clamp_axis(pos, radius, extent - radius), -vel, true)
    } else {
        (pos, vel, false)
    }
}

/// Keep an entity inside `[r, dim - r]` on both axes, negating the velocity
/// component of each axis that crossed an edge.
pub fn reflect_edges(entity: &mut Entity, arena: Vec2) -> EdgeHit {
    let r = entity.bounding_radius();
    let (px, vx, hit_x) = reflect_axis(entity.pos.x, entity.vel.x, r, arena.x);
    let (py, vy, hit_y) = reflect_axis(entity.pos.y, entity.vel.y, r, arena.y);
    entity.pos = Vec2::new(px, py);
    entity.vel = Vec2::new(vx, vy);
    EdgeHit { x: hit_x, y: hit_y }
}

/// Clamp an entity into the arena without touching its velocity (used on resize)
pub fn clamp_into(entity: &mut Entity, arena: Vec2) {
    let r = entity.bounding_radius();
    entity.pos = Vec2::new(
        clamp_axis(entity.pos.x, r, arena.x - r),
        clamp_axis(entity.pos.y, r, arena.y - r),
    );
}

/// Collision response for a pair: both shapes reverse course
pub fn invert_pair(entities: &mut [Entity], i: usize, j: usize) {
    entities[i].invert_velocity();
    entities[j].invert_velocity();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::shape::ShapeKind;
    use proptest::prelude::*;

    fn moving(x: f32, y: f32, vx: f32, vy: f32, size: f32) -> Entity {
        let mut e = Entity::new(1, ShapeKind::Rect, Vec2::new(x, y), size, 0.0);
        e.vel = Vec2::new(vx, vy);
        e
    }

    #[test]
    fn test_left_edge_reflects_x_only() {
        let arena = Vec2::new(100.0, 100.0);
        let mut e = moving(3.0, 50.0, -1.0, 0.5, 10.0);
        let hit = reflect_edges(&mut e, arena);
        assert_eq!(hit, EdgeHit { x: true, y: false });
        assert_eq!(e.pos, Vec2::new(5.0, 50.0));
        assert_eq!(e.vel, Vec2::new(1.0, 0.5));
    }

    #[test]
    fn test_corner_reflects_both_axes() {
        let arena = Vec2::new(100.0, 80.0);
        let mut e = moving(99.0, 79.0, 2.0, 3.0, 10.0);
        let hit = reflect_edges(&mut e, arena);
        assert!(hit.x && hit.y);
        assert_eq!(e.pos, Vec2::new(95.0, 75.0));
        assert_eq!(e.vel, Vec2::new(-2.0, -3.0));
    }

    #[test]
    fn test_interior_untouched() {
        let arena = Vec2::new(100.0, 100.0);
        let mut e = moving(50.0, 50.0, 1.0, 1.0, 10.0);
        assert!(!reflect_edges(&mut e, arena).any());
        assert_eq!(e.vel, Vec2::new(1.0, 1.0));
    }

    #[test]
    fn test_clamp_into_keeps_velocity() {
        let mut e = moving(500.0, -20.0, 0.3, -0.2, 10.0);
        clamp_into(&mut e, Vec2::new(200.0, 100.0));
        assert_eq!(e.pos, Vec2::new(195.0, 5.0));
        assert_eq!(e.vel, Vec2::new(0.3, -0.2));
    }

    proptest! {
        #[test]
        fn prop_reflect_keeps_inside(
            x in -50.0f32..850.0, y in -50.0f32..650.0,
            vx in -2.0f32..2.0, vy in -2.0f32..2.0, size in 5.0f32..25.0,
        ) {
            let arena = Vec2::new(800.0, 600.0);
            let mut e = moving(x, y, vx, vy, size);
            reflect_edges(&mut e, arena);
            let r = size / 2.0;
            prop_assert!(e.pos.x >= r && e.pos.x <= arena.x - r);
            prop_assert!(e.pos.y >= r && e.pos.y <= arena.y - r);
            prop_assert_eq!(e.vel.x.abs(), vx.abs());
            prop_assert_eq!(e.vel.y.abs(), vy.abs());
        }
    }
}
