//! Collision detection
//!
//! Every shape is approximated by its bounding circle against other shapes and
//! by its bounding square against background regions. All tests are strict:
//! touching edges do not count as overlap.

use glam::Vec2;

use super::region::Region;
use super::shape::Entity;

/// True if `point` lies strictly inside the circle
#[inline]
pub fn point_in_circle(point: Vec2, center: Vec2, radius: f32) -> bool {
    point.distance(center) < radius
}

/// Entity/entity test: center distance below the sum of bounding radii
#[inline]
pub fn entities_overlap(a: &Entity, b: &Entity) -> bool {
    a.pos.distance(b.pos) < a.bounding_radius() + b.bounding_radius()
}

/// Entity/region test: bounding square (side = size) against the rectangle
pub fn entity_region_overlap(entity: &Entity, region: &Region) -> bool {
    square_region_overlap(entity.pos, entity.size, region)
}

/// Box overlap between a centered square and a region
#[inline]
pub fn square_region_overlap(center: Vec2, side: f32, region: &Region) -> bool {
    let half = side / 2.0;
    center.x + half > region.x
        && center.x - half < region.right()
        && center.y + half > region.y
        && center.y - half < region.bottom()
}

/// True if a centered square lies strictly inside the region on all four sides
#[inline]
pub fn square_inside_region(center: Vec2, side: f32, region: &Region) -> bool {
    let half = side / 2.0;
    center.x - half > region.x
        && center.x + half < region.right()
        && center.y - half > region.y
        && center.y + half < region.bottom()
}

/// True if the square is fully enclosed by any region
pub fn square_inside_any(center: Vec2, side: f32, regions: &[Region]) -> bool {
    regions
        .iter()
        .any(|r| square_inside_region(center, side, r))
}

/// Indices of every region the entity overlaps, in region order
pub fn overlapping_regions<'a>(
    entity: &'a Entity,
    regions: &'a [Region],
) -> impl Iterator<Item = usize> + 'a {
    regions
        .iter()
        .enumerate()
        .filter(move |(_, r)| entity_region_overlap(entity, r))
        .map(|(i, _)| i)
}

/// All overlapping unordered pairs `(i, j)` with `i < j`, in scan order
pub fn overlapping_pairs(entities: &[Entity]) -> Vec<(usize, usize)> {
    let mut pairs = Vec::new();
    for i in 0..entities.len() {
        for j in (i + 1)..entities.len() {
            if entities_overlap(&entities[i], &entities[j]) {
                pairs.push((i, j));
            }
        }
    }
    pairs
}

/// Index of the topmost (last inserted) entity whose bounding circle holds `point`
pub fn topmost_at(entities: &[Entity], point: Vec2) -> Option<usize> {
    entities.iter().rposition(|e| e.contains_point(point))
}
