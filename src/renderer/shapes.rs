//! Shape generation for 2D primitives
//!
//! Every primitive is emitted as a triangle list.

use glam::Vec2;
use std::f32::consts::{PI, TAU};

use super::vertex::{Vertex, hsb_to_rgba};
use crate::consts::GRAY_MAX;
use crate::sim::{Region, RenderHint, ShapeKind};

/// Segments used for ball outlines
pub const CIRCLE_SEGMENTS: u32 = 24;
/// Star points
pub const STAR_POINTS: u32 = 5;

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Rotate local offsets by `angle` and translate to `center`
fn place(center: Vec2, angle: f32, local: &[Vec2]) -> Vec<Vec2> {
    let rot = Vec2::from_angle(angle);
    local.iter().map(|p| center + rot.rotate(*p)).collect()
}

/// Axis-aligned rectangle from its top-left corner
pub fn rect(x: f32, y: f32, w: f32, h: f32, color: [f32; 4]) -> Vec<Vertex> {
    vec![
        Vertex::new(x, y, color),
        Vertex::new(x + w, y, color),
        Vertex::new(x, y + h, color),
        Vertex::new(x, y + h, color),
        Vertex::new(x + w, y, color),
        Vertex::new(x + w, y + h, color),
    ]
}

/// Rotated square centered on `center`
pub fn square(center: Vec2, side: f32, angle: f32, color: [f32; 4]) -> Vec<Vertex> {
    let h = side / 2.0;
    let c = place(
        center,
        angle,
        &[
            Vec2::new(-h, -h),
            Vec2::new(h, -h),
            Vec2::new(h, h),
            Vec2::new(-h, h),
        ],
    );
    [c[0], c[1], c[3], c[3], c[1], c[2]]
        .iter()
        .map(|p| Vertex::new(p.x, p.y, color))
        .collect()
}

/// Rotated isosceles triangle inscribed in the `size` box, apex up
pub fn triangle(center: Vec2, size: f32, angle: f32, color: [f32; 4]) -> Vec<Vertex> {
    let h = size / 2.0;
    place(
        center,
        angle,
        &[Vec2::new(-h, h), Vec2::new(0.0, -h), Vec2::new(h, h)],
    )
    .iter()
    .map(|p| Vertex::new(p.x, p.y, color))
    .collect()
}

/// Rotated star: outer radius `size / 2`, inner radius `size / 4`
pub fn star(center: Vec2, size: f32, angle: f32, points: u32, color: [f32; 4]) -> Vec<Vertex> {
    let outer = size / 2.0;
    let inner = size / 4.0;
    let step = TAU / points as f32;

    // Alternate outer tips and inner notches around the rim
    let rim: Vec<Vec2> = (0..points * 2)
        .map(|i| {
            let a = i as f32 * step / 2.0;
            let r = if i % 2 == 0 { outer } else { inner };
            Vec2::new(a.cos() * r, a.sin() * r)
        })
        .collect();
    let rim = place(center, angle, &rim);

    let mut vertices = Vec::with_capacity(rim.len() * 3);
    for i in 0..rim.len() {
        let a = rim[i];
        let b = rim[(i + 1) % rim.len()];
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(a.x, a.y, color));
        vertices.push(Vertex::new(b.x, b.y, color));
    }
    vertices
}

/// Tessellate one entity; full saturation and brightness at its hue
pub fn entity(hint: &RenderHint) -> Vec<Vertex> {
    let color = hsb_to_rgba(hint.hue, 1.0, 1.0, 1.0);
    match hint.kind {
        ShapeKind::Ball => circle(hint.position, hint.size / 2.0, color, CIRCLE_SEGMENTS),
        ShapeKind::Rect => square(hint.position, hint.size, hint.angle, color),
        ShapeKind::Triangle => triangle(hint.position, hint.size, hint.angle, color),
        ShapeKind::Star => star(hint.position, hint.size, hint.angle, STAR_POINTS, color),
    }
}

/// Tessellate one background region in its gray
pub fn region(region: &Region) -> Vec<Vertex> {
    let g = (region.gray / GRAY_MAX).clamp(0.0, 1.0);
    rect(region.x, region.y, region.w, region.h, [g, g, g, 1.0])
}
