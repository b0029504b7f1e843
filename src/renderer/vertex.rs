//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    /// Floats per vertex when flattened for upload
    pub const FLOATS: usize = 6;

    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }
}

/// Flatten a vertex list into interleaved `[x, y, r, g, b, a]` floats
pub fn as_floats(vertices: &[Vertex]) -> &[f32] {
    bytemuck::cast_slice(vertices)
}

/// Convert HSB (hue in degrees, saturation and brightness in [0, 1]) to RGBA
pub fn hsb_to_rgba(hue: f32, saturation: f32, brightness: f32, alpha: f32) -> [f32; 4] {
    let h = hue.rem_euclid(360.0) / 60.0;
    let c = brightness * saturation;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = brightness - c;
    [r + m, g + m, b + m, alpha]
}

/// Colors for sketch elements
pub mod colors {
    /// Canvas background (gray 220)
    pub const BACKGROUND: [f32; 4] = [220.0 / 255.0, 220.0 / 255.0, 220.0 / 255.0, 1.0];
}
