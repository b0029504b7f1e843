//! Static background regions
//!
//! Regions are opaque gray rectangles painted onto the background. They never
//! move; the whole set is regenerated at once.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::{GRAY_MAX, REGION_SIDE_MAX, REGION_SIDE_MIN};

/// An axis-aligned background rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    pub w: f32,
    pub h: f32,
    /// Grayscale fill, [0, 255]
    pub gray: f32,
}

impl Region {
    pub fn new(x: f32, y: f32, w: f32, h: f32, gray: f32) -> Self {
        Self { x, y, w, h, gray }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    #[inline]
    pub fn area(&self) -> f32 {
        self.w * self.h
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }
}

/// Number of regions for a percentile roll in [0, 100)
///
/// Weighted: 50% -> 20, 20% -> 15, 20% -> 10, 10% -> 5.
pub fn region_count_for_roll(roll: u32) -> usize {
    match roll {
        0..50 => 20,
        50..70 => 15,
        70..90 => 10,
        _ => 5,
    }
}

/// Generate a fresh region layout for an arena of the given size
pub fn generate_regions<R: Rng + ?Sized>(arena: Vec2, rng: &mut R) -> Vec<Region> {
    let count = region_count_for_roll(rng.random_range(0..100));

    (0..count)
        .map(|_| {
            // Draw order (gray, position, size) is part of the seeded layout
            let gray = uniform(rng, 0.0, GRAY_MAX);
            let x = uniform(rng, 0.0, arena.x);
            let y = uniform(rng, 0.0, arena.y);
            let w = uniform(rng, REGION_SIDE_MIN, REGION_SIDE_MAX);
            let h = uniform(rng, REGION_SIDE_MIN, REGION_SIDE_MAX);
            Region::new(x, y, w, h, gray)
        })
        .collect()
}

/// Half-open uniform draw that tolerates an empty range
pub(crate) fn uniform<R: Rng + ?Sized>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    if hi > lo {
        rng.random_range(lo..hi)
    } else {
        lo
    }
}
