//! Moving shape entities
//!
//! Every kind shares one kinematic and collision model: a bounding circle of
//! radius `size / 2`. Kinds only differ in rotation rate and render primitive.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::sound::Waveform;
use crate::consts::{ROTATION_SCALE, SPEED_SCALE};

/// Entity identifier (monotonic per World)
pub type EntityId = u32;

/// Shape variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ShapeKind {
    #[default]
    Ball,
    Rect,
    Triangle,
    Star,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 4] = [
        ShapeKind::Ball,
        ShapeKind::Rect,
        ShapeKind::Triangle,
        ShapeKind::Star,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeKind::Ball => "ball",
            ShapeKind::Rect => "rect",
            ShapeKind::Triangle => "triangle",
            ShapeKind::Star => "star",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "ball" | "circle" => Some(ShapeKind::Ball),
            "rect" | "rectangle" | "square" => Some(ShapeKind::Rect),
            "triangle" => Some(ShapeKind::Triangle),
            "star" => Some(ShapeKind::Star),
            _ => None,
        }
    }

    /// Oscillator waveform voiced by this kind
    pub fn waveform(&self) -> Waveform {
        match self {
            ShapeKind::Ball => Waveform::Sine,
            ShapeKind::Rect => Waveform::Square,
            ShapeKind::Triangle => Waveform::Triangle,
            ShapeKind::Star => Waveform::Sawtooth,
        }
    }

    /// Rotation added per step for a shape of the given size
    #[inline]
    pub fn rotation_rate(&self, size: f32) -> f32 {
        match self {
            ShapeKind::Ball => 0.0,
            _ => ROTATION_SCALE / size,
        }
    }
}

/// Everything a render collaborator needs to draw one entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RenderHint {
    pub kind: ShapeKind,
    pub position: Vec2,
    pub size: f32,
    pub hue: f32,
    pub angle: f32,
}

/// A moving shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub kind: ShapeKind,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Diameter of the bounding circle (side of the bounding square)
    pub size: f32,
    /// Hue in degrees, [0, 360)
    pub hue: f32,
    /// Accumulated rotation (radians)
    #[serde(default)]
    pub angle: f32,
}

impl Entity {
    /// Create a resting entity. Use [`Entity::spawn`] for a randomized velocity.
    pub fn new(id: EntityId, kind: ShapeKind, pos: Vec2, size: f32, hue: f32) -> Self {
        Self {
            id,
            kind,
            pos,
            vel: Vec2::ZERO,
            size,
            hue,
            angle: 0.0,
        }
    }

    /// Create an entity whose velocity components are drawn from `[-10/size, 10/size]`
    pub fn spawn<R: Rng + ?Sized>(
        id: EntityId,
        kind: ShapeKind,
        pos: Vec2,
        size: f32,
        hue: f32,
        rng: &mut R,
    ) -> Self {
        let mut entity = Self::new(id, kind, pos, size, hue);
        entity.vel = random_velocity(size, rng);
        entity
    }

    #[inline]
    pub fn bounding_radius(&self) -> f32 {
        self.size / 2.0
    }

    /// Integrate one frame of motion and spin
    pub fn advance(&mut self) {
        self.pos += self.vel;
        self.angle += self.kind.rotation_rate(self.size);
    }

    /// Reverse travel direction (both axes at once)
    #[inline]
    pub fn invert_velocity(&mut self) {
        self.vel = -self.vel;
    }

    /// True if `point` lies strictly inside the bounding circle
    #[inline]
    pub fn contains_point(&self, point: Vec2) -> bool {
        super::collision::point_in_circle(point, self.pos, self.bounding_radius())
    }

    pub fn render_hint(&self) -> RenderHint {
        RenderHint {
            kind: self.kind,
            position: self.pos,
            size: self.size,
            hue: self.hue,
            angle: self.angle,
        }
    }
}

/// Random per-axis velocity scaled so smaller shapes move faster
pub fn random_velocity<R: Rng + ?Sized>(size: f32, rng: &mut R) -> Vec2 {
    let bound = SPEED_SCALE / size;
    if !(bound.is_finite() && bound > 0.0) {
        return Vec2::ZERO;
    }
    Vec2::new(
        rng.random_range(-bound..=bound),
        rng.random_range(-bound..=bound),
    )
}
