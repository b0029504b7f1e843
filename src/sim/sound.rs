//! Collision-to-sound parameter mapping
//!
//! A pure function of the struck region, the striking entity and the arena
//! size. Every numeric output is an unclamped linear re-map, so the mapping is
//! total over finite inputs.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::region::Region;
use super::shape::Entity;
use crate::consts::*;
use crate::map_range;

/// Oscillator waveform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Waveform {
    #[default]
    Sine,
    Square,
    Triangle,
    Sawtooth,
}

impl Waveform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Waveform::Sine => "sine",
            Waveform::Square => "square",
            Waveform::Triangle => "triangle",
            Waveform::Sawtooth => "sawtooth",
        }
    }
}

/// Synthesis parameters for one triggered note
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SoundEvent {
    /// Carrier frequency (Hz), from the region's left edge
    pub frequency: f32,
    /// Peak level, from the region's top edge (higher on screen = louder)
    pub amplitude: f32,
    /// FM modulator/carrier ratio, from the region's gray value
    pub harmonicity: f32,
    /// FM depth, from the entity's hue
    pub modulation_index: f32,
    /// Reverb mix, from the region's area
    pub wetness: f32,
    /// Stereo position in [-1, 1], from the edge the entity approached
    pub pan: f32,
    pub waveform: Waveform,
}

/// Map a region strike to sound parameters
pub fn map_sound(region: &Region, entity: &Entity, arena: Vec2) -> SoundEvent {
    let frequency = map_range(region.x, 0.0, arena.x, FREQ_MIN, FREQ_MAX);
    let amplitude = map_range(region.y, 0.0, arena.y, AMP_TOP, AMP_BOTTOM);
    let harmonicity = map_range(region.gray, 0.0, GRAY_MAX, HARMONICITY_MIN, HARMONICITY_MAX);
    let modulation_index = map_range(entity.hue, 0.0, HUE_MAX, MOD_INDEX_MIN, MOD_INDEX_MAX);
    let wetness = map_range(region.area(), 0.0, WET_AREA_MAX, 0.0, 1.0);

    // Pan toward the edge the entity came in from
    let edge = if entity.pos.x < region.x {
        region.x
    } else {
        region.right()
    };
    let pan = map_range(edge, 0.0, arena.x, -1.0, 1.0);

    SoundEvent {
        frequency,
        amplitude,
        harmonicity,
        modulation_index,
        wetness,
        pan,
        waveform: entity.kind.waveform(),
    }
}
