//! Sonic Shapes - bouncing shapes that sonify a random background
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, regions, collisions, sound mapping)
//! - `audio`: Sound sinks that consume the simulation's sound events
//! - `interaction`: Append-only interaction log
//! - `renderer`: CPU tessellation of render hints into vertex lists
//! - `platform`: Browser/native platform abstraction
//! - `settings`: User-tunable configuration

pub mod audio;
pub mod interaction;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use audio::{AudioSink, CaptureSink, LogSink, NullSink};
pub use interaction::{InteractionKind, InteractionLog, InteractionRecord};
pub use settings::Settings;

/// Sketch configuration constants
pub mod consts {
    /// Default arena dimensions (window minus the control strip)
    pub const DEFAULT_ARENA_WIDTH: f32 = 1280.0;
    pub const DEFAULT_ARENA_HEIGHT: f32 = 620.0;

    /// Shape size slider range
    pub const SIZE_MIN: f32 = 5.0;
    pub const SIZE_MAX: f32 = 25.0;
    pub const DEFAULT_SIZE: f32 = 25.0;

    /// Hue slider range (degrees)
    pub const HUE_MAX: f32 = 360.0;
    pub const DEFAULT_HUE: f32 = 180.0;

    /// Per-axis speed bound is SPEED_SCALE / size (small shapes move faster)
    pub const SPEED_SCALE: f32 = 10.0;
    /// Per-step rotation is ROTATION_SCALE / size (balls don't rotate)
    pub const ROTATION_SCALE: f32 = 0.05;

    /// Placement retries before accepting an overlapping candidate
    pub const MAX_PLACEMENT_ATTEMPTS: u32 = 100;

    /// Background region side length range
    pub const REGION_SIDE_MIN: f32 = 20.0;
    pub const REGION_SIDE_MAX: f32 = 50.0;
    /// Grayscale attribute range
    pub const GRAY_MAX: f32 = 255.0;

    /// Sound mapping ranges
    pub const FREQ_MIN: f32 = 60.0;
    pub const FREQ_MAX: f32 = 3600.0;
    pub const AMP_TOP: f32 = 1.0;
    pub const AMP_BOTTOM: f32 = 0.1;
    pub const HARMONICITY_MIN: f32 = 0.1;
    pub const HARMONICITY_MAX: f32 = 1.0;
    pub const MOD_INDEX_MIN: f32 = 0.1;
    pub const MOD_INDEX_MAX: f32 = 1.0;
    /// Region area that maps to a fully wet signal (largest region is 50x50)
    pub const WET_AREA_MAX: f32 = REGION_SIDE_MAX * REGION_SIDE_MAX;

    /// Note length: an eighth note at 120 BPM
    pub const NOTE_DURATION_SECS: f32 = 0.25;
    /// Frames between audio readiness polls in the browser front (~5 s at 60 fps)
    pub const AUDIO_STATUS_POLL_FRAMES: u64 = 300;
}

/// Linearly re-map `value` from `[in_lo, in_hi]` onto `[out_lo, out_hi]`.
///
/// Not clamped: inputs outside the source range extrapolate. A zero-width
/// source range maps everything to `out_lo`.
#[inline]
pub fn map_range(value: f32, in_lo: f32, in_hi: f32, out_lo: f32, out_hi: f32) -> f32 {
    let span = in_hi - in_lo;
    if span == 0.0 {
        return out_lo;
    }
    out_lo + (value - in_lo) * (out_hi - out_lo) / span
}

/// Clamp without panicking when `lo > hi` (arena smaller than the shape).
#[inline]
pub fn clamp_axis(value: f32, lo: f32, hi: f32) -> f32 {
    value.max(lo).min(hi)
}
