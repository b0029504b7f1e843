//! Deterministic simulation module
//!
//! All sketch logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Stable iteration order (insertion order)
//! - No rendering, audio device or platform dependencies

pub mod collision;
pub mod reflect;
pub mod region;
pub mod shape;
pub mod sound;
pub mod state;
pub mod tick;

pub use collision::{entities_overlap, entity_region_overlap, square_inside_region};
pub use reflect::{EdgeHit, reflect_edges};
pub use region::{Region, generate_regions, region_count_for_roll};
pub use shape::{Entity, EntityId, RenderHint, ShapeKind};
pub use sound::{SoundEvent, Waveform, map_sound};
pub use state::{Placement, PointerOutcome, RecordingState, Selection, World};
pub use tick::{StepReport, step};
