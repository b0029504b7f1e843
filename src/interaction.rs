//! Interaction log
//!
//! Append-only record of user actions, kept for export by an external
//! collaborator. Each record snapshots the selection at the time of the action.

use serde::{Deserialize, Serialize};

use crate::platform::now_ms;
use crate::sim::ShapeKind;

/// Capture targets that can be toggled on and off
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordTarget {
    Video,
    Audio,
}

/// What happened
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InteractionKind {
    /// Shape placed by pointer or API
    Added { x: f32, y: f32 },
    /// Shape placed by the random-shape action
    RandomAdded { x: f32, y: f32 },
    /// Shape picked off the canvas
    Removed { x: f32, y: f32 },
    /// Pointer pressed inside the arena
    PointerDown { x: f32, y: f32 },
    /// Active shape kind changed
    ShapeSelected,
    /// Size or hue slider moved
    SliderChanged,
    /// Shapes cleared
    Reset,
    /// Shapes cleared and background regenerated
    SketchUpdated,
    /// Background regions regenerated
    RegionsRegenerated { count: usize },
    RecordingStarted(RecordTarget),
    RecordingStopped(RecordTarget),
}

impl InteractionKind {
    /// Short label used in exports
    pub fn label(&self) -> &'static str {
        match self {
            InteractionKind::Added { .. } => "Shape added",
            InteractionKind::RandomAdded { .. } => "Random shape added",
            InteractionKind::Removed { .. } => "Shape removed",
            InteractionKind::PointerDown { .. } => "Mouse pressed",
            InteractionKind::ShapeSelected => "Shape selected",
            InteractionKind::SliderChanged => "Slider change",
            InteractionKind::Reset => "Sketch reset",
            InteractionKind::SketchUpdated => "Sketch updated",
            InteractionKind::RegionsRegenerated { .. } => "Regions regenerated",
            InteractionKind::RecordingStarted(RecordTarget::Video) => "Video recording started",
            InteractionKind::RecordingStopped(RecordTarget::Video) => "Video recording stopped",
            InteractionKind::RecordingStarted(RecordTarget::Audio) => "Audio recording started",
            InteractionKind::RecordingStopped(RecordTarget::Audio) => "Audio recording stopped",
        }
    }
}

/// A single log entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionRecord {
    /// Unix timestamp (ms)
    pub timestamp_ms: f64,
    pub kind: InteractionKind,
    pub shape: ShapeKind,
    pub size: f32,
    pub hue: f32,
}

/// Append-only interaction log
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InteractionLog {
    pub entries: Vec<InteractionRecord>,
}

impl InteractionLog {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Append a record stamped with the current time
    pub fn record(&mut self, kind: InteractionKind, shape: ShapeKind, size: f32, hue: f32) {
        log::debug!("interaction: {} ({}, size {size:.1}, hue {hue:.1})", kind.label(), shape.as_str());
        self.entries.push(InteractionRecord {
            timestamp_ms: now_ms(),
            kind,
            shape,
            size,
            hue,
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&InteractionRecord> {
        self.entries.last()
    }

    /// Number of records of a given kind (compared by variant, ignoring payload)
    pub fn count_of(&self, kind: &InteractionKind) -> usize {
        let wanted = std::mem::discriminant(kind);
        self.entries
            .iter()
            .filter(|e| std::mem::discriminant(&e.kind) == wanted)
            .count()
    }

    /// Hand the accumulated records to an exporter, leaving the log empty
    pub fn drain(&mut self) -> Vec<InteractionRecord> {
        std::mem::take(&mut self.entries)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.entries).unwrap_or_else(|e| {
            log::warn!("Failed to serialize interaction log: {e}");
            "[]".to_string()
        })
    }
}
