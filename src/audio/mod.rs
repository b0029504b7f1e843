//! Sound sinks
//!
//! The simulation never synthesizes audio itself. It hands each `SoundEvent`
//! to an `AudioSink`, which must accept it without blocking. A sink that is not
//! ready (no audio device, suspended context, muted tab) simply gets skipped.

use crate::sim::{SoundEvent, Waveform};

#[cfg(target_arch = "wasm32")]
pub mod web;

#[cfg(target_arch = "wasm32")]
pub use web::WebAudioSink;

/// Receiver for sound events
///
/// Implementations must return promptly and must not panic. Failures are the
/// sink's own business and never reach the World.
pub trait AudioSink {
    /// Whether `trigger` would currently produce sound
    fn is_ready(&self) -> bool;

    /// Fire-and-forget playback of one event
    fn trigger(&mut self, event: &SoundEvent);

    /// Default voice for the currently selected shape kind. Events carry
    /// their own waveform, which always wins.
    fn set_default_waveform(&mut self, waveform: Waveform);
}

/// A sink with no audio device: never ready, drops everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl AudioSink for NullSink {
    fn is_ready(&self) -> bool {
        false
    }

    fn trigger(&mut self, _event: &SoundEvent) {}

    fn set_default_waveform(&mut self, _waveform: Waveform) {}
}

/// Writes every event to the log (headless runs)
#[derive(Debug, Clone, Default)]
pub struct LogSink {
    pub triggered: u64,
    pub waveform: Waveform,
}

impl AudioSink for LogSink {
    fn is_ready(&self) -> bool {
        true
    }

    fn trigger(&mut self, event: &SoundEvent) {
        self.triggered += 1;
        log::debug!(
            "note {:.1} Hz amp {:.2} harm {:.2} mod {:.2} wet {:.2} pan {:+.2} {}",
            event.frequency,
            event.amplitude,
            event.harmonicity,
            event.modulation_index,
            event.wetness,
            event.pan,
            event.waveform.as_str()
        );
    }

    fn set_default_waveform(&mut self, waveform: Waveform) {
        log::debug!("default waveform -> {}", waveform.as_str());
        self.waveform = waveform;
    }
}

/// Keeps every event in memory; readiness is switchable
#[derive(Debug, Clone)]
pub struct CaptureSink {
    pub ready: bool,
    pub events: Vec<SoundEvent>,
    pub waveform: Option<Waveform>,
}

impl Default for CaptureSink {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptureSink {
    pub fn new() -> Self {
        Self {
            ready: true,
            events: Vec::new(),
            waveform: None,
        }
    }

    /// A sink that reports itself unavailable
    pub fn offline() -> Self {
        Self {
            ready: false,
            ..Self::new()
        }
    }
}

impl AudioSink for CaptureSink {
    fn is_ready(&self) -> bool {
        self.ready
    }

    fn trigger(&mut self, event: &SoundEvent) {
        self.events.push(*event);
    }

    fn set_default_waveform(&mut self, waveform: Waveform) {
        self.waveform = Some(waveform);
    }
}

/// Volume/mute stage shared by device-backed sinks
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mixer {
    master_volume: f32,
    muted: bool,
}

impl Default for Mixer {
    fn default() -> Self {
        Self::new(0.8, false)
    }
}

impl Mixer {
    pub fn new(master_volume: f32, muted: bool) -> Self {
        Self {
            master_volume: master_volume.clamp(0.0, 1.0),
            muted,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Effective gain applied on top of an event's amplitude
    pub fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.master_volume }
    }

    /// Final peak gain for an event; the mapped amplitude is unclamped so cap it here
    pub fn peak_gain(&self, amplitude: f32) -> f32 {
        (amplitude * self.effective_volume()).clamp(0.0, 1.0)
    }
}
