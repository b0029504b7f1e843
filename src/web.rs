//! Browser front
//!
//! Exposes the World to JavaScript. The page owns the canvas, the
//! animation-frame loop and the DOM controls; it calls `step()` once per frame
//! and uploads `vertices()` to whatever 2D/GL context it draws with.

use glam::Vec2;
use wasm_bindgen::prelude::*;

use crate::audio::{AudioSink, Mixer, WebAudioSink};
use crate::consts::AUDIO_STATUS_POLL_FRAMES;
use crate::interaction::RecordTarget;
use crate::renderer::{self, vertex::colors};
use crate::settings::Settings;
use crate::sim::{PointerOutcome, ShapeKind, StepReport, World};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        // Logger already installed by an earlier module instance
        return;
    }
    log::info!("Sonic Shapes starting...");
}

/// One running sketch: world, audio and frame bookkeeping
#[wasm_bindgen]
pub struct Sketch {
    world: World,
    audio: WebAudioSink,
    settings: Settings,
    totals: StepReport,
    audio_ready: bool,
}

#[wasm_bindgen]
impl Sketch {
    /// Build from stored settings, sized to the canvas
    #[wasm_bindgen(constructor)]
    pub fn new(width: f32, height: f32) -> Sketch {
        let mut settings = Settings::load();
        settings.width = width;
        settings.height = height;

        let mut audio = WebAudioSink::new(Mixer::new(settings.master_volume, settings.muted));
        let world = settings.build_world(&mut audio);
        log::info!(
            "Sketch {}x{} with {} regions",
            width,
            height,
            world.regions().len()
        );

        Sketch {
            world,
            audio,
            settings,
            totals: StepReport::default(),
            audio_ready: false,
        }
    }

    /// Advance one frame
    pub fn step(&mut self) {
        let report = self.world.step(&mut self.audio);
        self.totals.absorb(&report);

        if self.world.frame() % AUDIO_STATUS_POLL_FRAMES == 0 {
            self.poll_audio_status();
        }
    }

    /// Pointer press on the canvas. Also unlocks audio, since browsers only
    /// start an AudioContext from a user gesture.
    pub fn pointer_down(&mut self, x: f32, y: f32) -> String {
        self.activate_audio();
        match self.world.pointer_down(Vec2::new(x, y)) {
            PointerOutcome::Removed(_) => "removed",
            PointerOutcome::Added(_) => "added",
            PointerOutcome::Blocked => "blocked",
        }
        .to_string()
    }

    /// Shape dropdown; returns false for an unknown name
    pub fn select_kind(&mut self, name: &str) -> bool {
        let Some(kind) = ShapeKind::from_str(name) else {
            log::warn!("Unknown shape kind '{name}'");
            return false;
        };
        self.world.select_kind(kind, &mut self.audio);
        self.settings.shape = kind;
        self.settings.save();
        true
    }

    pub fn set_size(&mut self, size: f32) {
        self.world.set_size(size);
        self.settings.size = size;
        self.settings.save();
    }

    pub fn set_hue(&mut self, hue: f32) {
        self.world.set_hue(hue);
        self.settings.hue = hue;
        self.settings.save();
    }

    pub fn add_random_shape(&mut self) {
        self.activate_audio();
        self.world.add_random_shape(&mut self.audio);
    }

    pub fn reset(&mut self) {
        self.world.reset();
    }

    pub fn update_sketch(&mut self) {
        self.world.update_sketch();
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.world.resize(width, height);
    }

    pub fn toggle_video_recording(&mut self) -> bool {
        self.world.toggle_recording(RecordTarget::Video)
    }

    pub fn toggle_audio_recording(&mut self) -> bool {
        self.world.toggle_recording(RecordTarget::Audio)
    }

    pub fn set_master_volume(&mut self, volume: f32) {
        self.audio.mixer_mut().set_master_volume(volume);
        self.settings.master_volume = volume;
        self.settings.save();
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.audio.mixer_mut().set_muted(muted);
        self.settings.muted = muted;
        self.settings.save();
    }

    /// Resume the audio context and apply the selected voice
    pub fn activate_audio(&mut self) {
        self.audio.resume();
        self.poll_audio_status();
    }

    pub fn audio_ready(&self) -> bool {
        self.audio_ready
    }

    /// Oscillator type of the selected shape kind, for the voice indicator
    pub fn voice(&self) -> String {
        self.audio.default_waveform().as_str().to_string()
    }

    /// Interleaved `[x, y, r, g, b, a]` triangle list for the whole frame
    pub fn vertices(&self) -> Vec<f32> {
        renderer::as_floats(&renderer::scene_vertices(&self.world)).to_vec()
    }

    pub fn background_color(&self) -> Vec<f32> {
        colors::BACKGROUND.to_vec()
    }

    pub fn entity_count(&self) -> usize {
        self.world.entities().len()
    }

    pub fn region_count(&self) -> usize {
        self.world.regions().len()
    }

    pub fn sounds_emitted(&self) -> u32 {
        self.totals.sounds_emitted
    }

    /// Draw list as JSON for pages that render shapes themselves
    pub fn render_hints_json(&self) -> String {
        serde_json::to_string(&self.world.render_hints()).unwrap_or_else(|e| {
            log::warn!("Failed to encode render hints: {e}");
            "[]".to_string()
        })
    }

    pub fn interaction_log_json(&self) -> String {
        self.world.interaction_log().to_json()
    }
}

impl Sketch {
    /// Track context state changes; re-voice the sink once it comes up
    fn poll_audio_status(&mut self) {
        let ready = self.audio.is_ready();
        if ready == self.audio_ready {
            return;
        }
        self.audio_ready = ready;
        if ready {
            log::info!("Audio running");
            let waveform = self.world.selection().kind.waveform();
            self.audio.set_default_waveform(waveform);
        } else {
            log::warn!("Audio suspended - sketch continues silently");
        }
    }
}
