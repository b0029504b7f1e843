//! Web Audio sink
//!
//! Two-operator FM voice per note: a modulator oscillator drives the
//! carrier's frequency, the carrier runs through a dry path and a feedback
//! delay (the "room"), and both land on a stereo panner.

use web_sys::{
    AudioContext, AudioContextState, AudioNode, GainNode, OscillatorNode, OscillatorType,
    StereoPannerNode,
};

use super::{AudioSink, Mixer};
use crate::consts::NOTE_DURATION_SECS;
use crate::sim::{SoundEvent, Waveform};

/// Echo spacing for the wet path (seconds)
const ROOM_DELAY_SECS: f64 = 0.09;
/// Feedback gain of the room loop
const ROOM_FEEDBACK: f32 = 0.45;
/// Tail left after release before oscillators stop
const RELEASE_TAIL_SECS: f64 = 1.5;

fn oscillator_type(waveform: Waveform) -> OscillatorType {
    match waveform {
        Waveform::Sine => OscillatorType::Sine,
        Waveform::Square => OscillatorType::Square,
        Waveform::Triangle => OscillatorType::Triangle,
        Waveform::Sawtooth => OscillatorType::Sawtooth,
    }
}

/// Audio sink backed by a browser `AudioContext`
pub struct WebAudioSink {
    ctx: Option<AudioContext>,
    mixer: Mixer,
    default_waveform: Waveform,
}

impl WebAudioSink {
    pub fn new(mixer: Mixer) -> Self {
        // May fail outside a secure context
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            mixer,
            default_waveform: Waveform::Sine,
        }
    }

    /// Resume the context (browsers require a user gesture first)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            if ctx.resume().is_err() {
                log::warn!("AudioContext resume rejected");
            }
        }
    }

    pub fn mixer_mut(&mut self) -> &mut Mixer {
        &mut self.mixer
    }

    pub fn default_waveform(&self) -> Waveform {
        self.default_waveform
    }

    fn create_osc(&self, ctx: &AudioContext, freq: f32, waveform: Waveform) -> Option<OscillatorNode> {
        let osc = ctx.create_oscillator().ok()?;
        osc.set_type(oscillator_type(waveform));
        osc.frequency().set_value(freq);
        Some(osc)
    }

    fn create_gain(&self, ctx: &AudioContext, value: f32) -> Option<GainNode> {
        let gain = ctx.create_gain().ok()?;
        gain.gain().set_value(value);
        Some(gain)
    }

    /// Dry + wet (feedback delay) routing into the panner
    fn create_room(
        &self,
        ctx: &AudioContext,
        input: &AudioNode,
        wetness: f32,
        panner: &StereoPannerNode,
    ) -> Option<()> {
        let wet = wetness.clamp(0.0, 1.0);

        let dry = self.create_gain(ctx, 1.0 - wet)?;
        input.connect_with_audio_node(&dry).ok()?;
        dry.connect_with_audio_node(panner).ok()?;

        let delay = ctx.create_delay().ok()?;
        delay.delay_time().set_value(ROOM_DELAY_SECS as f32);
        let feedback = self.create_gain(ctx, ROOM_FEEDBACK)?;
        let send = self.create_gain(ctx, wet)?;
        input.connect_with_audio_node(&delay).ok()?;
        delay.connect_with_audio_node(&feedback).ok()?;
        feedback.connect_with_audio_node(&delay).ok()?;
        delay.connect_with_audio_node(&send).ok()?;
        send.connect_with_audio_node(panner).ok()?;
        Some(())
    }

    fn play(&self, ctx: &AudioContext, event: &SoundEvent) -> Option<()> {
        let peak = self.mixer.peak_gain(event.amplitude);
        if peak <= 0.0 {
            return Some(());
        }
        let t = ctx.current_time();
        let note = NOTE_DURATION_SECS as f64;

        // Modulator -> carrier.frequency (depth in Hz = mod freq * index)
        let mod_freq = event.frequency * event.harmonicity;
        let modulator = self.create_osc(ctx, mod_freq, Waveform::Sine)?;
        let depth = self.create_gain(ctx, mod_freq * event.modulation_index)?;
        let carrier = self.create_osc(ctx, event.frequency, event.waveform)?;
        modulator.connect_with_audio_node(&depth).ok()?;
        depth.connect_with_audio_param(&carrier.frequency()).ok()?;

        // Envelope
        let env = self.create_gain(ctx, 0.0)?;
        carrier.connect_with_audio_node(&env).ok()?;
        env.gain().set_value_at_time(0.0001, t).ok()?;
        env.gain().exponential_ramp_to_value_at_time(peak, t + 0.01).ok()?;
        env.gain()
            .exponential_ramp_to_value_at_time(0.0001, t + note)
            .ok()?;

        let panner = ctx.create_stereo_panner().ok()?;
        panner.pan().set_value(event.pan.clamp(-1.0, 1.0));
        panner.connect_with_audio_node(&ctx.destination()).ok()?;
        self.create_room(ctx, &env, event.wetness, &panner)?;

        modulator.start().ok()?;
        carrier.start().ok()?;
        modulator.stop_with_when(t + note + RELEASE_TAIL_SECS).ok()?;
        carrier.stop_with_when(t + note + RELEASE_TAIL_SECS).ok()?;
        Some(())
    }
}

impl AudioSink for WebAudioSink {
    fn is_ready(&self) -> bool {
        self.ctx
            .as_ref()
            .is_some_and(|ctx| ctx.state() == AudioContextState::Running)
    }

    fn trigger(&mut self, event: &SoundEvent) {
        let Some(ctx) = &self.ctx else { return };
        if self.play(ctx, event).is_none() {
            log::warn!("Sound trigger failed ({:.1} Hz)", event.frequency);
        }
    }

    /// Tracked for the page's voice indicator; `play` uses the event's waveform
    fn set_default_waveform(&mut self, waveform: Waveform) {
        log::debug!("default voice {}", waveform.as_str());
        self.default_waveform = waveform;
    }
}
