//! Audio system using Web Audio API
//!
//! Procedurally generated sound effects - no external files needed!
//! Every sound is fire-and-forget: nothing waits on playback.

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::settings::Settings;
use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Any shot on the playfield
    Gunshot,
    /// A duck was hit and drops
    Fall,
    /// A flying-away duck was hit
    Bonus,
    /// A duck gave up and flies off
    Quack,
    /// New level banner
    LevelStart,
    /// Game over
    GameOver,
}

impl SoundEffect {
    /// Sound for a simulation event, if any
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Shot => Some(SoundEffect::Gunshot),
            GameEvent::Hit { bonus: false, .. } => Some(SoundEffect::Fall),
            GameEvent::Hit { bonus: true, .. } => Some(SoundEffect::Bonus),
            GameEvent::FlyAway => Some(SoundEffect::Quack),
            GameEvent::LevelStarted(_) => Some(SoundEffect::LevelStart),
            GameEvent::GameOver { .. } => Some(SoundEffect::GameOver),
            GameEvent::ComboHit | GameEvent::LifeLost { .. } => None,
        }
    }
}

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    gain: f32,
    muted: bool,
}

impl AudioManager {
    pub fn new(settings: &Settings) -> Self {
        // Try to create audio context (may fail if not in secure context)
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            gain: settings.sfx_gain(),
            muted: false,
        }
    }

    /// Mute/unmute all audio (window focus)
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.gain }
    }

    /// Play a sound effect
    pub fn play(&self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }

        let Some(ctx) = &self.ctx else { return };

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match effect {
            SoundEffect::Gunshot => self.play_gunshot(ctx, vol),
            SoundEffect::Fall => self.play_fall(ctx, vol),
            SoundEffect::Bonus => self.play_bonus(ctx, vol),
            SoundEffect::Quack => self.play_quack(ctx, vol),
            SoundEffect::LevelStart => self.play_level_start(ctx, vol),
            SoundEffect::GameOver => self.play_game_over(ctx, vol),
        }
    }

    // === Sound generators ===

    /// Create an oscillator with gain envelope
    fn create_osc(
        &self,
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    /// Short burst sweeping `from` -> `to` Hz over `len` seconds, starting `delay` from now
    fn sweep(
        &self,
        ctx: &AudioContext,
        osc_type: OscillatorType,
        from: f32,
        to: f32,
        len: f64,
        delay: f64,
        level: f32,
    ) {
        let Some((osc, gain)) = self.create_osc(ctx, from, osc_type) else {
            return;
        };
        let t = ctx.current_time() + delay;

        gain.gain().set_value_at_time(0.0, ctx.current_time()).ok();
        gain.gain().set_value_at_time(level, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.001, t + len)
            .ok();
        osc.frequency().set_value_at_time(from, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(to, t + len)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + len + 0.02).ok();
    }

    /// Gunshot - sharp crack over a low boom
    fn play_gunshot(&self, ctx: &AudioContext, vol: f32) {
        self.sweep(ctx, OscillatorType::Square, 1800.0, 200.0, 0.04, 0.0, vol * 0.35);
        self.sweep(ctx, OscillatorType::Sawtooth, 160.0, 35.0, 0.25, 0.0, vol * 0.6);
    }

    /// Falling duck - descending whistle
    fn play_fall(&self, ctx: &AudioContext, vol: f32) {
        self.sweep(ctx, OscillatorType::Sine, 1200.0, 180.0, 0.9, 0.05, vol * 0.25);
    }

    /// Bonus - two rising notes
    fn play_bonus(&self, ctx: &AudioContext, vol: f32) {
        self.sweep(ctx, OscillatorType::Triangle, 880.0, 900.0, 0.12, 0.0, vol * 0.3);
        self.sweep(ctx, OscillatorType::Triangle, 1320.0, 1350.0, 0.18, 0.1, vol * 0.3);
    }

    /// Quack - nasal double honk
    fn play_quack(&self, ctx: &AudioContext, vol: f32) {
        self.sweep(ctx, OscillatorType::Sawtooth, 520.0, 380.0, 0.12, 0.0, vol * 0.2);
        self.sweep(ctx, OscillatorType::Sawtooth, 500.0, 340.0, 0.15, 0.16, vol * 0.2);
    }

    /// Level start - rising arpeggio
    fn play_level_start(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [523.25_f32, 659.25, 783.99].into_iter().enumerate() {
            self.sweep(ctx, OscillatorType::Square, freq, freq, 0.12, i as f64 * 0.1, vol * 0.15);
        }
    }

    /// Game over - slow descending tones
    fn play_game_over(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [392.0_f32, 311.13, 261.63].into_iter().enumerate() {
            self.sweep(ctx, OscillatorType::Triangle, freq, freq * 0.97, 0.35, i as f64 * 0.3, vol * 0.3);
        }
    }
}
