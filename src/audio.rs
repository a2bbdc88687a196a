//! Audio system using Web Audio API
//!
//! Sound effects are procedural oscillators; background music streams from
//! a looping `<audio>` element.

use web_sys::{AudioContext, GainNode, HtmlAudioElement, OscillatorNode, OscillatorType};

use crate::game::AudioCue;

const MUSIC_URL: &str = "./sounds/md-ost.mp3";
const MUSIC_VOLUME: f64 = 0.3;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Apple eaten
    Eat,
    /// Fatal collision
    Fail,
}

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    music: Option<HtmlAudioElement>,
    sfx_volume: f32,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        // Try to create audio context (may fail if not in secure context)
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - sound effects disabled");
        }

        let music = HtmlAudioElement::new_with_src(MUSIC_URL).ok();
        match &music {
            Some(el) => {
                el.set_loop(true);
                el.set_volume(MUSIC_VOLUME);
            }
            None => log::warn!("Failed to create music element - music disabled"),
        }

        Self {
            ctx,
            music,
            sfx_volume: 0.8,
            muted: false,
        }
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        if let Some(music) = &self.music {
            music.set_muted(muted);
        }
    }

    /// Act on one cue from the game's outbox
    pub fn play_cue(&self, cue: AudioCue) {
        match cue {
            AudioCue::Eat => self.play(SoundEffect::Eat),
            AudioCue::GameOver => self.play(SoundEffect::Fail),
            AudioCue::MusicStart { rewind } => self.start_music(rewind),
            AudioCue::MusicStop => self.stop_music(),
        }
    }

    fn start_music(&self, rewind: bool) {
        let Some(music) = &self.music else { return };
        if rewind {
            music.set_current_time(0.0);
        }
        // Autoplay is blocked until the first user gesture
        if music.play().is_err() {
            log::debug!("Music playback refused");
        }
    }

    fn stop_music(&self) {
        if let Some(music) = &self.music {
            let _ = music.pause();
        }
    }

    /// Play a sound effect
    pub fn play(&self, effect: SoundEffect) {
        if self.muted || self.sfx_volume <= 0.0 {
            return;
        }
        let vol = self.sfx_volume;

        let Some(ctx) = &self.ctx else { return };

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match effect {
            SoundEffect::Eat => self.play_eat(ctx, vol),
            SoundEffect::Fail => self.play_fail(ctx, vol),
        }
    }

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

    /// Eat - short rising chirp
    fn play_eat(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 520.0, OscillatorType::Square) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.2, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.12)
            .ok();
        osc.frequency().set_value_at_time(520.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(1040.0, t + 0.08)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.15).ok();
    }

    /// Fail - descending buzz over a low thump
    fn play_fail(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [400.0, 300.0, 200.0].iter().enumerate() {
            let delay = i as f64 * 0.15;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Sawtooth) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.25, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.25)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.3).ok();
            }
        }

        if let Some((osc, gain)) = self.create_osc(ctx, 70.0, OscillatorType::Sine) {
            let t = ctx.current_time();
            gain.gain().set_value_at_time(vol * 0.4, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.3)
                .ok();
            osc.frequency().set_value_at_time(70.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(35.0, t + 0.3)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.35).ok();
        }
    }
}
