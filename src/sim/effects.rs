//! Continuous-time visual effects
//!
//! Particles and screen shake advance by real frame time on every frame,
//! whatever the game phase. Nothing in here is read by the simulation step,
//! and it draws from its own RNG so cosmetics never perturb a replay.

use std::collections::VecDeque;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Reference frame length that particle velocities are expressed against
pub const REFERENCE_FRAME_MS: f32 = 1000.0 / 60.0;
/// Per-reference-frame velocity damping
pub const PARTICLE_DRAG: f32 = 0.97;
/// Maximum particles alive at once
pub const MAX_PARTICLES: usize = 256;

/// A cosmetic particle in canvas pixel space
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    /// Pixels per reference frame
    pub vel: Vec2,
    /// 0xRRGGBB
    pub color: u32,
    pub age: f32,
    pub lifespan: f32,
    pub radius: f32,
}

impl Particle {
    /// Fade from 1 to 0 over the lifespan
    pub fn alpha(&self) -> f32 {
        (1.0 - self.age / self.lifespan).clamp(0.0, 1.0)
    }

    pub fn is_alive(&self) -> bool {
        self.age < self.lifespan
    }
}

/// Decaying screen shake
#[derive(Debug, Clone, Default)]
pub struct ScreenShake {
    duration: f32,
    remaining: f32,
    intensity: f32,
    offset: Vec2,
}

impl ScreenShake {
    pub fn is_active(&self) -> bool {
        self.remaining > 0.0
    }

    /// Current canvas translation
    pub fn offset(&self) -> Vec2 {
        self.offset
    }
}

/// Owner of all continuous-time cosmetic state
#[derive(Debug, Clone)]
pub struct Effects {
    /// Oldest first
    pub particles: VecDeque<Particle>,
    pub shake: ScreenShake,
    rng: Pcg32,
}

impl Effects {
    pub fn new(seed: u64) -> Self {
        Self {
            particles: VecDeque::new(),
            shake: ScreenShake::default(),
            rng: Pcg32::seed_from_u64(seed ^ 0x5eed_cafe),
        }
    }

    /// Drop everything (on restart)
    pub fn clear(&mut self) {
        self.particles.clear();
        self.shake = ScreenShake::default();
    }

    /// Ring of `count` particles bursting out of `origin`
    pub fn burst(&mut self, origin: Vec2, color: u32, count: usize) {
        use std::f32::consts::TAU;

        for i in 0..count {
            if self.particles.len() >= MAX_PARTICLES {
                // Remove oldest to make room
                self.particles.pop_front();
            }
            let angle =
                TAU * i as f32 / count as f32 + (self.rng.random::<f32>() - 0.5) * 0.5;
            let speed = 1.0 + self.rng.random::<f32>() * 2.5;
            self.particles.push_back(Particle {
                pos: origin,
                vel: Vec2::new(angle.cos(), angle.sin()) * speed,
                color,
                age: 0.0,
                lifespan: 400.0 + self.rng.random::<f32>() * 200.0,
                radius: 2.0 + self.rng.random::<f32>() * 2.0,
            });
        }
    }

    /// Start a shake, replacing any running one
    pub fn start_shake(&mut self, duration_ms: f32, intensity: f32) {
        self.shake = ScreenShake {
            duration: duration_ms,
            remaining: duration_ms,
            intensity,
            offset: Vec2::ZERO,
        };
    }

    /// Advance by `dt` milliseconds of real time
    pub fn advance(&mut self, dt: f32) {
        let dt = dt.max(0.0);
        let frames = dt / REFERENCE_FRAME_MS;
        let drag = PARTICLE_DRAG.powf(frames);

        for p in self.particles.iter_mut() {
            p.age += dt;
            p.pos += p.vel * frames;
            p.vel *= drag;
        }
        self.particles.retain(Particle::is_alive);

        let shake = &mut self.shake;
        shake.remaining = (shake.remaining - dt).max(0.0);
        if shake.remaining > 0.0 && shake.duration > 0.0 {
            let strength = shake.intensity * shake.remaining / shake.duration;
            shake.offset = Vec2::new(
                (self.rng.random::<f32>() - 0.5) * 2.0 * strength,
                (self.rng.random::<f32>() - 0.5) * 2.0 * strength,
            );
        } else {
            shake.offset = Vec2::ZERO;
        }
    }
}

/// Apple glow breathing, in pixels (time in ms)
pub fn apple_pulse(time: f64) -> f32 {
    ((time / 200.0).sin() * 1.5) as f32
}

/// Slow 0..1 blink used for prompts and fields (time in ms)
pub fn blink(time: f64) -> f32 {
    (0.5 + 0.5 * (time / 400.0).sin()) as f32
}
