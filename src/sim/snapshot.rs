//! Read-only per-frame view handed to the renderer

use std::collections::VecDeque;

use glam::Vec2;

use super::effects::{Effects, Particle};
use super::grid::{Cell, Heading};
use super::powerup::{effect_remaining_ms, field_life_fraction};
use super::progression::background_tier;
use super::state::{GamePhase, GameState, PowerUpKind};
use crate::config::GameConfig;

/// Live field as the renderer sees it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldView {
    pub cell: Cell,
    pub kind: PowerUpKind,
    /// 1.0 fresh, 0.0 about to vanish
    pub life_fraction: f32,
}

/// Running effect as the renderer sees it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectView {
    pub kind: PowerUpKind,
    pub remaining_ms: f64,
}

/// Everything needed to draw one frame. Borrowed; the renderer cannot mutate.
#[derive(Debug, Clone)]
pub struct Snapshot<'a> {
    pub phase: GamePhase,
    pub tile_count: i32,
    pub tile_size: f32,
    pub cell_size: f32,
    pub head: Cell,
    pub heading: Heading,
    /// Oldest first
    pub body: &'a VecDeque<Cell>,
    pub apple: Cell,
    pub obstacles: &'a [Cell],
    pub power_up: Option<FieldView>,
    pub active_effect: Option<EffectView>,
    pub particles: &'a VecDeque<Particle>,
    pub score: u32,
    pub high_score: u32,
    pub background_tier: u32,
    pub shake_offset: Vec2,
    pub muted: bool,
    /// Frame timestamp (ms), for pulsing cues
    pub time: f64,
}

impl<'a> Snapshot<'a> {
    pub fn capture(
        state: &'a GameState,
        effects: &'a Effects,
        config: &GameConfig,
        high_score: u32,
        muted: bool,
        now: f64,
    ) -> Self {
        Self {
            phase: state.phase,
            tile_count: config.tile_count,
            tile_size: config.tile_size(),
            cell_size: config.cell_size(),
            head: state.snake.head,
            heading: state.snake.heading,
            body: &state.snake.body,
            apple: state.apple,
            obstacles: &state.obstacles,
            power_up: state.power_up.map(|field| FieldView {
                cell: field.cell,
                kind: field.kind,
                life_fraction: field_life_fraction(&field, config, now),
            }),
            active_effect: state.active_effect.map(|effect| EffectView {
                kind: effect.kind,
                remaining_ms: effect_remaining_ms(&effect, now),
            }),
            particles: &effects.particles,
            score: state.score,
            high_score,
            background_tier: background_tier(config, state.score),
            shake_offset: effects.shake.offset(),
            muted,
            time: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{ActiveEffect, PowerUpField};

    #[test]
    fn test_capture_reports_timers() {
        let config = GameConfig::default();
        let mut state = GameState::new(&config, 1);
        state.score = 7;
        state.power_up = Some(PowerUpField {
            cell: Cell::new(2, 2),
            kind: PowerUpKind::Shrink,
            spawn_time: 0.0,
        });
        state.active_effect = Some(ActiveEffect {
            kind: PowerUpKind::X2,
            expiry_time: 5000.0,
        });
        let effects = Effects::new(1);

        let snap = Snapshot::capture(&state, &effects, &config, 11, true, 3500.0);
        assert_eq!(snap.phase, GamePhase::Menu);
        assert_eq!(snap.tile_count, 20);
        assert_eq!(snap.background_tier, 2);
        assert_eq!(snap.high_score, 11);
        assert!(snap.muted);
        let field = snap.power_up.expect("field");
        assert!((field.life_fraction - 0.5).abs() < 1e-6);
        let effect = snap.active_effect.expect("effect");
        assert_eq!(effect.remaining_ms, 1500.0);
        assert_eq!(snap.shake_offset, Vec2::ZERO);
    }
}
