//! Power-up spawn, pickup and expiry
//!
//! Timers are plain comparisons against the simulation clock passed into each
//! tick, so a collected field needs no timer cancellation.

use rand::Rng;

use super::state::{ActiveEffect, GameEvent, GameState, PowerUpField, PowerUpKind};
use crate::config::GameConfig;

/// Roll for a new field after an apple is eaten.
///
/// Needs no live field, a minimum score and a successful draw. Placement
/// failure skips the spawn silently.
pub fn try_spawn_field(
    state: &mut GameState,
    config: &GameConfig,
    now: f64,
    events: &mut Vec<GameEvent>,
) {
    if state.power_up.is_some() || state.score < config.powerup_min_score {
        return;
    }
    let chance = config.powerup_chance;
    if chance.is_nan() || chance <= 0.0 || !state.rng().random_bool(chance.min(1.0)) {
        return;
    }

    let kind = PowerUpKind::ALL[state.rng().random_range(0..PowerUpKind::ALL.len())];
    let Some(cell) = state.random_free_cell(config) else {
        log::debug!("Skipped {} power-up spawn: board full", kind.name());
        return;
    };

    state.power_up = Some(PowerUpField {
        cell,
        kind,
        spawn_time: now,
    });
    events.push(GameEvent::PowerUpSpawned { cell, kind });
}

/// Pick up the field if the head is on it
pub fn collect_field(
    state: &mut GameState,
    config: &GameConfig,
    now: f64,
    events: &mut Vec<GameEvent>,
) {
    let Some(field) = state.power_up else {
        return;
    };
    if field.cell != state.snake.head {
        return;
    }
    apply(state, config, field.kind, now);
    state.power_up = None;
    events.push(GameEvent::PowerUpCollected {
        cell: field.cell,
        kind: field.kind,
    });
}

/// Apply a power-up's effect
pub fn apply(state: &mut GameState, config: &GameConfig, kind: PowerUpKind, now: f64) {
    match kind {
        PowerUpKind::Shrink => {
            state
                .snake
                .shrink(config.shrink_amount, config.min_tail_length);
        }
        PowerUpKind::Slow | PowerUpKind::X2 => {
            // A new effect replaces whatever was running
            state.active_effect = Some(ActiveEffect {
                kind,
                expiry_time: now + config.powerup_effect_duration_ms,
            });
            if kind == PowerUpKind::Slow {
                state.speed = slowed_speed(config, state.base_speed);
            }
        }
    }
}

/// Half the base speed, floored
pub fn slowed_speed(config: &GameConfig, base_speed: u32) -> u32 {
    (base_speed / 2).max(config.slow_speed_floor)
}

/// Drop a stale field and an expired effect
pub fn expire(state: &mut GameState, config: &GameConfig, now: f64, events: &mut Vec<GameEvent>) {
    if let Some(field) = state.power_up
        && now - field.spawn_time > config.powerup_field_duration_ms
    {
        state.power_up = None;
        events.push(GameEvent::PowerUpExpired { kind: field.kind });
    }

    if let Some(effect) = state.active_effect
        && now > effect.expiry_time
    {
        if effect.kind == PowerUpKind::Slow {
            state.speed = state.base_speed;
        }
        state.active_effect = None;
        events.push(GameEvent::EffectExpired { kind: effect.kind });
    }
}

/// Fraction of the field's life left, 1.0 when fresh
pub fn field_life_fraction(field: &PowerUpField, config: &GameConfig, now: f64) -> f32 {
    if config.powerup_field_duration_ms <= 0.0 {
        return 0.0;
    }
    let left = 1.0 - (now - field.spawn_time) / config.powerup_field_duration_ms;
    left.clamp(0.0, 1.0) as f32
}

/// Milliseconds left on an effect
pub fn effect_remaining_ms(effect: &ActiveEffect, now: f64) -> f64 {
    (effect.expiry_time - now).max(0.0)
}
