//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time is passed in, never read from an ambient clock
//! - Seeded RNG only
//! - No rendering, storage or platform dependencies

pub mod collision;
pub mod effects;
pub mod grid;
pub mod powerup;
pub mod progression;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use collision::{Collision, Occupancy, detect_collision, find_free_cell};
pub use effects::{Effects, Particle, ScreenShake};
pub use grid::{Cell, Heading};
pub use progression::{Step, StepTable};
pub use snapshot::{EffectView, FieldView, Snapshot};
pub use state::{
    APPLE_COLOR, ActiveEffect, GameEvent, GamePhase, GameState, PowerUpField, PowerUpKind, Snake,
};
pub use tick::tick;
