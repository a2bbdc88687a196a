//! Snake Arcade - grid snake with power-ups and obstacles
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, collisions, spawning, effects)
//! - `game`: Phase state machine and frame driver
//! - `platform`: Browser input mapping, canvas drawing and storage
//! - `persistence`: Key-value storage abstraction
//! - `config`: Data-driven game balance

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod config;
pub mod game;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;

pub use config::GameConfig;
pub use game::{AudioCue, Command, Game, InputSource, TickPolicy};
pub use highscores::HighScore;
pub use persistence::{KeyValueStore, MemoryStore};
pub use settings::Settings;
