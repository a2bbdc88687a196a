//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Input events (key names and swipes mapped to commands)
//! - Storage (LocalStorage on web)
//! - Drawing (2D canvas on web)

pub mod color;
pub mod input;

#[cfg(target_arch = "wasm32")]
pub mod canvas;
#[cfg(target_arch = "wasm32")]
pub mod storage;
