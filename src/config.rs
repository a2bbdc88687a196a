//! Game configuration
//!
//! Built once at startup and handed by reference to everything that needs it.
//! Derived sizes are computed on construction, never recomputed on access.

use serde::{Deserialize, Serialize};

use crate::sim::grid::Cell;
use crate::sim::progression::StepTable;

/// LocalStorage key for the persisted high score
pub const HIGH_SCORE_KEY: &str = "snakeHighScore";
/// LocalStorage key for the persisted mute flag
pub const MUTED_KEY: &str = "snakeMuted";

/// Immutable game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Canvas edge length in pixels
    pub canvas_size: f32,
    /// Cells per grid edge
    pub tile_count: i32,

    /// Speed (cells/sec) before any progression threshold
    pub initial_speed: u32,
    /// Score -> base speed
    pub speed_levels: StepTable,
    /// Score -> background tier (cosmetic)
    pub background_levels: StepTable,
    /// Score -> target obstacle count
    pub obstacle_levels: StepTable,

    pub initial_head: Cell,
    pub initial_apple: Cell,
    pub initial_tail_length: usize,
    /// Shrink never takes the tail below this
    pub min_tail_length: usize,

    /// Chance per eaten apple that a power-up field appears
    pub powerup_chance: f64,
    /// Power-ups only spawn at or above this score
    pub powerup_min_score: u32,
    /// Uncollected field lifetime
    pub powerup_field_duration_ms: f64,
    /// Slow / x2 effect lifetime
    pub powerup_effect_duration_ms: f64,
    /// Slowest speed the slow effect can produce
    pub slow_speed_floor: u32,
    /// Segments removed by a shrink pickup
    pub shrink_amount: usize,

    /// Rejection-sampling budget for random placement
    pub placement_attempts: u32,

    pub shake_duration_ms: f32,
    pub shake_intensity: f32,
    pub apple_particles: usize,
    pub powerup_particles: usize,

    /// Pixel size of one tile (derived)
    #[serde(skip)]
    tile_size: f32,
    /// Drawn size of one cell, leaving a 2 px gap (derived)
    #[serde(skip)]
    cell_size: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            canvas_size: 400.0,
            tile_count: 20,

            initial_speed: 7,
            speed_levels: StepTable::new(7, &[(0, 7), (2, 10), (4, 15), (7, 20)]),
            background_levels: StepTable::new(0, &[(0, 0), (4, 1), (7, 2)]),
            obstacle_levels: StepTable::new(0, &[(5, 1), (10, 2), (15, 3)]),

            initial_head: Cell::new(10, 10),
            initial_apple: Cell::new(5, 5),
            initial_tail_length: 2,
            min_tail_length: 2,

            powerup_chance: 0.2,
            powerup_min_score: 3,
            powerup_field_duration_ms: 7000.0,
            powerup_effect_duration_ms: 5000.0,
            slow_speed_floor: 4,
            shrink_amount: 3,

            placement_attempts: 400,

            shake_duration_ms: 500.0,
            shake_intensity: 8.0,
            apple_particles: 12,
            powerup_particles: 10,

            tile_size: 0.0,
            cell_size: 0.0,
        }
        .with_derived()
    }
}

impl GameConfig {
    /// Default configuration on a custom grid
    pub fn with_grid(canvas_size: f32, tile_count: i32) -> Self {
        Self {
            canvas_size,
            tile_count: tile_count.max(1),
            ..Self::default()
        }
        .with_derived()
    }

    /// Same configuration with a different power-up roll
    pub fn with_powerups(self, chance: f64, min_score: u32) -> Self {
        Self {
            powerup_chance: chance,
            powerup_min_score: min_score,
            ..self
        }
        .with_derived()
    }

    /// Parse JSON overrides on top of the defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: GameConfig = serde_json::from_str(json)?;
        Ok(config.with_derived())
    }

    /// Load overrides, falling back to defaults on malformed input
    pub fn from_json_or_default(json: Option<&str>) -> Self {
        match json.map(Self::from_json) {
            Some(Ok(config)) => {
                log::info!("Loaded config overrides");
                config
            }
            Some(Err(e)) => {
                log::warn!("Ignoring malformed config overrides: {}", e);
                Self::default()
            }
            None => Self::default(),
        }
    }

    /// Recompute derived sizes and pull start cells back onto the grid
    fn with_derived(mut self) -> Self {
        self.tile_count = self.tile_count.max(1);
        self.tile_size = self.canvas_size / self.tile_count as f32;
        self.cell_size = (self.tile_size - 2.0).max(1.0);

        let mid = self.tile_count / 2;
        if !self.in_bounds(self.initial_head) {
            log::warn!(
                "Start cell {:?} is off a {}x{} grid, using the centre",
                self.initial_head,
                self.tile_count,
                self.tile_count
            );
            self.initial_head = Cell::new(mid, mid);
        }
        if !self.in_bounds(self.initial_apple) || self.initial_apple == self.initial_head {
            let quarter = self.tile_count / 4;
            let fallback = Cell::new(quarter, quarter);
            log::debug!(
                "Moving first apple from {:?} to {:?}",
                self.initial_apple,
                fallback
            );
            self.initial_apple = fallback;
        }
        self
    }

    #[inline]
    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    #[inline]
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Pixel-space center of a grid cell
    pub fn cell_center(&self, cell: Cell) -> glam::Vec2 {
        let ts = self.tile_size;
        glam::Vec2::new(
            cell.x as f32 * ts + ts / 2.0,
            cell.y as f32 * ts + ts / 2.0,
        )
    }

    /// Whether a cell lies on the grid
    #[inline]
    pub fn in_bounds(&self, cell: Cell) -> bool {
        (0..self.tile_count).contains(&cell.x) && (0..self.tile_count).contains(&cell.y)
    }
}
