//! Game state and core simulation types
//!
//! Everything the simulation step reads or writes lives here. Particles and
//! screen shake are not part of this state; see `effects`.

use std::collections::VecDeque;

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::collision::{Collision, Occupancy, find_free_cell};
use super::grid::{Cell, Heading};
use crate::config::GameConfig;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GamePhase {
    /// Title screen, waiting for any input
    #[default]
    Menu,
    /// Active gameplay
    Playing,
    /// Ticks suspended, still rendered
    Paused,
    /// Run ended
    GameOver,
}

/// The snake
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snake {
    pub head: Cell,
    pub heading: Heading,
    /// Trail cells, oldest first. Never longer than `tail_length`.
    pub body: VecDeque<Cell>,
    pub tail_length: usize,
}

impl Snake {
    pub fn new(head: Cell, tail_length: usize) -> Self {
        Self {
            head,
            heading: Heading::Still,
            body: VecDeque::with_capacity(tail_length + 1),
            tail_length,
        }
    }

    /// Change heading. Rejects 180° turns; returns whether the heading changed.
    pub fn steer(&mut self, heading: Heading) -> bool {
        if !heading.is_moving() || self.heading.is_reverse_of(heading) {
            return false;
        }
        self.heading = heading;
        true
    }

    /// Push the head onto the trail, dropping the oldest cell past `tail_length`
    pub fn record_trail(&mut self) {
        self.body.push_back(self.head);
        while self.body.len() > self.tail_length {
            self.body.pop_front();
        }
    }

    /// Move the head one cell along the heading
    pub fn advance(&mut self) {
        self.head = self.head.step(self.heading);
    }

    pub fn grow(&mut self) {
        self.tail_length += 1;
    }

    /// Drop up to `amount` from the tail length, never below `min`, trimming the trail to fit
    pub fn shrink(&mut self, amount: usize, min: usize) {
        self.tail_length = self.tail_length.saturating_sub(amount).max(min);
        while self.body.len() > self.tail_length {
            self.body.pop_front();
        }
    }

    #[inline]
    pub fn body_contains(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    /// Head or body covers this cell
    #[inline]
    pub fn occupies(&self, cell: Cell) -> bool {
        self.head == cell || self.body_contains(cell)
    }
}

/// Power-up kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PowerUpKind {
    /// Halve speed for a while
    Slow,
    /// Double points per apple for a while
    X2,
    /// Cut the tail immediately
    Shrink,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 3] = [PowerUpKind::Slow, PowerUpKind::X2, PowerUpKind::Shrink];

    /// Display color (0xRRGGBB)
    pub fn color(self) -> u32 {
        match self {
            PowerUpKind::Slow => 0x3498db,
            PowerUpKind::X2 => 0xf1c40f,
            PowerUpKind::Shrink => 0x9b59b6,
        }
    }

    /// Short label drawn on the field
    pub fn label(self) -> &'static str {
        match self {
            PowerUpKind::Slow => "S",
            PowerUpKind::X2 => "x2",
            PowerUpKind::Shrink => "-3",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PowerUpKind::Slow => "Slow",
            PowerUpKind::X2 => "x2",
            PowerUpKind::Shrink => "Shrink",
        }
    }

    /// Whether pickup leaves a timed effect behind
    pub fn is_timed(self) -> bool {
        !matches!(self, PowerUpKind::Shrink)
    }
}

/// A power-up resting on the grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerUpField {
    pub cell: Cell,
    pub kind: PowerUpKind,
    pub spawn_time: f64,
}

/// A collected, still-running power-up effect
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveEffect {
    pub kind: PowerUpKind,
    pub expiry_time: f64,
}

/// Apple color (0xRRGGBB), used for the eat burst
pub const APPLE_COLOR: u32 = 0xe74c3c;

/// Things that happened during a tick, for the shell and effects layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// Apple eaten at `cell`, awarding `points`
    Ate { cell: Cell, points: u32 },
    /// Run ended
    Collided { collision: Collision, cell: Cell },
    PowerUpSpawned { cell: Cell, kind: PowerUpKind },
    PowerUpCollected { cell: Cell, kind: PowerUpKind },
    /// Field timed out uncollected
    PowerUpExpired { kind: PowerUpKind },
    EffectExpired { kind: PowerUpKind },
    ObstacleAdded { cell: Cell },
}

/// Complete simulation state (deterministic for a given seed and inputs)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub phase: GamePhase,
    pub snake: Snake,
    pub apple: Cell,
    /// Never shrinks during a run
    pub obstacles: Vec<Cell>,
    /// At most one live field
    pub power_up: Option<PowerUpField>,
    /// At most one running effect
    pub active_effect: Option<ActiveEffect>,
    pub score: u32,
    /// Speed from the progression table
    pub base_speed: u32,
    /// Effective speed (base, or slowed)
    pub speed: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    rng: Pcg32,
}

impl GameState {
    /// Fresh run with the given seed, in the menu phase
    pub fn new(config: &GameConfig, seed: u64) -> Self {
        Self {
            seed,
            phase: GamePhase::Menu,
            snake: Snake::new(config.initial_head, config.initial_tail_length),
            apple: config.initial_apple,
            obstacles: Vec::new(),
            power_up: None,
            active_effect: None,
            score: 0,
            base_speed: config.initial_speed,
            speed: config.initial_speed,
            time_ticks: 0,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Borrowed view for occupancy tests
    pub fn occupancy(&self) -> Occupancy<'_> {
        occupancy_view(&self.snake, self.apple, &self.obstacles, self.power_up)
    }

    /// Random unoccupied cell, or `None` when the attempt budget runs out
    pub fn random_free_cell(&mut self, config: &GameConfig) -> Option<Cell> {
        // Split borrow: the view reads entities while the RNG is drawn from
        let Self {
            snake,
            apple,
            obstacles,
            power_up,
            rng,
            ..
        } = self;
        find_free_cell(
            &occupancy_view(snake, *apple, obstacles, *power_up),
            rng,
            config.tile_count,
            config.placement_attempts,
        )
    }

    /// Simulation RNG (seeded, replayable)
    pub(crate) fn rng(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    /// Points the next apple is worth
    pub fn points_per_apple(&self) -> u32 {
        match self.active_effect {
            Some(ActiveEffect {
                kind: PowerUpKind::X2,
                ..
            }) => 2,
            _ => 1,
        }
    }

    pub fn slow_active(&self) -> bool {
        matches!(
            self.active_effect,
            Some(ActiveEffect {
                kind: PowerUpKind::Slow,
                ..
            })
        )
    }

    /// Milliseconds between ticks at the current speed
    pub fn tick_interval_ms(&self) -> f64 {
        1000.0 / self.speed.max(1) as f64
    }
}

/// Everything that blocks placement
fn occupancy_view<'a>(
    snake: &'a Snake,
    apple: Cell,
    obstacles: &'a [Cell],
    power_up: Option<PowerUpField>,
) -> Occupancy<'a> {
    Occupancy {
        snake,
        apple,
        obstacles,
        power_up: power_up.map(|p| p.cell),
    }
}
