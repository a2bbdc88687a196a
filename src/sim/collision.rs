//! Collision detection and occupancy tests on the grid
//!
//! Fatal collisions are checked in a fixed priority order: wall, then the
//! snake's own body, then obstacles. The first match wins.

use rand::Rng;

use super::grid::Cell;
use super::state::Snake;
use crate::config::GameConfig;

/// Kind of fatal collision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collision {
    /// Head left the grid
    Wall,
    /// Head landed on its own body
    SelfBody,
    /// Head landed on an obstacle
    Obstacle,
}

/// Check the (already moved) head against walls, body and obstacles
pub fn detect_collision(
    config: &GameConfig,
    snake: &Snake,
    obstacles: &[Cell],
) -> Option<Collision> {
    let head = snake.head;
    if !config.in_bounds(head) {
        return Some(Collision::Wall);
    }
    if snake.body_contains(head) {
        return Some(Collision::SelfBody);
    }
    if obstacles.contains(&head) {
        return Some(Collision::Obstacle);
    }
    None
}

/// Borrowed view of everything that blocks placement
#[derive(Debug, Clone, Copy)]
pub struct Occupancy<'a> {
    pub snake: &'a Snake,
    pub apple: Cell,
    pub obstacles: &'a [Cell],
    pub power_up: Option<Cell>,
}

impl Occupancy<'_> {
    /// Whether anything sits on this cell
    pub fn is_occupied(&self, cell: Cell) -> bool {
        self.snake.occupies(cell)
            || self.apple == cell
            || self.obstacles.contains(&cell)
            || self.power_up == Some(cell)
    }
}

/// Rejection-sample a free cell.
///
/// Gives up after `attempts` draws so a nearly full board degrades to a
/// skipped spawn instead of spinning.
pub fn find_free_cell<R: Rng>(
    occupancy: &Occupancy<'_>,
    rng: &mut R,
    tile_count: i32,
    attempts: u32,
) -> Option<Cell> {
    if tile_count <= 0 {
        return None;
    }
    for _ in 0..attempts {
        let cell = Cell::new(
            rng.random_range(0..tile_count),
            rng.random_range(0..tile_count),
        );
        if !occupancy.is_occupied(cell) {
            return Some(cell);
        }
    }
    log::debug!("No free cell found in {} attempts", attempts);
    None
}
