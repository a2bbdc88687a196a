//! Discrete grid coordinates and headings

use serde::{Deserialize, Serialize};

/// A grid cell. Signed so a head that has left the board is representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The neighbouring cell one step along `heading`
    #[inline]
    pub fn step(self, heading: Heading) -> Self {
        let (dx, dy) = heading.delta();
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Snake direction. `Still` is the (0,0) heading a fresh snake starts with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Heading {
    #[default]
    Still,
    Up,
    Down,
    Left,
    Right,
}

impl Heading {
    /// Unit delta; screen coordinates, so up is -y
    pub fn delta(self) -> (i32, i32) {
        match self {
            Heading::Still => (0, 0),
            Heading::Up => (0, -1),
            Heading::Down => (0, 1),
            Heading::Left => (-1, 0),
            Heading::Right => (1, 0),
        }
    }

    pub fn from_delta(dx: i32, dy: i32) -> Option<Self> {
        match (dx, dy) {
            (0, 0) => Some(Heading::Still),
            (0, -1) => Some(Heading::Up),
            (0, 1) => Some(Heading::Down),
            (-1, 0) => Some(Heading::Left),
            (1, 0) => Some(Heading::Right),
            _ => None,
        }
    }

    #[inline]
    pub fn is_moving(self) -> bool {
        self != Heading::Still
    }

    /// True when turning to `other` would be a 180° turn
    pub fn is_reverse_of(self, other: Heading) -> bool {
        matches!(
            (self, other),
            (Heading::Up, Heading::Down)
                | (Heading::Down, Heading::Up)
                | (Heading::Left, Heading::Right)
                | (Heading::Right, Heading::Left)
        )
    }
}
