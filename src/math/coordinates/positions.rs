//! Position types and cardinal directions.
//!
//! Two coordinate systems are in play:
//! - [`MatrixPos`]: `(row, col)` into a wall matrix, where cell centers sit on odd
//!   coordinates and walls between them on the coordinate in between.
//! - [`ScreenPos`]: `(x, y)` terminal character coordinates.
//!
//! Both are signed so that offsets and out-of-bounds probes can be expressed
//! without wrapping; bounds are checked by whoever indexes with them.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// Enum representing cardinal directions in the maze
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Towards row 0 / y 0.
    North,
    /// Towards larger rows.
    South,
    /// Towards larger columns.
    East,
    /// Towards column 0.
    West,
}

impl Direction {
    /// All four directions in neighbour-scan order.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::West,
        Direction::East,
    ];

    /// Returns the direction pointing the other way.
    pub fn opposite(self) -> Self {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
        }
    }

    /// Unit step as `(dx, dy)`, with y growing downwards.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::South => (0, 1),
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
        }
    }

    /// Gets the direction from one cell to an orthogonally adjacent one.
    ///
    /// Returns `None` when the cells are equal, diagonal, or further than one step apart.
    pub fn between(from: (usize, usize), to: (usize, usize)) -> Option<Direction> {
        let dx = to.0 as i64 - from.0 as i64;
        let dy = to.1 as i64 - from.1 as i64;
        match (dx, dy) {
            (0, -1) => Some(Direction::North),
            (0, 1) => Some(Direction::South),
            (1, 0) => Some(Direction::East),
            (-1, 0) => Some(Direction::West),
            _ => None,
        }
    }
}

/// A `(row, col)` coordinate in a wall matrix.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[i32; 2]", into = "[i32; 2]")]
pub struct MatrixPos {
    pub row: i32,
    pub col: i32,
}

impl MatrixPos {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Matrix coordinate of the center of grid cell `(x, y)`.
    pub fn cell_center(x: usize, y: usize) -> Self {
        Self::new(2 * y as i32 + 1, 2 * x as i32 + 1)
    }

    /// The position one step away in `direction`.
    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self::new(self.row + dy, self.col + dx)
    }

    /// Index pair if the position lies inside a `rows x cols` matrix.
    pub fn in_bounds(self, rows: usize, cols: usize) -> Option<(usize, usize)> {
        let row = usize::try_from(self.row).ok()?;
        let col = usize::try_from(self.col).ok()?;
        (row < rows && col < cols).then_some((row, col))
    }
}

impl From<[i32; 2]> for MatrixPos {
    fn from([row, col]: [i32; 2]) -> Self {
        Self::new(row, col)
    }
}

impl From<MatrixPos> for [i32; 2] {
    fn from(pos: MatrixPos) -> Self {
        [pos.row, pos.col]
    }
}

/// An `(x, y)` terminal coordinate.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScreenPos {
    pub x: i32,
    pub y: i32,
}

impl ScreenPos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The position one character away in `direction`.
    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self::new(self.x + dx, self.y + dy)
    }
}

impl Add for ScreenPos {
    type Output = ScreenPos;

    fn add(self, rhs: ScreenPos) -> ScreenPos {
        ScreenPos::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for ScreenPos {
    type Output = ScreenPos;

    fn sub(self, rhs: ScreenPos) -> ScreenPos {
        ScreenPos::new(self.x - rhs.x, self.y - rhs.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_between_adjacent_cells() {
        assert_eq!(Direction::between((1, 1), (1, 0)), Some(Direction::North));
        assert_eq!(Direction::between((1, 1), (1, 2)), Some(Direction::South));
        assert_eq!(Direction::between((1, 1), (2, 1)), Some(Direction::East));
        assert_eq!(Direction::between((1, 1), (0, 1)), Some(Direction::West));
    }

    #[test]
    fn test_direction_between_rejects_non_adjacent() {
        assert_eq!(Direction::between((1, 1), (1, 1)), None);
        assert_eq!(Direction::between((1, 1), (2, 2)), None);
        assert_eq!(Direction::between((0, 0), (0, 2)), None);
    }

    #[test]
    fn test_matrix_pos_bounds() {
        assert_eq!(MatrixPos::new(2, 3).in_bounds(3, 4), Some((2, 3)));
        assert_eq!(MatrixPos::new(3, 0).in_bounds(3, 4), None);
        assert_eq!(MatrixPos::new(-1, 0).in_bounds(3, 4), None);
    }

    #[test]
    fn test_matrix_pos_serializes_as_pair() {
        let json = serde_json::to_string(&MatrixPos::new(3, 7)).unwrap();
        assert_eq!(json, "[3,7]");
        let back: MatrixPos = serde_json::from_str("[5,1]").unwrap();
        assert_eq!(back, MatrixPos::new(5, 1));
    }
}
