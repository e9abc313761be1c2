//! Cell graph of a maze: every cell knows which of its four walls still stand.

use crate::error::{MazeError, Result};
use crate::math::coordinates::{Direction, MatrixPos};
use crate::maze::wall_matrix::WallMatrix;

/// Set of standing walls (or, for glyphs, connected directions), one bit per direction.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Walls(u8);

impl Walls {
    pub const NONE: Walls = Walls(0);
    pub const ALL: Walls = Walls(0b1111);

    const fn bit(direction: Direction) -> u8 {
        match direction {
            Direction::North => 0b0001,
            Direction::South => 0b0010,
            Direction::East => 0b0100,
            Direction::West => 0b1000,
        }
    }

    pub fn contains(self, direction: Direction) -> bool {
        self.0 & Self::bit(direction) != 0
    }

    pub fn insert(&mut self, direction: Direction) {
        self.0 |= Self::bit(direction);
    }

    pub fn remove(&mut self, direction: Direction) {
        self.0 &= !Self::bit(direction);
    }

    pub fn len(self) -> u32 {
        self.0.count_ones()
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// The raw 4-bit mask, `N=1, S=2, E=4, W=8`.
    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn from_bits(bits: u8) -> Self {
        Walls(bits & 0b1111)
    }

    pub fn iter(self) -> impl Iterator<Item = Direction> {
        Direction::ALL.into_iter().filter(move |d| self.contains(*d))
    }
}

impl FromIterator<Direction> for Walls {
    fn from_iter<I: IntoIterator<Item = Direction>>(iter: I) -> Self {
        let mut walls = Walls::NONE;
        for direction in iter {
            walls.insert(direction);
        }
        walls
    }
}

/// Represents a cell in the maze grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    /// Column of the cell
    pub x: usize,
    /// Row of the cell
    pub y: usize,
    /// Walls still standing around the cell
    pub walls: Walls,
}

impl Cell {
    /// Creates a cell with all four walls standing.
    pub fn new(x: usize, y: usize) -> Self {
        Self {
            x,
            y,
            walls: Walls::ALL,
        }
    }

    /// Returns true if all walls are still standing, i.e. generation has not visited it.
    pub fn is_full(&self) -> bool {
        self.walls == Walls::ALL
    }

    /// Matrix coordinate of this cell's center.
    pub fn center(&self) -> MatrixPos {
        MatrixPos::cell_center(self.x, self.y)
    }
}

/// A `width x height` array of cells in row-major order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Creates a grid with every wall standing.
    ///
    /// # Errors
    /// `InvalidDimensions` if either dimension is zero.
    pub fn new(width: usize, height: usize) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(MazeError::InvalidDimensions {
                width: width as i64,
                height: height as i64,
            });
        }
        let cells = (0..height)
            .flat_map(|y| (0..width).map(move |x| Cell::new(x, y)))
            .collect();
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Rebuilds the cell graph from a wall matrix.
    ///
    /// A cell's wall towards a direction is removed when the matrix is open one
    /// step from the cell's center in that direction.
    ///
    /// # Errors
    /// `MalformedSaveData` unless the matrix has odd dimensions of at least 3.
    pub fn from_wall_matrix(matrix: &WallMatrix) -> Result<Self> {
        let (rows, cols) = (matrix.rows(), matrix.cols());
        if rows < 3 || cols < 3 || rows % 2 == 0 || cols % 2 == 0 {
            return Err(MazeError::malformed(format!(
                "wall matrix must have odd dimensions of at least 3, got {rows}x{cols}"
            )));
        }
        let mut grid = Grid::new((cols - 1) / 2, (rows - 1) / 2)?;
        for cell in &mut grid.cells {
            let center = cell.center();
            for direction in Direction::ALL {
                if !matrix.is_wall(center.step(direction)) {
                    cell.walls.remove(direction);
                }
            }
        }
        Ok(grid)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Returns the cell at `(x, y)`, if inside the grid.
    pub fn cell(&self, x: usize, y: usize) -> Option<&Cell> {
        if x < self.width && y < self.height {
            self.cells.get(x + y * self.width)
        } else {
            None
        }
    }

    /// Returns true if all walls of `(x, y)` are standing.
    ///
    /// # Panics
    /// If `(x, y)` is outside the grid.
    pub fn is_full(&self, x: usize, y: usize) -> bool {
        self.cells[self.index(x, y)].is_full()
    }

    /// Neighbouring cells, not counting diagonals, in the order north, south, west, east.
    ///
    /// Cells on borders or corners have fewer than 4 neighbours.
    pub fn neighbors(&self, x: usize, y: usize) -> impl Iterator<Item = &Cell> + '_ {
        Direction::ALL.into_iter().filter_map(move |direction| {
            let (dx, dy) = direction.delta();
            let nx = x.checked_add_signed(dx as isize)?;
            let ny = y.checked_add_signed(dy as isize)?;
            self.cell(nx, ny)
        })
    }

    /// Removes the wall between two adjacent cells, on both sides.
    ///
    /// # Panics
    /// If the cells are not orthogonally adjacent inside the grid.
    pub fn connect(&mut self, a: (usize, usize), b: (usize, usize)) {
        let direction = Direction::between(a, b)
            .unwrap_or_else(|| panic!("cells {a:?} and {b:?} are not adjacent"));
        assert!(
            self.cell(a.0, a.1).is_some() && self.cell(b.0, b.1).is_some(),
            "cells {a:?} and {b:?} must both be inside the grid"
        );
        let ia = self.index(a.0, a.1);
        let ib = self.index(b.0, b.1);
        self.cells[ia].walls.remove(direction);
        self.cells[ib].walls.remove(direction.opposite());
    }

    /// Number of removed walls between pairs of cells (each passage counted once).
    pub fn connection_count(&self) -> usize {
        self.cells
            .iter()
            .map(|cell| {
                usize::from(!cell.walls.contains(Direction::East) && cell.x + 1 < self.width)
                    + usize::from(!cell.walls.contains(Direction::South) && cell.y + 1 < self.height)
            })
            .sum()
    }

    fn index(&self, x: usize, y: usize) -> usize {
        x + y * self.width
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_new_grid_is_full() {
        let grid = Grid::new(4, 3).unwrap();
        assert_eq!(grid.len(), 12);
        assert!(grid.cells().iter().all(Cell::is_full));
        assert_eq!(grid.connection_count(), 0);
    }

    #[test]
    fn test_zero_dimension_is_rejected() {
        assert!(matches!(
            Grid::new(0, 3),
            Err(MazeError::InvalidDimensions { width: 0, height: 3 })
        ));
        assert!(Grid::new(3, 0).is_err());
    }

    #[test]
    fn test_neighbors_respect_bounds() {
        let grid = Grid::new(3, 3).unwrap();
        let corner: Vec<_> = grid.neighbors(0, 0).map(|c| (c.x, c.y)).collect();
        assert_eq!(corner, vec![(0, 1), (1, 0)]);

        let middle: Vec<_> = grid.neighbors(1, 1).map(|c| (c.x, c.y)).collect();
        assert_eq!(middle, vec![(1, 0), (1, 2), (0, 1), (2, 1)]);

        // restartable
        assert_eq!(grid.neighbors(1, 1).count(), 4);
    }

    #[test]
    fn test_connect_removes_both_sides() {
        let mut grid = Grid::new(2, 2).unwrap();
        grid.connect((0, 0), (1, 0));
        assert!(!grid.cell(0, 0).unwrap().walls.contains(Direction::East));
        assert!(!grid.cell(1, 0).unwrap().walls.contains(Direction::West));
        assert!(!grid.is_full(0, 0));
        assert!(grid.is_full(0, 1));
        assert_eq!(grid.connection_count(), 1);
    }

    #[test]
    #[should_panic(expected = "not adjacent")]
    fn test_connect_non_adjacent_panics() {
        let mut grid = Grid::new(3, 3).unwrap();
        grid.connect((0, 0), (2, 0));
    }

    #[test]
    fn test_walls_set_operations() {
        let mut walls = Walls::ALL;
        walls.remove(Direction::North);
        assert_eq!(walls.len(), 3);
        assert!(!walls.contains(Direction::North));
        walls.insert(Direction::North);
        assert_eq!(walls, Walls::ALL);
        let ew: Walls = [Direction::East, Direction::West].into_iter().collect();
        assert_eq!(ew.bits(), 0b1100);
    }

    #[test]
    fn test_round_trip_through_wall_matrix() {
        let mut grid = Grid::new(3, 2).unwrap();
        grid.connect((0, 0), (1, 0));
        grid.connect((1, 0), (1, 1));
        grid.connect((1, 1), (2, 1));
        let matrix = WallMatrix::from_grid(&grid);
        assert_eq!(Grid::from_wall_matrix(&matrix).unwrap(), grid);
    }

    #[test]
    fn test_from_wall_matrix_rejects_even_shape() {
        let matrix = WallMatrix::from_rows(vec![vec![true; 4]; 3]).unwrap();
        assert!(matches!(
            Grid::from_wall_matrix(&matrix),
            Err(MazeError::MalformedSaveData(_))
        ));
    }
}
