//! Double resolution boolean wall matrix.
//!
//! A grid of `w x h` cells becomes a `(2h+1) x (2w+1)` matrix: cell centers on
//! odd/odd coordinates, the wall between two cells on the coordinate between
//! their centers, pillars on even/even coordinates. `true` is a wall.

use crate::error::{MazeError, Result};
use crate::math::coordinates::{Direction, MatrixPos};
use crate::maze::grid::Grid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WallMatrix {
    rows: usize,
    cols: usize,
    walls: Vec<bool>,
}

impl WallMatrix {
    /// Builds the matrix for a grid.
    pub fn from_grid(grid: &Grid) -> Self {
        let rows = grid.height() * 2 + 1;
        let cols = grid.width() * 2 + 1;
        let mut matrix = Self {
            rows,
            cols,
            walls: vec![true; rows * cols],
        };
        for cell in grid.cells() {
            let center = cell.center();
            matrix.set(center, false);
            for direction in Direction::ALL {
                if !cell.walls.contains(direction) {
                    matrix.set(center.step(direction), false);
                }
            }
        }
        matrix
    }

    /// Builds a matrix from rows of booleans.
    ///
    /// # Errors
    /// `MalformedSaveData` if the rows are empty or ragged.
    pub fn from_rows(rows: Vec<Vec<bool>>) -> Result<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        if cols == 0 {
            return Err(MazeError::malformed("map has no rows or columns"));
        }
        if let Some((index, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != cols) {
            return Err(MazeError::malformed(format!(
                "map row {index} has {} entries, expected {cols}",
                row.len()
            )));
        }
        Ok(Self {
            rows: rows.len(),
            cols,
            walls: rows.into_iter().flatten().collect(),
        })
    }

    /// Builds a matrix from the 0/1 integer rows of the level format.
    ///
    /// # Errors
    /// `MalformedSaveData` for ragged rows or values other than 0 and 1.
    pub fn from_int_rows(rows: &[Vec<u8>]) -> Result<Self> {
        let bools = rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|&value| match value {
                        0 => Ok(false),
                        1 => Ok(true),
                        other => Err(MazeError::malformed(format!(
                            "map values must be 0 or 1, found {other}"
                        ))),
                    })
                    .collect::<Result<Vec<_>>>()
            })
            .collect::<Result<Vec<_>>>()?;
        Self::from_rows(bools)
    }

    /// The 0/1 integer rows of the level format.
    pub fn to_int_rows(&self) -> Vec<Vec<u8>> {
        self.walls
            .chunks(self.cols)
            .map(|row| row.iter().map(|&wall| u8::from(wall)).collect())
            .collect()
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns true for a wall; positions outside the matrix are not walls.
    pub fn is_wall(&self, pos: MatrixPos) -> bool {
        pos.in_bounds(self.rows, self.cols)
            .is_some_and(|(row, col)| self.walls[row * self.cols + col])
    }

    /// Returns true for an in-bounds open position.
    pub fn is_open(&self, pos: MatrixPos) -> bool {
        pos.in_bounds(self.rows, self.cols)
            .is_some_and(|(row, col)| !self.walls[row * self.cols + col])
    }

    /// All in-bounds open positions, row-major.
    pub fn open_positions(&self) -> impl Iterator<Item = MatrixPos> + '_ {
        self.walls.iter().enumerate().filter(|(_, wall)| !**wall).map(|(index, _)| {
            MatrixPos::new((index / self.cols) as i32, (index % self.cols) as i32)
        })
    }

    /// Copy of this matrix keeping only `keep`; everything else becomes open,
    /// so it is never drawn.
    pub fn masked(&self, keep: &[MatrixPos]) -> Self {
        let mut masked = Self {
            rows: self.rows,
            cols: self.cols,
            walls: vec![false; self.walls.len()],
        };
        for &pos in keep {
            if self.is_wall(pos) {
                masked.set(pos, true);
            }
        }
        masked
    }

    /// Row-major iterator over rows of booleans.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[bool]> {
        self.walls.chunks(self.cols)
    }

    fn set(&mut self, pos: MatrixPos, wall: bool) {
        if let Some((row, col)) = pos.in_bounds(self.rows, self.cols) {
            self.walls[row * self.cols + col] = wall;
        }
    }
}
