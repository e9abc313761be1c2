//! Maze generation using a randomized depth-first backtracker.
//!
//! Walls are knocked down between a current cell and a random unvisited
//! neighbour; dead ends pop back along an explicit stack. The result is a
//! perfect maze: the passages form a spanning tree, so there is exactly one
//! path between any two cells.
//!
//! Generation can be driven one step at a time (for a loading animation) or
//! run to completion with [`generate`].
//!
//! # Examples
//!
//! ```rust
//! use fogbox::maze::generator::MazeGenerator;
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! let mut generator = MazeGenerator::new(10, 10, StdRng::seed_from_u64(7)).unwrap();
//! while !generator.is_complete() {
//!     generator.step();
//! }
//! let grid = generator.finish();
//! assert_eq!(grid.connection_count(), 99);
//! ```

use crate::error::Result;
use crate::maze::grid::Grid;
use rand::prelude::*;
use rand::rngs::StdRng;
use tracing::debug;

/// Stepwise maze generator.
pub struct MazeGenerator<R: Rng> {
    grid: Grid,
    rng: R,
    stack: Vec<(usize, usize)>,
    current: (usize, usize),
    visited: usize,
}

impl<R: Rng> MazeGenerator<R> {
    /// Creates a generator over a full `width x height` grid, starting at a
    /// uniformly random cell.
    ///
    /// # Errors
    /// `InvalidDimensions` if either dimension is zero.
    pub fn new(width: usize, height: usize, mut rng: R) -> Result<Self> {
        let grid = Grid::new(width, height)?;
        let current = (rng.gen_range(0..width), rng.gen_range(0..height));
        Ok(Self {
            grid,
            rng,
            stack: Vec::new(),
            current,
            visited: 1,
        })
    }

    /// Performs one step of generation.
    ///
    /// Returns true if a wall was removed, false on a backtrack or once complete.
    pub fn step(&mut self) -> bool {
        if self.is_complete() {
            return false;
        }

        let (x, y) = self.current;
        let candidates: Vec<(usize, usize)> = self
            .grid
            .neighbors(x, y)
            .filter(|cell| cell.is_full())
            .map(|cell| (cell.x, cell.y))
            .collect();

        if let Some(&next) = candidates.choose(&mut self.rng) {
            self.grid.connect(self.current, next);
            self.stack.push(self.current);
            self.current = next;
            self.visited += 1;
            true
        } else {
            // The grid is connected, so an unvisited cell is always reachable
            // from something still on the stack.
            if let Some(previous) = self.stack.pop() {
                self.current = previous;
            }
            false
        }
    }

    /// Checks if every cell has been visited.
    pub fn is_complete(&self) -> bool {
        self.visited >= self.grid.len()
    }

    /// Returns the current progress of generation (visited cells, total cells)
    pub fn progress(&self) -> (usize, usize) {
        (self.visited, self.grid.len())
    }

    /// Returns the generation progress as a ratio (0.0 to 1.0)
    pub fn progress_ratio(&self) -> f32 {
        self.visited as f32 / self.grid.len() as f32
    }

    /// The grid as generated so far.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Runs any remaining steps and returns the finished grid.
    pub fn finish(mut self) -> Grid {
        while !self.is_complete() {
            self.step();
        }
        debug!(
            width = self.grid.width(),
            height = self.grid.height(),
            "maze generation complete"
        );
        self.grid
    }
}

/// Returns a new random perfect maze of the given size.
///
/// With a seed the result is reproducible; without one it draws from entropy.
///
/// # Errors
/// `InvalidDimensions` if either dimension is zero.
pub fn generate(width: usize, height: usize, seed: Option<u64>) -> Result<Grid> {
    let rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    Ok(MazeGenerator::new(width, height, rng)?.finish())
}

/// Same as [`generate`], drawing from a caller-owned random source.
///
/// # Errors
/// `InvalidDimensions` if either dimension is zero.
pub fn generate_with<R: Rng>(width: usize, height: usize, rng: &mut R) -> Result<Grid> {
    Ok(MazeGenerator::new(width, height, rng)?.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::coordinates::Direction;
    use std::collections::VecDeque;
    use test_case::test_case;

    /// Number of cells reachable from (0, 0) through removed walls.
    fn reachable(grid: &Grid) -> usize {
        let mut seen = vec![false; grid.len()];
        let mut queue = VecDeque::from([(0usize, 0usize)]);
        seen[0] = true;
        let mut count = 0;
        while let Some((x, y)) = queue.pop_front() {
            count += 1;
            let cell = grid.cell(x, y).unwrap();
            for neighbor in grid.neighbors(x, y) {
                let direction = Direction::between((x, y), (neighbor.x, neighbor.y)).unwrap();
                let index = neighbor.x + neighbor.y * grid.width();
                if !cell.walls.contains(direction) && !seen[index] {
                    seen[index] = true;
                    queue.push_back((neighbor.x, neighbor.y));
                }
            }
        }
        count
    }

    #[test_case(1, 1)]
    #[test_case(3, 3)]
    #[test_case(1, 9)]
    #[test_case(20, 10)]
    #[test_case(37, 23)]
    fn test_generated_maze_is_spanning_tree(width: usize, height: usize) {
        for seed in 0..5 {
            let grid = generate(width, height, Some(seed)).unwrap();
            // A connected graph with n - 1 edges is a tree.
            assert_eq!(grid.connection_count(), width * height - 1);
            assert_eq!(reachable(&grid), width * height);
        }
    }

    #[test]
    fn test_three_by_three_always_has_eight_connections() {
        for seed in 0..50 {
            assert_eq!(generate(3, 3, Some(seed)).unwrap().connection_count(), 8);
        }
    }

    #[test]
    fn test_same_seed_same_maze() {
        assert_eq!(
            generate(12, 8, Some(42)).unwrap(),
            generate(12, 8, Some(42)).unwrap()
        );
    }

    #[test]
    fn test_stepwise_progress() {
        let mut generator = MazeGenerator::new(4, 4, StdRng::seed_from_u64(1)).unwrap();
        assert_eq!(generator.progress(), (1, 16));
        let mut removed = 0;
        while !generator.is_complete() {
            if generator.step() {
                removed += 1;
            }
        }
        assert_eq!(removed, 15);
        assert_eq!(generator.progress_ratio(), 1.0);
        assert!(!generator.step());
    }

    #[test]
    fn test_zero_size_fails() {
        assert!(generate(0, 5, Some(1)).is_err());
    }
}
