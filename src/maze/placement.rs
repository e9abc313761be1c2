//! Start and end placement.
//!
//! Positions are matrix coordinates on open positions. Random placement is
//! rejection sampling with a hard attempt cap, so an impossible request ends in
//! [`MazeError::PlacementUnsatisfiable`] instead of spinning forever.

use crate::error::{MazeError, Result};
use crate::math::coordinates::{MatrixPos, distance};
use crate::maze::wall_matrix::WallMatrix;
use rand::Rng;
use tracing::{debug, warn};

/// Minimum start/end distance for a matrix: `factor` times the Euclidean norm
/// of its `(rows, cols)` shape.
pub fn min_distance_for(matrix: &WallMatrix, factor: f64) -> f64 {
    (matrix.rows() as f64).hypot(matrix.cols() as f64) * factor
}

/// Picks two distinct open positions at least `min_distance` apart.
///
/// # Errors
/// `PlacementUnsatisfiable` when `min_distance` exceeds the matrix diagonal,
/// when fewer than two positions are open, or after `max_attempts` rejected pairs.
pub fn place_start_end<R: Rng + ?Sized>(
    matrix: &WallMatrix,
    min_distance: f64,
    max_attempts: usize,
    rng: &mut R,
) -> Result<(MatrixPos, MatrixPos)> {
    let open: Vec<MatrixPos> = matrix.open_positions().collect();
    let diagonal = ((matrix.rows() - 1) as f64).hypot((matrix.cols() - 1) as f64);
    if open.len() < 2 || min_distance > diagonal {
        return Err(MazeError::PlacementUnsatisfiable {
            what: "start and end",
            attempts: 0,
        });
    }

    for _ in 0..max_attempts {
        let start = open[rng.gen_range(0..open.len())];
        let end = open[rng.gen_range(0..open.len())];
        if start != end && distance(start, end) >= min_distance {
            debug!(?start, ?end, "placed start and end");
            return Ok((start, end));
        }
    }
    Err(MazeError::PlacementUnsatisfiable {
        what: "start and end",
        attempts: max_attempts,
    })
}

/// [`place_start_end`], halving `min_distance` after each failure up to
/// `relax_steps` times before surfacing the error.
///
/// # Errors
/// `PlacementUnsatisfiable` if even the most relaxed attempt fails.
pub fn place_relaxed<R: Rng + ?Sized>(
    matrix: &WallMatrix,
    min_distance: f64,
    max_attempts: usize,
    relax_steps: u32,
    rng: &mut R,
) -> Result<(MatrixPos, MatrixPos)> {
    let mut wanted = min_distance;
    let mut step = 0;
    loop {
        match place_start_end(matrix, wanted, max_attempts, rng) {
            Ok(placement) => return Ok(placement),
            Err(err) if step < relax_steps => {
                step += 1;
                wanted /= 2.0;
                warn!(%err, min_distance = wanted, "relaxing start/end distance");
            }
            Err(err) => return Err(err),
        }
    }
}

/// Places the start on a random cell of the leftmost cell column and the end
/// on a random cell of the rightmost one.
///
/// # Errors
/// `PlacementUnsatisfiable` if either column has no open cell center.
pub fn place_opposite_sides<R: Rng + ?Sized>(
    matrix: &WallMatrix,
    rng: &mut R,
) -> Result<(MatrixPos, MatrixPos)> {
    let last_col = matrix.cols().saturating_sub(2) as i32;
    let column = |col: i32| -> Vec<MatrixPos> {
        (1..matrix.rows() as i32)
            .step_by(2)
            .map(|row| MatrixPos::new(row, col))
            .filter(|pos| matrix.is_open(*pos))
            .collect()
    };
    let starts = column(1);
    let ends = column(last_col);
    if starts.is_empty() || ends.is_empty() {
        return Err(MazeError::PlacementUnsatisfiable {
            what: "start and end on opposite sides",
            attempts: 0,
        });
    }
    let start = starts[rng.gen_range(0..starts.len())];
    let end = ends[rng.gen_range(0..ends.len())];
    Ok((start, end))
}
