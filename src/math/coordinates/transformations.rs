//! Coordinate system transformations between screen and wall matrix space.
//!
//! The rasterized maze duplicates every matrix column, so one matrix column is
//! two terminal columns wide while one matrix row is one terminal row tall. The
//! transforms below divide/multiply by `(2, 1)` accordingly and swap the axes,
//! because matrix indices are `(row, col)` while the screen is `(x, y)`.

use super::positions::{MatrixPos, ScreenPos};

/// Converts a screen position to the matrix position underneath it.
///
/// Uses floor division, so positions left of or above `top_left` map to negative
/// matrix coordinates instead of being folded back onto row/column 0.
///
/// # Arguments
/// * `screen` - The terminal position
/// * `top_left` - Screen position of the rendered maze's top-left glyph
pub fn screen_to_matrix(screen: ScreenPos, top_left: ScreenPos) -> MatrixPos {
    let offset = screen - top_left;
    MatrixPos::new(offset.y, offset.x.div_euclid(2))
}

/// Converts a matrix position to the screen position of its left glyph.
///
/// Inverse of [`screen_to_matrix`] for screen positions at an even x offset
/// from `top_left`; odd offsets are truncated by the forward transform.
pub fn matrix_to_screen(mat: MatrixPos, top_left: ScreenPos) -> ScreenPos {
    top_left + ScreenPos::new(mat.col * 2, mat.row)
}

/// Top-left screen position that centers content of `rendered` size
/// (columns, rows) inside a terminal of `terminal` size (columns, rows).
///
/// The result can be negative when the terminal is smaller than the content.
pub fn centered_top_left(terminal: (u16, u16), rendered: (usize, usize)) -> ScreenPos {
    let dx = i32::from(terminal.0) - rendered.0 as i32;
    let dy = i32::from(terminal.1) - rendered.1 as i32;
    ScreenPos::new(dx.div_euclid(2), dy.div_euclid(2))
}

/// Euclidean distance between two matrix positions.
pub fn distance(a: MatrixPos, b: MatrixPos) -> f64 {
    let dr = f64::from(a.row - b.row);
    let dc = f64::from(a.col - b.col);
    dr.hypot(dc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(ScreenPos::new(10, 5), ScreenPos::new(10, 5), MatrixPos::new(0, 0) ; "origin")]
    #[test_case(ScreenPos::new(14, 8), ScreenPos::new(10, 5), MatrixPos::new(3, 2) ; "cell")]
    #[test_case(ScreenPos::new(15, 8), ScreenPos::new(10, 5), MatrixPos::new(3, 2) ; "odd offset truncates")]
    #[test_case(ScreenPos::new(9, 5), ScreenPos::new(10, 5), MatrixPos::new(0, -1) ; "left of maze floors")]
    fn test_screen_to_matrix(screen: ScreenPos, top_left: ScreenPos, expected: MatrixPos) {
        assert_eq!(screen_to_matrix(screen, top_left), expected);
    }

    #[test]
    fn test_round_trip_on_cell_centers() {
        let top_left = ScreenPos::new(7, 3);
        for row in 0..9 {
            for col in 0..13 {
                let screen = top_left + ScreenPos::new(col * 2, row);
                let mat = screen_to_matrix(screen, top_left);
                assert_eq!(matrix_to_screen(mat, top_left), screen);
            }
        }
    }

    #[test]
    fn test_centered_top_left() {
        assert_eq!(centered_top_left((80, 24), (41, 11)), ScreenPos::new(19, 6));
        assert_eq!(centered_top_left((10, 4), (21, 11)), ScreenPos::new(-6, -4));
    }

    #[test]
    fn test_distance() {
        assert_eq!(distance(MatrixPos::new(0, 0), MatrixPos::new(3, 4)), 5.0);
    }
}
