//! Reveal boxes: circular sub-mazes that show up while the player stands on them.
//!
//! A [`RevealBox`] owns a copy of the part of the main maze inside a disc (the
//! "fog disc") and its own glyphs. Terminal output is not double buffered, so
//! whatever a box draws has to be overwritten with blanks when the player
//! leaves; the three-state machine below guarantees that happens exactly once
//! per exit.
//!
//! ```text
//!            inside                       outside
//!   Hidden ─────────▶ Shown ───────────▶ PendingErase
//!     ▲   emit Reveal   │  ▲   (no output)    │
//!     │                 │  └──── inside ──────┤
//!     └─────────────────┴──── outside ────────┘
//!                            emit Erase
//! ```

use crate::error::Result;
use crate::math::coordinates::{MatrixPos, ScreenPos, centered_top_left, distance, matrix_to_screen};
use crate::maze::Maze;
use crate::maze::grid::Cell;
use crate::maze::raster::{DrawCommand, GlyphColor, RenderedMaze, rasterize};
use crate::maze::wall_matrix::WallMatrix;
use std::collections::HashSet;

/// Coordinates of a `rows x cols` matrix within `radius` of `center`,
/// row-major.
///
/// Only the bounding square `[center - radius - 1, center + radius + 1]`,
/// clipped to the matrix, is scanned.
pub fn extract_disc(rows: usize, cols: usize, center: MatrixPos, radius: u32) -> Vec<MatrixPos> {
    if rows == 0 || cols == 0 {
        return Vec::new();
    }
    let r = i64::from(radius) + 1;
    let clip = |c: i32, len: usize| {
        let last = i64::try_from(len).unwrap_or(i64::MAX) - 1;
        let low = (i64::from(c) - r).max(0);
        let high = (i64::from(c) + r).min(last);
        // Both ends lie in [0, len - 1], so they fit in i32 whenever the
        // matrix is addressable by MatrixPos.
        (
            i32::try_from(low).unwrap_or(i32::MAX),
            i32::try_from(high).unwrap_or(i32::MAX),
        )
    };
    let (row_low, row_high) = clip(center.row, rows);
    let (col_low, col_high) = clip(center.col, cols);
    let limit = f64::from(radius);
    let mut disc = Vec::new();
    for row in row_low..=row_high {
        for col in col_low..=col_high {
            let pos = MatrixPos::new(row, col);
            if distance(pos, center) <= limit {
                disc.push(pos);
            }
        }
    }
    disc
}

/// Reveal lifecycle of a box.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum RevealState {
    #[default]
    Hidden,
    Shown,
    /// The player left; the drawn glyphs still have to be erased.
    PendingErase,
}

/// Screen rectangle that triggers a reveal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Footprint {
    pub top_left: ScreenPos,
    pub width: u16,
    pub height: u16,
}

impl Footprint {
    /// A `size` rectangle centered on `center`.
    pub fn around(center: ScreenPos, size: (u16, u16)) -> Self {
        let (width, height) = size;
        Self {
            top_left: center - ScreenPos::new(i32::from(width / 2), i32::from(height / 2)),
            width,
            height,
        }
    }

    pub fn contains(&self, pos: ScreenPos) -> bool {
        let offset = pos - self.top_left;
        (0..i32::from(self.width)).contains(&offset.x)
            && (0..i32::from(self.height)).contains(&offset.y)
    }

    /// Corner glyphs outlining the rectangle.
    pub fn corners(&self) -> [(ScreenPos, char); 4] {
        let right = i32::from(self.width.max(1)) - 1;
        let bottom = i32::from(self.height.max(1)) - 1;
        [
            (self.top_left, '┌'),
            (self.top_left + ScreenPos::new(right, 0), '┐'),
            (self.top_left + ScreenPos::new(0, bottom), '└'),
            (self.top_left + ScreenPos::new(right, bottom), '┘'),
        ]
    }
}

/// A fog-revealed sub-maze.
#[derive(Debug, Clone)]
pub struct RevealBox {
    center: MatrixPos,
    radius: u32,
    cells: Vec<Cell>,
    matrix: WallMatrix,
    rendered: RenderedMaze,
    top_left: ScreenPos,
    footprint_size: (u16, u16),
    color: GlyphColor,
    state: RevealState,
}

impl RevealBox {
    /// Cuts the disc of `radius` around `center` out of `maze`.
    ///
    /// Outside the disc the copied matrix is open, so nothing is drawn there.
    /// The box is aligned with the maze's current screen position.
    pub fn extract(
        maze: &Maze,
        center: MatrixPos,
        radius: u32,
        footprint_size: (u16, u16),
        color: GlyphColor,
    ) -> Self {
        let matrix = maze.matrix();
        let disc = extract_disc(matrix.rows(), matrix.cols(), center, radius);
        let masked = matrix.masked(&disc);
        Self::build(maze, center, radius, masked, &disc, footprint_size, color)
    }

    /// Wraps a box stored in a level file: `matrix` is its already masked map.
    ///
    /// The radius is recovered as the distance to the farthest wall.
    ///
    /// # Errors
    /// `MalformedSaveData` if the map's shape differs from the maze's.
    pub fn from_matrix(
        maze: &Maze,
        center: MatrixPos,
        matrix: WallMatrix,
        footprint_size: (u16, u16),
        color: GlyphColor,
    ) -> Result<Self> {
        if (matrix.rows(), matrix.cols()) != (maze.matrix().rows(), maze.matrix().cols()) {
            return Err(crate::error::MazeError::malformed(format!(
                "box map is {}x{}, maze map is {}x{}",
                matrix.rows(),
                matrix.cols(),
                maze.matrix().rows(),
                maze.matrix().cols()
            )));
        }
        let farthest = (0..matrix.rows() as i32)
            .flat_map(|row| (0..matrix.cols() as i32).map(move |col| MatrixPos::new(row, col)))
            .filter(|pos| matrix.is_wall(*pos))
            .map(|pos| distance(pos, center))
            .fold(0.0, f64::max);
        let radius = farthest.ceil() as u32;
        let disc = extract_disc(matrix.rows(), matrix.cols(), center, radius);
        Ok(Self::build(maze, center, radius, matrix, &disc, footprint_size, color))
    }

    fn build(
        maze: &Maze,
        center: MatrixPos,
        radius: u32,
        matrix: WallMatrix,
        disc: &[MatrixPos],
        footprint_size: (u16, u16),
        color: GlyphColor,
    ) -> Self {
        let inside: HashSet<MatrixPos> = disc.iter().copied().collect();
        let cells = maze
            .grid()
            .cells()
            .iter()
            .filter(|cell| inside.contains(&cell.center()))
            .copied()
            .collect();
        let rendered = rasterize(&matrix, color);
        Self {
            center,
            radius,
            cells,
            matrix,
            rendered,
            top_left: maze.top_left(),
            footprint_size,
            color,
            state: RevealState::Hidden,
        }
    }

    /// Centers the box's glyphs in a terminal of `(columns, rows)`, the same
    /// way the main maze is centered.
    pub fn centre_on(&mut self, terminal: (u16, u16)) {
        self.top_left = centered_top_left(terminal, self.rendered.size());
    }

    /// Advances the reveal state machine for one frame.
    ///
    /// Returns the glyphs to draw on a reveal, blanks to draw on an erase,
    /// and nothing otherwise.
    pub fn advance_state(&mut self, player: ScreenPos) -> Option<DrawCommand> {
        let inside = self.footprint().contains(player);
        match (self.state, inside) {
            (RevealState::Hidden, true) => {
                self.state = RevealState::Shown;
                Some(self.reveal_command())
            }
            (RevealState::Hidden, false) | (RevealState::Shown, true) => None,
            (RevealState::Shown, false) => {
                self.state = RevealState::PendingErase;
                None
            }
            (RevealState::PendingErase, true) => {
                self.state = RevealState::Shown;
                None
            }
            (RevealState::PendingErase, false) => {
                self.state = RevealState::Hidden;
                Some(DrawCommand::Erase {
                    top_left: self.top_left,
                    glyphs: self.rendered.glyphs.blanked(),
                })
            }
        }
    }

    /// The reveal command again if the box is currently on screen, for use
    /// after something else drew over it.
    pub fn redraw(&self) -> Option<DrawCommand> {
        matches!(self.state, RevealState::Shown | RevealState::PendingErase)
            .then(|| self.reveal_command())
    }

    /// Back to `Hidden` without emitting anything (level reset clears the screen).
    pub fn reset(&mut self) {
        self.state = RevealState::Hidden;
    }

    pub fn state(&self) -> RevealState {
        self.state
    }

    pub fn is_shown(&self) -> bool {
        self.state == RevealState::Shown
    }

    /// Screen rectangle around the box center.
    pub fn footprint(&self) -> Footprint {
        Footprint::around(matrix_to_screen(self.center, self.top_left), self.footprint_size)
    }

    /// Corner glyphs `┌┐└┘` outlining the footprint.
    pub fn frame_glyphs(&self) -> [(ScreenPos, char); 4] {
        self.footprint().corners()
    }

    pub fn center(&self) -> MatrixPos {
        self.center
    }

    pub fn radius(&self) -> u32 {
        self.radius
    }

    pub fn color(&self) -> GlyphColor {
        self.color
    }

    /// Cells of the main grid whose centers lie in the disc.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn matrix(&self) -> &WallMatrix {
        &self.matrix
    }

    pub fn rendered(&self) -> &RenderedMaze {
        &self.rendered
    }

    fn reveal_command(&self) -> DrawCommand {
        DrawCommand::Reveal {
            top_left: self.top_left,
            glyphs: self.rendered.glyphs.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::generator::generate;
    use pretty_assertions::assert_eq;

    fn maze() -> Maze {
        let mut maze = Maze::from_grid(generate(10, 6, Some(5)).unwrap());
        maze.centre_on((80, 24));
        maze
    }

    #[test]
    fn test_disc_stays_within_radius_and_bounds() {
        let center = MatrixPos::new(1, 1);
        let disc = extract_disc(13, 21, center, 3);
        assert!(!disc.is_empty());
        for pos in &disc {
            assert!(distance(*pos, center) <= 3.0);
            assert!(pos.in_bounds(13, 21).is_some());
            assert!((pos.row - center.row).abs() <= 4 && (pos.col - center.col).abs() <= 4);
        }
        // (1,1) with radius 3 inside a large matrix: rows/cols 0..=4 only.
        assert_eq!(disc.len(), 18);
        assert_eq!(extract_disc(13, 21, center, 3), disc);
    }

    #[test]
    fn test_disc_radius_zero_is_center() {
        assert_eq!(
            extract_disc(5, 5, MatrixPos::new(2, 2), 0),
            vec![MatrixPos::new(2, 2)]
        );
    }

    #[test]
    fn test_disc_with_huge_radius_covers_matrix() {
        let center = MatrixPos::new(2, 2);
        for radius in [1_000_000, 3_000_000_000, u32::MAX] {
            let disc = extract_disc(5, 5, center, radius);
            assert_eq!(disc.len(), 25, "radius {radius}");
            assert_eq!(disc[0], MatrixPos::new(0, 0));
            assert_eq!(disc[24], MatrixPos::new(4, 4));
        }
    }

    #[test]
    fn test_disc_centered_outside_matrix() {
        assert!(extract_disc(5, 5, MatrixPos::new(-20, 40), 3).is_empty());
        assert_eq!(extract_disc(5, 5, MatrixPos::new(-1, 2), 1), vec![MatrixPos::new(0, 2)]);
    }

    #[test]
    fn test_extract_masks_outside_disc() {
        let maze = maze();
        let center = MatrixPos::new(5, 9);
        let b = RevealBox::extract(&maze, center, 3, (3, 3), GlyphColor::Red);
        assert_eq!(b.matrix().rows(), maze.matrix().rows());
        for row in 0..b.matrix().rows() as i32 {
            for col in 0..b.matrix().cols() as i32 {
                let pos = MatrixPos::new(row, col);
                if b.matrix().is_wall(pos) {
                    assert!(distance(pos, center) <= 3.0);
                    assert!(maze.matrix().is_wall(pos));
                }
            }
        }
        assert!(b.cells().iter().all(|c| distance(c.center(), center) <= 3.0));
        assert!(b.cells().iter().any(|c| (c.x, c.y) == (4, 2)));
        assert_eq!(b.rendered().size(), maze.size());
    }

    #[test]
    fn test_reveal_cycle() {
        let maze = maze();
        let mut b = RevealBox::extract(&maze, MatrixPos::new(5, 9), 3, (3, 3), GlyphColor::Red);
        let on = maze.matrix_to_screen(MatrixPos::new(5, 9));
        let off = on + ScreenPos::new(10, 0);

        assert_eq!(b.advance_state(off), None);
        assert_eq!(b.state(), RevealState::Hidden);

        let reveal = b.advance_state(on).expect("reveal on entry");
        assert!(!reveal.is_erase());
        assert_eq!(b.state(), RevealState::Shown);

        // staying inside, or moving within the footprint, emits nothing
        assert_eq!(b.advance_state(on), None);
        assert_eq!(b.advance_state(on + ScreenPos::new(1, 1)), None);

        assert_eq!(b.advance_state(off), None);
        assert_eq!(b.state(), RevealState::PendingErase);

        let erase = b.advance_state(off).expect("erase after exit");
        assert!(erase.is_erase());
        assert_eq!(erase.glyphs(), &reveal.glyphs().blanked());
        assert_eq!(b.state(), RevealState::Hidden);

        assert_eq!(b.advance_state(off), None);
    }

    #[test]
    fn test_reentry_while_pending_erase_keeps_box_shown() {
        let maze = maze();
        let mut b = RevealBox::extract(&maze, MatrixPos::new(5, 9), 3, (3, 3), GlyphColor::Red);
        let on = maze.matrix_to_screen(MatrixPos::new(5, 9));
        let off = on + ScreenPos::new(0, 5);
        assert!(b.advance_state(on).is_some());
        assert_eq!(b.advance_state(off), None);
        assert_eq!(b.advance_state(on), None);
        assert_eq!(b.state(), RevealState::Shown);
        assert!(b.redraw().is_some());
        b.reset();
        assert_eq!(b.redraw(), None);
    }

    #[test]
    fn test_footprint() {
        let footprint = Footprint::around(ScreenPos::new(10, 10), (3, 3));
        assert_eq!(footprint.top_left, ScreenPos::new(9, 9));
        assert!(footprint.contains(ScreenPos::new(11, 11)));
        assert!(!footprint.contains(ScreenPos::new(12, 10)));
        assert_eq!(footprint.corners()[3], (ScreenPos::new(11, 11), '┘'));
    }

    #[test]
    fn test_from_matrix_recovers_radius() {
        let maze = maze();
        let extracted = RevealBox::extract(&maze, MatrixPos::new(5, 9), 4, (3, 3), GlyphColor::Blue);
        let loaded = RevealBox::from_matrix(
            &maze,
            MatrixPos::new(5, 9),
            extracted.matrix().clone(),
            (3, 3),
            GlyphColor::Blue,
        )
        .unwrap();
        assert!(loaded.radius() <= 4);
        assert_eq!(loaded.rendered(), extracted.rendered());
    }
}
