//! Maze generation, rasterization, placement, and reveal boxes.
//!
//! [`Maze`] ties the pieces together: a [`grid::Grid`] (source of truth for
//! walls), its [`wall_matrix::WallMatrix`], the rendered glyphs, start/end
//! positions, and where on screen the maze is drawn.

pub mod generator;
pub mod grid;
pub mod layout;
pub mod placement;
pub mod raster;
pub mod region;
pub mod save_data;
pub mod wall_matrix;

use crate::config::{GameConfig, PlacementMode};
use crate::error::Result;
use crate::math::coordinates::{
    MatrixPos, ScreenPos, centered_top_left, matrix_to_screen, screen_to_matrix,
};
use self::grid::Grid;
use self::raster::{DrawCommand, GlyphColor, GlyphMatrix, RenderedMaze, rasterize};
use self::wall_matrix::WallMatrix;
use rand::Rng;
use tracing::debug;

/// A maze ready to be drawn and walked.
#[derive(Debug, Clone)]
pub struct Maze {
    grid: Grid,
    matrix: WallMatrix,
    rendered: RenderedMaze,
    top_left: ScreenPos,
    /// Start position (matrix coordinates), if placed.
    pub start: Option<MatrixPos>,
    /// End position (matrix coordinates), if placed.
    pub end: Option<MatrixPos>,
}

impl Maze {
    /// Wraps a grid, deriving its wall matrix and glyphs. No start/end yet.
    pub fn from_grid(grid: Grid) -> Self {
        let matrix = WallMatrix::from_grid(&grid);
        let rendered = rasterize(&matrix, GlyphColor::Green);
        Self {
            grid,
            matrix,
            rendered,
            top_left: ScreenPos::default(),
            start: None,
            end: None,
        }
    }

    /// Generates a random perfect maze and places start and end as configured.
    ///
    /// # Errors
    /// `InvalidDimensions` for zero sizes, `PlacementUnsatisfiable` if no
    /// start/end pair can be found even after relaxing the distance.
    pub fn generate<R: Rng>(
        width: usize,
        height: usize,
        config: &GameConfig,
        rng: &mut R,
    ) -> Result<Self> {
        let grid = generator::generate_with(width, height, rng)?;
        let mut maze = Self::from_grid(grid);
        let (start, end) = match config.placement_mode {
            PlacementMode::Random => {
                let min_distance =
                    placement::min_distance_for(&maze.matrix, config.min_distance_factor);
                placement::place_relaxed(
                    &maze.matrix,
                    min_distance,
                    config.placement_attempts,
                    config.relax_steps,
                    rng,
                )?
            }
            PlacementMode::OppositeSides => placement::place_opposite_sides(&maze.matrix, rng)?,
        };
        maze.start = Some(start);
        maze.end = Some(end);
        debug!(width, height, ?start, ?end, "generated maze");
        Ok(maze)
    }

    /// Builds a maze from an existing wall matrix, bypassing generation.
    ///
    /// # Errors
    /// `MalformedSaveData` if the matrix is not a valid maze shape.
    pub fn load(
        matrix: WallMatrix,
        start: Option<MatrixPos>,
        end: Option<MatrixPos>,
    ) -> Result<Self> {
        let grid = Grid::from_wall_matrix(&matrix)?;
        let rendered = rasterize(&matrix, GlyphColor::Green);
        Ok(Self {
            grid,
            matrix,
            rendered,
            top_left: ScreenPos::default(),
            start,
            end,
        })
    }

    /// Printable glyph string and the screen offset to draw it at.
    pub fn render(&self) -> (&str, ScreenPos) {
        (&self.rendered.text, self.top_left)
    }

    /// Centers the maze in a terminal of `(columns, rows)`.
    pub fn centre_on(&mut self, terminal: (u16, u16)) {
        self.top_left = centered_top_left(terminal, self.rendered.size());
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn matrix(&self) -> &WallMatrix {
        &self.matrix
    }

    pub fn rendered(&self) -> &RenderedMaze {
        &self.rendered
    }

    pub fn glyphs(&self) -> &GlyphMatrix {
        &self.rendered.glyphs
    }

    pub fn top_left(&self) -> ScreenPos {
        self.top_left
    }

    /// Rendered size in characters, `(columns, rows)`.
    pub fn size(&self) -> (usize, usize) {
        self.rendered.size()
    }

    pub fn screen_to_matrix(&self, screen: ScreenPos) -> MatrixPos {
        screen_to_matrix(screen, self.top_left)
    }

    pub fn matrix_to_screen(&self, mat: MatrixPos) -> ScreenPos {
        matrix_to_screen(mat, self.top_left)
    }

    /// True if a wall glyph is drawn at this screen position. Positions outside
    /// the rendered maze are never walls.
    pub fn wall_at_screen(&self, screen: ScreenPos) -> bool {
        let offset = screen - self.top_left;
        match (usize::try_from(offset.y), usize::try_from(offset.x)) {
            (Ok(row), Ok(col)) => self.rendered.glyphs.is_wall(row, col),
            _ => false,
        }
    }

    /// Command drawing the whole maze.
    pub fn draw_command(&self) -> DrawCommand {
        DrawCommand::Reveal {
            top_left: self.top_left,
            glyphs: self.rendered.glyphs.clone(),
        }
    }

    /// Command erasing everything [`Maze::draw_command`] drew.
    pub fn erase_command(&self) -> DrawCommand {
        DrawCommand::Erase {
            top_left: self.top_left,
            glyphs: self.rendered.glyphs.blanked(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_generate_places_start_and_end() {
        let mut rng = StdRng::seed_from_u64(11);
        let maze = Maze::generate(12, 6, &GameConfig::default(), &mut rng).unwrap();
        let (start, end) = (maze.start.unwrap(), maze.end.unwrap());
        assert!(maze.matrix().is_open(start));
        assert!(maze.matrix().is_open(end));
        assert_ne!(start, end);
        assert_eq!(maze.grid().connection_count(), 71);
    }

    #[test]
    fn test_render_is_centered() {
        let mut maze = Maze::from_grid(Grid::new(5, 5).unwrap());
        assert_eq!(maze.size(), (21, 11));
        maze.centre_on((81, 25));
        let (text, top_left) = maze.render();
        assert_eq!(top_left, ScreenPos::new(30, 7));
        assert_eq!(text.lines().count(), 11);
    }

    #[test]
    fn test_wall_at_screen() {
        let mut maze = Maze::from_grid(Grid::new(1, 1).unwrap());
        maze.centre_on((15, 13));
        let top_left = maze.top_left();
        assert_eq!(top_left, ScreenPos::new(5, 5));
        assert!(maze.wall_at_screen(top_left));
        assert!(!maze.wall_at_screen(top_left + ScreenPos::new(2, 1)));
        assert!(!maze.wall_at_screen(top_left - ScreenPos::new(1, 0)));
        assert!(!maze.wall_at_screen(top_left + ScreenPos::new(40, 0)));
    }

    #[test]
    fn test_load_rejects_even_matrix() {
        let matrix = WallMatrix::from_rows(vec![vec![true; 4]; 4]).unwrap();
        assert!(Maze::load(matrix, None, None).is_err());
    }

    #[test]
    fn test_erase_command_matches_draw_command() {
        let maze = Maze::from_grid(Grid::new(3, 2).unwrap());
        let draw = maze.draw_command();
        let erase = maze.erase_command();
        assert!(erase.is_erase() && !draw.is_erase());
        assert_eq!(erase.glyphs().iter_glyphs().count(), draw.glyphs().iter_glyphs().count());
    }
}
