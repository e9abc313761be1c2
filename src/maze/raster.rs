//! Rasterizer: wall matrix to Unicode box-drawing glyphs.
//!
//! Terminal glyphs are about twice as tall as they are wide, so the wall matrix
//! is first doubled horizontally (dropping the redundant final column), then
//! the walls that became two characters thick are thinned back to one, and
//! finally every wall position gets the box-drawing character matching the
//! walls around it.
//!
//! A 2x2 maze with one inner wall renders like this:
//!
//! ```text
//! ┌───────┐
//! │       │
//! │   ╷   │
//! │   │   │
//! └───┴───┘
//! ```

use crate::error::MazeError;
use crate::math::coordinates::{Direction, ScreenPos};
use crate::maze::grid::Walls;
use crate::maze::wall_matrix::WallMatrix;
use std::fmt;
use std::str::FromStr;

/// Box-drawing character for each set of connected directions, indexed by the
/// [`Walls`] bit mask (`N=1, S=2, E=4, W=8`).
const GLYPHS: [char; 16] = [
    ' ', // -
    '╵', // n
    '╷', // s
    '│', // ns
    '╶', // e
    '└', // en
    '┌', // es
    '├', // ens
    '╴', // w
    '┘', // nw
    '┐', // sw
    '┤', // nsw
    '─', // ew
    '┴', // enw
    '┬', // esw
    '┼', // ensw
];

/// Returns the glyph for a wall connected in the given directions.
pub fn glyph_for(connections: Walls) -> char {
    GLYPHS[usize::from(connections.bits())]
}

/// Sorted lowercase direction letters, e.g. `"ensw"`; empty for no connections.
pub fn connection_key(connections: Walls) -> String {
    let mut key: Vec<char> = connections
        .iter()
        .map(|direction| match direction {
            Direction::North => 'n',
            Direction::South => 's',
            Direction::East => 'e',
            Direction::West => 'w',
        })
        .collect();
    key.sort_unstable();
    key.into_iter().collect()
}

/// Display colour tag carried by every glyph.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GlyphColor {
    #[default]
    Green,
    Red,
    Blue,
    Yellow,
    Magenta,
    Cyan,
    White,
    Black,
}

impl GlyphColor {
    pub const ALL: [GlyphColor; 8] = [
        GlyphColor::Green,
        GlyphColor::Red,
        GlyphColor::Blue,
        GlyphColor::Yellow,
        GlyphColor::Magenta,
        GlyphColor::Cyan,
        GlyphColor::White,
        GlyphColor::Black,
    ];

    pub fn name(self) -> &'static str {
        match self {
            GlyphColor::Green => "green",
            GlyphColor::Red => "red",
            GlyphColor::Blue => "blue",
            GlyphColor::Yellow => "yellow",
            GlyphColor::Magenta => "magenta",
            GlyphColor::Cyan => "cyan",
            GlyphColor::White => "white",
            GlyphColor::Black => "black",
        }
    }
}

impl FromStr for GlyphColor {
    type Err = MazeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GlyphColor::ALL
            .into_iter()
            .find(|color| color.name() == s)
            .ok_or_else(|| MazeError::malformed(format!("unknown colour {s:?}")))
    }
}

impl fmt::Display for GlyphColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One drawn character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    pub ch: char,
    pub color: GlyphColor,
}

/// Rendered character grid. `None` marks a transparent position (no wall):
/// nothing is written there, so whatever is on screen stays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphMatrix {
    rows: usize,
    cols: usize,
    cells: Vec<Option<Glyph>>,
}

impl GlyphMatrix {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> Option<Glyph> {
        if row < self.rows && col < self.cols {
            self.cells[row * self.cols + col]
        } else {
            None
        }
    }

    /// True if a visible wall glyph occupies `(row, col)`.
    pub fn is_wall(&self, row: usize, col: usize) -> bool {
        self.get(row, col).is_some_and(|glyph| glyph.ch != ' ')
    }

    /// Same shape, every glyph replaced by a space: drawing it erases the original.
    pub fn blanked(&self) -> Self {
        Self {
            rows: self.rows,
            cols: self.cols,
            cells: self
                .cells
                .iter()
                .map(|cell| cell.map(|glyph| Glyph { ch: ' ', ..glyph }))
                .collect(),
        }
    }

    /// Hides a single glyph, making its position transparent.
    pub fn hide(&mut self, row: usize, col: usize) {
        if row < self.rows && col < self.cols {
            self.cells[row * self.cols + col] = None;
        }
    }

    /// Recolours a single glyph, if present.
    pub fn set_color(&mut self, row: usize, col: usize, color: GlyphColor) {
        if row < self.rows && col < self.cols {
            if let Some(glyph) = &mut self.cells[row * self.cols + col] {
                glyph.color = color;
            }
        }
    }

    /// Iterates over `(row, col, glyph)` for every non-transparent position.
    pub fn iter_glyphs(&self) -> impl Iterator<Item = (usize, usize, Glyph)> + '_ {
        self.cells.iter().enumerate().filter_map(|(index, cell)| {
            cell.map(|glyph| (index / self.cols, index % self.cols, glyph))
        })
    }

    /// Joined string form, one line per row, transparent positions as spaces.
    pub fn to_text(&self) -> String {
        self.cells
            .chunks(self.cols)
            .map(|row| row.iter().map(|cell| cell.map_or(' ', |g| g.ch)).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Output of [`rasterize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMaze {
    /// Per-position glyphs.
    pub glyphs: GlyphMatrix,
    /// Printable string form.
    pub text: String,
    /// `(row, col)` of every non-blank glyph.
    pub placed: Vec<(usize, usize)>,
}

impl RenderedMaze {
    /// Size in terminal characters as `(columns, rows)`.
    pub fn size(&self) -> (usize, usize) {
        (self.glyphs.cols(), self.glyphs.rows())
    }
}

/// A glyph matrix to be drawn at a screen position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawCommand {
    /// Draw the glyphs.
    Reveal {
        top_left: ScreenPos,
        glyphs: GlyphMatrix,
    },
    /// Overwrite previously drawn glyphs with spaces.
    Erase {
        top_left: ScreenPos,
        glyphs: GlyphMatrix,
    },
}

impl DrawCommand {
    pub fn top_left(&self) -> ScreenPos {
        match self {
            DrawCommand::Reveal { top_left, .. } | DrawCommand::Erase { top_left, .. } => {
                *top_left
            }
        }
    }

    pub fn glyphs(&self) -> &GlyphMatrix {
        match self {
            DrawCommand::Reveal { glyphs, .. } | DrawCommand::Erase { glyphs, .. } => glyphs,
        }
    }

    pub fn is_erase(&self) -> bool {
        matches!(self, DrawCommand::Erase { .. })
    }
}

/// Turns a wall matrix into box-drawing glyphs of the given colour.
pub fn rasterize(matrix: &WallMatrix, color: GlyphColor) -> RenderedMaze {
    let rows = matrix.rows();
    let cols = matrix.cols() * 2 - 1;

    // Every column twice, minus the final duplicate.
    let doubled: Vec<bool> = matrix
        .iter_rows()
        .flat_map(|row| (0..cols).map(move |col| row[col / 2]))
        .collect();

    // A doubled wall next to an open position is one character too thick.
    let mut walls = doubled.clone();
    for row in 0..rows {
        for col in 1..cols {
            let index = row * cols + col;
            if !doubled[index] && doubled[index - 1] {
                walls[index - 1] = false;
            }
        }
    }

    let wall_at = |row: i64, col: i64| -> bool {
        row >= 0
            && col >= 0
            && (row as usize) < rows
            && (col as usize) < cols
            && walls[row as usize * cols + col as usize]
    };

    let mut cells = Vec::with_capacity(rows * cols);
    let mut placed = Vec::new();
    for row in 0..rows {
        for col in 0..cols {
            let (r, c) = (row as i64, col as i64);
            if !wall_at(r, c) {
                cells.push(None);
                continue;
            }
            let connections: Walls = Direction::ALL
                .into_iter()
                .filter(|direction| {
                    let (dx, dy) = direction.delta();
                    wall_at(r + i64::from(dy), c + i64::from(dx))
                })
                .collect();
            if connections.is_empty() {
                // Lone pillar: nothing to connect, draws as blank.
                cells.push(None);
                continue;
            }
            cells.push(Some(Glyph {
                ch: glyph_for(connections),
                color,
            }));
            placed.push((row, col));
        }
    }

    let glyphs = GlyphMatrix { rows, cols, cells };
    let text = glyphs.to_text();
    RenderedMaze {
        glyphs,
        text,
        placed,
    }
}
