//! Frame output.
//!
//! The game never writes to the terminal directly. Each frame it fills a
//! [`DrawBuffer`] with [`DrawOp`]s and [`Cue`]s, and a backend such as
//! [`terminal::TerminalRenderer`] flushes the buffer. This keeps the game
//! logic testable without a terminal.

/// Crossterm backend.
pub mod terminal;

use crate::math::coordinates::{Direction, ScreenPos};
use crate::maze::raster::{DrawCommand, GlyphColor, GlyphMatrix};
use tracing::debug;

/// One drawing instruction, applied in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawOp {
    /// Clear the whole screen.
    Clear,
    /// Draw a glyph matrix with its top-left corner at `top_left`.
    /// Transparent positions are skipped.
    Glyphs {
        top_left: ScreenPos,
        glyphs: GlyphMatrix,
    },
    /// Print a single line of text. `None` uses the terminal's default colour.
    Text {
        at: ScreenPos,
        text: String,
        color: Option<GlyphColor>,
    },
}

/// Sound cues. Playback is not implemented; cues are logged and can be
/// inspected in tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cue {
    LevelUp,
    EnterBox(GlyphColor),
    HitWall(Direction),
    /// Distance in characters to the nearest wall in `direction`, if any.
    Echo {
        direction: Direction,
        distance: Option<u32>,
    },
    Won,
    Lost,
}

/// Everything one frame wants to show or play.
#[derive(Debug, Default)]
pub struct DrawBuffer {
    ops: Vec<DrawOp>,
    cues: Vec<Cue>,
}

impl DrawBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear_screen(&mut self) {
        self.ops.push(DrawOp::Clear);
    }

    /// Queues a reveal or erase command.
    pub fn draw(&mut self, command: DrawCommand) {
        let (top_left, glyphs) = match command {
            DrawCommand::Reveal { top_left, glyphs } | DrawCommand::Erase { top_left, glyphs } => {
                (top_left, glyphs)
            }
        };
        self.ops.push(DrawOp::Glyphs { top_left, glyphs });
    }

    pub fn text(&mut self, at: ScreenPos, text: impl Into<String>, color: Option<GlyphColor>) {
        self.ops.push(DrawOp::Text {
            at,
            text: text.into(),
            color,
        });
    }

    pub fn cue(&mut self, cue: Cue) {
        debug!(?cue, "cue");
        self.cues.push(cue);
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn cues(&self) -> &[Cue] {
        &self.cues
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty() && self.cues.is_empty()
    }

    /// Takes the queued ops, leaving the buffer empty.
    pub fn take_ops(&mut self) -> Vec<DrawOp> {
        self.cues.clear();
        std::mem::take(&mut self.ops)
    }
}
