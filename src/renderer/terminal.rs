use crate::math::coordinates::ScreenPos;
use crate::maze::raster::{GlyphColor, GlyphMatrix};
use crate::renderer::{DrawBuffer, DrawOp};
use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};
use std::io::{self, Write};

/// Terminal colour for a glyph colour tag.
pub fn term_color(color: GlyphColor) -> Color {
    match color {
        GlyphColor::Green => Color::Green,
        GlyphColor::Red => Color::Red,
        GlyphColor::Blue => Color::Blue,
        GlyphColor::Yellow => Color::Yellow,
        GlyphColor::Magenta => Color::Magenta,
        GlyphColor::Cyan => Color::Cyan,
        GlyphColor::White => Color::White,
        GlyphColor::Black => Color::Black,
    }
}

/// Writes [`DrawBuffer`]s to any writer with crossterm commands.
///
/// Everything is queued and flushed once per buffer. Positions left of or
/// above the screen origin are dropped.
pub struct TerminalRenderer<W: Write> {
    out: W,
    color: Option<Color>,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out, color: None }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Applies and drains the buffer.
    pub fn flush_buffer(&mut self, buffer: &mut DrawBuffer) -> io::Result<()> {
        let ops = buffer.take_ops();
        if ops.is_empty() {
            return Ok(());
        }
        for op in &ops {
            match op {
                DrawOp::Clear => {
                    queue!(self.out, ResetColor, Clear(ClearType::All))?;
                    self.color = None;
                }
                DrawOp::Glyphs { top_left, glyphs } => self.queue_glyphs(*top_left, glyphs)?,
                DrawOp::Text { at, text, color } => {
                    let Some((x, y)) = to_cell(*at) else {
                        continue;
                    };
                    self.set_color(color.map(term_color))?;
                    queue!(self.out, MoveTo(x, y), Print(text))?;
                }
            }
        }
        self.out.flush()
    }

    fn queue_glyphs(&mut self, top_left: ScreenPos, glyphs: &GlyphMatrix) -> io::Result<()> {
        let mut cursor = None;
        for (row, col, glyph) in glyphs.iter_glyphs() {
            let pos = top_left + ScreenPos::new(col as i32, row as i32);
            let Some(cell) = to_cell(pos) else {
                continue;
            };
            // Consecutive characters on a row don't need a cursor move.
            if cursor != Some(cell) {
                queue!(self.out, MoveTo(cell.0, cell.1))?;
            }
            self.set_color(Some(term_color(glyph.color)))?;
            queue!(self.out, Print(glyph.ch))?;
            cursor = Some((cell.0.saturating_add(1), cell.1));
        }
        Ok(())
    }

    fn set_color(&mut self, color: Option<Color>) -> io::Result<()> {
        if self.color != color {
            match color {
                Some(color) => queue!(self.out, SetForegroundColor(color))?,
                None => queue!(self.out, ResetColor)?,
            }
            self.color = color;
        }
        Ok(())
    }
}

fn to_cell(pos: ScreenPos) -> Option<(u16, u16)> {
    Some((u16::try_from(pos.x).ok()?, u16::try_from(pos.y).ok()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::Maze;
    use crate::maze::grid::Grid;

    fn flushed(buffer: &mut DrawBuffer) -> String {
        let mut renderer = TerminalRenderer::new(Vec::new());
        renderer.flush_buffer(buffer).unwrap();
        String::from_utf8(renderer.into_inner()).unwrap()
    }

    #[test]
    fn test_glyphs_are_written() {
        let mut maze = Maze::from_grid(Grid::new(1, 1).unwrap());
        maze.centre_on((20, 10));
        let mut buffer = DrawBuffer::new();
        buffer.draw(maze.draw_command());
        let out = flushed(&mut buffer);
        for ch in ['┌', '─', '┐', '│', '└', '┘'] {
            assert!(out.contains(ch), "missing {ch}");
        }
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_offscreen_text_is_dropped() {
        let mut buffer = DrawBuffer::new();
        buffer.text(ScreenPos::new(-1, 0), "hidden", None);
        buffer.text(ScreenPos::new(2, 3), "shown", Some(GlyphColor::Red));
        let out = flushed(&mut buffer);
        assert!(!out.contains("hidden"));
        assert!(out.contains("shown"));
    }

    #[test]
    fn test_empty_buffer_writes_nothing() {
        assert_eq!(flushed(&mut DrawBuffer::new()), "");
    }
}
