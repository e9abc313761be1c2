//! Play loop.
//!
//! Single-threaded: poll the keyboard with the configured frame timeout, feed
//! at most one key to [`Level::next_frame`], flush the frame, repeat. A key
//! press ends the wait early, so held keys move the player faster than the
//! frame rate.
//!
//! Endless mode generates a new, slightly larger level every time the player
//! wins; the score carries over and each win pays one point per cell.

use crate::config::GameConfig;
use crate::error::Result;
use crate::game::keys::GameKey;
use crate::game::score::Score;
use crate::game::{Level, LevelStatus};
use crate::maze::Maze;
use crate::maze::layout::layout_boxes;
use crate::maze::save_data::{LevelParts, SaveData};
use crate::renderer::DrawBuffer;
use crate::renderer::terminal::TerminalRenderer;
use crossterm::cursor::{Hide, Show};
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::style::ResetColor;
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Where levels come from.
#[derive(Debug, Clone)]
pub enum LevelSource {
    /// One level file; winning ends the run.
    File(PathBuf),
    /// Generated levels starting at `width x height` cells.
    Endless { width: usize, height: usize },
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub levels_won: u32,
    pub score: f64,
    pub last_status: LevelStatus,
}

/// Clamps a maze size in cells so the rendered maze, its boundary and the
/// status line fit in a terminal of `(columns, rows)`.
pub fn fit_to_terminal(width: usize, height: usize, terminal: (u16, u16)) -> (usize, usize) {
    // 4w+1 columns and 2h+1 rows, plus the boundary on each side and one status row.
    let max_width = usize::from(terminal.0).saturating_sub(3) / 4;
    let max_height = usize::from(terminal.1).saturating_sub(4) / 2;
    (width.min(max_width).max(1), height.min(max_height).max(1))
}

/// Reward for finishing an endless level: one point per cell.
pub fn endless_reward(width: usize, height: usize) -> f64 {
    (width * height) as f64
}

/// A generated maze with automatically laid out boxes.
///
/// # Errors
/// Generation and placement errors.
pub fn generated_level<R: Rng>(
    width: usize,
    height: usize,
    config: &GameConfig,
    rng: &mut R,
) -> Result<LevelParts> {
    let maze = Maze::generate(width, height, config, rng)?;
    let boxes = layout_boxes(&maze, config, rng);
    Ok(LevelParts {
        maze,
        boxes,
        dialogues: Vec::new(),
    })
}

/// Raw mode and the alternate screen, undone on drop even if the game errors.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen, Hide)?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(err) = execute!(io::stdout(), ResetColor, Show, LeaveAlternateScreen) {
            warn!(%err, "failed to leave the alternate screen");
        }
        if let Err(err) = terminal::disable_raw_mode() {
            warn!(%err, "failed to disable raw mode");
        }
    }
}

/// Runs the game until the player quits, loses, or wins a file level.
///
/// # Errors
/// Terminal IO errors, unreadable level files, and generation failures.
pub fn run(source: LevelSource, config: &GameConfig, seed: Option<u64>) -> Result<RunSummary> {
    let mut rng = seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
    let size = terminal::size()?;

    let (mut width, mut height) = (0, 0);
    let parts = match &source {
        LevelSource::File(path) => SaveData::read(path)?.into_level_parts(config)?,
        LevelSource::Endless {
            width: start_width,
            height: start_height,
        } => {
            (width, height) = fit_to_terminal(*start_width, *start_height, size);
            generated_level(width, height, config, &mut rng)?
        }
    };
    let (cols, rows) = parts.maze.size();
    if cols + 2 > usize::from(size.0) || rows + 2 > usize::from(size.1) {
        warn!(cols, rows, terminal = ?size, "maze does not fit the terminal");
    }

    let _guard = TerminalGuard::enter()?;
    let mut renderer = TerminalRenderer::new(BufWriter::new(io::stdout()));
    let mut buffer = DrawBuffer::new();
    let mut score = Score::new(config);
    if let LevelSource::Endless { .. } = source {
        score.set_goal_reward(endless_reward(width, height));
    }
    let mut level = Level::new(parts, config, size, score);
    let mut levels_won = 0;
    let timeout = Duration::from_millis(config.frame_timeout_ms);
    info!(?source, "game started");

    loop {
        let key = if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key_event) => GameKey::from_key_event(&key_event),
                other => {
                    debug!(?other, "ignored event");
                    None
                }
            }
        } else {
            None
        };

        let status = level.next_frame(key, &mut buffer);
        renderer.flush_buffer(&mut buffer)?;

        match status {
            LevelStatus::Continue => {}
            LevelStatus::Won => {
                levels_won += 1;
                if let LevelSource::Endless { .. } = source {
                    (width, height) = fit_to_terminal(width + 2, height + 1, size);
                    info!(level = levels_won + 1, width, height, "next level");
                    let parts = generated_level(width, height, config, &mut rng)?;
                    let mut score = level.into_score();
                    score.set_goal_reward(endless_reward(width, height));
                    level = Level::new(parts, config, size, score);
                } else {
                    return Ok(summary(&level, levels_won, status));
                }
            }
            LevelStatus::Lost | LevelStatus::Quit => {
                return Ok(summary(&level, levels_won, status));
            }
        }
    }
}

fn summary(level: &Level, levels_won: u32, last_status: LevelStatus) -> RunSummary {
    RunSummary {
        levels_won,
        score: level.score().value(),
        last_status,
    }
}
