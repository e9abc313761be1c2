//! Level runtime.
//!
//! A [`Level`] is advanced one frame at a time with [`Level::next_frame`]. The
//! app calls it once per input poll (a key press or the poll timeout), so
//! every counter here is measured in frames rather than wall-clock time.
//!
//! Lifecycle of a level:
//! 1. First frame: the whole maze is drawn together with the boundary, the
//!    end marker and the player.
//! 2. The next `show_frames` frames ignore input. When the counter runs out
//!    the maze is erased. With `show_frames` at zero it is erased right away.
//! 3. From then on the player walks the invisible maze. Boxes reveal their
//!    part of it while the player stands on them.

pub mod keys;
pub mod player;
pub mod score;

use crate::config::GameConfig;
use crate::math::coordinates::{Direction, MatrixPos, ScreenPos};
use crate::maze::Maze;
use crate::maze::region::RevealBox;
use crate::maze::save_data::{Dialogue, LevelParts};
use crate::renderer::{Cue, DrawBuffer};
use self::keys::GameKey;
use self::player::{MoveOutcome, PLAYER_GLYPH, Player};
use self::score::Score;
use tracing::{debug, info};

/// Character marking the end of the level.
pub const END_GLYPH: char = '&';

/// What the app should do after a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelStatus {
    Continue,
    Won,
    Lost,
    Quit,
}

pub struct Level {
    maze: Maze,
    boxes: Vec<RevealBox>,
    dialogues: Vec<Dialogue>,
    pending_dialogues: Vec<Dialogue>,
    /// Last dialogue drawn, so it can be blanked when the next one shows.
    shown_text: Option<(ScreenPos, usize)>,
    player: Player,
    score: Score,
    config: GameConfig,
    terminal: (u16, u16),
    first_frame: bool,
    reveal_frames: u32,
    maze_visible: bool,
}

impl Level {
    /// Sets up a level centred in a terminal of `(columns, rows)`.
    ///
    /// Without a start position the player starts in the top-left cell.
    pub fn new(parts: LevelParts, config: &GameConfig, terminal: (u16, u16), score: Score) -> Self {
        let LevelParts {
            mut maze,
            mut boxes,
            dialogues,
        } = parts;
        maze.centre_on(terminal);
        for reveal_box in &mut boxes {
            reveal_box.centre_on(terminal);
        }
        let start = maze.matrix_to_screen(maze.start.unwrap_or(MatrixPos::cell_center(0, 0)));
        Self {
            player: Player::new(start, terminal),
            maze,
            boxes,
            pending_dialogues: dialogues.clone(),
            dialogues,
            shown_text: None,
            score,
            config: config.clone(),
            terminal,
            first_frame: true,
            reveal_frames: 0,
            maze_visible: false,
        }
    }

    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    pub fn boxes(&self) -> &[RevealBox] {
        &self.boxes
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn score(&self) -> &Score {
        &self.score
    }

    /// Hands the score over to the next level.
    pub fn into_score(self) -> Score {
        self.score
    }

    /// Frames left before the maze is hidden.
    pub fn reveal_frames(&self) -> u32 {
        self.reveal_frames
    }

    pub fn maze_visible(&self) -> bool {
        self.maze_visible
    }

    fn end_screen(&self) -> Option<ScreenPos> {
        self.maze.end.map(|end| self.maze.matrix_to_screen(end))
    }

    /// Advances the level by one frame, queuing output into `buffer`.
    pub fn next_frame(&mut self, key: Option<GameKey>, buffer: &mut DrawBuffer) -> LevelStatus {
        if self.first_frame {
            self.first_frame = false;
            self.reveal_frames = self.config.show_frames;
            buffer.clear_screen();
            self.draw_boundary(buffer);
            self.show_maze(buffer);
            buffer.cue(Cue::LevelUp);
            info!(show_frames = self.reveal_frames, "level started");
            if self.reveal_frames == 0 {
                self.hide_maze(buffer);
            }
            return LevelStatus::Continue;
        }

        if self.reveal_frames > 0 {
            self.reveal_frames -= 1;
            if self.reveal_frames == 0 {
                debug!("hiding maze");
                self.hide_maze(buffer);
            }
            return LevelStatus::Continue;
        }

        match key {
            Some(GameKey::Quit) => return LevelStatus::Quit,
            Some(GameKey::Reset) => {
                info!("level reset");
                self.reset();
                return LevelStatus::Continue;
            }
            Some(GameKey::ToggleMaze) => {
                if self.maze_visible {
                    self.hide_maze(buffer);
                } else {
                    self.show_maze(buffer);
                }
            }
            Some(GameKey::Echo) => buffer.cue(Cue::Echo {
                direction: self.player.facing(),
                distance: self.player.echo_distance(&self.maze),
            }),
            Some(key) => {
                if let Some(direction) = key.direction() {
                    self.move_player(direction, buffer);
                }
            }
            None => {}
        }
        self.player.tick();

        self.advance_boxes(buffer);
        self.show_dialogue(buffer);
        self.draw_markers(buffer);

        if self.end_screen() == Some(self.player.position()) {
            self.score.reach_goal();
            buffer.cue(Cue::Won);
            info!(score = self.score.value(), "level won");
            return LevelStatus::Won;
        }

        let inside_box = self
            .boxes
            .iter()
            .any(|b| b.footprint().contains(self.player.position()));
        self.score.tick(inside_box);
        self.draw_score(buffer);
        if self.score.is_depleted() {
            buffer.cue(Cue::Lost);
            info!("out of persistence");
            return LevelStatus::Lost;
        }
        LevelStatus::Continue
    }

    /// Restarts the level: the next frame shows the maze again.
    pub fn reset(&mut self) {
        self.first_frame = true;
        self.reveal_frames = 0;
        self.maze_visible = false;
        self.player.reset();
        for reveal_box in &mut self.boxes {
            reveal_box.reset();
        }
        self.pending_dialogues = self.dialogues.clone();
        self.shown_text = None;
    }

    fn move_player(&mut self, direction: Direction, buffer: &mut DrawBuffer) {
        match self
            .player
            .try_move(direction, &self.maze, self.config.collision_cooldown_frames)
        {
            MoveOutcome::Moved => buffer.text(self.player.previous(), " ", None),
            MoveOutcome::Blocked { counted: true } => {
                let collisions = self.player.collisions();
                self.score.collide(collisions);
                buffer.cue(Cue::HitWall(direction));
                buffer.text(ScreenPos::new(0, 0), format!("Collisions: {collisions}"), None);
                debug!(collisions, "hit wall");
            }
            MoveOutcome::Blocked { counted: false } => {}
        }
    }

    fn advance_boxes(&mut self, buffer: &mut DrawBuffer) {
        let player = self.player.position();
        let mut erased = false;
        for reveal_box in &mut self.boxes {
            if let Some(command) = reveal_box.advance_state(player) {
                if command.is_erase() {
                    erased = true;
                } else {
                    buffer.cue(Cue::EnterBox(reveal_box.color()));
                }
                buffer.draw(command);
            }
        }
        // Blanks may have hit glyphs of overlapping boxes or the visible maze.
        if erased {
            if self.maze_visible {
                buffer.draw(self.maze.draw_command());
            }
            for reveal_box in &self.boxes {
                if let Some(command) = reveal_box.redraw() {
                    buffer.draw(command);
                }
            }
        }
    }

    fn show_dialogue(&mut self, buffer: &mut DrawBuffer) {
        let here = self.maze.screen_to_matrix(self.player.position());
        let Some(index) = self.pending_dialogues.iter().position(|d| d.hit == here) else {
            return;
        };
        let dialogue = self.pending_dialogues.remove(index);
        if let Some((at, len)) = self.shown_text.take() {
            buffer.text(at, " ".repeat(len), None);
        }
        let at = self.maze.matrix_to_screen(dialogue.text_at);
        debug!(text = %dialogue.text, "dialogue");
        self.shown_text = Some((at, dialogue.text.chars().count()));
        buffer.text(at, dialogue.text, None);
    }

    fn show_maze(&mut self, buffer: &mut DrawBuffer) {
        self.maze_visible = true;
        buffer.draw(self.maze.draw_command());
        self.redraw_boxes(buffer);
        self.draw_markers(buffer);
        self.draw_score(buffer);
    }

    fn hide_maze(&mut self, buffer: &mut DrawBuffer) {
        self.maze_visible = false;
        buffer.draw(self.maze.erase_command());
        self.redraw_boxes(buffer);
        self.draw_markers(buffer);
    }

    fn redraw_boxes(&self, buffer: &mut DrawBuffer) {
        for reveal_box in &self.boxes {
            if let Some(command) = reveal_box.redraw() {
                buffer.draw(command);
            }
        }
    }

    /// Box outlines, the end marker, then the player on top.
    fn draw_markers(&self, buffer: &mut DrawBuffer) {
        for reveal_box in &self.boxes {
            for (at, corner) in reveal_box.frame_glyphs() {
                buffer.text(at, corner.to_string(), Some(reveal_box.color()));
            }
        }
        if let Some(end) = self.end_screen() {
            buffer.text(end, END_GLYPH.to_string(), None);
        }
        buffer.text(self.player.position(), PLAYER_GLYPH.to_string(), None);
    }

    fn draw_score(&self, buffer: &mut DrawBuffer) {
        let text = self.score.text();
        let x = i32::from(self.terminal.0) - text.chars().count() as i32;
        buffer.text(ScreenPos::new(x.max(0), 0), text, None);
    }

    /// Double-line frame one character outside the maze.
    fn draw_boundary(&self, buffer: &mut DrawBuffer) {
        let (cols, rows) = self.maze.size();
        let top_left = self.maze.top_left() - ScreenPos::new(1, 1);
        let horizontal = "═".repeat(cols);
        buffer.text(top_left, format!("╔{horizontal}╗"), None);
        for row in 1..=rows as i32 {
            buffer.text(top_left + ScreenPos::new(0, row), "║", None);
            buffer.text(top_left + ScreenPos::new(cols as i32 + 1, row), "║", None);
        }
        buffer.text(
            top_left + ScreenPos::new(0, rows as i32 + 1),
            format!("╚{horizontal}╝"),
            None,
        );
    }
}
