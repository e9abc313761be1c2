//! Player cursor and movement logic.
//!
//! The player is a single `█` character in screen coordinates that moves one
//! character per key press. Movement is checked against the maze's glyphs even
//! while the maze is hidden, so walls stay solid when invisible.
//!
//! # Collisions
//!
//! A blocked move leaves the player where it was. The first blocked move
//! counts as a collision and starts a cooldown; further blocked moves during
//! the cooldown are free, so holding an arrow key against a wall does not
//! drain the score every frame.

use crate::math::coordinates::{Direction, ScreenPos};
use crate::maze::Maze;

/// Character used to draw the player.
pub const PLAYER_GLYPH: char = '█';

/// Result of [`Player::try_move`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved,
    /// A wall was in the way. `counted` is false while the collision
    /// cooldown is running.
    Blocked { counted: bool },
}

#[derive(Debug, Clone)]
pub struct Player {
    start: ScreenPos,
    position: ScreenPos,
    previous: ScreenPos,
    facing: Direction,
    /// Movement is clamped to `[0, bound - 2]` on both axes.
    bounds: (u16, u16),
    collisions: u32,
    cooldown: u32,
}

impl Player {
    /// Creates a player at `start` inside a terminal of `(columns, rows)`.
    pub fn new(start: ScreenPos, bounds: (u16, u16)) -> Self {
        Self {
            start,
            position: start,
            previous: start,
            facing: Direction::East,
            bounds,
            collisions: 0,
            cooldown: 0,
        }
    }

    pub fn position(&self) -> ScreenPos {
        self.position
    }

    /// Position before the last successful move.
    pub fn previous(&self) -> ScreenPos {
        self.previous
    }

    pub fn facing(&self) -> Direction {
        self.facing
    }

    pub fn collisions(&self) -> u32 {
        self.collisions
    }

    fn target(&self, direction: Direction) -> ScreenPos {
        let next = self.position.step(direction);
        let max_x = i32::from(self.bounds.0).saturating_sub(2).max(0);
        let max_y = i32::from(self.bounds.1).saturating_sub(2).max(0);
        ScreenPos::new(next.x.clamp(0, max_x), next.y.clamp(0, max_y))
    }

    /// Moves one step unless a wall glyph is in the way.
    pub fn try_move(&mut self, direction: Direction, maze: &Maze, cooldown_frames: u32) -> MoveOutcome {
        self.facing = direction;
        let target = self.target(direction);
        if maze.wall_at_screen(target) {
            let counted = self.cooldown == 0;
            if counted {
                self.collisions += 1;
                self.cooldown = cooldown_frames;
            }
            return MoveOutcome::Blocked { counted };
        }
        self.previous = self.position;
        self.position = target;
        MoveOutcome::Moved
    }

    /// Advances the collision cooldown by one frame.
    pub fn tick(&mut self) {
        self.cooldown = self.cooldown.saturating_sub(1);
    }

    /// Characters between the player and the nearest wall ahead, or `None`
    /// if the player faces out of the maze.
    pub fn echo_distance(&self, maze: &Maze) -> Option<u32> {
        let (cols, rows) = maze.size();
        let reach = cols.max(rows) as u32;
        let mut probe = self.position;
        for distance in 0..reach {
            probe = probe.step(self.facing);
            if maze.wall_at_screen(probe) {
                return Some(distance);
            }
        }
        None
    }

    /// Back to the start with no collisions.
    pub fn reset(&mut self) {
        self.position = self.start;
        self.previous = self.start;
        self.facing = Direction::East;
        self.collisions = 0;
        self.cooldown = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::coordinates::MatrixPos;
    use crate::maze::wall_matrix::WallMatrix;
    use pretty_assertions::assert_eq;

    /// One corridor of two cells: `┌───────┐ / │       │ / └───────┘`.
    fn corridor() -> Maze {
        let rows = vec![
            vec![true, true, true, true, true],
            vec![true, false, false, false, true],
            vec![true, true, true, true, true],
        ];
        let mut maze = Maze::load(WallMatrix::from_rows(rows).unwrap(), None, None).unwrap();
        maze.centre_on((29, 13));
        maze
    }

    fn player_at_start(maze: &Maze) -> Player {
        Player::new(maze.matrix_to_screen(MatrixPos::new(1, 1)), (29, 13))
    }

    #[test]
    fn test_moves_through_open_corridor() {
        let maze = corridor();
        let mut player = player_at_start(&maze);
        let start = player.position();
        for _ in 0..4 {
            assert_eq!(player.try_move(Direction::East, &maze, 10), MoveOutcome::Moved);
        }
        assert_eq!(player.position(), start + ScreenPos::new(4, 0));
        assert_eq!(player.previous(), start + ScreenPos::new(3, 0));
    }

    #[test]
    fn test_collision_reverts_and_cools_down() {
        let maze = corridor();
        let mut player = player_at_start(&maze);
        let start = player.position();

        assert_eq!(
            player.try_move(Direction::North, &maze, 2),
            MoveOutcome::Blocked { counted: true }
        );
        assert_eq!(player.position(), start);
        assert_eq!(player.facing(), Direction::North);
        assert_eq!(
            player.try_move(Direction::North, &maze, 2),
            MoveOutcome::Blocked { counted: false }
        );
        player.tick();
        player.tick();
        assert_eq!(
            player.try_move(Direction::South, &maze, 2),
            MoveOutcome::Blocked { counted: true }
        );
        assert_eq!(player.collisions(), 2);

        player.reset();
        assert_eq!(player.collisions(), 0);
    }

    #[test]
    fn test_echo_distance() {
        let maze = corridor();
        let mut player = player_at_start(&maze);
        // facing east from screen column 2: open at 3..=7, wall at 8
        assert_eq!(player.echo_distance(&maze), Some(5));
        player.try_move(Direction::West, &maze, 0);
        assert_eq!(player.facing(), Direction::West);
        assert_eq!(player.echo_distance(&maze), Some(0));
    }

    #[test]
    fn test_movement_is_clamped_to_terminal() {
        let maze = corridor();
        let mut player = Player::new(ScreenPos::new(0, 0), (29, 13));
        assert_eq!(player.try_move(Direction::West, &maze, 0), MoveOutcome::Moved);
        assert_eq!(player.position(), ScreenPos::new(0, 0));
    }
}
