//! Keyboard input for the game.
//!
//! [`GameKey`] abstracts game actions from physical keys; [`GameKey::from_key_event`]
//! maps crossterm key events onto it.

use crate::math::coordinates::Direction;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// All in-game actions that can be triggered from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameKey {
    /// Move up (Up Arrow).
    Up,
    /// Move down (Down Arrow).
    Down,
    /// Move left (Left Arrow).
    Left,
    /// Move right (Right Arrow).
    Right,
    /// Listen for the nearest wall ahead (E).
    Echo,
    /// Show or hide the maze (H).
    ToggleMaze,
    /// Restart the level (R).
    Reset,
    /// Quit the game (Q or Ctrl-C).
    Quit,
}

impl GameKey {
    /// Maps a key press to a game action. Releases and repeats of
    /// non-movement keys are ignored.
    pub fn from_key_event(event: &KeyEvent) -> Option<Self> {
        if event.kind == KeyEventKind::Release {
            return None;
        }
        if event.modifiers.contains(KeyModifiers::CONTROL) {
            return matches!(event.code, KeyCode::Char('c')).then_some(GameKey::Quit);
        }
        let key = match event.code {
            KeyCode::Up => GameKey::Up,
            KeyCode::Down => GameKey::Down,
            KeyCode::Left => GameKey::Left,
            KeyCode::Right => GameKey::Right,
            KeyCode::Char(c) => match c.to_ascii_lowercase() {
                'e' => GameKey::Echo,
                'h' => GameKey::ToggleMaze,
                'r' => GameKey::Reset,
                'q' => GameKey::Quit,
                _ => return None,
            },
            _ => return None,
        };
        if event.kind == KeyEventKind::Repeat && key.direction().is_none() {
            return None;
        }
        Some(key)
    }

    /// Movement direction for arrow keys.
    pub fn direction(self) -> Option<Direction> {
        match self {
            GameKey::Up => Some(Direction::North),
            GameKey::Down => Some(Direction::South),
            GameKey::Left => Some(Direction::West),
            GameKey::Right => Some(Direction::East),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;
    use test_case::test_case;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test_case(KeyCode::Up, Some(GameKey::Up) ; "up arrow")]
    #[test_case(KeyCode::Right, Some(GameKey::Right) ; "right arrow")]
    #[test_case(KeyCode::Char('e'), Some(GameKey::Echo) ; "echo")]
    #[test_case(KeyCode::Char('H'), Some(GameKey::ToggleMaze) ; "uppercase toggle")]
    #[test_case(KeyCode::Char('r'), Some(GameKey::Reset) ; "reset")]
    #[test_case(KeyCode::Char('q'), Some(GameKey::Quit) ; "quit")]
    #[test_case(KeyCode::Char('x'), None ; "unmapped letter")]
    #[test_case(KeyCode::Enter, None ; "unmapped key")]
    fn test_key_mapping(code: KeyCode, expected: Option<GameKey>) {
        assert_eq!(GameKey::from_key_event(&press(code)), expected);
    }

    #[test]
    fn test_ctrl_c_quits() {
        let event = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(GameKey::from_key_event(&event), Some(GameKey::Quit));
        let event = KeyEvent::new(KeyCode::Char('e'), KeyModifiers::CONTROL);
        assert_eq!(GameKey::from_key_event(&event), None);
    }

    #[test]
    fn test_release_and_repeat() {
        let release = KeyEvent::new_with_kind(KeyCode::Up, KeyModifiers::NONE, KeyEventKind::Release);
        assert_eq!(GameKey::from_key_event(&release), None);

        let held = KeyEvent::new_with_kind_and_state(
            KeyCode::Left,
            KeyModifiers::NONE,
            KeyEventKind::Repeat,
            KeyEventState::NONE,
        );
        assert_eq!(GameKey::from_key_event(&held), Some(GameKey::Left));
        let held_reset =
            KeyEvent::new_with_kind(KeyCode::Char('r'), KeyModifiers::NONE, KeyEventKind::Repeat);
        assert_eq!(GameKey::from_key_event(&held_reset), None);
    }

    #[test]
    fn test_directions() {
        assert_eq!(GameKey::Down.direction(), Some(Direction::South));
        assert_eq!(GameKey::Echo.direction(), None);
    }
}
