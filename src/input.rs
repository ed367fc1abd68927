use ggez::input::keyboard::KeyCode;

use crate::grid::Direction;

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Command {
    Turn(Direction),
    Restart,
    Dismiss,
}

pub fn command_for_key(keycode: KeyCode) -> Option<Command> {
    match keycode {
        KeyCode::Up | KeyCode::W => Some(Command::Turn(Direction::Up)),
        KeyCode::Down | KeyCode::S => Some(Command::Turn(Direction::Down)),
        KeyCode::Left | KeyCode::A => Some(Command::Turn(Direction::Left)),
        KeyCode::Right | KeyCode::D => Some(Command::Turn(Direction::Right)),
        KeyCode::R => Some(Command::Restart),
        KeyCode::Return | KeyCode::Space | KeyCode::Escape => Some(Command::Dismiss),
        _ => None,
    }
}

/// Holds the direction requested since the last tick.
#[derive(Debug, Default, Clone)]
pub struct DirectionInput {
    pending: Option<Direction>,
}

impl DirectionInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `requested` unless it would reverse `current`. Later accepted
    /// requests overwrite earlier ones. Returns whether it was accepted.
    pub fn request(&mut self, requested: Direction, current: Direction) -> bool {
        if requested.is_neutral() {
            return false;
        }
        if !current.is_neutral() && requested == current.opposite() {
            return false;
        }
        self.pending = Some(requested);
        true
    }

    pub fn take(&mut self) -> Option<Direction> {
        self.pending.take()
    }

    pub fn clear(&mut self) {
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reversal_is_rejected() {
        let mut input = DirectionInput::new();
        assert!(!input.request(Direction::Left, Direction::Right));
        assert_eq!(input.take(), None);
        assert!(!input.request(Direction::Down, Direction::Up));
        assert_eq!(input.take(), None);
    }

    #[test]
    fn neutral_accepts_anything() {
        for dir in [Direction::Up, Direction::Down, Direction::Left, Direction::Right] {
            let mut input = DirectionInput::new();
            assert!(input.request(dir, Direction::Neutral));
            assert_eq!(input.take(), Some(dir));
        }
    }

    #[test]
    fn last_accepted_request_wins() {
        let mut input = DirectionInput::new();
        assert!(input.request(Direction::Up, Direction::Right));
        assert!(input.request(Direction::Down, Direction::Right));
        assert_eq!(input.take(), Some(Direction::Down));
        assert_eq!(input.take(), None);
    }

    #[test]
    fn quick_turns_cannot_fold_back() {
        // Moving right: Up then Left between ticks must not end up as Left.
        let mut input = DirectionInput::new();
        assert!(input.request(Direction::Up, Direction::Right));
        assert!(!input.request(Direction::Left, Direction::Right));
        assert_eq!(input.take(), Some(Direction::Up));
    }

    #[test]
    fn keys_map_to_commands() {
        assert_eq!(
            command_for_key(KeyCode::Up),
            Some(Command::Turn(Direction::Up))
        );
        assert_eq!(
            command_for_key(KeyCode::A),
            Some(Command::Turn(Direction::Left))
        );
        assert_eq!(command_for_key(KeyCode::R), Some(Command::Restart));
        assert_eq!(command_for_key(KeyCode::Return), Some(Command::Dismiss));
        assert_eq!(command_for_key(KeyCode::Q), None);
    }
}
