use serde::{Deserialize, Serialize};
use winit::keyboard::KeyCode;

use crate::block::Direction;

/// Game command produced by the input layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Command {
    Move(Direction),
    TogglePause,
    Reset,
}

/// Maps a pressed key to a command. WASD and the arrow keys steer, space
/// pauses, R restarts the level.
pub fn map_keycode(code: KeyCode) -> Option<Command> {
    Some(match code {
        KeyCode::KeyW | KeyCode::ArrowUp => Command::Move(Direction::Up),
        KeyCode::KeyS | KeyCode::ArrowDown => Command::Move(Direction::Down),
        KeyCode::KeyA | KeyCode::ArrowLeft => Command::Move(Direction::Left),
        KeyCode::KeyD | KeyCode::ArrowRight => Command::Move(Direction::Right),
        KeyCode::Space => Command::TogglePause,
        KeyCode::KeyR => Command::Reset,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wasd_and_arrows_map_to_the_same_moves() {
        assert_eq!(map_keycode(KeyCode::KeyW), map_keycode(KeyCode::ArrowUp));
        assert_eq!(map_keycode(KeyCode::KeyS), map_keycode(KeyCode::ArrowDown));
        assert_eq!(map_keycode(KeyCode::KeyA), map_keycode(KeyCode::ArrowLeft));
        assert_eq!(map_keycode(KeyCode::KeyD), map_keycode(KeyCode::ArrowRight));
        assert_eq!(
            map_keycode(KeyCode::ArrowUp),
            Some(Command::Move(Direction::Up))
        );
    }

    #[test]
    fn pause_and_reset_keys() {
        assert_eq!(map_keycode(KeyCode::Space), Some(Command::TogglePause));
        assert_eq!(map_keycode(KeyCode::KeyR), Some(Command::Reset));
    }

    #[test]
    fn unbound_keys_are_ignored() {
        assert_eq!(map_keycode(KeyCode::KeyQ), None);
        assert_eq!(map_keycode(KeyCode::Escape), None);
    }
}
