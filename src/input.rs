//! Key bindings.

use crossterm::event::KeyCode;

use crate::game::Command;
use crate::grid::Dir;

pub const CONTROLS: &str = "Controls: W/A/S/D = move   . = wait   Q = quit";
pub const INVALID_KEY_NOTICE: &str = "Invalid input! Use W/A/S/D to move, Q to quit.";
pub const QUIT_PROMPT: &str = "Are you sure you want to quit? (y/N)";
pub const QUIT_CANCELED: &str = "Quit canceled.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Play(Command),
    /// Ask before quitting.
    RequestQuit,
    Unknown,
}

pub fn action_for(code: KeyCode) -> Action {
    let dir = match code {
        KeyCode::Char('w' | 'W' | 'k') | KeyCode::Up => Some(Dir::Up),
        KeyCode::Char('s' | 'S' | 'j') | KeyCode::Down => Some(Dir::Down),
        KeyCode::Char('a' | 'A' | 'h') | KeyCode::Left => Some(Dir::Left),
        KeyCode::Char('d' | 'D' | 'l') | KeyCode::Right => Some(Dir::Right),
        _ => None,
    };
    if let Some(dir) = dir {
        return Action::Play(Command::Move(dir));
    }
    match code {
        KeyCode::Char('.' | ' ') => Action::Play(Command::Wait),
        KeyCode::Char('q' | 'Q') | KeyCode::Esc => Action::RequestQuit,
        _ => Action::Unknown,
    }
}

/// Answer to [`QUIT_PROMPT`]; anything but `y` keeps playing.
pub fn confirms_quit(code: KeyCode) -> bool {
    matches!(code, KeyCode::Char('y' | 'Y'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movement_keys() {
        assert_eq!(action_for(KeyCode::Char('w')), Action::Play(Command::Move(Dir::Up)));
        assert_eq!(action_for(KeyCode::Char('D')), Action::Play(Command::Move(Dir::Right)));
        assert_eq!(action_for(KeyCode::Left), Action::Play(Command::Move(Dir::Left)));
        assert_eq!(action_for(KeyCode::Char('j')), Action::Play(Command::Move(Dir::Down)));
        assert_eq!(action_for(KeyCode::Char('.')), Action::Play(Command::Wait));
    }

    #[test]
    fn quit_needs_confirmation() {
        assert_eq!(action_for(KeyCode::Char('q')), Action::RequestQuit);
        assert!(confirms_quit(KeyCode::Char('y')));
        assert!(!confirms_quit(KeyCode::Char('n')));
        assert!(!confirms_quit(KeyCode::Enter));
        assert_eq!(action_for(KeyCode::Char('x')), Action::Unknown);
    }
}
