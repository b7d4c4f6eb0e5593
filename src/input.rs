use crate::board::Direction::{*, self};

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Move(Direction),
    Restart,
    Quit,
    Resize,
}

/// Maps a terminal event to a game command. Unknown keys, mouse events and
/// letters typed with a modifier are ignored.
pub fn command_for(event: &Event) -> Option<Command> {
    match event {
        Event::Resize(_, _) => Some(Command::Resize),
        Event::Key(key) => command_for_key(key),
        _ => None,
    }
}

fn command_for_key(key: &KeyEvent) -> Option<Command> {
    let command = match (key.code, key.modifiers) {
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Command::Quit,
        (KeyCode::Char('r'), KeyModifiers::CONTROL) => Command::Restart,
        (KeyCode::Up, _) | (KeyCode::Char('w'), KeyModifiers::NONE) => Command::Move(Up),
        (KeyCode::Down, _) | (KeyCode::Char('s'), KeyModifiers::NONE) => Command::Move(Down),
        (KeyCode::Left, _) | (KeyCode::Char('a'), KeyModifiers::NONE) => Command::Move(Left),
        (KeyCode::Right, _) | (KeyCode::Char('d'), KeyModifiers::NONE) => Command::Move(Right),
        _ => return None,
    };

    Some(command)
}
