//! Keyboard mapping and cursor movement.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Cursor direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// One column left.
    Left,
    /// One column right.
    Right,
    /// One row up.
    Up,
    /// One row down.
    Down,
}

/// What a key press asks the app to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Move the cursor.
    Move(Direction),
    /// Select the card under the cursor.
    Select,
    /// Deal a new round of the same size.
    NewRound,
    /// Deal a new round one size larger.
    Bigger,
    /// Deal a new round one size smaller.
    Smaller,
    /// Leave the game.
    Quit,
}

/// Maps a key event to an action.
pub fn action_for(key: KeyEvent) -> Option<Action> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    let action = match key.code {
        KeyCode::Left | KeyCode::Char('h') => Action::Move(Direction::Left),
        KeyCode::Right | KeyCode::Char('l') => Action::Move(Direction::Right),
        KeyCode::Up | KeyCode::Char('k') => Action::Move(Direction::Up),
        KeyCode::Down | KeyCode::Char('j') => Action::Move(Direction::Down),
        KeyCode::Enter | KeyCode::Char(' ') => Action::Select,
        KeyCode::Char('n') | KeyCode::Char('r') => Action::NewRound,
        KeyCode::Char('+') | KeyCode::Char('=') => Action::Bigger,
        KeyCode::Char('-') => Action::Smaller,
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        _ => return None,
    };
    Some(action)
}

/// Moves `cursor` one step on a grid of `len` cards, `columns` wide.
/// Moves off the edge leave it where it is.
pub fn move_cursor(cursor: usize, direction: Direction, columns: usize, len: usize) -> usize {
    if columns == 0 || len == 0 {
        return 0;
    }
    let cursor = cursor.min(len - 1);
    let column = cursor % columns;

    match direction {
        Direction::Left if column > 0 => cursor - 1,
        Direction::Right if column + 1 < columns && cursor + 1 < len => cursor + 1,
        Direction::Up if cursor >= columns => cursor - columns,
        Direction::Down if cursor + columns < len => cursor + columns,
        _ => cursor,
    }
}
