use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::state::Direction;

/// What a key press resolved to.
///
/// Enter and Tab are intercepted unconditionally by the code-aware handlers;
/// everything else resolves through the default binding table, and keys with
/// no binding stay unhandled so the surrounding UI can react.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyBinding {
    /// Code-aware line split (Enter).
    HandleReturn,
    /// Code-aware indent or dedent (Tab / Shift-Tab).
    HandleTab { dedent: bool },
    /// A default editing command.
    Command(EditorCommand),
}

/// The default editing command set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorCommand {
    InsertChar(char),
    Backspace,
    Delete,
    Move { direction: Direction, extend: bool },
    Home { extend: bool },
    End { extend: bool },
    WordLeft { extend: bool },
    WordRight { extend: bool },
    DocStart { extend: bool },
    DocEnd { extend: bool },
}

/// Resolve a key press to a binding, or `None` when nothing binds it.
pub fn bind_key(key: &KeyEvent) -> Option<KeyBinding> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);
    let extend = key.modifiers.contains(KeyModifiers::SHIFT);

    let binding = match key.code {
        // Intercepted unconditionally
        KeyCode::Enter => KeyBinding::HandleReturn,
        KeyCode::Tab => KeyBinding::HandleTab { dedent: extend },
        KeyCode::BackTab => KeyBinding::HandleTab { dedent: true },

        // Default bindings
        KeyCode::Backspace => KeyBinding::Command(EditorCommand::Backspace),
        KeyCode::Delete => KeyBinding::Command(EditorCommand::Delete),
        KeyCode::Left if ctrl => KeyBinding::Command(EditorCommand::WordLeft { extend }),
        KeyCode::Right if ctrl => KeyBinding::Command(EditorCommand::WordRight { extend }),
        KeyCode::Left => KeyBinding::Command(EditorCommand::Move {
            direction: Direction::Left,
            extend,
        }),
        KeyCode::Right => KeyBinding::Command(EditorCommand::Move {
            direction: Direction::Right,
            extend,
        }),
        KeyCode::Up => KeyBinding::Command(EditorCommand::Move {
            direction: Direction::Up,
            extend,
        }),
        KeyCode::Down => KeyBinding::Command(EditorCommand::Move {
            direction: Direction::Down,
            extend,
        }),
        KeyCode::Home if ctrl => KeyBinding::Command(EditorCommand::DocStart { extend }),
        KeyCode::End if ctrl => KeyBinding::Command(EditorCommand::DocEnd { extend }),
        KeyCode::Home => KeyBinding::Command(EditorCommand::Home { extend }),
        KeyCode::End => KeyBinding::Command(EditorCommand::End { extend }),
        KeyCode::Char(c) if !ctrl && !alt => {
            KeyBinding::Command(EditorCommand::InsertChar(c))
        }

        _ => return None,
    };
    Some(binding)
}
