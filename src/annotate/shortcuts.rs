//! Keyboard shortcuts for the annotation editor.
//!
//! ## Shortcuts
//!
//! - **Escape**: Leave text editing, clear selection, or close
//! - **Ctrl+C** / **Ctrl+S**: Copy / save the composed image
//! - **Ctrl+Z**: Undo
//! - **Ctrl+Y** or **Ctrl+Shift+Z**: Redo
//! - **Delete**: Delete the selected shape
//! - **Shift+1/2/3/5/8**: Rect / Line / Arrow / Pencil / Text tool
//! - **V**: Select tool
//! - **R**: Reselect the capture source
//! - **[** / **]**: Thinner / thicker stroke
//!
//! While a text shape is being edited, printable keys, Enter and Backspace
//! go to the text instead.

use super::session::{Command, Session};
use super::tools::Tool;

/// Layout-independent key identity as delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorKey {
    Escape,
    Enter,
    Backspace,
    Delete,
    /// Top-row digit key, regardless of the character Shift produces.
    Digit(u8),
    /// Letter key, lowercase.
    Letter(char),
    BracketLeft,
    BracketRight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
}

/// Everything a key press (or a toolbar button) can ask the session to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorAction {
    Escape,
    Emit(Command),
    Undo,
    Redo,
    DeleteSelection,
    SetTool(Tool),
    Thinner,
    Thicker,
    FinishText,
    Backspace,
}

/// Map a key press to an action. `text_editing` routes Enter, Backspace and
/// unmodified character keys to the text shape; those produce `None` here
/// and arrive as character input instead.
pub fn action_for_key(key: EditorKey, mods: Modifiers, text_editing: bool) -> Option<EditorAction> {
    if mods.ctrl {
        return match key {
            EditorKey::Letter('c') => Some(EditorAction::Emit(Command::Copy)),
            EditorKey::Letter('s') => Some(EditorAction::Emit(Command::Save)),
            EditorKey::Letter('z') if mods.shift => Some(EditorAction::Redo),
            EditorKey::Letter('z') => Some(EditorAction::Undo),
            EditorKey::Letter('y') => Some(EditorAction::Redo),
            _ => None,
        };
    }

    match key {
        EditorKey::Escape => return Some(EditorAction::Escape),
        EditorKey::Delete => return Some(EditorAction::DeleteSelection),
        _ => {}
    }

    if text_editing {
        return match key {
            EditorKey::Enter => Some(EditorAction::FinishText),
            EditorKey::Backspace => Some(EditorAction::Backspace),
            _ => None,
        };
    }

    match key {
        EditorKey::Digit(digit) if mods.shift => match digit {
            1 => Some(EditorAction::SetTool(Tool::Rect)),
            2 => Some(EditorAction::SetTool(Tool::Line)),
            3 => Some(EditorAction::SetTool(Tool::Arrow)),
            5 => Some(EditorAction::SetTool(Tool::Pencil)),
            8 => Some(EditorAction::SetTool(Tool::Text)),
            _ => None,
        },
        EditorKey::Letter('v') => Some(EditorAction::SetTool(Tool::Select)),
        EditorKey::Letter('r') if !mods.shift => Some(EditorAction::Emit(Command::Reselect)),
        EditorKey::BracketLeft => Some(EditorAction::Thinner),
        EditorKey::BracketRight => Some(EditorAction::Thicker),
        _ => None,
    }
}

impl Session {
    /// Carry out `action`, returning the command the host must handle, if
    /// any.
    pub fn apply(&mut self, action: EditorAction) -> Option<Command> {
        match action {
            EditorAction::Escape => return self.escape(),
            EditorAction::Emit(command) => return Some(command),
            EditorAction::Undo => {
                self.undo();
            }
            EditorAction::Redo => {
                self.redo();
            }
            EditorAction::DeleteSelection => {
                self.delete_selection();
            }
            EditorAction::SetTool(tool) => self.set_tool(tool),
            EditorAction::Thinner => self.thinner(),
            EditorAction::Thicker => self.thicker(),
            EditorAction::FinishText => {
                self.finish_text_edit();
            }
            EditorAction::Backspace => {
                self.backspace();
            }
        }
        None
    }
}
