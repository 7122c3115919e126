//! Keyboard shortcut registry and key-to-command mapping.

use serde::{Deserialize, Serialize};

/// Editor actions reachable from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EditorCommand {
    Undo,
    Redo,
    Copy,
    Paste,
    Duplicate,
    Delete,
    /// Cancel the current interaction and clear the selection.
    Escape,
}

/// Modifier state of a key press. `ctrl` covers the platform command key
/// (Meta on macOS).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyModifiers {
    pub ctrl: bool,
    pub shift: bool,
}

impl KeyModifiers {
    pub fn new(ctrl: bool, meta: bool, shift: bool) -> Self {
        Self {
            ctrl: ctrl || meta,
            shift,
        }
    }
}

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    pub ctrl: bool,
    pub shift: bool,
    pub command: EditorCommand,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(
        key: &'static str,
        ctrl: bool,
        shift: bool,
        command: EditorCommand,
        description: &'static str,
    ) -> Self {
        Self {
            key,
            ctrl,
            shift,
            command,
            description,
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl+S").
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl");
        }
        if self.shift {
            parts.push("Shift");
        }
        parts.push(self.key);
        parts.join("+")
    }

    fn matches(&self, key: &str, modifiers: KeyModifiers) -> bool {
        self.key.eq_ignore_ascii_case(key)
            && self.ctrl == modifiers.ctrl
            && self.shift == modifiers.shift
    }
}

const SHORTCUTS: &[Shortcut] = &[
    Shortcut::new("Z", true, false, EditorCommand::Undo, "Undo"),
    Shortcut::new("Z", true, true, EditorCommand::Redo, "Redo"),
    Shortcut::new("Y", true, false, EditorCommand::Redo, "Redo"),
    Shortcut::new("C", true, false, EditorCommand::Copy, "Copy element"),
    Shortcut::new("V", true, false, EditorCommand::Paste, "Paste element"),
    Shortcut::new("D", true, false, EditorCommand::Duplicate, "Duplicate element"),
    Shortcut::new("Delete", false, false, EditorCommand::Delete, "Delete selected elements"),
    Shortcut::new("Backspace", false, false, EditorCommand::Delete, "Delete selected elements"),
    Shortcut::new("Escape", false, false, EditorCommand::Escape, "Cancel current action"),
];

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    pub fn all() -> &'static [Shortcut] {
        SHORTCUTS
    }

    /// Resolve a key press. Nothing fires while a text input has focus, so
    /// typing into property fields never edits the canvas.
    pub fn resolve(
        key: &str,
        modifiers: KeyModifiers,
        text_input_focused: bool,
    ) -> Option<EditorCommand> {
        if text_input_focused {
            return None;
        }
        SHORTCUTS
            .iter()
            .find(|s| s.matches(key, modifiers))
            .map(|s| s.command)
    }
}
