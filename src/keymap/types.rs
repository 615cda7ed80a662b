//! Keystrokes as reported by the surface's keydown/keyup events

use std::fmt;
use std::ops::BitOr;

use crate::editable::{MoveTarget, TextEditMsg};

/// Modifier keys held during a key event
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    /// Cmd on macOS, the Windows key elsewhere
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        ctrl: false,
        shift: false,
        alt: false,
        meta: false,
    };
    pub const CTRL: Modifiers = Modifiers {
        ctrl: true,
        ..Modifiers::NONE
    };
    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        ..Modifiers::NONE
    };
    pub const ALT: Modifiers = Modifiers {
        alt: true,
        ..Modifiers::NONE
    };
    pub const META: Modifiers = Modifiers {
        meta: true,
        ..Modifiers::NONE
    };

    /// The platform's shortcut modifier: Cmd on macOS, Ctrl elsewhere
    pub fn cmd() -> Modifiers {
        if cfg!(target_os = "macos") {
            Modifiers::META
        } else {
            Modifiers::CTRL
        }
    }

    pub const fn is_empty(self) -> bool {
        !(self.ctrl || self.shift || self.alt || self.meta)
    }

    /// Anything but Shift turns a key into a shortcut; such keys never
    /// insert text
    pub const fn has_command_modifier(self) -> bool {
        self.ctrl || self.alt || self.meta
    }
}

impl BitOr for Modifiers {
    type Output = Modifiers;

    fn bitor(self, rhs: Self) -> Modifiers {
        Modifiers {
            ctrl: self.ctrl || rhs.ctrl,
            shift: self.shift || rhs.shift,
            alt: self.alt || rhs.alt,
            meta: self.meta || rhs.meta,
        }
    }
}

impl fmt::Display for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mac = cfg!(target_os = "macos");
        let names = [
            (self.ctrl, "Ctrl"),
            (self.alt, if mac { "Option" } else { "Alt" }),
            (self.shift, "Shift"),
            (self.meta, if mac { "Cmd" } else { "Meta" }),
        ];
        let held: Vec<&str> = names
            .iter()
            .filter(|(on, _)| *on)
            .map(|(_, name)| *name)
            .collect();
        f.write_str(&held.join("+"))
    }
}

/// Logical key of a key event
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A printable key, lowercased (Shift is carried in the modifiers)
    Char(char),
    Enter,
    Escape,
    Tab,
    Backspace,
    Delete,
    Space,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    /// A modifier key pressed on its own
    Modifier,
}

impl KeyCode {
    /// Keys whose keyup must not recompute suggestions: caret movement,
    /// lone modifiers and the keys the overlay consumes
    pub fn is_navigation(self) -> bool {
        matches!(
            self,
            KeyCode::Up
                | KeyCode::Down
                | KeyCode::Left
                | KeyCode::Right
                | KeyCode::Home
                | KeyCode::End
                | KeyCode::Escape
                | KeyCode::Enter
                | KeyCode::Tab
                | KeyCode::Modifier
        )
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyCode::Char(c) => write!(f, "{}", c.to_uppercase()),
            KeyCode::Up => f.write_str("ArrowUp"),
            KeyCode::Down => f.write_str("ArrowDown"),
            KeyCode::Left => f.write_str("ArrowLeft"),
            KeyCode::Right => f.write_str("ArrowRight"),
            other => write!(f, "{:?}", other),
        }
    }
}

/// A key with the modifiers held while it was pressed
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Keystroke {
    pub key: KeyCode,
    pub mods: Modifiers,
}

impl Keystroke {
    pub const fn new(key: KeyCode, mods: Modifiers) -> Self {
        Self { key, mods }
    }

    pub const fn key(key: KeyCode) -> Self {
        Self::new(key, Modifiers::NONE)
    }

    /// The keystroke that types `c`: Space gets its own key code, uppercase
    /// letters carry Shift
    pub fn char(c: char) -> Self {
        if c == ' ' {
            return Self::key(KeyCode::Space);
        }
        let mods = if c.is_uppercase() {
            Modifiers::SHIFT
        } else {
            Modifiers::NONE
        };
        Self::new(KeyCode::Char(c.to_ascii_lowercase()), mods)
    }

    /// What the surface does natively for this key when nothing intercepts
    /// it. Command-modified keys have no native text action.
    pub fn default_edit(&self) -> Option<TextEditMsg> {
        if self.mods.has_command_modifier() {
            return None;
        }
        let edit = match self.key {
            KeyCode::Char(c) if self.mods.shift => TextEditMsg::InsertText(c.to_uppercase().collect()),
            KeyCode::Char(c) => TextEditMsg::InsertText(c.to_string()),
            KeyCode::Space => TextEditMsg::InsertText(" ".to_string()),
            KeyCode::Tab => TextEditMsg::InsertText("\t".to_string()),
            KeyCode::Enter => TextEditMsg::InsertNewline,
            KeyCode::Backspace => TextEditMsg::DeleteBackward,
            KeyCode::Delete => TextEditMsg::DeleteForward,
            KeyCode::Left => TextEditMsg::Move(MoveTarget::Left),
            KeyCode::Right => TextEditMsg::Move(MoveTarget::Right),
            KeyCode::Home => TextEditMsg::Move(MoveTarget::DocumentStart),
            KeyCode::End => TextEditMsg::Move(MoveTarget::DocumentEnd),
            _ => return None,
        };
        Some(edit)
    }
}

impl fmt::Display for Keystroke {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.mods.is_empty() {
            write!(f, "{}", self.key)
        } else {
            write!(f, "{}+{}", self.mods, self.key)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifier_union() {
        let mods = Modifiers::CTRL | Modifiers::SHIFT;
        assert!(mods.ctrl && mods.shift);
        assert!(!mods.alt && !mods.meta);
        assert!(mods.has_command_modifier());
        assert!(!Modifiers::SHIFT.has_command_modifier());
        assert!(Modifiers::NONE.is_empty());
        assert!(!Modifiers::ALT.is_empty());
    }

    #[test]
    fn test_display() {
        let stroke = Keystroke::new(KeyCode::Char('b'), Modifiers::CTRL | Modifiers::SHIFT);
        assert_eq!(stroke.to_string(), "Ctrl+Shift+B");
        assert_eq!(Keystroke::key(KeyCode::Down).to_string(), "ArrowDown");
        assert_eq!(Keystroke::key(KeyCode::Escape).to_string(), "Escape");
    }

    #[test]
    fn test_typed_characters() {
        assert_eq!(Keystroke::char('a'), Keystroke::key(KeyCode::Char('a')));
        assert_eq!(
            Keystroke::char('A'),
            Keystroke::new(KeyCode::Char('a'), Modifiers::SHIFT)
        );
        assert_eq!(Keystroke::char(' ').key, KeyCode::Space);
        assert_eq!(Keystroke::char('/'), Keystroke::key(KeyCode::Char('/')));
    }

    #[test]
    fn test_default_edit() {
        assert_eq!(
            Keystroke::char('A').default_edit(),
            Some(TextEditMsg::InsertText("A".into()))
        );
        assert_eq!(
            Keystroke::key(KeyCode::Tab).default_edit(),
            Some(TextEditMsg::InsertText("\t".into()))
        );
        assert_eq!(
            Keystroke::key(KeyCode::Home).default_edit(),
            Some(TextEditMsg::Move(MoveTarget::DocumentStart))
        );
        assert_eq!(
            Keystroke::new(KeyCode::Char('b'), Modifiers::CTRL).default_edit(),
            None
        );
        assert_eq!(Keystroke::key(KeyCode::Escape).default_edit(), None);
    }

    #[test]
    fn test_navigation_keys() {
        assert!(KeyCode::Up.is_navigation());
        assert!(KeyCode::Escape.is_navigation());
        assert!(KeyCode::Tab.is_navigation());
        assert!(KeyCode::Modifier.is_navigation());
        assert!(!KeyCode::Char('a').is_navigation());
        assert!(!KeyCode::Space.is_navigation());
        assert!(!KeyCode::Backspace.is_navigation());
    }
}
