//! Keymap struct for storing and looking up keybindings

use std::collections::HashMap;

use super::binding::Keybinding;
use super::types::Keystroke;
use crate::commands::FormatCommand;

/// The keymap stores all keybindings and handles lookup
#[derive(Debug, Clone, Default)]
pub struct Keymap {
    bindings: Vec<Keybinding>,
    /// Fast lookup (index into bindings); later bindings override earlier ones
    lookup: HashMap<Keystroke, usize>,
}

impl Keymap {
    /// Create an empty keymap
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a keymap with the given bindings
    pub fn with_bindings(bindings: Vec<Keybinding>) -> Self {
        let mut keymap = Self::new();
        for binding in bindings {
            keymap.add_binding(binding);
        }
        keymap
    }

    pub fn add_binding(&mut self, binding: Keybinding) {
        self.lookup.insert(binding.keystroke, self.bindings.len());
        self.bindings.push(binding);
    }

    /// Look up the command bound to a keystroke
    pub fn lookup(&self, keystroke: &Keystroke) -> Option<&FormatCommand> {
        self.lookup
            .get(keystroke)
            .map(|&idx| &self.bindings[idx].command)
    }

    /// Get all bindings
    pub fn bindings(&self) -> &[Keybinding] {
        &self.bindings
    }

    /// Get the keybinding for a command (first match)
    pub fn binding_for(&self, command: &FormatCommand) -> Option<&Keybinding> {
        self.bindings.iter().find(|b| b.command == *command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keymap::types::{KeyCode, Modifiers};

    fn ctrl(c: char) -> Keystroke {
        Keystroke::new(KeyCode::Char(c), Modifiers::CTRL)
    }

    #[test]
    fn test_single_binding_lookup() {
        let keymap = Keymap::with_bindings(vec![Keybinding::new(ctrl('b'), FormatCommand::Bold)]);

        assert_eq!(keymap.lookup(&ctrl('b')), Some(&FormatCommand::Bold));
        assert_eq!(keymap.lookup(&ctrl('i')), None);
    }

    #[test]
    fn test_later_binding_overrides() {
        let keymap = Keymap::with_bindings(vec![
            Keybinding::new(ctrl('b'), FormatCommand::Bold),
            Keybinding::new(ctrl('b'), FormatCommand::Italic),
        ]);
        assert_eq!(keymap.lookup(&ctrl('b')), Some(&FormatCommand::Italic));
    }

    #[test]
    fn test_binding_for_command() {
        let keymap = Keymap::with_bindings(vec![
            Keybinding::new(ctrl('b'), FormatCommand::Bold),
            Keybinding::new(ctrl('u'), FormatCommand::Underline),
        ]);

        let binding = keymap.binding_for(&FormatCommand::Underline);
        assert_eq!(binding.map(|b| b.keystroke), Some(ctrl('u')));
        assert!(keymap.binding_for(&FormatCommand::Indent).is_none());
    }
}
