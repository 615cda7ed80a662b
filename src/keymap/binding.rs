//! Keybinding struct representing a mapping from a keystroke to a command

use super::types::Keystroke;
use crate::commands::FormatCommand;

/// A single keybinding mapping a keystroke to a formatting command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keybinding {
    pub keystroke: Keystroke,
    pub command: FormatCommand,
}

impl Keybinding {
    pub fn new(keystroke: Keystroke, command: FormatCommand) -> Self {
        Self { keystroke, command }
    }

    /// Check if this binding matches a keystroke
    pub fn matches(&self, keystroke: &Keystroke) -> bool {
        self.keystroke == *keystroke
    }
}
