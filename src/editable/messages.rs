//! Native editing actions the surface performs when a keystroke is not
//! intercepted.

/// Target for caret movement operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveTarget {
    /// Move one character left
    Left,
    /// Move one character right
    Right,
    /// Move to start of document
    DocumentStart,
    /// Move to end of document
    DocumentEnd,
}

/// Default editing behavior the host performs after an unprevented keydown.
/// The host reports it back as an input event (like `beforeinput`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextEditMsg {
    /// Move the caret
    Move(MoveTarget),
    /// Insert text typed at the caret (one character, or a tab)
    InsertText(String),
    /// Insert a line break (Enter)
    InsertNewline,
    /// Delete character before caret (Backspace)
    DeleteBackward,
    /// Delete character after caret (Delete)
    DeleteForward,
}
