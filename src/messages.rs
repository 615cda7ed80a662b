//! Message types for the Elm-style architecture
//!
//! All state changes flow through these message types.

use serde::Serialize;

use crate::commands::FormatCommand;
use crate::editable::{MoveTarget, Selection, TextEditMsg};
use crate::keymap::Keystroke;

/// Keyboard events from the surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyMsg {
    /// Key pressed; the returned command says whether to prevent default
    Down(Keystroke),
    /// Key released; recomputes autocomplete suggestions
    Up(Keystroke),
}

/// Content arriving at the surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMsg {
    /// Native editing action about to be performed (typing, tab, enter,
    /// deletion, caret moves)
    Edit(TextEditMsg),
    /// Plain text pasted from the clipboard
    Paste(String),
    /// Plain text dropped onto the surface
    Drop(String),
}

/// Surface state changes not tied to content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceMsg {
    Focus,
    Blur,
    /// Selection changed by pointer or platform
    SetSelection(Selection),
    /// Formatting toolbar / shortcut command
    Exec(FormatCommand),
    /// Per-instance change tracking toggle
    SetTracking(bool),
}

/// Messages from the host and its collaborators
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostMsg {
    /// New value from the host (after an echo of our own change, or an
    /// external edit)
    SetValue(ValueUpdate),
    /// Collaborator text insertion, applied at the caret when focused or at
    /// the end of the content otherwise
    InsertAtCursorOrEnd { text: String, track: bool },
    /// Insert an image (never tracked)
    InsertImage { url: String },
    /// Apply pending requests from the insertion queue
    DrainInsertions,
}

/// Pointer interaction with the suggestion overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutocompleteMsg {
    Hover(usize),
    /// Pointer-down commits (it must run before the surface blurs)
    PointerDown(usize),
}

/// Top-level message type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    Key(KeyMsg),
    Input(InputMsg),
    Surface(SurfaceMsg),
    Host(HostMsg),
    Autocomplete(AutocompleteMsg),
}

// Convenience constructors for common messages
impl Msg {
    pub fn key_down(keystroke: Keystroke) -> Self {
        Msg::Key(KeyMsg::Down(keystroke))
    }

    pub fn key_up(keystroke: Keystroke) -> Self {
        Msg::Key(KeyMsg::Up(keystroke))
    }

    /// Typed text reported by the surface's input event
    pub fn insert_text(text: impl Into<String>) -> Self {
        Msg::Input(InputMsg::Edit(TextEditMsg::InsertText(text.into())))
    }

    pub fn move_caret(target: MoveTarget) -> Self {
        Msg::Input(InputMsg::Edit(TextEditMsg::Move(target)))
    }

    pub fn paste(text: impl Into<String>) -> Self {
        Msg::Input(InputMsg::Paste(text.into()))
    }

    pub fn set_value(update: ValueUpdate) -> Self {
        Msg::Host(HostMsg::SetValue(update))
    }

    pub fn exec(command: FormatCommand) -> Self {
        Msg::Surface(SurfaceMsg::Exec(command))
    }
}

/// Who caused an emitted change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    /// User input on this surface (typing, paste, drop, commands)
    Local,
    /// Content inserted on behalf of a collaborator (dictation, AI rewrite,
    /// phrase picker, image upload)
    External,
}

/// A value emitted to the host's change callback
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeEvent {
    pub origin: Origin,
    /// Monotonic per-editor revision; hosts echo it back in `ValueUpdate`
    pub revision: u64,
    pub value: String,
}

/// Where a value passed back to the editor came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOrigin {
    /// Echo of the editor's own emission with this revision
    Local(u64),
    /// Anything else (another device, a template, a reset)
    External,
}

/// A value pushed into the editor by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueUpdate {
    pub value: String,
    pub origin: UpdateOrigin,
}

impl ValueUpdate {
    pub fn external(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            origin: UpdateOrigin::External,
        }
    }

    /// The host handing our own change back to us
    pub fn echo(event: &ChangeEvent) -> Self {
        Self {
            value: event.value.clone(),
            origin: UpdateOrigin::Local(event.revision),
        }
    }
}
