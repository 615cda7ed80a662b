//! Update functions for the Elm-style architecture
//!
//! All state transformations flow through these functions.

mod autocomplete;
mod host;
mod input;
mod keys;
mod surface;

use crate::commands::Cmd;
use crate::messages::Msg;
use crate::model::NoteEditor;

#[cfg(debug_assertions)]
use crate::tracing::CaretSnapshot;
#[cfg(debug_assertions)]
use tracing::{debug, span, Level};

pub use autocomplete::{refresh_suggestions, update_autocomplete};
pub use host::update_host;
pub use input::update_input;
pub use keys::update_keys;
pub use surface::update_surface;

/// Main update function - dispatches to sub-handlers
///
/// In debug builds, this wraps with tracing instrumentation.
/// In release builds, it's a direct dispatch with zero overhead.
#[inline]
pub fn update(editor: &mut NoteEditor, msg: Msg) -> Option<Cmd> {
    #[cfg(debug_assertions)]
    {
        update_traced(editor, msg)
    }
    #[cfg(not(debug_assertions))]
    {
        update_inner(editor, msg)
    }
}

/// Inner update logic (no tracing)
fn update_inner(editor: &mut NoteEditor, msg: Msg) -> Option<Cmd> {
    match msg {
        Msg::Key(m) => keys::update_keys(editor, m),
        Msg::Input(m) => input::update_input(editor, m),
        Msg::Surface(m) => surface::update_surface(editor, m),
        Msg::Host(m) => host::update_host(editor, m),
        Msg::Autocomplete(m) => autocomplete::update_autocomplete(editor, m),
    }
}

/// Traced update wrapper (debug builds only)
///
/// Captures before/after caret state and logs diffs for debugging.
#[cfg(debug_assertions)]
fn update_traced(editor: &mut NoteEditor, msg: Msg) -> Option<Cmd> {
    let msg_name = msg_type_name(&msg);
    let _span = span!(Level::DEBUG, "update", msg = %msg_name).entered();

    let before = CaretSnapshot::from_editor(editor);
    debug!(target: "message", msg = %msg_name, "processing");

    let result = update_inner(editor, msg);

    let after = CaretSnapshot::from_editor(editor);
    if let Some(diff) = before.diff(&after) {
        debug!(target: "cursor", %diff, "state changed");
    }

    result
}

/// Get a display name for a message type
///
/// Example outputs:
/// - `Key::Down(Keystroke { .. })`
/// - `Host::DrainInsertions`
#[cfg(debug_assertions)]
fn msg_type_name(msg: &Msg) -> String {
    match msg {
        Msg::Key(m) => format!("Key::{:?}", m),
        Msg::Input(m) => format!("Input::{:?}", m),
        Msg::Surface(m) => format!("Surface::{:?}", m),
        Msg::Host(m) => format!("Host::{:?}", m),
        Msg::Autocomplete(m) => format!("Autocomplete::{:?}", m),
    }
}
