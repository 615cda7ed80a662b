//! Editor model - the complete state of a note field
//!
//! Follows the Elm Architecture: all state lives here and changes only
//! through `update`.

pub mod editor;

pub use editor::{NoteEditor, Reconciliation, DEFAULT_FONT_SIZE};
