//! notefield - controlled rich-text editing engine for clinical note fields
//!
//! This crate provides the core types and logic of a note field implementing
//! the Elm Architecture pattern: shortcut expansion and autocorrect on word
//! boundaries, an autocomplete overlay, change-tracking markup for new text,
//! and reconciliation of the live surface against a host-owned value.

pub mod autocomplete;
pub mod cli;
pub mod commands;
pub mod config;
pub mod config_paths;
pub mod editable;
pub mod error;
pub mod expansion;
pub mod format;
pub mod keymap;
pub mod messages;
pub mod model;
pub mod queue;
pub mod tracing;
pub mod tracking;
pub mod update;
pub mod util;

// Re-export commonly used types
pub use commands::Cmd;
pub use config::EditorConfig;
pub use error::EditorError;
pub use messages::Msg;
pub use model::NoteEditor;
pub use update::update;
