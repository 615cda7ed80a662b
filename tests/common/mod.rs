//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use notefield::commands::Cmd;
use notefield::error::EditorError;
use notefield::expansion::{ConflictPolicy, ShortcutEntry, ShortcutTable};
use notefield::keymap::{KeyCode, Keystroke};
use notefield::messages::{ChangeEvent, InputMsg, Msg, SurfaceMsg, ValueUpdate};
use notefield::tracking::ChangeTrackingConfig;
use notefield::{update, NoteEditor};

/// A controlled host around one editor.
///
/// Mimics the platform event order for a key press (keydown, native input
/// unless prevented, keyup) and, like a controlled host, hands every emitted
/// value straight back to the editor.
pub struct Host {
    pub editor: NoteEditor,
    pub events: Vec<ChangeEvent>,
    pub errors: Vec<EditorError>,
    /// Echo emitted values back as `SetValue` (on by default)
    pub echo: bool,
}

impl Host {
    /// Focused editor showing `value` with the built-in shortcut list
    pub fn new(value: &str) -> Self {
        Self::with_editor(NoteEditor::new(value))
    }

    pub fn with_editor(editor: NoteEditor) -> Self {
        let mut host = Self {
            editor,
            events: Vec::new(),
            errors: Vec::new(),
            echo: true,
        };
        host.send(Msg::Surface(SurfaceMsg::Focus));
        host
    }

    /// Run a message and perform the side effects of its command
    pub fn send(&mut self, msg: Msg) -> Option<Cmd> {
        let cmd = update(&mut self.editor, msg)?;
        for event in cmd.notifications() {
            self.events.push(event.clone());
            if self.echo {
                update(&mut self.editor, Msg::set_value(ValueUpdate::echo(event)));
            }
        }
        self.errors.extend(cmd.errors().into_iter().cloned());
        Some(cmd)
    }

    /// Press a key; returns whether the default action was prevented
    pub fn press(&mut self, keystroke: Keystroke) -> bool {
        let prevented = self
            .send(Msg::key_down(keystroke))
            .is_some_and(|cmd| cmd.prevents_default());
        if !prevented {
            if let Some(edit) = keystroke.default_edit() {
                self.send(Msg::Input(InputMsg::Edit(edit)));
            }
        }
        self.send(Msg::key_up(keystroke));
        prevented
    }

    pub fn key(&mut self, key: KeyCode) -> bool {
        self.press(Keystroke::key(key))
    }

    /// Type characters one key press at a time
    pub fn type_text(&mut self, text: &str) {
        for c in text.chars() {
            self.press(Keystroke::char(c));
        }
    }

    pub fn paste(&mut self, text: &str) {
        self.send(Msg::paste(text));
    }

    pub fn value(&self) -> String {
        self.editor.value()
    }

    pub fn caret_at_end(&self) -> bool {
        let surface = &self.editor.surface;
        surface.normalize(surface.caret()) == surface.end_point()
    }

    pub fn overlay_visible(&self) -> bool {
        self.editor.autocomplete.is_some()
    }

    pub fn candidates(&self) -> Vec<String> {
        self.editor
            .autocomplete
            .as_ref()
            .map(|s| s.candidates.iter().map(|e| e.shortcut.clone()).collect())
            .unwrap_or_default()
    }
}

/// Shortcut table from (shortcut, expansion) pairs, table order preserved
pub fn table(entries: &[(&str, &str)]) -> ShortcutTable {
    ShortcutTable::from_entries(
        entries
            .iter()
            .map(|(s, e)| ShortcutEntry::new(s, e, "Test")),
        ConflictPolicy::LastWins,
    )
    .unwrap()
}

/// Tracking config with a readable wrapper
pub fn italic_tracking() -> Option<ChangeTrackingConfig> {
    Some(ChangeTrackingConfig::new(|t| format!("<i>{}</i>", t)))
}
