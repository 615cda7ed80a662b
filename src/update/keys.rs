//! Keyboard handling: suggestion navigation, formatting shortcuts and word
//! expansion on Space/Tab

use crate::commands::Cmd;
use crate::expansion::{resolve, Trigger};
use crate::keymap::{KeyCode, Keystroke};
use crate::messages::{KeyMsg, Origin};
use crate::model::NoteEditor;

use super::autocomplete::{handle_overlay_key, refresh_suggestions};
use super::surface::exec;

/// Handle key messages.
///
/// A returned command containing `PreventDefault` means the key was consumed
/// and the surface must not perform its native action for it.
pub fn update_keys(editor: &mut NoteEditor, msg: KeyMsg) -> Option<Cmd> {
    match msg {
        KeyMsg::Down(keystroke) => key_down(editor, keystroke),
        KeyMsg::Up(keystroke) => {
            if !keystroke.key.is_navigation() {
                refresh_suggestions(editor);
            }
            None
        }
    }
}

fn key_down(editor: &mut NoteEditor, keystroke: Keystroke) -> Option<Cmd> {
    let command_key = keystroke.mods.has_command_modifier();

    if editor.autocomplete.is_some() && !command_key {
        if let Some(cmd) = handle_overlay_key(editor, keystroke.key) {
            return Some(cmd);
        }
    }

    if command_key {
        let command = editor.keymap.lookup(&keystroke).cloned()?;
        tracing::debug!(target: "message", %keystroke, ?command, "formatting shortcut");
        let notify = exec(editor, &command);
        return Some(Cmd::batch(
            std::iter::once(Cmd::PreventDefault).chain(notify).collect(),
        ));
    }

    let trigger = match keystroke.key {
        KeyCode::Space => Trigger::Space,
        KeyCode::Tab => Trigger::Tab,
        _ => return None,
    };
    expand_word(editor, trigger)
}

/// Replace the word before the caret if it resolves to an expansion.
/// None lets the trigger key through unchanged.
fn expand_word(editor: &mut NoteEditor, trigger: Trigger) -> Option<Cmd> {
    let word = editor.current_word()?;
    let expansion = resolve(&word.text, trigger, &editor.shortcuts, editor.autocorrect)?;

    if let Err(e) = editor.replace_word(&word, &expansion.replacement) {
        tracing::debug!(target: "expansion", %e, word = %word.text, "replacement skipped");
        return None;
    }
    tracing::debug!(
        target: "expansion",
        word = %word.text,
        source = ?expansion.source,
        "word expanded"
    );
    editor.autocomplete = None;
    editor.format_labels();
    Some(Cmd::batch(vec![
        Cmd::PreventDefault,
        editor.notify(Origin::Local),
    ]))
}
