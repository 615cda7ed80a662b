//! Suggestion overlay: recompute on keyup, keyboard and pointer selection,
//! commit through the word replacement path

use crate::autocomplete::{suggest, AutocompleteState, OverlayAnchor};
use crate::commands::Cmd;
use crate::keymap::KeyCode;
use crate::messages::{AutocompleteMsg, Origin};
use crate::model::NoteEditor;

/// Handle pointer interaction with the overlay
pub fn update_autocomplete(editor: &mut NoteEditor, msg: AutocompleteMsg) -> Option<Cmd> {
    match msg {
        AutocompleteMsg::Hover(index) => {
            if let Some(state) = editor.autocomplete.as_mut() {
                state.hover(index);
            }
            None
        }
        AutocompleteMsg::PointerDown(index) => {
            if let Some(state) = editor.autocomplete.as_mut() {
                state.hover(index);
            }
            commit_selected(editor)
        }
    }
}

/// Recompute candidates for the word before the caret; shows, updates or
/// hides the overlay
pub fn refresh_suggestions(editor: &mut NoteEditor) {
    let candidates = editor
        .current_word()
        .map(|word| suggest(&word.text, &editor.shortcuts))
        .unwrap_or_default();

    let anchor = OverlayAnchor::below_caret(&editor.surface.caret_geometry(), editor.font_size);
    editor.autocomplete = AutocompleteState::open(candidates, anchor);

    if let Some(state) = &editor.autocomplete {
        tracing::trace!(
            target: "autocomplete",
            candidates = state.candidates.len(),
            "overlay shown"
        );
    }
}

/// Keys consumed while the overlay is visible
pub(super) fn handle_overlay_key(editor: &mut NoteEditor, key: KeyCode) -> Option<Cmd> {
    match key {
        KeyCode::Down => {
            editor.autocomplete.as_mut()?.select_next();
            Some(Cmd::PreventDefault)
        }
        KeyCode::Up => {
            editor.autocomplete.as_mut()?.select_prev();
            Some(Cmd::PreventDefault)
        }
        KeyCode::Enter | KeyCode::Tab => {
            let notify = commit_selected(editor);
            Some(Cmd::batch(
                std::iter::once(Cmd::PreventDefault).chain(notify).collect(),
            ))
        }
        KeyCode::Escape => {
            editor.autocomplete = None;
            Some(Cmd::PreventDefault)
        }
        _ => None,
    }
}

/// Replace the current word with the highlighted candidate and hide the
/// overlay
fn commit_selected(editor: &mut NoteEditor) -> Option<Cmd> {
    let entry = editor
        .autocomplete
        .take()
        .and_then(|state| state.selected().cloned())?;
    let word = editor.current_word()?;

    if let Err(e) = editor.replace_word(&word, &entry.expansion) {
        tracing::debug!(target: "autocomplete", %e, "commit skipped");
        return None;
    }
    tracing::debug!(
        target: "autocomplete",
        shortcut = %entry.shortcut,
        word = %word.text,
        "candidate committed"
    );
    editor.format_labels();
    Some(editor.notify(Origin::Local))
}
