//! Content arriving at the surface: typing, native edits, paste and drop

use crate::commands::Cmd;
use crate::editable::{MarkupNode, Point, TextEditMsg};
use crate::error::EditorError;
use crate::messages::{InputMsg, Origin};
use crate::model::NoteEditor;

/// Handle input messages. Every content change is followed by the underline
/// pass and a local change notification.
pub fn update_input(editor: &mut NoteEditor, msg: InputMsg) -> Option<Cmd> {
    match msg {
        InputMsg::Edit(edit) => update_text_edit(editor, edit),
        // The whole string is one tracked unit
        InputMsg::Paste(text) | InputMsg::Drop(text) => insert_text(editor, &text),
    }
}

fn update_text_edit(editor: &mut NoteEditor, edit: TextEditMsg) -> Option<Cmd> {
    match edit {
        TextEditMsg::Move(target) => {
            editor.surface.move_caret(target);
            // Candidates belong to the word the caret just left
            editor.autocomplete = None;
            None
        }
        TextEditMsg::InsertText(text) => insert_text(editor, &text),
        TextEditMsg::InsertNewline => {
            let result = editor.insert_at_caret(vec![MarkupNode::element("br", Vec::new(), Vec::new())]);
            finish_edit(editor, result)
        }
        TextEditMsg::DeleteBackward | TextEditMsg::DeleteForward => {
            let before = editor.value();
            let result = if edit == TextEditMsg::DeleteBackward {
                editor.surface.delete_backward()
            } else {
                editor.surface.delete_forward()
            };
            if result.is_ok() && editor.value() == before {
                return None;
            }
            finish_edit(editor, result)
        }
    }
}

fn insert_text(editor: &mut NoteEditor, text: &str) -> Option<Cmd> {
    if text.is_empty() {
        return None;
    }
    let fragment = editor.fragment(text, true);
    let result = editor.insert_at_caret(fragment);
    finish_edit(editor, result)
}

fn finish_edit(editor: &mut NoteEditor, result: Result<Point, EditorError>) -> Option<Cmd> {
    match result {
        Ok(_) => {
            editor.format_labels();
            Some(editor.notify(Origin::Local))
        }
        Err(e) => {
            tracing::debug!(target: "message", %e, "edit ignored");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editable::MoveTarget;
    use crate::tracking::ChangeTrackingConfig;

    fn insert(text: &str) -> InputMsg {
        InputMsg::Edit(TextEditMsg::InsertText(text.to_string()))
    }

    #[test]
    fn test_typing_notifies_each_event() {
        let mut editor = NoteEditor::new("");
        let first = update_input(&mut editor, insert("a")).unwrap();
        let second = update_input(&mut editor, insert("b")).unwrap();
        assert_eq!(first.notifications()[0].revision, 1);
        assert_eq!(second.notifications()[0].value, "ab");
    }

    #[test]
    fn test_tracked_typing_wraps_each_event() {
        let mut editor = NoteEditor::new("x ")
            .with_change_tracking(Some(ChangeTrackingConfig::new(|t| format!("<i>{}</i>", t))));
        update_input(&mut editor, insert("a"));
        update_input(&mut editor, insert("b"));
        assert_eq!(editor.value(), "x <i>a</i><i>b</i>");
    }

    #[test]
    fn test_paste_is_one_fragment() {
        let mut editor = NoteEditor::new("")
            .with_change_tracking(Some(ChangeTrackingConfig::new(|t| {
                format!("[[{}]]", t.to_uppercase())
            })));
        update_input(&mut editor, InputMsg::Paste("edema".into())).unwrap();
        assert_eq!(editor.value(), "[[EDEMA]]");
    }

    #[test]
    fn test_newline_and_backspace() {
        let mut editor = NoteEditor::new("ab");
        update_input(&mut editor, InputMsg::Edit(TextEditMsg::InsertNewline)).unwrap();
        assert_eq!(editor.value(), "ab<br>");
        update_input(&mut editor, InputMsg::Edit(TextEditMsg::DeleteBackward)).unwrap();
        assert_eq!(editor.value(), "ab");
    }

    #[test]
    fn test_noop_delete_does_not_notify() {
        let mut editor = NoteEditor::new("ab");
        update_input(
            &mut editor,
            InputMsg::Edit(TextEditMsg::Move(MoveTarget::DocumentStart)),
        );
        assert!(update_input(&mut editor, InputMsg::Edit(TextEditMsg::DeleteBackward)).is_none());
        assert_eq!(editor.revision(), 0);
    }

    #[test]
    fn test_caret_move_hides_overlay() {
        let mut editor = NoteEditor::new("pt ch");
        crate::update::refresh_suggestions(&mut editor);
        assert!(editor.autocomplete.is_some());

        update_input(&mut editor, InputMsg::Edit(TextEditMsg::Move(MoveTarget::Left)));
        assert!(editor.autocomplete.is_none());
    }

    #[test]
    fn test_typed_label_is_underlined() {
        let mut editor = NoteEditor::new("#Plan");
        update_input(&mut editor, insert(":")).unwrap();
        assert_eq!(editor.value(), "<u>#Plan:</u>");
    }
}
