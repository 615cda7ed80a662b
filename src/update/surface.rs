//! Focus, selection, formatting commands and the tracking toggle

use crate::commands::{Cmd, FormatCommand};
use crate::messages::{Origin, SurfaceMsg};
use crate::model::NoteEditor;

pub fn update_surface(editor: &mut NoteEditor, msg: SurfaceMsg) -> Option<Cmd> {
    match msg {
        SurfaceMsg::Focus => {
            editor.surface.set_focused(true);
            None
        }
        SurfaceMsg::Blur => {
            editor.surface.set_focused(false);
            editor.autocomplete = None;
            None
        }
        SurfaceMsg::SetSelection(selection) => {
            if editor.surface.is_valid_point(selection.anchor)
                && editor.surface.is_valid_point(selection.head)
            {
                editor.surface.set_selection(selection);
                editor.autocomplete = None;
            } else {
                tracing::debug!(target: "message", ?selection, "stale selection ignored");
            }
            None
        }
        SurfaceMsg::Exec(command) => exec(editor, &command),
        SurfaceMsg::SetTracking(enabled) => {
            editor.tracking_enabled = enabled;
            tracing::debug!(target: "message", enabled, "change tracking toggled");
            None
        }
    }
}

/// Run a formatting command through the executor; a command that changed
/// the surface takes the local notify path
pub(super) fn exec(editor: &mut NoteEditor, command: &FormatCommand) -> Option<Cmd> {
    match editor.execute(command) {
        Ok(true) => {
            editor.format_labels();
            Some(editor.notify(Origin::Local))
        }
        Ok(false) => None,
        Err(e) => {
            tracing::debug!(target: "message", %e, ?command, "command not executed");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editable::{Point, Selection};

    #[test]
    fn test_blur_hides_overlay() {
        let mut editor = NoteEditor::new("pt ch");
        update_surface(&mut editor, SurfaceMsg::Focus);
        assert!(editor.surface.is_focused());
        crate::update::refresh_suggestions(&mut editor);
        assert!(editor.autocomplete.is_some());

        update_surface(&mut editor, SurfaceMsg::Blur);
        assert!(!editor.surface.is_focused());
        assert!(editor.autocomplete.is_none());
    }

    #[test]
    fn test_exec_bold_notifies() {
        let mut editor = NoteEditor::new("pt has sob");
        let text = editor.surface.text_leaves()[0];
        update_surface(
            &mut editor,
            SurfaceMsg::SetSelection(Selection::new(Point::new(text, 7), Point::new(text, 10))),
        );
        let cmd = update_surface(&mut editor, SurfaceMsg::Exec(FormatCommand::Bold)).unwrap();
        assert_eq!(cmd.notifications()[0].value, "pt has <b>sob</b>");
        assert_eq!(cmd.notifications()[0].origin, Origin::Local);
    }

    #[test]
    fn test_undo_is_not_notified() {
        let mut editor = NoteEditor::new("abc");
        assert!(update_surface(&mut editor, SurfaceMsg::Exec(FormatCommand::Undo)).is_none());
    }

    #[test]
    fn test_stale_selection_is_ignored() {
        let mut editor = NoteEditor::new("abc");
        let before = editor.surface.selection();
        let text = editor.surface.text_leaves()[0];
        update_surface(
            &mut editor,
            SurfaceMsg::SetSelection(Selection::collapsed(Point::new(text, 99))),
        );
        assert_eq!(editor.surface.selection(), before);
    }
}
