//! Host and collaborator messages: value reconciliation, programmatic
//! insertions and the insertion queue

use crate::commands::Cmd;
use crate::editable::MarkupNode;
use crate::error::EditorError;
use crate::messages::{HostMsg, Origin};
use crate::model::NoteEditor;
use crate::queue::InsertionRequest;

pub fn update_host(editor: &mut NoteEditor, msg: HostMsg) -> Option<Cmd> {
    match msg {
        HostMsg::SetValue(update) => {
            let result = editor.reconcile(update);
            tracing::trace!(target: "reconcile", ?result, "value received");
            None
        }
        HostMsg::InsertAtCursorOrEnd { text, track } => insert_text(editor, &text, track),
        HostMsg::InsertImage { url } => insert_image(editor, &url),
        HostMsg::DrainInsertions => drain_insertions(editor),
    }
}

fn insert_text(editor: &mut NoteEditor, text: &str, track: bool) -> Option<Cmd> {
    if text.is_empty() {
        return None;
    }
    let fragment = editor.fragment(text, track);
    insert_external(editor, fragment)
}

/// Images are never tracked
fn insert_image(editor: &mut NoteEditor, url: &str) -> Option<Cmd> {
    let image = MarkupNode::element("img", vec![("src".to_string(), url.to_string())], Vec::new());
    insert_external(editor, vec![image])
}

fn insert_external(editor: &mut NoteEditor, fragment: Vec<MarkupNode>) -> Option<Cmd> {
    match editor.insert_at_cursor_or_end(fragment) {
        Ok(_) => {
            editor.format_labels();
            Some(editor.notify(Origin::External))
        }
        Err(e) => {
            tracing::warn!(target: "queue", %e, "collaborator insertion dropped");
            None
        }
    }
}

/// Apply pending collaborator requests in arrival order. Each request
/// resolves "caret or end" at this moment, not when it was submitted.
fn drain_insertions(editor: &mut NoteEditor) -> Option<Cmd> {
    let mut cmds = Vec::new();
    for request in editor.drain_queue() {
        let cmd = match request {
            InsertionRequest::Text { text, track } => insert_text(editor, &text, track),
            InsertionRequest::Image { url } => insert_image(editor, &url),
            InsertionRequest::Failed { source } => {
                tracing::warn!(target: "queue", %source, "collaborator failed");
                Some(Cmd::ReportError(EditorError::HostCallbackFailure { source }))
            }
        };
        cmds.extend(cmd);
    }

    match Cmd::batch(cmds) {
        Cmd::None => None,
        cmd => Some(cmd),
    }
}
