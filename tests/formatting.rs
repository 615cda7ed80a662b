//! `#label:` underlining and formatting commands

mod common;

use common::*;
use notefield::commands::{CommandExecutor, FormatCommand};
use notefield::editable::{Point, Selection, Surface};
use notefield::format::apply_underline_formatting;
use notefield::keymap::{KeyCode, Keystroke, Modifiers};
use notefield::messages::{Msg, SurfaceMsg};
use notefield::{EditorError, NoteEditor};

#[test]
fn test_scenario_label_is_underlined_while_typing() {
    let mut host = Host::new("");
    host.type_text("#Plan:");
    assert_eq!(host.value(), "<u>#Plan:</u>");

    host.type_text(" f/u 2 wks");
    assert_eq!(host.value(), "<u>#Plan:</u> f/u 2 wks");

    let value = host.value();
    assert_eq!(apply_underline_formatting(&value), value);
}

#[test]
fn test_second_label_leaves_first_alone() {
    let mut host = Host::new("");
    host.type_text("#S: ok #O:");
    assert_eq!(host.value(), "<u>#S:</u> ok <u>#O:</u>");
}

#[test]
fn test_pasted_labels_are_underlined() {
    let mut host = Host::new("");
    host.paste("#A: stable #P: discharge");
    assert_eq!(host.value(), "<u>#A:</u> stable <u>#P:</u> discharge");
}

#[test]
fn test_external_value_is_not_reformatted() {
    let mut host = Host::new("");
    host.send(Msg::set_value(notefield::messages::ValueUpdate::external(
        "#Plan: rest",
    )));
    assert_eq!(host.value(), "#Plan: rest");
}

#[test]
fn test_keymap_bold_shortcut() {
    let mut host = Host::new("pt has sob");
    let leaf = host.editor.surface.text_leaves()[0];
    host.send(Msg::Surface(SurfaceMsg::SetSelection(Selection::new(
        Point::new(leaf, 7),
        Point::new(leaf, 10),
    ))));

    let bold = Keystroke::new(KeyCode::Char('b'), Modifiers::cmd());
    assert!(host.press(bold));
    assert_eq!(host.value(), "pt has <b>sob</b>");
    assert_eq!(host.events.len(), 1);
}

#[test]
fn test_unbound_command_key_is_ignored() {
    let mut host = Host::new("abc");
    let stroke = Keystroke::new(KeyCode::Char('k'), Modifiers::cmd());
    assert!(!host.press(stroke));
    assert_eq!(host.value(), "abc");
    assert!(host.events.is_empty());
}

#[test]
fn test_exec_list_command() {
    let mut host = Host::new("item");
    host.send(Msg::exec(FormatCommand::UnorderedList));
    assert_eq!(host.value(), "<ul><li>item</li></ul>");
}

/// Executor that records commands instead of running them
struct Recorder(std::sync::Arc<std::sync::Mutex<Vec<FormatCommand>>>);

impl CommandExecutor for Recorder {
    fn execute(&mut self, _: &mut Surface, command: &FormatCommand) -> Result<bool, EditorError> {
        self.0.lock().unwrap().push(command.clone());
        Ok(false)
    }
}

#[test]
fn test_custom_executor_receives_commands() {
    let log = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
    let editor = NoteEditor::new("abc").with_executor(Recorder(log.clone()));
    let mut host = Host::with_editor(editor);

    host.send(Msg::exec(FormatCommand::ForeColor("red".into())));
    host.press(Keystroke::new(KeyCode::Char('z'), Modifiers::cmd()));

    assert_eq!(
        *log.lock().unwrap(),
        vec![FormatCommand::ForeColor("red".into()), FormatCommand::Undo]
    );
    // Nothing changed, nothing emitted
    assert!(host.events.is_empty());
}
