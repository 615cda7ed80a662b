//! Suggestion overlay behavior

mod common;

use common::*;
use notefield::autocomplete::MAX_CANDIDATES;
use notefield::keymap::KeyCode;
use notefield::messages::{AutocompleteMsg, Msg, SurfaceMsg};
use notefield::NoteEditor;

fn numbered() -> Host {
    let table = table(&[
        ("ab1", "one"),
        ("ab2", "two"),
        ("ab3", "three"),
        ("ab4", "four"),
        ("ab5", "five"),
        ("ab6", "six"),
        ("ab7", "seven"),
        ("xab", "not a prefix match"),
    ]);
    Host::with_editor(NoteEditor::new("").with_shortcuts(table))
}

fn selected(host: &Host) -> usize {
    host.editor
        .autocomplete
        .as_ref()
        .map(|s| s.selected_index)
        .unwrap_or(usize::MAX)
}

#[test]
fn test_needs_two_characters() {
    let mut host = numbered();
    host.type_text("a");
    assert!(!host.overlay_visible());
    host.type_text("b");
    assert!(host.overlay_visible());
}

#[test]
fn test_prefix_matches_in_table_order() {
    let mut host = numbered();
    host.type_text("ab");
    assert_eq!(host.candidates(), vec!["ab1", "ab2", "ab3", "ab4", "ab5"]);
    assert_eq!(host.candidates().len(), MAX_CANDIDATES);

    host.type_text("6");
    assert_eq!(host.candidates(), vec!["ab6"]);

    host.type_text("x");
    assert!(!host.overlay_visible());
}

#[test]
fn test_prefix_ignores_case() {
    let mut host = numbered();
    host.type_text("AB");
    assert_eq!(host.candidates().len(), MAX_CANDIDATES);
    assert_eq!(host.candidates()[0], "ab1");
}

#[test]
fn test_arrow_keys_wrap() {
    let mut host = numbered();
    host.type_text("ab");
    assert_eq!(selected(&host), 0);

    assert!(host.key(KeyCode::Up));
    assert_eq!(selected(&host), MAX_CANDIDATES - 1);

    for _ in 0..MAX_CANDIDATES {
        assert!(host.key(KeyCode::Down));
    }
    assert_eq!(selected(&host), MAX_CANDIDATES - 1);
    assert!(host.key(KeyCode::Down));
    assert_eq!(selected(&host), 0);
    assert_eq!(host.value(), "ab");
}

#[test]
fn test_enter_commits_highlighted_candidate() {
    let mut host = numbered();
    host.type_text("pt ab");
    host.key(KeyCode::Down);
    assert!(host.key(KeyCode::Enter));

    assert_eq!(host.value(), "pt two ");
    assert!(!host.overlay_visible());
    assert!(host.caret_at_end());
}

#[test]
fn test_tab_commits_highlighted_candidate() {
    let mut host = numbered();
    host.type_text("ab");
    assert!(host.key(KeyCode::Tab));
    assert_eq!(host.value(), "one ");
}

#[test]
fn test_escape_hides_until_next_keyup() {
    let mut host = numbered();
    host.type_text("ab");
    assert!(host.key(KeyCode::Escape));
    assert!(!host.overlay_visible());
    assert_eq!(host.value(), "ab");

    host.type_text("3");
    assert_eq!(host.candidates(), vec!["ab3"]);
}

#[test]
fn test_blur_hides_overlay() {
    let mut host = numbered();
    host.type_text("ab");
    host.send(Msg::Surface(SurfaceMsg::Blur));
    assert!(!host.overlay_visible());
    assert_eq!(host.value(), "ab");
}

#[test]
fn test_pointer_selection() {
    let mut host = numbered();
    host.type_text("ab");

    host.send(Msg::Autocomplete(AutocompleteMsg::Hover(3)));
    assert_eq!(selected(&host), 3);
    // Out of range hover is ignored
    host.send(Msg::Autocomplete(AutocompleteMsg::Hover(9)));
    assert_eq!(selected(&host), 3);

    host.send(Msg::Autocomplete(AutocompleteMsg::PointerDown(2)));
    assert_eq!(host.value(), "three ");
    assert!(!host.overlay_visible());
}

#[test]
fn test_commit_emits_local_change() {
    let mut host = numbered();
    host.type_text("ab");
    let before = host.events.len();
    host.key(KeyCode::Enter);

    assert_eq!(host.events.len(), before + 1);
    assert_eq!(host.events.last().unwrap().value, "one ");
}

#[test]
fn test_overlay_anchor_follows_caret() {
    let table = table(&[("ab1", "one")]);
    let editor = NoteEditor::new("").with_shortcuts(table).with_font_size(20.0);
    let mut host = Host::with_editor(editor);
    host.type_text("pt ab");

    let anchor = host.editor.autocomplete.as_ref().unwrap().anchor;
    assert_eq!(anchor.top, 30.0);
    assert!((anchor.left - 60.0).abs() < 0.01);
}

#[test]
fn test_navigation_keys_do_not_refresh() {
    let mut host = numbered();
    host.type_text("ab");
    host.key(KeyCode::Escape);
    host.key(KeyCode::Left);
    assert!(!host.overlay_visible());
}

#[test]
fn test_moving_the_caret_hides_overlay() {
    let mut host = numbered();
    host.type_text("ab");
    assert!(host.overlay_visible());

    host.key(KeyCode::Left);
    assert!(!host.overlay_visible());

    // Enter is a plain line break again, nothing is committed
    assert!(!host.key(KeyCode::Enter));
    assert_eq!(host.value(), "a<br>b");
}
