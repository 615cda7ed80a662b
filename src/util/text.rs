//! Text helpers: the word locator and tab-aware column math

use crate::editable::{Point, Selection, Surface};
use crate::error::EditorError;

/// The word immediately before the caret and the points bounding it.
///
/// `start` and `end` may lie in different text nodes when the word spans
/// several adjacent inline leaves (e.g. one tracked span per typed character).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordSpan {
    pub start: Point,
    pub end: Point,
    pub text: String,
}

impl WordSpan {
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Length of the word in characters
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Find the contiguous non-whitespace run immediately before the caret.
///
/// The scan only looks left of the caret. It crosses into earlier text
/// leaves of the same block and stops at whitespace, void elements (`<br>`,
/// `<img>`) and block boundaries.
///
/// Fails with `InvalidCursorState` when the selection is a range or the
/// caret is not in a text node; callers treat that as "no word".
pub fn locate_word(surface: &Surface, selection: Selection) -> Result<WordSpan, EditorError> {
    if !selection.is_collapsed() || !surface.is_valid_point(selection.head) {
        return Err(EditorError::InvalidCursorState);
    }
    let caret = surface.normalize(selection.head);
    if surface.text(caret.node).is_none() {
        return Err(EditorError::InvalidCursorState);
    }

    let mut parts: Vec<String> = Vec::new();
    let mut start = caret;
    let mut node = caret.node;
    let mut offset = caret.offset;

    loop {
        let Some(text) = surface.text(node) else {
            break;
        };
        let chars: Vec<char> = text.chars().take(offset).collect();
        let mut i = chars.len();
        while i > 0 && !chars[i - 1].is_whitespace() {
            i -= 1;
        }
        if i < chars.len() || node == caret.node {
            start = Point::new(node, i);
            parts.push(chars[i..].iter().collect());
        }
        if i > 0 {
            break;
        }

        match surface.prev_inline_leaf(node) {
            Some(prev) => match surface.text_len(prev) {
                Some(len) => {
                    node = prev;
                    offset = len;
                }
                None => break,
            },
            None => break,
        }
    }

    parts.reverse();
    Ok(WordSpan {
        start,
        end: caret,
        text: parts.concat(),
    })
}

/// Tab stops used when measuring caret columns
pub const TABULATOR_WIDTH: usize = 4;

/// Width of a line in columns, with tabs advancing to the next tab stop
pub fn visual_width(text: &str) -> usize {
    text.chars().fold(0, |col, ch| match ch {
        '\t' => col + TABULATOR_WIDTH - col % TABULATOR_WIDTH,
        _ => col + 1,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editable::Mutation;

    fn word_at_end(markup: &str) -> Result<WordSpan, EditorError> {
        let surface = Surface::from_markup(markup);
        locate_word(&surface, surface.selection())
    }

    #[test]
    fn test_word_before_caret() {
        let span = word_at_end("pt has sob").unwrap();
        assert_eq!(span.text, "sob");
        assert_eq!(span.start.offset, 7);
        assert_eq!(span.end.offset, 10);
    }

    #[test]
    fn test_empty_word_after_whitespace() {
        let span = word_at_end("pt has ").unwrap();
        assert!(span.is_empty());
        assert_eq!(span.start, span.end);
    }

    #[test]
    fn test_scan_is_left_looking_only() {
        let mut surface = Surface::from_markup("shortcut");
        let t = surface.text_leaves()[0];
        surface.set_caret(Point::new(t, 5));
        let span = locate_word(&surface, surface.selection()).unwrap();
        assert_eq!(span.text, "short");
    }

    #[test]
    fn test_word_across_tracked_fragments() {
        let span = word_at_end(
            "pt has <span data-tracked=\"true\">s</span><span data-tracked=\"true\">o</span><span data-tracked=\"true\">b</span>",
        )
        .unwrap();
        assert_eq!(span.text, "sob");
        assert_ne!(span.start.node, span.end.node);
    }

    #[test]
    fn test_scan_stops_at_line_break_and_block() {
        assert_eq!(word_at_end("abc<br>def").unwrap().text, "def");
        assert_eq!(word_at_end("<div>abc</div><div>def</div>").unwrap().text, "def");
    }

    #[test]
    fn test_range_selection_is_invalid() {
        let mut surface = Surface::from_markup("hello");
        let t = surface.text_leaves()[0];
        surface.set_selection(Selection::new(Point::new(t, 0), Point::new(t, 5)));
        assert_eq!(
            locate_word(&surface, surface.selection()),
            Err(EditorError::InvalidCursorState)
        );
    }

    #[test]
    fn test_caret_outside_text_is_invalid() {
        let mut surface = Surface::new();
        let caret = surface.caret();
        surface
            .apply(Mutation::insert_markup(caret, "<img src=\"x.png\">"))
            .unwrap();
        surface.move_caret(crate::editable::MoveTarget::DocumentEnd);
        assert_eq!(
            locate_word(&surface, surface.selection()),
            Err(EditorError::InvalidCursorState)
        );
    }

    #[test]
    fn test_visual_width_with_tabs() {
        assert_eq!(visual_width("\t"), 4);
        assert_eq!(visual_width("a\tb"), 5);
        assert_eq!(visual_width("abcd\t"), 8);
        assert_eq!(visual_width("pt ab"), 5);
    }
}
