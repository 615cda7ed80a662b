//! Autocomplete suggester and the overlay's selection state machine

use crate::editable::CaretGeometry;
use crate::expansion::{ShortcutEntry, ShortcutTable};
use crate::util::visual_width;

/// Words shorter than this never show suggestions
pub const MIN_PREFIX_LEN: usize = 2;

/// Upper bound on candidates shown at once
pub const MAX_CANDIDATES: usize = 5;

/// Line height as a multiple of the font size
const LINE_HEIGHT_FACTOR: f32 = 1.5;

/// Average glyph advance as a multiple of the font size
const CHAR_WIDTH_FACTOR: f32 = 0.6;

/// Compute candidates for a partial word: entries whose shortcut starts with
/// the word (case-insensitive), in table order, at most [`MAX_CANDIDATES`].
pub fn suggest(word: &str, table: &ShortcutTable) -> Vec<ShortcutEntry> {
    if word.chars().count() < MIN_PREFIX_LEN {
        return Vec::new();
    }
    let prefix = word.to_lowercase();
    table
        .entries()
        .iter()
        .filter(|entry| entry.shortcut.to_lowercase().starts_with(&prefix))
        .take(MAX_CANDIDATES)
        .cloned()
        .collect()
}

/// Overlay position relative to the top-left of the surface, in pixels
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OverlayAnchor {
    pub top: f32,
    pub left: f32,
}

impl OverlayAnchor {
    /// Place the overlay just below the caret's line
    pub fn below_caret(geometry: &CaretGeometry, font_size: f32) -> Self {
        let column = visual_width(&geometry.line_text);
        Self {
            top: (geometry.line + 1) as f32 * LINE_HEIGHT_FACTOR * font_size,
            left: column as f32 * CHAR_WIDTH_FACTOR * font_size,
        }
    }
}

/// State for a visible suggestion overlay. The overlay is hidden when the
/// editor holds no state.
#[derive(Debug, Clone, PartialEq)]
pub struct AutocompleteState {
    /// Current candidates (never empty, at most [`MAX_CANDIDATES`])
    pub candidates: Vec<ShortcutEntry>,
    /// Index of the highlighted candidate
    pub selected_index: usize,
    /// Where the overlay is drawn
    pub anchor: OverlayAnchor,
}

impl AutocompleteState {
    /// Build a visible state, or None when there is nothing to show
    pub fn open(candidates: Vec<ShortcutEntry>, anchor: OverlayAnchor) -> Option<Self> {
        if candidates.is_empty() {
            return None;
        }
        Some(Self {
            candidates,
            selected_index: 0,
            anchor,
        })
    }

    /// Highlight the next candidate, wrapping to the first
    pub fn select_next(&mut self) {
        self.selected_index = (self.selected_index + 1) % self.candidates.len();
    }

    /// Highlight the previous candidate, wrapping to the last
    pub fn select_prev(&mut self) {
        let len = self.candidates.len();
        self.selected_index = (self.selected_index + len - 1) % len;
    }

    /// Pointer hover; out-of-range indices are ignored
    pub fn hover(&mut self, index: usize) {
        if index < self.candidates.len() {
            self.selected_index = index;
        }
    }

    pub fn selected(&self) -> Option<&ShortcutEntry> {
        self.candidates.get(self.selected_index)
    }
}
