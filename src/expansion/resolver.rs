//! Decides what replaces the word before the caret on a trigger key

use super::autocorrect::AutocorrectTable;
use super::shortcuts::ShortcutTable;

/// Key that ends a word and may trigger an expansion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Space,
    /// Tab confirms shortcuts only; it never autocorrects
    Tab,
}

/// Where a replacement came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpansionSource {
    Shortcut,
    Autocorrect,
    /// A candidate committed from the suggestion overlay
    Autocomplete,
}

/// Replacement text for a word (the trailing space is added on insertion)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expansion {
    pub replacement: String,
    pub source: ExpansionSource,
}

/// Resolve a word in priority order: shortcut table first, then (on Space
/// only) the autocorrect table. Empty words never resolve.
pub fn resolve(
    word: &str,
    trigger: Trigger,
    shortcuts: &ShortcutTable,
    autocorrect: &AutocorrectTable,
) -> Option<Expansion> {
    if word.is_empty() {
        return None;
    }

    if let Some(entry) = shortcuts.lookup(word) {
        tracing::debug!(target: "expansion", word, ?trigger, "shortcut match");
        return Some(Expansion {
            replacement: entry.expansion.clone(),
            source: ExpansionSource::Shortcut,
        });
    }

    if trigger == Trigger::Space {
        if let Some(corrected) = autocorrect.lookup(word) {
            tracing::debug!(target: "expansion", word, corrected, "autocorrect match");
            return Some(Expansion {
                replacement: corrected.to_string(),
                source: ExpansionSource::Autocorrect,
            });
        }
    }

    None
}
