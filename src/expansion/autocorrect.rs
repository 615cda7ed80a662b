//! Built-in misspelling dictionary

use std::collections::HashMap;
use std::sync::OnceLock;

/// Read-only misspelling → correction table, keyed by lowercase misspelling
#[derive(Debug)]
pub struct AutocorrectTable {
    corrections: HashMap<&'static str, &'static str>,
}

const BUILTIN_CORRECTIONS: &[(&str, &str)] = &[
    ("teh", "the"),
    ("hte", "the"),
    ("adn", "and"),
    ("taht", "that"),
    ("waht", "what"),
    ("wiht", "with"),
    ("recieve", "receive"),
    ("recieved", "received"),
    ("beleive", "believe"),
    ("occured", "occurred"),
    ("untill", "until"),
    ("seperate", "separate"),
    ("definately", "definitely"),
    ("pateint", "patient"),
    ("paitent", "patient"),
    ("pateints", "patients"),
    ("symtoms", "symptoms"),
    ("symptons", "symptoms"),
    ("diagnosys", "diagnosis"),
    ("perscription", "prescription"),
    ("medicaiton", "medication"),
    ("abdomin", "abdomen"),
    ("nausia", "nausea"),
    ("dizzyness", "dizziness"),
    ("fevr", "fever"),
    ("tounge", "tongue"),
    ("wieght", "weight"),
    ("hieght", "height"),
];

impl AutocorrectTable {
    /// The shared built-in table
    pub fn builtin() -> &'static AutocorrectTable {
        static TABLE: OnceLock<AutocorrectTable> = OnceLock::new();
        TABLE.get_or_init(|| AutocorrectTable {
            corrections: BUILTIN_CORRECTIONS.iter().copied().collect(),
        })
    }

    /// Case-insensitive exact lookup
    pub fn lookup(&self, word: &str) -> Option<&'static str> {
        self.corrections.get(word.to_lowercase().as_str()).copied()
    }

    pub fn len(&self) -> usize {
        self.corrections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.corrections.is_empty()
    }
}
