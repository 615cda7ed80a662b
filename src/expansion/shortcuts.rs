//! User shortcut (autotext) table
//!
//! Shortcuts are matched case-insensitively. The table keeps registration
//! order so autocomplete can list candidates in the order the user defined
//! them.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::EditorError;

/// A single autotext entry: `sob` → `shortness of breath`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortcutEntry {
    pub shortcut: String,
    pub expansion: String,
    #[serde(default)]
    pub category: String,
}

impl ShortcutEntry {
    pub fn new(shortcut: &str, expansion: &str, category: &str) -> Self {
        Self {
            shortcut: shortcut.to_string(),
            expansion: expansion.to_string(),
            category: category.to_string(),
        }
    }
}

/// What to do when two entries share a shortcut (compared case-insensitively)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictPolicy {
    /// The later entry replaces the earlier one in place (logged)
    #[default]
    LastWins,
    /// The earlier entry is kept and the later one ignored
    FirstWins,
    /// Registration fails with `AmbiguousShortcut`
    Reject,
}

/// Ordered, case-insensitive shortcut table
#[derive(Debug, Clone, Default)]
pub struct ShortcutTable {
    entries: Vec<ShortcutEntry>,
    index: HashMap<String, usize>,
    policy: ConflictPolicy,
}

impl ShortcutTable {
    pub fn new(policy: ConflictPolicy) -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
            policy,
        }
    }

    /// Build a table from entries, applying the conflict policy in order
    pub fn from_entries(
        entries: impl IntoIterator<Item = ShortcutEntry>,
        policy: ConflictPolicy,
    ) -> Result<Self, EditorError> {
        let mut table = Self::new(policy);
        for entry in entries {
            table.insert(entry)?;
        }
        Ok(table)
    }

    /// Table holding the built-in clinical shortcuts
    pub fn with_defaults() -> Self {
        let mut table = Self::new(ConflictPolicy::LastWins);
        for entry in default_shortcuts() {
            // Built-in keys are unique
            let _ = table.insert(entry);
        }
        table
    }

    /// Register an entry. Blank shortcuts are ignored.
    pub fn insert(&mut self, entry: ShortcutEntry) -> Result<(), EditorError> {
        let key = entry.shortcut.trim().to_lowercase();
        if key.is_empty() {
            tracing::debug!(target: "expansion", "ignoring shortcut with empty key");
            return Ok(());
        }

        match self.index.get(&key) {
            Some(&i) => match self.policy {
                ConflictPolicy::LastWins => {
                    tracing::warn!(
                        target: "expansion",
                        shortcut = %key,
                        previous = %self.entries[i].category,
                        replacement = %entry.category,
                        "duplicate shortcut, later entry wins"
                    );
                    self.entries[i] = entry;
                }
                ConflictPolicy::FirstWins => {
                    tracing::debug!(target: "expansion", shortcut = %key, "duplicate shortcut ignored");
                }
                ConflictPolicy::Reject => {
                    return Err(EditorError::AmbiguousShortcut { shortcut: key });
                }
            },
            None => {
                self.index.insert(key, self.entries.len());
                self.entries.push(entry);
            }
        }
        Ok(())
    }

    /// Case-insensitive exact lookup
    pub fn lookup(&self, word: &str) -> Option<&ShortcutEntry> {
        self.index
            .get(&word.to_lowercase())
            .map(|&i| &self.entries[i])
    }

    /// Entries in registration order
    pub fn entries(&self) -> &[ShortcutEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn policy(&self) -> ConflictPolicy {
        self.policy
    }
}

/// Root structure of a shortcut YAML file
#[derive(Debug, Deserialize)]
pub struct ShortcutFile {
    #[serde(default)]
    pub conflict_policy: ConflictPolicy,
    pub autotexts: Vec<ShortcutEntry>,
}

/// Load a shortcut table from a YAML file
pub fn load_shortcut_file(path: &Path) -> Result<ShortcutTable, ShortcutFileError> {
    let content =
        std::fs::read_to_string(path).map_err(|e| ShortcutFileError::IoError(e.to_string()))?;

    parse_shortcut_yaml(&content)
}

/// Parse a shortcut table from a YAML string
pub fn parse_shortcut_yaml(yaml: &str) -> Result<ShortcutTable, ShortcutFileError> {
    let file: ShortcutFile =
        serde_yaml::from_str(yaml).map_err(|e| ShortcutFileError::ParseError(e.to_string()))?;

    ShortcutTable::from_entries(file.autotexts, file.conflict_policy)
        .map_err(ShortcutFileError::Conflict)
}

/// Errors that can occur when loading shortcut files
#[derive(Debug, Clone)]
pub enum ShortcutFileError {
    IoError(String),
    ParseError(String),
    Conflict(EditorError),
}

impl std::fmt::Display for ShortcutFileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShortcutFileError::IoError(e) => write!(f, "IO error: {}", e),
            ShortcutFileError::ParseError(e) => write!(f, "Parse error: {}", e),
            ShortcutFileError::Conflict(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ShortcutFileError {}

/// Built-in clinical autotexts used when the host supplies none
pub fn default_shortcuts() -> Vec<ShortcutEntry> {
    [
        ("sob", "shortness of breath", "Respiratory"),
        ("doe", "dyspnea on exertion", "Respiratory"),
        ("cp", "chest pain", "Cardiovascular"),
        ("htn", "hypertension", "Cardiovascular"),
        ("cad", "coronary artery disease", "Cardiovascular"),
        ("chf", "congestive heart failure", "Cardiovascular"),
        ("afib", "atrial fibrillation", "Cardiovascular"),
        ("dm", "diabetes mellitus", "Endocrine"),
        ("dm2", "type 2 diabetes mellitus", "Endocrine"),
        ("copd", "chronic obstructive pulmonary disease", "Respiratory"),
        ("uri", "upper respiratory infection", "Respiratory"),
        ("uti", "urinary tract infection", "Genitourinary"),
        ("n/v", "nausea and vomiting", "Gastrointestinal"),
        ("abd", "abdominal", "Gastrointestinal"),
        ("hx", "history", "General"),
        ("fhx", "family history", "General"),
        ("nkda", "no known drug allergies", "General"),
        ("wnl", "within normal limits", "General"),
        ("prn", "as needed", "Medication"),
        ("bid", "twice daily", "Medication"),
        ("tid", "three times daily", "Medication"),
        ("qd", "once daily", "Medication"),
    ]
    .into_iter()
    .map(|(s, e, c)| ShortcutEntry::new(s, e, c))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        let table = ShortcutTable::with_defaults();
        assert_eq!(
            table.lookup("SOB").map(|e| e.expansion.as_str()),
            Some("shortness of breath")
        );
        assert_eq!(
            table.lookup("Sob").map(|e| e.expansion.as_str()),
            Some("shortness of breath")
        );
        assert!(table.lookup("sobx").is_none());
    }

    #[test]
    fn test_last_wins_replaces_in_place() {
        let table = ShortcutTable::from_entries(
            vec![
                ShortcutEntry::new("cp", "chest pain", "Cardio"),
                ShortcutEntry::new("bp", "blood pressure", "Vitals"),
                ShortcutEntry::new("CP", "cerebral palsy", "Neuro"),
            ],
            ConflictPolicy::LastWins,
        )
        .unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.entries()[0].expansion, "cerebral palsy");
        assert_eq!(table.lookup("cp").unwrap().category, "Neuro");
    }

    #[test]
    fn test_first_wins_keeps_original() {
        let table = ShortcutTable::from_entries(
            vec![
                ShortcutEntry::new("cp", "chest pain", "Cardio"),
                ShortcutEntry::new("cp", "cerebral palsy", "Neuro"),
            ],
            ConflictPolicy::FirstWins,
        )
        .unwrap();
        assert_eq!(table.lookup("cp").unwrap().expansion, "chest pain");
    }

    #[test]
    fn test_reject_reports_ambiguous_shortcut() {
        let result = ShortcutTable::from_entries(
            vec![
                ShortcutEntry::new("cp", "chest pain", "Cardio"),
                ShortcutEntry::new("Cp", "cerebral palsy", "Neuro"),
            ],
            ConflictPolicy::Reject,
        );
        assert_eq!(
            result.unwrap_err(),
            EditorError::AmbiguousShortcut {
                shortcut: "cp".into()
            }
        );
    }

    #[test]
    fn test_blank_shortcut_ignored() {
        let mut table = ShortcutTable::new(ConflictPolicy::Reject);
        table.insert(ShortcutEntry::new("  ", "nothing", "")).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_parse_shortcut_yaml() {
        let yaml = r#"
conflict_policy: first_wins
autotexts:
  - shortcut: sob
    expansion: shortness of breath
    category: Respiratory
  - shortcut: rrr
    expansion: regular rate and rhythm
"#;
        let table = parse_shortcut_yaml(yaml).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.policy(), ConflictPolicy::FirstWins);
        assert_eq!(table.entries()[1].category, "");
    }

    #[test]
    fn test_parse_shortcut_yaml_errors() {
        assert!(matches!(
            parse_shortcut_yaml("autotexts: 12"),
            Err(ShortcutFileError::ParseError(_))
        ));
        let dupes = "conflict_policy: reject\nautotexts:\n  - {shortcut: a1, expansion: x}\n  - {shortcut: A1, expansion: y}\n";
        assert!(matches!(
            parse_shortcut_yaml(dupes),
            Err(ShortcutFileError::Conflict(EditorError::AmbiguousShortcut { .. }))
        ));
    }

    #[test]
    fn test_default_shortcuts_are_unique() {
        let defaults = default_shortcuts();
        let table = ShortcutTable::from_entries(defaults.clone(), ConflictPolicy::Reject).unwrap();
        assert_eq!(table.len(), defaults.len());
    }
}
