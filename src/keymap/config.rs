//! Keymap files: YAML bindings from key strings to formatting commands
//!
//! ```yaml
//! bindings:
//!   - key: cmd+shift+8
//!     command: UnorderedList
//!   - key: alt+r
//!     command: "ForeColor: red"
//!     platform: linux
//! ```

use std::path::Path;

use serde::Deserialize;

use super::binding::Keybinding;
use super::types::{KeyCode, Keystroke, Modifiers};
use crate::commands::FormatCommand;

/// Root structure of a keymap YAML file
#[derive(Debug, Deserialize)]
pub struct KeymapConfig {
    #[serde(default)]
    pub bindings: Vec<BindingConfig>,
}

/// One `key` → `command` entry, optionally limited to a platform
#[derive(Debug, Deserialize)]
pub struct BindingConfig {
    pub key: String,
    pub command: String,
    #[serde(default)]
    pub platform: Option<String>,
}

impl BindingConfig {
    fn applies_here(&self) -> bool {
        self.platform
            .as_deref()
            .map_or(true, |p| p.eq_ignore_ascii_case(std::env::consts::OS))
    }

    fn to_binding(&self) -> Result<Keybinding, KeymapError> {
        let keystroke = parse_key_string(&self.key)?;
        let command = self
            .command
            .parse::<FormatCommand>()
            .map_err(|_| KeymapError::InvalidCommand(self.command.clone()))?;
        Ok(Keybinding::new(keystroke, command))
    }
}

/// Load keybindings from a YAML file
pub fn load_keymap_file(path: &Path) -> Result<Vec<Keybinding>, KeymapError> {
    let content =
        std::fs::read_to_string(path).map_err(|e| KeymapError::IoError(e.to_string()))?;
    parse_keymap_yaml(&content)
}

/// Parse keybindings from a YAML string. Entries for other platforms are
/// skipped; a single bad entry fails the whole file.
pub fn parse_keymap_yaml(yaml: &str) -> Result<Vec<Keybinding>, KeymapError> {
    let config: KeymapConfig =
        serde_yaml::from_str(yaml).map_err(|e| KeymapError::ParseError(e.to_string()))?;

    config
        .bindings
        .iter()
        .filter(|entry| entry.applies_here())
        .map(BindingConfig::to_binding)
        .collect()
}

/// Parse a key string such as `cmd+shift+8`. The last segment is the key,
/// everything before it must be a modifier.
pub fn parse_key_string(key_str: &str) -> Result<Keystroke, KeymapError> {
    let spec = key_str.trim().to_lowercase();
    let (mod_part, key_part) = match spec.rsplit_once('+') {
        Some((mods, key)) => (Some(mods), key),
        None => (None, spec.as_str()),
    };

    let mut mods = Modifiers::NONE;
    for name in mod_part.into_iter().flat_map(|m| m.split('+')) {
        mods = mods
            | modifier(name)
                .ok_or_else(|| KeymapError::InvalidKey(format!("{} (in {})", name, key_str)))?;
    }

    let key = key_code(key_part)
        .ok_or_else(|| KeymapError::InvalidKey(format!("{} (in {})", key_part, key_str)))?;
    Ok(Keystroke::new(key, mods))
}

fn modifier(name: &str) -> Option<Modifiers> {
    match name {
        "cmd" | "mod" => Some(Modifiers::cmd()),
        "ctrl" | "control" => Some(Modifiers::CTRL),
        "shift" => Some(Modifiers::SHIFT),
        "alt" | "option" | "opt" => Some(Modifiers::ALT),
        "meta" | "super" | "win" => Some(Modifiers::META),
        _ => None,
    }
}

/// Key names follow the DOM `KeyboardEvent.key` values, lowercased, plus a
/// few short aliases
fn key_code(name: &str) -> Option<KeyCode> {
    let mut chars = name.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Some(KeyCode::Char(c));
    }
    let key = match name {
        "enter" | "return" => KeyCode::Enter,
        "escape" | "esc" => KeyCode::Escape,
        "tab" => KeyCode::Tab,
        "backspace" => KeyCode::Backspace,
        "delete" | "del" => KeyCode::Delete,
        "space" => KeyCode::Space,
        "arrowup" | "up" => KeyCode::Up,
        "arrowdown" | "down" => KeyCode::Down,
        "arrowleft" | "left" => KeyCode::Left,
        "arrowright" | "right" => KeyCode::Right,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        _ => return None,
    };
    Some(key)
}

/// Errors that can occur when loading keymaps
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeymapError {
    IoError(String),
    ParseError(String),
    InvalidKey(String),
    InvalidCommand(String),
}

impl std::fmt::Display for KeymapError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeymapError::IoError(e) => write!(f, "could not read keymap: {}", e),
            KeymapError::ParseError(e) => write!(f, "malformed keymap: {}", e),
            KeymapError::InvalidKey(k) => write!(f, "unknown key or modifier: {}", k),
            KeymapError::InvalidCommand(c) => write!(f, "unknown formatting command: {}", c),
        }
    }
}

impl std::error::Error for KeymapError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_character() {
        let stroke = parse_key_string("8").unwrap();
        assert_eq!(stroke, Keystroke::key(KeyCode::Char('8')));
    }

    #[test]
    fn test_list_shortcut() {
        let stroke = parse_key_string("Cmd+Shift+8").unwrap();
        assert_eq!(stroke.key, KeyCode::Char('8'));
        assert_eq!(stroke.mods, Modifiers::cmd() | Modifiers::SHIFT);
    }

    #[test]
    fn test_dom_key_names() {
        assert_eq!(parse_key_string("ArrowDown").unwrap().key, KeyCode::Down);
        assert_eq!(parse_key_string("esc").unwrap().key, KeyCode::Escape);
        assert_eq!(parse_key_string("alt+space").unwrap().key, KeyCode::Space);
        assert_eq!(parse_key_string("cmd+]").unwrap().key, KeyCode::Char(']'));
    }

    #[test]
    fn test_rejects_bad_key_strings() {
        for bad in ["ctrl+a+b", "ctrl+shift", "hyper+b", "f13"] {
            assert!(
                matches!(parse_key_string(bad), Err(KeymapError::InvalidKey(_))),
                "{}",
                bad
            );
        }
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
bindings:
  - key: "cmd+i"
    command: Italic
  - key: "alt+r"
    command: "ForeColor: red"
"#;
        let bindings = parse_keymap_yaml(yaml).unwrap();
        assert_eq!(bindings.len(), 2);
        assert_eq!(bindings[0].command, FormatCommand::Italic);
        assert_eq!(bindings[1].command, FormatCommand::ForeColor("red".into()));
    }

    #[test]
    fn test_unknown_command_fails_file() {
        let yaml = "bindings:\n  - key: cmd+b\n    command: Bold\n  - key: cmd+s\n    command: SaveFile\n";
        assert_eq!(
            parse_keymap_yaml(yaml),
            Err(KeymapError::InvalidCommand("SaveFile".into()))
        );
    }

    #[test]
    fn test_platform_filter() {
        let yaml = format!(
            "bindings:\n  - key: cmd+u\n    command: Underline\n    platform: {}\n  - key: cmd+b\n    command: Bold\n    platform: plan9\n",
            std::env::consts::OS
        );
        let bindings = parse_keymap_yaml(&yaml).unwrap();
        assert_eq!(bindings.len(), 1);
        assert_eq!(bindings[0].command, FormatCommand::Underline);
    }

    #[test]
    fn test_empty_file() {
        assert!(parse_keymap_yaml("{}").unwrap().is_empty());
    }
}
