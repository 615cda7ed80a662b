//! Default formatting keybindings
//!
//! The embedded keymap.yaml is the source of truth; the hardcoded table is
//! only used if it fails to parse.

use std::path::Path;

use super::binding::Keybinding;
use super::config::{load_keymap_file, parse_keymap_yaml};
use super::types::{KeyCode, Keystroke, Modifiers};
use crate::commands::FormatCommand;
use crate::config_paths;

/// Default keymap YAML embedded at compile time
const DEFAULT_KEYMAP_YAML: &str = include_str!("../../keymap.yaml");

/// Load and merge keymaps: defaults + user overrides
///
/// Loading order (each layer overrides the previous):
/// 1. Embedded default keymap (compiled into binary)
/// 2. Explicit keymap file from the editor config, if any
/// 3. User config at ~/.config/notefield/keymap.yaml
pub fn load_default_keymap(extra: Option<&Path>) -> Vec<Keybinding> {
    let mut bindings = match parse_keymap_yaml(DEFAULT_KEYMAP_YAML) {
        Ok(b) => {
            tracing::info!("Loaded embedded default keymap ({} bindings)", b.len());
            b
        }
        Err(e) => {
            tracing::warn!(
                "Failed to parse embedded keymap: {}, using hardcoded defaults",
                e
            );
            default_bindings()
        }
    };

    if let Some(path) = extra {
        match load_keymap_file(path) {
            Ok(extra_bindings) => {
                tracing::info!(
                    "Merging keymap from {} ({} bindings)",
                    path.display(),
                    extra_bindings.len()
                );
                bindings = merge_bindings(bindings, extra_bindings);
            }
            Err(e) => {
                tracing::warn!("Failed to load keymap from {}: {}", path.display(), e);
            }
        }
    }

    if let Some(user_path) = config_paths::keymap_file() {
        if user_path.exists() {
            match load_keymap_file(&user_path) {
                Ok(user_bindings) => {
                    tracing::info!(
                        "Merging user keymap from {} ({} bindings)",
                        user_path.display(),
                        user_bindings.len()
                    );
                    bindings = merge_bindings(bindings, user_bindings);
                }
                Err(e) => {
                    tracing::warn!(
                        "Failed to load user keymap from {}: {}",
                        user_path.display(),
                        e
                    );
                }
            }
        }
    }

    bindings
}

/// Merge user bindings into base bindings
///
/// A user binding with the same keystroke replaces the base binding;
/// anything else is added.
pub fn merge_bindings(base: Vec<Keybinding>, user: Vec<Keybinding>) -> Vec<Keybinding> {
    let mut result = base;

    for user_binding in user {
        match result
            .iter()
            .position(|b| b.keystroke == user_binding.keystroke)
        {
            Some(idx) => result[idx] = user_binding,
            None => result.push(user_binding),
        }
    }

    result
}

/// Hardcoded formatting bindings for the current platform
///
/// Uses Cmd on macOS, Ctrl on Windows/Linux for the "command" modifier.
pub fn default_bindings() -> Vec<Keybinding> {
    let cmd = Modifiers::cmd();
    let cmd_shift = cmd | Modifiers::SHIFT;

    vec![
        bind(KeyCode::Char('b'), cmd, FormatCommand::Bold),
        bind(KeyCode::Char('i'), cmd, FormatCommand::Italic),
        bind(KeyCode::Char('u'), cmd, FormatCommand::Underline),
        bind(KeyCode::Char('8'), cmd_shift, FormatCommand::UnorderedList),
        bind(KeyCode::Char('7'), cmd_shift, FormatCommand::OrderedList),
        bind(KeyCode::Char(']'), cmd, FormatCommand::Indent),
        bind(KeyCode::Char('['), cmd, FormatCommand::Outdent),
        bind(KeyCode::Char('z'), cmd, FormatCommand::Undo),
        bind(KeyCode::Char('z'), cmd_shift, FormatCommand::Redo),
    ]
}

/// Get the embedded default keymap YAML
pub fn get_default_keymap_yaml() -> &'static str {
    DEFAULT_KEYMAP_YAML
}

fn bind(key: KeyCode, mods: Modifiers, command: FormatCommand) -> Keybinding {
    Keybinding::new(Keystroke::new(key, mods), command)
}
