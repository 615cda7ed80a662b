//! Configurable formatting shortcuts
//!
//! Maps keystrokes to formatting commands:
//! - Platform-specific modifier handling (Cmd on macOS, Ctrl elsewhere)
//! - User customization via YAML config files
//!
//! # Architecture
//!
//! ```text
//! KeyMsg::Down(Keystroke) → Keymap::lookup() → FormatCommand → CommandExecutor
//! ```
//!
//! # Loading Keymaps
//!
//! ```
//! use notefield::keymap::{default_bindings, parse_keymap_yaml, Keymap};
//!
//! let mut keymap = Keymap::with_bindings(default_bindings());
//! for binding in parse_keymap_yaml("bindings:\n  - key: alt+r\n    command: \"ForeColor: red\"\n").unwrap() {
//!     keymap.add_binding(binding);
//! }
//! assert_eq!(keymap.bindings().len(), default_bindings().len() + 1);
//! ```

mod binding;
mod config;
mod defaults;
#[allow(clippy::module_inception)]
mod keymap;
mod types;

pub use binding::Keybinding;
pub use config::{load_keymap_file, parse_key_string, parse_keymap_yaml, KeymapError};
pub use defaults::{
    default_bindings, get_default_keymap_yaml, load_default_keymap, merge_bindings,
};
pub use keymap::Keymap;
pub use types::{KeyCode, Keystroke, Modifiers};
