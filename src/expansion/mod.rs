//! Shortcut expansion and autocorrect
//!
//! ```text
//! Space/Tab keydown → locate_word() → resolve() → Expansion → word replacement
//! ```

mod autocorrect;
mod resolver;
mod shortcuts;

pub use autocorrect::AutocorrectTable;
pub use resolver::{resolve, Expansion, ExpansionSource, Trigger};
pub use shortcuts::{
    default_shortcuts, load_shortcut_file, parse_shortcut_yaml, ConflictPolicy, ShortcutEntry,
    ShortcutFile, ShortcutFileError, ShortcutTable,
};
