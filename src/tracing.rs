//! Debug tracing infrastructure for development diagnostics
//!
//! Provides structured logging with scoped filtering for debugging caret,
//! expansion and reconciliation behavior.
//!
//! # Usage
//!
//! Configure via RUST_LOG environment variable:
//! - `RUST_LOG=debug` - all debug logs
//! - `RUST_LOG=expansion=debug,reconcile=trace` - scoped filtering
//! - `RUST_LOG=notefield::update=debug` - module-level filtering
//!
//! # Log Files
//!
//! Logs are written to `~/.config/notefield/logs/notefield.log` with daily
//! rotation. File logging uses debug level by default.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config_paths::LOG_FILE_PREFIX;
use crate::model::NoteEditor;

/// Initialize tracing subscriber with console and file logging
///
/// Console output respects RUST_LOG (default `warn`). Console output goes to
/// stderr so it never mixes with values printed on stdout.
pub fn init() {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_filter(console_filter);

    // File layer - always debug level for troubleshooting
    let file_layer = match crate::config_paths::ensure_logs_dir() {
        Ok(logs_dir) => {
            let file_appender = tracing_appender::rolling::daily(logs_dir, LOG_FILE_PREFIX);
            Some(
                fmt::layer()
                    .with_writer(file_appender)
                    .with_ansi(false)
                    .with_target(true)
                    .with_line_number(true)
                    .with_filter(EnvFilter::new("debug")),
            )
        }
        Err(e) => {
            eprintln!("Warning: Could not initialize file logging: {}", e);
            None
        }
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
}

/// Lightweight snapshot of caret, focus and overlay state for diffing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaretSnapshot {
    /// (node index, offset)
    pub anchor: (usize, usize),
    pub head: (usize, usize),
    pub collapsed: bool,
    pub focused: bool,
    /// Highlighted candidate while the overlay is visible
    pub overlay: Option<usize>,
}

impl CaretSnapshot {
    pub fn from_editor(editor: &NoteEditor) -> Self {
        let sel = editor.surface.selection();
        Self {
            anchor: (sel.anchor.node.index(), sel.anchor.offset),
            head: (sel.head.node.index(), sel.head.offset),
            collapsed: sel.is_collapsed(),
            focused: editor.surface.is_focused(),
            overlay: editor.autocomplete.as_ref().map(|s| s.selected_index),
        }
    }

    /// Generate a diff description between two snapshots
    pub fn diff(&self, other: &CaretSnapshot) -> Option<String> {
        let mut changes = Vec::new();

        if self.head != other.head {
            changes.push(format!(
                "caret: n{}:{} → n{}:{}",
                self.head.0, self.head.1, other.head.0, other.head.1
            ));
        }
        if self.collapsed != other.collapsed {
            let status = if other.collapsed { "cleared" } else { "active" };
            changes.push(format!("selection {}", status));
        }
        if self.focused != other.focused {
            let status = if other.focused { "gained" } else { "lost" };
            changes.push(format!("focus {}", status));
        }
        match (self.overlay, other.overlay) {
            (None, Some(_)) => changes.push("overlay shown".to_string()),
            (Some(_), None) => changes.push("overlay hidden".to_string()),
            (Some(a), Some(b)) if a != b => changes.push(format!("candidate: {} → {}", a, b)),
            _ => {}
        }

        if changes.is_empty() {
            None
        } else {
            Some(changes.join("; "))
        }
    }
}
