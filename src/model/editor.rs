//! The note editor: one editable surface plus everything the controller
//! needs to decide what a keystroke does

use std::fmt;

use crate::autocomplete::AutocompleteState;
use crate::commands::{Cmd, CommandExecutor, NativeCommands};
use crate::config::EditorConfig;
use crate::editable::{markup, MarkupNode, Mutation, Point, Selection, Surface};
use crate::error::EditorError;
use crate::expansion::{AutocorrectTable, ShortcutTable};
use crate::format;
use crate::keymap::{default_bindings, Keymap};
use crate::messages::{ChangeEvent, Origin, UpdateOrigin, ValueUpdate};
use crate::queue::{InsertionQueue, InsertionSender};
use crate::tracking::ChangeTrackingConfig;
use crate::util::{locate_word, WordSpan};

/// Default advisory font size in pixels
pub const DEFAULT_FONT_SIZE: f32 = 14.0;

/// Outcome of handing a value to the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciliation {
    /// Echo of the editor's own emission; the surface was left alone
    Suppressed,
    /// The value already matches the surface
    Unchanged,
    /// The surface content was replaced
    Overwritten,
}

/// A single note field
pub struct NoteEditor {
    pub surface: Surface,
    pub shortcuts: ShortcutTable,
    pub autocorrect: &'static AutocorrectTable,
    pub change_tracking: Option<ChangeTrackingConfig>,
    /// Per-instance toggle, on top of `ChangeTrackingConfig::enabled`
    pub tracking_enabled: bool,
    pub font_size: f32,
    /// Visible suggestion overlay, if any
    pub autocomplete: Option<AutocompleteState>,
    pub keymap: Keymap,
    executor: Box<dyn CommandExecutor>,
    queue: InsertionQueue,
    /// Last emitted revision
    revision: u64,
    /// Highest revision whose echo has been consumed
    acknowledged: u64,
    last_reconciliation: Option<Reconciliation>,
}

impl NoteEditor {
    /// Create an editor showing `value`, with the built-in shortcut list
    pub fn new(value: &str) -> Self {
        Self {
            surface: Surface::from_markup(value),
            shortcuts: ShortcutTable::with_defaults(),
            autocorrect: AutocorrectTable::builtin(),
            change_tracking: None,
            tracking_enabled: true,
            font_size: DEFAULT_FONT_SIZE,
            autocomplete: None,
            keymap: Keymap::with_bindings(default_bindings()),
            executor: Box::new(NativeCommands),
            queue: InsertionQueue::new(),
            revision: 0,
            acknowledged: 0,
            last_reconciliation: None,
        }
    }

    /// Create an editor from persisted preferences
    pub fn from_config(config: &EditorConfig, value: &str) -> Self {
        let bindings = crate::keymap::load_default_keymap(config.keymap.as_deref());
        Self::new(value)
            .with_shortcuts(config.shortcut_table())
            .with_change_tracking(config.change_tracking.to_config())
            .with_font_size(config.font_size)
            .with_keymap(Keymap::with_bindings(bindings))
    }

    pub fn with_shortcuts(mut self, shortcuts: ShortcutTable) -> Self {
        self.shortcuts = shortcuts;
        self
    }

    pub fn with_change_tracking(mut self, tracking: Option<ChangeTrackingConfig>) -> Self {
        self.change_tracking = tracking;
        self
    }

    pub fn with_font_size(mut self, font_size: f32) -> Self {
        self.font_size = font_size;
        self
    }

    pub fn with_keymap(mut self, keymap: Keymap) -> Self {
        self.keymap = keymap;
        self
    }

    /// Replace the native command execution seam
    pub fn with_executor(mut self, executor: impl CommandExecutor + 'static) -> Self {
        self.executor = Box::new(executor);
        self
    }

    // =========================================================================
    // Host-facing accessors
    // =========================================================================

    /// Current serialized value of the surface
    pub fn value(&self) -> String {
        self.surface.serialize()
    }

    /// Submission handle for a collaborator
    pub fn insertion_sender(&self) -> InsertionSender {
        self.queue.sender()
    }

    /// Last emitted revision (0 before the first change)
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// How the most recent `SetValue` was handled
    pub fn last_reconciliation(&self) -> Option<Reconciliation> {
        self.last_reconciliation
    }

    /// Whether insertions flagged for tracking are currently wrapped
    pub fn tracking_active(&self) -> bool {
        self.tracking_enabled && self.change_tracking.as_ref().is_some_and(|c| c.enabled)
    }

    // =========================================================================
    // Controller helpers used by the update functions
    // =========================================================================

    /// The single notify step: bump the revision and emit the value
    pub(crate) fn notify(&mut self, origin: Origin) -> Cmd {
        self.revision += 1;
        let event = ChangeEvent {
            origin,
            revision: self.revision,
            value: self.surface.serialize(),
        };
        tracing::debug!(target: "reconcile", ?origin, revision = event.revision, "notify host");
        Cmd::Notify(event)
    }

    /// Reconcile the surface against a value pushed by the host
    pub(crate) fn reconcile(&mut self, update: ValueUpdate) -> Reconciliation {
        let result = self.reconcile_inner(update);
        self.last_reconciliation = Some(result);
        result
    }

    fn reconcile_inner(&mut self, update: ValueUpdate) -> Reconciliation {
        if let UpdateOrigin::Local(revision) = update.origin {
            if revision > self.acknowledged && revision <= self.revision {
                self.acknowledged = revision;
                tracing::debug!(target: "reconcile", revision, "own change echoed, surface kept");
                return Reconciliation::Suppressed;
            }
        }

        if markup::normalize(&update.value) == self.surface.serialize() {
            return Reconciliation::Unchanged;
        }

        let focused = self.surface.is_focused();
        if let Err(e) = self.surface.apply(Mutation::ReplaceContent {
            markup: update.value,
        }) {
            tracing::debug!(target: "reconcile", %e, "replace failed");
        }
        if focused {
            let end = self.surface.end_point();
            self.surface.set_caret(end);
        }
        self.autocomplete = None;
        tracing::debug!(target: "reconcile", focused, "surface overwritten by external value");
        Reconciliation::Overwritten
    }

    /// The word before the caret; cursor problems resolve to "no word"
    pub(crate) fn current_word(&self) -> Option<WordSpan> {
        match locate_word(&self.surface, self.surface.selection()) {
            Ok(span) if !span.is_empty() => Some(span),
            Ok(_) => None,
            Err(e) => {
                tracing::debug!(target: "expansion", %e, "no word at caret");
                None
            }
        }
    }

    /// Fragment for inserted text: wrapped when `track` is requested and
    /// tracking is active, plain otherwise
    pub(crate) fn fragment(&self, text: &str, track: bool) -> Vec<MarkupNode> {
        match &self.change_tracking {
            Some(config) if track && self.tracking_active() => config.fragment(text),
            _ => vec![MarkupNode::text(text)],
        }
    }

    /// Insert a fragment at the caret, replacing a range selection first.
    /// The caret ends right after the inserted content.
    pub(crate) fn insert_at_caret(&mut self, fragment: Vec<MarkupNode>) -> Result<Point, EditorError> {
        let at = self.collapse_selection()?;
        let after = self.surface.apply(Mutation::InsertAt { at, fragment })?;
        self.surface.set_caret(after);
        Ok(after)
    }

    /// Insert at the caret when focused, otherwise at the end of the content
    pub(crate) fn insert_at_cursor_or_end(
        &mut self,
        fragment: Vec<MarkupNode>,
    ) -> Result<Point, EditorError> {
        if self.surface.is_focused() && self.surface.is_valid_point(self.surface.caret()) {
            return self.insert_at_caret(fragment);
        }
        let end = self.surface.end_point();
        let after = self.surface.apply(Mutation::InsertAt { at: end, fragment })?;
        self.surface.set_caret(after);
        Ok(after)
    }

    /// Replace a word span with `replacement` plus a trailing space. The
    /// replacement is tracked when tracking is active; the space never is.
    ///
    /// The replacement goes in behind the word before the word is removed, so
    /// it stays inside whatever inline formatting the word carried.
    pub(crate) fn replace_word(&mut self, span: &WordSpan, replacement: &str) -> Result<Point, EditorError> {
        if !self.surface.is_valid_point(span.start) || !self.surface.is_valid_point(span.end) {
            return Err(EditorError::InvalidCursorState);
        }

        let mut fragment = self.fragment(replacement, true);
        match fragment.as_mut_slice() {
            [MarkupNode::Text(text)] => text.push(' '),
            _ => fragment.push(MarkupNode::text(" ")),
        }

        let after = self.surface.apply(Mutation::InsertAt {
            at: span.end,
            fragment,
        })?;
        self.surface.set_caret(after);
        self.surface.apply(Mutation::DeleteRange {
            start: span.start,
            end: span.end,
        })?;

        let caret = self.surface.normalize(self.surface.caret());
        self.surface.set_caret(caret);
        Ok(caret)
    }

    /// Run the `#label:` underline pass; failures leave the content as is
    pub(crate) fn format_labels(&mut self) {
        if let Err(e) = format::underline_labels(&mut self.surface) {
            tracing::debug!(target: "format", %e, "underline pass skipped");
        }
    }

    pub(crate) fn execute(&mut self, command: &crate::commands::FormatCommand) -> Result<bool, EditorError> {
        self.executor.execute(&mut self.surface, command)
    }

    pub(crate) fn drain_queue(&self) -> Vec<crate::queue::InsertionRequest> {
        self.queue.drain()
    }

    fn collapse_selection(&mut self) -> Result<Point, EditorError> {
        let sel = self.surface.selection();
        if sel.is_collapsed() {
            if !self.surface.is_valid_point(sel.head) {
                return Err(EditorError::InvalidCursorState);
            }
            return Ok(self.surface.normalize(sel.head));
        }
        let at = self.surface.apply(Mutation::DeleteRange {
            start: sel.anchor,
            end: sel.head,
        })?;
        self.surface.set_selection(Selection::collapsed(at));
        Ok(at)
    }
}

impl fmt::Debug for NoteEditor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NoteEditor")
            .field("value", &self.surface.serialize())
            .field("selection", &self.surface.selection())
            .field("focused", &self.surface.is_focused())
            .field("shortcuts", &self.shortcuts.len())
            .field("change_tracking", &self.change_tracking)
            .field("tracking_enabled", &self.tracking_enabled)
            .field("autocomplete", &self.autocomplete)
            .field("revision", &self.revision)
            .finish_non_exhaustive()
    }
}
