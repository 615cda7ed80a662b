//! Command types for the Elm-style architecture
//!
//! `Cmd` values are side effects the host performs after an update.
//! `FormatCommand` values are formatting actions executed against the
//! surface through a [`CommandExecutor`].

use std::str::FromStr;

use crate::editable::{is_block_tag, Mutation, NodeId, Point, Selection, Surface};
use crate::error::EditorError;
use crate::messages::ChangeEvent;

/// Side effects returned from `update`
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Cmd {
    /// No command - do nothing
    #[default]
    None,
    /// Deliver a new value to the host's change callback
    Notify(ChangeEvent),
    /// Cancel the platform's default handling of the current key event
    PreventDefault,
    /// Route an error to the host's error reporting (toast)
    ReportError(EditorError),
    /// Execute multiple commands
    Batch(Vec<Cmd>),
}

impl Cmd {
    /// Create a batch of commands, flattening trivial cases
    pub fn batch(cmds: Vec<Cmd>) -> Self {
        let mut cmds: Vec<Cmd> = cmds.into_iter().filter(|c| *c != Cmd::None).collect();
        match cmds.len() {
            0 => Cmd::None,
            1 => cmds.remove(0),
            _ => Cmd::Batch(cmds),
        }
    }

    /// Check if the default key behavior must be suppressed
    pub fn prevents_default(&self) -> bool {
        match self {
            Cmd::PreventDefault => true,
            Cmd::Batch(cmds) => cmds.iter().any(|c| c.prevents_default()),
            _ => false,
        }
    }

    /// All change notifications carried by this command, in order
    pub fn notifications(&self) -> Vec<&ChangeEvent> {
        match self {
            Cmd::Notify(event) => vec![event],
            Cmd::Batch(cmds) => cmds.iter().flat_map(|c| c.notifications()).collect(),
            _ => Vec::new(),
        }
    }

    /// All errors carried by this command, in order
    pub fn errors(&self) -> Vec<&EditorError> {
        match self {
            Cmd::ReportError(err) => vec![err],
            Cmd::Batch(cmds) => cmds.iter().flat_map(|c| c.errors()).collect(),
            _ => Vec::new(),
        }
    }
}

/// Formatting commands delegated to the platform's native editing commands
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FormatCommand {
    Bold,
    Italic,
    Underline,
    /// Text color (any CSS color value)
    ForeColor(String),
    UnorderedList,
    OrderedList,
    Indent,
    Outdent,
    Undo,
    Redo,
}

impl FromStr for FormatCommand {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(color) = s.strip_prefix("ForeColor:") {
            return Ok(FormatCommand::ForeColor(color.trim().to_string()));
        }
        match s {
            "Bold" => Ok(FormatCommand::Bold),
            "Italic" => Ok(FormatCommand::Italic),
            "Underline" => Ok(FormatCommand::Underline),
            "UnorderedList" => Ok(FormatCommand::UnorderedList),
            "OrderedList" => Ok(FormatCommand::OrderedList),
            "Indent" => Ok(FormatCommand::Indent),
            "Outdent" => Ok(FormatCommand::Outdent),
            "Undo" => Ok(FormatCommand::Undo),
            "Redo" => Ok(FormatCommand::Redo),
            _ => Err(()),
        }
    }
}

/// The platform's native command execution. Returns whether the command ran
/// and changed the surface.
pub trait CommandExecutor: Send {
    fn execute(&mut self, surface: &mut Surface, command: &FormatCommand) -> Result<bool, EditorError>;
}

/// Built-in executor operating directly on the surface arena
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeCommands;

impl CommandExecutor for NativeCommands {
    fn execute(&mut self, surface: &mut Surface, command: &FormatCommand) -> Result<bool, EditorError> {
        match command {
            FormatCommand::Bold => wrap_selection(surface, "b", Vec::new()),
            FormatCommand::Italic => wrap_selection(surface, "i", Vec::new()),
            FormatCommand::Underline => wrap_selection(surface, "u", Vec::new()),
            FormatCommand::ForeColor(color) => wrap_selection(
                surface,
                "span",
                vec![("style".to_string(), format!("color: {}", color))],
            ),
            FormatCommand::UnorderedList => make_list(surface, "ul"),
            FormatCommand::OrderedList => make_list(surface, "ol"),
            FormatCommand::Indent => {
                let target = line_target(surface)?;
                surface.apply(Mutation::WrapNode {
                    node: target,
                    tag: "blockquote".to_string(),
                    attrs: Vec::new(),
                })?;
                Ok(true)
            }
            FormatCommand::Outdent => {
                let caret = surface.normalize(surface.caret());
                match nearest_ancestor(surface, caret.node, |tag| tag == "blockquote") {
                    Some(quote) => {
                        surface.apply(Mutation::Unwrap { node: quote })?;
                        Ok(true)
                    }
                    None => Ok(false),
                }
            }
            FormatCommand::Undo | FormatCommand::Redo => {
                tracing::debug!(target: "message", ?command, "no edit history, command not executed");
                Ok(false)
            }
        }
    }
}

/// Wrap a selection lying inside one text node; collapsed or multi-node
/// selections are left alone
fn wrap_selection(
    surface: &mut Surface,
    tag: &str,
    attrs: Vec<(String, String)>,
) -> Result<bool, EditorError> {
    let sel = surface.selection();
    if sel.is_collapsed() {
        return Ok(false);
    }
    let (start, end) = surface.ordered(surface.normalize(sel.anchor), surface.normalize(sel.head));
    if start.node != end.node || surface.text_len(start.node).is_none() {
        tracing::debug!(target: "message", tag, "selection spans several nodes, not wrapped");
        return Ok(false);
    }

    let after = surface.apply(Mutation::WrapRange {
        node: start.node,
        range: start.offset..end.offset,
        tag: tag.to_string(),
        attrs,
    })?;
    surface.set_selection(Selection::new(Point::new(after.node, 0), after));
    Ok(true)
}

fn make_list(surface: &mut Surface, list_tag: &str) -> Result<bool, EditorError> {
    let caret = surface.normalize(surface.caret());
    if nearest_ancestor(surface, caret.node, |tag| tag == "li").is_some() {
        return Ok(false);
    }
    let target = line_target(surface)?;
    let item = wrap(surface, target, "li")?;
    wrap(surface, item, list_tag)?;
    Ok(true)
}

fn wrap(surface: &mut Surface, node: NodeId, tag: &str) -> Result<NodeId, EditorError> {
    surface.apply(Mutation::WrapNode {
        node,
        tag: tag.to_string(),
        attrs: Vec::new(),
    })?;
    surface.parent(node).ok_or(EditorError::InvalidCursorState)
}

/// The node a block command applies to: the caret's block, or the caret's
/// text node when it sits directly in the root
fn line_target(surface: &Surface) -> Result<NodeId, EditorError> {
    let caret = surface.normalize(surface.caret());
    if !surface.contains(caret.node) || caret.node == surface.root() {
        return Err(EditorError::InvalidCursorState);
    }
    let block = nearest_ancestor(surface, caret.node, is_block_tag);
    Ok(block.unwrap_or(caret.node))
}

fn nearest_ancestor(surface: &Surface, from: NodeId, matches: impl Fn(&str) -> bool) -> Option<NodeId> {
    let mut cur = Some(from);
    while let Some(id) = cur {
        if surface.node(id).and_then(|n| n.tag()).is_some_and(&matches) {
            return Some(id);
        }
        cur = surface.parent(id);
    }
    None
}
