//! The editing surface: an arena of document nodes addressed by stable ids.
//!
//! Every structural change goes through [`Surface::apply`] with a
//! [`Mutation`]. The primitives behind it (splice, split, attach, detach,
//! unwrap) keep the current selection pointing at the same content, so the
//! caret never dangles after an edit.

use std::ops::Range;

use crate::error::EditorError;

use super::cursor::Point;
use super::markup::{self, MarkupNode};
use super::messages::MoveTarget;
use super::node::{Node, NodeId, NodeKind};
use super::selection::Selection;

/// A structural edit applied to the surface
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    /// Insert a fragment at a point. Plain text landing in a text node is
    /// spliced into it; element fragments are attached as siblings.
    InsertAt {
        at: Point,
        fragment: Vec<MarkupNode>,
    },
    /// Delete everything between two text points
    DeleteRange { start: Point, end: Point },
    /// Wrap a character range of a text node in a new element
    WrapRange {
        node: NodeId,
        range: Range<usize>,
        tag: String,
        attrs: Vec<(String, String)>,
    },
    /// Wrap the content between two text points in a new element. Text
    /// nodes at the edges may be split; other elements may not, so the
    /// points must sit on the outer edges of any element they are nested in.
    WrapSpan {
        start: Point,
        end: Point,
        tag: String,
        attrs: Vec<(String, String)>,
    },
    /// Wrap a whole node in a new element
    WrapNode {
        node: NodeId,
        tag: String,
        attrs: Vec<(String, String)>,
    },
    /// Replace an element by its children
    Unwrap { node: NodeId },
    /// Throw away all content and load new markup
    ReplaceContent { markup: String },
}

impl Mutation {
    pub fn insert_text(at: Point, text: &str) -> Self {
        Mutation::InsertAt {
            at,
            fragment: vec![MarkupNode::text(text)],
        }
    }

    pub fn insert_markup(at: Point, markup: &str) -> Self {
        Mutation::InsertAt {
            at,
            fragment: markup::parse(markup),
        }
    }
}

/// Caret location in rendered lines, used to anchor overlays
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaretGeometry {
    /// 0-based line index (line breaks and block starts begin a new line)
    pub line: usize,
    /// Text of the caret's line up to the caret
    pub line_text: String,
}

/// The live document: node arena plus selection and focus
#[derive(Debug, Clone)]
pub struct Surface {
    nodes: Vec<Option<Node>>,
    root: NodeId,
    selection: Selection,
    focused: bool,
}

impl Default for Surface {
    fn default() -> Self {
        Self::new()
    }
}

impl Surface {
    /// Create an empty surface
    pub fn new() -> Self {
        let root = NodeId::from_raw(0);
        Self {
            nodes: vec![Some(Node::new(NodeKind::Root))],
            root,
            selection: Selection::collapsed(Point::new(root, 0)),
            focused: false,
        }
    }

    /// Create a surface holding the given markup, caret at the end
    pub fn from_markup(markup: &str) -> Self {
        let mut surface = Self::new();
        surface.load(markup);
        surface
    }

    // =========================================================================
    // Read access
    // =========================================================================

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index()).and_then(|slot| slot.as_ref())
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index()).and_then(|slot| slot.as_mut())
    }

    /// Check that a node is alive (not removed)
    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    /// Character length of a text node (None for non-text nodes)
    pub fn text_len(&self, id: NodeId) -> Option<usize> {
        self.node(id)
            .and_then(|n| n.text())
            .map(|t| t.chars().count())
    }

    pub fn text(&self, id: NodeId) -> Option<&str> {
        self.node(id).and_then(|n| n.text())
    }

    fn index_in_parent(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|&c| c == id)
    }

    /// Check whether `id` is `ancestor` or lies inside it
    pub fn is_within(&self, id: NodeId, ancestor: NodeId) -> bool {
        let mut cur = Some(id);
        while let Some(node) = cur {
            if node == ancestor {
                return true;
            }
            cur = self.parent(node);
        }
        false
    }

    /// Check whether any ancestor of `id` is an element with the given tag
    pub fn has_ancestor_tag(&self, id: NodeId, tag: &str) -> bool {
        let mut cur = self.parent(id);
        while let Some(node) = cur {
            if self.node(node).and_then(|n| n.tag()) == Some(tag) {
                return true;
            }
            cur = self.parent(node);
        }
        false
    }

    /// Serialize the live content to markup (the editor value)
    pub fn serialize(&self) -> String {
        let mut out = String::new();
        for &child in self.children(self.root) {
            self.write_node(&mut out, child);
        }
        out
    }

    fn write_node(&self, out: &mut String, id: NodeId) {
        let Some(node) = self.node(id) else {
            return;
        };
        match &node.kind {
            NodeKind::Text(text) => markup::write_text(out, text),
            NodeKind::Element { tag, attrs } => {
                markup::write_open_tag(out, tag, attrs);
                if !node.is_void() {
                    for &child in &node.children {
                        self.write_node(out, child);
                    }
                    markup::write_close_tag(out, tag);
                }
            }
            NodeKind::Root => {
                for &child in &node.children {
                    self.write_node(out, child);
                }
            }
        }
    }

    /// Rendered plain text (line breaks and block starts become `\n`)
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        self.flatten_until(self.root, None, &mut out);
        out
    }

    /// All leaves (text nodes, void elements, empty elements) in document order
    pub fn leaves(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_leaves(self.root, &mut out);
        out
    }

    fn collect_leaves(&self, id: NodeId, out: &mut Vec<NodeId>) {
        for &child in self.children(id) {
            let Some(node) = self.node(child) else {
                continue;
            };
            if node.is_text() || node.children.is_empty() {
                out.push(child);
            } else {
                self.collect_leaves(child, out);
            }
        }
    }

    /// Text nodes in document order
    pub fn text_leaves(&self) -> Vec<NodeId> {
        self.leaves()
            .into_iter()
            .filter(|&id| self.text_len(id).is_some())
            .collect()
    }

    /// The leaf immediately before `id` within the same block, skipping empty
    /// inline wrappers. Returns None at a block boundary.
    pub fn prev_inline_leaf(&self, id: NodeId) -> Option<NodeId> {
        self.adjacent_inline_leaf(id, Side::Before)
    }

    /// The leaf immediately after `id` within the same block
    pub fn next_inline_leaf(&self, id: NodeId) -> Option<NodeId> {
        self.adjacent_inline_leaf(id, Side::After)
    }

    fn adjacent_inline_leaf(&self, id: NodeId, side: Side) -> Option<NodeId> {
        let mut cur = id;
        loop {
            let parent = self.parent(cur)?;
            let idx = self.index_in_parent(cur)?;
            let siblings = self.children(parent);
            let sibling = match side {
                Side::Before if idx > 0 => Some(siblings[idx - 1]),
                Side::After if idx + 1 < siblings.len() => Some(siblings[idx + 1]),
                _ => None,
            };

            let Some(mut candidate) = sibling else {
                let parent_node = self.node(parent)?;
                if parent_node.is_block() || matches!(parent_node.kind, NodeKind::Root) {
                    return None;
                }
                cur = parent;
                continue;
            };

            // Descend to the nearest leaf on the facing side
            loop {
                let node = self.node(candidate)?;
                if node.is_block() {
                    return None;
                }
                if node.is_text() || node.is_void() {
                    return Some(candidate);
                }
                let next = match side {
                    Side::Before => node.children.last(),
                    Side::After => node.children.first(),
                };
                match next {
                    Some(&child) => candidate = child,
                    None => break,
                }
            }
            // Empty inline wrapper: keep scanning past it
            cur = candidate;
        }
    }

    /// Compare two points in document order
    pub fn ordered(&self, a: Point, b: Point) -> (Point, Point) {
        if self.point_key(b) < self.point_key(a) {
            (b, a)
        } else {
            (a, b)
        }
    }

    fn point_key(&self, p: Point) -> Vec<usize> {
        let mut key = Vec::new();
        let mut cur = p.node;
        while let Some(parent) = self.parent(cur) {
            key.push(self.index_in_parent(cur).unwrap_or(0));
            cur = parent;
        }
        key.reverse();
        key.push(p.offset);
        key
    }

    // =========================================================================
    // Selection and focus
    // =========================================================================

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn set_selection(&mut self, selection: Selection) {
        self.selection = selection;
    }

    /// The caret (selection head)
    pub fn caret(&self) -> Point {
        self.selection.head
    }

    pub fn set_caret(&mut self, point: Point) {
        self.selection = Selection::collapsed(point);
    }

    /// Collapse the caret right after `id`, outside it. An empty text node is
    /// added there when the next sibling is not text, so that typing does not
    /// extend the element.
    pub fn set_caret_after(&mut self, id: NodeId) -> Result<Point, EditorError> {
        let parent = self.parent(id).ok_or(EditorError::InvalidCursorState)?;
        let idx = self
            .index_in_parent(id)
            .ok_or(EditorError::InvalidCursorState)?;
        let next = self.children(parent).get(idx + 1).copied();
        let text = match next.filter(|&n| self.text_len(n).is_some()) {
            Some(text) => text,
            None => {
                let text = self.alloc(NodeKind::Text(String::new()));
                self.attach(parent, idx + 1, text);
                text
            }
        };
        let point = Point::new(text, 0);
        self.set_caret(point);
        Ok(point)
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    /// A point is usable when its node is alive and its offset is in bounds
    pub fn is_valid_point(&self, p: Point) -> bool {
        match self.node(p.node) {
            Some(node) => match node.text() {
                Some(text) => p.offset <= text.chars().count(),
                None => p.offset <= node.children.len(),
            },
            None => false,
        }
    }

    pub fn start_point(&self) -> Point {
        self.normalize(Point::new(self.root, 0))
    }

    pub fn end_point(&self) -> Point {
        let len = self.children(self.root).len();
        self.normalize(Point::new(self.root, len))
    }

    /// Resolve a point to the equivalent text position when there is one.
    ///
    /// An element position right after inline content resolves to the end of
    /// its last text leaf; otherwise one right before content resolves to the
    /// start of its first text leaf. A point inside a void element resolves
    /// to the position after it.
    pub fn normalize(&self, p: Point) -> Point {
        let Some(node) = self.node(p.node) else {
            return p;
        };
        if let Some(text) = node.text() {
            return Point::new(p.node, p.offset.min(text.chars().count()));
        }
        if node.is_void() {
            return match (node.parent, self.index_in_parent(p.node)) {
                (Some(parent), Some(idx)) => self.normalize(Point::new(parent, idx + 1)),
                _ => p,
            };
        }

        let offset = p.offset.min(node.children.len());
        if offset > 0 {
            if let Some(point) = self.edge_text(node.children[offset - 1], Side::Before) {
                return point;
            }
        }
        if offset < node.children.len() {
            if let Some(point) = self.edge_text(node.children[offset], Side::After) {
                return point;
            }
        }
        Point::new(p.node, offset)
    }

    /// Text position at the facing edge of a subtree, if that edge is text
    fn edge_text(&self, mut id: NodeId, side: Side) -> Option<Point> {
        loop {
            let node = self.node(id)?;
            if let Some(text) = node.text() {
                let offset = match side {
                    Side::Before => text.chars().count(),
                    Side::After => 0,
                };
                return Some(Point::new(id, offset));
            }
            if node.is_void() {
                return None;
            }
            id = match side {
                Side::Before => *node.children.last()?,
                Side::After => *node.children.first()?,
            };
        }
    }

    /// Line index and line text of the caret, for overlay anchoring
    pub fn caret_geometry(&self) -> CaretGeometry {
        let mut before = String::new();
        self.flatten_until(self.root, Some(self.caret()), &mut before);
        let line = before.matches('\n').count();
        let line_text = match before.rfind('\n') {
            Some(i) => before[i + 1..].to_string(),
            None => before,
        };
        CaretGeometry { line, line_text }
    }

    /// Append rendered text of `id` to `out`; returns true once `stop` is hit
    fn flatten_until(&self, id: NodeId, stop: Option<Point>, out: &mut String) -> bool {
        let Some(node) = self.node(id) else {
            return false;
        };
        if let Some(text) = node.text() {
            match stop {
                Some(p) if p.node == id => {
                    out.extend(text.chars().take(p.offset));
                    return true;
                }
                _ => {
                    out.push_str(text);
                    return false;
                }
            }
        }

        if node.is_block() && !out.is_empty() && !out.ends_with('\n') {
            out.push('\n');
        }
        match node.tag() {
            Some("br") | Some("hr") => out.push('\n'),
            Some("img") => out.push('\u{FFFC}'),
            _ => {}
        }

        for (i, &child) in node.children.iter().enumerate() {
            if stop == Some(Point::new(id, i)) {
                return true;
            }
            if self.flatten_until(child, stop, out) {
                return true;
            }
        }
        stop == Some(Point::new(id, node.children.len()))
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Apply a mutation and return the point right after the affected content
    /// (after the insertion, at the start of a deletion, after a wrap).
    pub fn apply(&mut self, mutation: Mutation) -> Result<Point, EditorError> {
        tracing::trace!(target: "surface", ?mutation, "apply");
        match mutation {
            Mutation::InsertAt { at, fragment } => self.insert_at(at, &fragment),
            Mutation::DeleteRange { start, end } => self.delete_range(start, end),
            Mutation::WrapRange {
                node,
                range,
                tag,
                attrs,
            } => self.wrap_range(node, range, &tag, attrs),
            Mutation::WrapSpan {
                start,
                end,
                tag,
                attrs,
            } => self.wrap_span(start, end, &tag, attrs),
            Mutation::WrapNode { node, tag, attrs } => {
                self.wrap_node(node, &tag, attrs)?;
                let after = self.point_after(node);
                Ok(after)
            }
            Mutation::Unwrap { node } => self.unwrap(node),
            Mutation::ReplaceContent { markup } => {
                self.load(&markup);
                Ok(self.caret())
            }
        }
    }

    fn load(&mut self, markup: &str) {
        let root = self.root;
        let old: Vec<NodeId> = self.children(root).to_vec();
        for id in old {
            self.free_subtree(id);
        }
        if let Some(node) = self.node_mut(root) {
            node.children.clear();
        }
        for (i, fragment) in markup::parse(markup).iter().enumerate() {
            let id = self.build(fragment);
            self.attach(root, i, id);
        }
        self.selection = Selection::collapsed(self.end_point());
    }

    fn insert_at(&mut self, at: Point, fragment: &[MarkupNode]) -> Result<Point, EditorError> {
        if !self.is_valid_point(at) {
            return Err(EditorError::InvalidCursorState);
        }
        let at = self.normalize(at);
        if fragment.is_empty() {
            return Ok(at);
        }

        if let [MarkupNode::Text(text)] = fragment {
            if self.text_len(at.node).is_some() {
                self.splice_text(at.node, at.offset..at.offset, text)?;
                return Ok(Point::new(at.node, at.offset + text.chars().count()));
            }
        }

        let hoist = !fragment.iter().all(|n| matches!(n, MarkupNode::Text(_)));
        let (parent, mut index) = self.insertion_slot(at, hoist)?;
        let mut last = None;
        for node in fragment {
            let id = self.build(node);
            self.attach(parent, index, id);
            index += 1;
            last = Some(id);
        }
        match last {
            Some(id) => Ok(self.point_after(id)),
            None => Ok(at),
        }
    }

    /// Parent and child index where a fragment lands for a given point.
    /// With `hoist`, a slot at the very edge of an inline wrapper moves out of
    /// it, so element fragments land beside earlier ones instead of nesting.
    fn insertion_slot(&mut self, at: Point, hoist: bool) -> Result<(NodeId, usize), EditorError> {
        let (mut parent, mut index) = match self.text_len(at.node) {
            Some(len) => {
                let parent = self.parent(at.node).ok_or(EditorError::InvalidCursorState)?;
                let idx = self
                    .index_in_parent(at.node)
                    .ok_or(EditorError::InvalidCursorState)?;
                if at.offset == 0 {
                    (parent, idx)
                } else if at.offset >= len {
                    (parent, idx + 1)
                } else {
                    self.split_text(at.node, at.offset)?;
                    (parent, idx + 1)
                }
            }
            None => (at.node, at.offset),
        };

        if hoist {
            loop {
                let Some(node) = self.node(parent) else {
                    break;
                };
                let inline = matches!(node.kind, NodeKind::Element { .. }) && !node.is_block();
                let (Some(grand), Some(pidx)) = (node.parent, self.index_in_parent(parent)) else {
                    break;
                };
                if !inline {
                    break;
                }
                if index >= node.children.len() {
                    parent = grand;
                    index = pidx + 1;
                } else if index == 0 {
                    parent = grand;
                    index = pidx;
                } else {
                    break;
                }
            }
        }
        Ok((parent, index))
    }

    /// Caret position right after a freshly inserted node
    fn point_after(&self, id: NodeId) -> Point {
        if let Some(len) = self.text_len(id) {
            return Point::new(id, len);
        }
        match (self.parent(id), self.index_in_parent(id)) {
            (Some(parent), Some(idx)) => self.normalize(Point::new(parent, idx + 1)),
            _ => self.end_point(),
        }
    }

    fn delete_range(&mut self, start: Point, end: Point) -> Result<Point, EditorError> {
        if !self.is_valid_point(start) || !self.is_valid_point(end) {
            return Err(EditorError::InvalidCursorState);
        }
        let (start, end) = self.ordered(self.normalize(start), self.normalize(end));
        if start == end {
            return Ok(start);
        }
        if self.text_len(start.node).is_none() || self.text_len(end.node).is_none() {
            return Err(EditorError::InvalidCursorState);
        }

        if start.node == end.node {
            self.splice_text(start.node, start.offset..end.offset, "")?;
        } else {
            let leaves = self.leaves();
            let i = leaves.iter().position(|&id| id == start.node);
            let j = leaves.iter().position(|&id| id == end.node);
            let (Some(i), Some(j)) = (i, j) else {
                return Err(EditorError::InvalidCursorState);
            };
            let between = leaves[i + 1..j].to_vec();

            self.splice_text(start.node, start.offset..usize::MAX, "")?;
            self.splice_text(end.node, 0..end.offset, "")?;
            for id in between {
                if self.contains(id) {
                    self.remove_pruning(id);
                }
            }
            if self.text_len(end.node) == Some(0) {
                self.remove_pruning(end.node);
            }
        }

        if self.text_len(start.node) == Some(0) {
            if let Some(p) = self.remove_pruning(start.node) {
                return Ok(self.normalize(p));
            }
        }
        Ok(start)
    }

    fn wrap_range(
        &mut self,
        node: NodeId,
        range: Range<usize>,
        tag: &str,
        attrs: Vec<(String, String)>,
    ) -> Result<Point, EditorError> {
        let len = self.text_len(node).ok_or(EditorError::InvalidCursorState)?;
        let start = range.start.min(len);
        let end = range.end.min(len).max(start);
        if start == end {
            return Ok(Point::new(node, start));
        }
        if end < len {
            self.split_text(node, end)?;
        }
        let middle = if start > 0 {
            self.split_text(node, start)?
        } else {
            node
        };
        self.wrap_node(middle, tag, attrs)?;
        Ok(Point::new(middle, end - start))
    }

    fn wrap_span(
        &mut self,
        start: Point,
        end: Point,
        tag: &str,
        attrs: Vec<(String, String)>,
    ) -> Result<Point, EditorError> {
        if !self.is_valid_point(start) || !self.is_valid_point(end) {
            return Err(EditorError::InvalidCursorState);
        }
        let (start, end) = self.ordered(self.normalize(start), self.normalize(end));
        let (Some(_), Some(end_len)) = (self.text_len(start.node), self.text_len(end.node)) else {
            return Err(EditorError::InvalidCursorState);
        };
        if start.node == end.node {
            return self.wrap_range(start.node, start.offset..end.offset, tag, attrs);
        }

        let common = self
            .common_ancestor(start.node, end.node)
            .ok_or(EditorError::InvalidCursorState)?;
        let first = self
            .child_toward(common, start.node)
            .ok_or(EditorError::InvalidCursorState)?;
        let last = self
            .child_toward(common, end.node)
            .ok_or(EditorError::InvalidCursorState)?;

        // Only text directly under `common` may be cut
        let start_ok = first == start.node
            || (start.offset == 0
                && self.edge_text(first, Side::After) == Some(Point::new(start.node, 0)));
        let end_ok = last == end.node
            || (end.offset == end_len
                && self.edge_text(last, Side::Before) == Some(Point::new(end.node, end_len)));
        if !start_ok || !end_ok {
            return Err(EditorError::InvalidCursorState);
        }
        let (Some(i), Some(j)) = (self.index_in_parent(first), self.index_in_parent(last)) else {
            return Err(EditorError::InvalidCursorState);
        };
        if i >= j {
            return Err(EditorError::InvalidCursorState);
        }
        if self.children(common)[i..=j]
            .iter()
            .any(|&id| self.node(id).is_some_and(|n| n.is_block()))
        {
            return Err(EditorError::InvalidCursorState);
        }

        if last == end.node && end.offset < end_len {
            self.split_text(last, end.offset)?;
        }
        let first = if first == start.node && start.offset > 0 {
            self.split_text(first, start.offset)?
        } else {
            first
        };
        let (Some(i), Some(j)) = (self.index_in_parent(first), self.index_in_parent(last)) else {
            return Err(EditorError::InvalidCursorState);
        };

        let wrapper = self.alloc(NodeKind::Element {
            tag: tag.to_string(),
            attrs,
        });
        self.remap(move |_, p| {
            if p.node != common || p.offset <= i {
                p
            } else if p.offset <= j {
                Point::new(wrapper, p.offset - i)
            } else {
                Point::new(common, p.offset - (j - i))
            }
        });

        let moved: Vec<NodeId> = match self.node_mut(common) {
            Some(parent) => parent.children.splice(i..=j, [wrapper]).collect(),
            None => return Err(EditorError::InvalidCursorState),
        };
        for &child in &moved {
            if let Some(c) = self.node_mut(child) {
                c.parent = Some(wrapper);
            }
        }
        if let Some(w) = self.node_mut(wrapper) {
            w.parent = Some(common);
            w.children = moved;
        }
        Ok(Point::new(end.node, end.offset))
    }

    /// Nearest element containing both nodes
    fn common_ancestor(&self, a: NodeId, b: NodeId) -> Option<NodeId> {
        let mut cur = self.parent(b);
        while let Some(id) = cur {
            if self.is_within(a, id) {
                return Some(id);
            }
            cur = self.parent(id);
        }
        None
    }

    /// The child of `ancestor` on the path down to `id`
    fn child_toward(&self, ancestor: NodeId, id: NodeId) -> Option<NodeId> {
        let mut cur = id;
        loop {
            let parent = self.parent(cur)?;
            if parent == ancestor {
                return Some(cur);
            }
            cur = parent;
        }
    }

    fn wrap_node(
        &mut self,
        id: NodeId,
        tag: &str,
        attrs: Vec<(String, String)>,
    ) -> Result<NodeId, EditorError> {
        let parent = self.parent(id).ok_or(EditorError::InvalidCursorState)?;
        let idx = self
            .index_in_parent(id)
            .ok_or(EditorError::InvalidCursorState)?;
        let wrapper = self.alloc(NodeKind::Element {
            tag: tag.to_string(),
            attrs,
        });
        if let Some(p) = self.node_mut(parent) {
            p.children[idx] = wrapper;
        }
        if let Some(w) = self.node_mut(wrapper) {
            w.parent = Some(parent);
            w.children.push(id);
        }
        if let Some(n) = self.node_mut(id) {
            n.parent = Some(wrapper);
        }
        Ok(wrapper)
    }

    fn unwrap(&mut self, id: NodeId) -> Result<Point, EditorError> {
        let parent = self.parent(id).ok_or(EditorError::InvalidCursorState)?;
        let idx = self
            .index_in_parent(id)
            .ok_or(EditorError::InvalidCursorState)?;
        let children = self.children(id).to_vec();
        let n = children.len();

        self.remap(move |_, p| {
            if p.node == id {
                Point::new(parent, idx + p.offset)
            } else if p.node == parent && p.offset > idx {
                Point::new(parent, p.offset + n - 1)
            } else {
                p
            }
        });

        if let Some(p) = self.node_mut(parent) {
            p.children.remove(idx);
            for (k, &child) in children.iter().enumerate() {
                p.children.insert(idx + k, child);
            }
        }
        for &child in &children {
            if let Some(c) = self.node_mut(child) {
                c.parent = Some(parent);
            }
        }
        if let Some(slot) = self.nodes.get_mut(id.index()) {
            *slot = None;
        }
        Ok(self.normalize(Point::new(parent, idx + n)))
    }

    /// Delete one character (or void leaf) before the caret, or the selection
    pub fn delete_backward(&mut self) -> Result<Point, EditorError> {
        let sel = self.selection;
        if !sel.is_collapsed() {
            let point = self.delete_range(sel.anchor, sel.head)?;
            self.set_caret(point);
            return Ok(point);
        }
        if !self.is_valid_point(sel.head) {
            return Err(EditorError::InvalidCursorState);
        }

        let p = self.normalize(sel.head);
        self.set_caret(p);
        if self.text_len(p.node).is_some() && p.offset > 0 {
            let point = self.delete_range(Point::new(p.node, p.offset - 1), p)?;
            self.set_caret(point);
            return Ok(point);
        }

        let prev = match self.text_len(p.node) {
            Some(_) => self.prev_inline_leaf(p.node),
            None => self
                .children(p.node)
                .get(p.offset.wrapping_sub(1))
                .copied()
                .filter(|&id| self.node(id).is_some_and(|n| n.is_void())),
        };
        match prev {
            Some(leaf) => match self.text_len(leaf) {
                Some(len) if len > 0 => {
                    let point = self.delete_range(Point::new(leaf, len - 1), Point::new(leaf, len))?;
                    self.set_caret(point);
                }
                _ => {
                    self.remove_pruning(leaf);
                }
            },
            None => self.merge_with_previous_block(p.node),
        }
        let caret = self.normalize(self.caret());
        self.set_caret(caret);
        Ok(caret)
    }

    /// Delete one character (or void leaf) after the caret, or the selection
    pub fn delete_forward(&mut self) -> Result<Point, EditorError> {
        let sel = self.selection;
        if !sel.is_collapsed() {
            let point = self.delete_range(sel.anchor, sel.head)?;
            self.set_caret(point);
            return Ok(point);
        }
        if !self.is_valid_point(sel.head) {
            return Err(EditorError::InvalidCursorState);
        }

        let p = self.normalize(sel.head);
        self.set_caret(p);
        match self.text_len(p.node) {
            Some(len) if p.offset < len => {
                let point = self.delete_range(p, Point::new(p.node, p.offset + 1))?;
                self.set_caret(point);
            }
            Some(_) => {
                if let Some(leaf) = self.next_inline_leaf(p.node) {
                    match self.text_len(leaf) {
                        Some(len) if len > 0 => {
                            self.splice_text(leaf, 0..1, "")?;
                        }
                        _ => {
                            self.remove_pruning(leaf);
                        }
                    }
                }
            }
            None => {
                let next = self.children(p.node).get(p.offset).copied();
                if let Some(id) = next.filter(|&id| self.node(id).is_some_and(|n| n.is_void())) {
                    self.remove_pruning(id);
                }
            }
        }
        let caret = self.normalize(self.caret());
        self.set_caret(caret);
        Ok(caret)
    }

    /// Backspace at the start of a block: pull its content into the previous
    /// sibling block
    fn merge_with_previous_block(&mut self, from: NodeId) {
        let mut block = Some(from);
        while let Some(id) = block {
            if self.node(id).is_some_and(|n| n.is_block()) {
                break;
            }
            block = self.parent(id);
        }
        let Some(block) = block else {
            return;
        };
        let (Some(parent), Some(idx)) = (self.parent(block), self.index_in_parent(block)) else {
            return;
        };
        if idx == 0 {
            return;
        }
        let prev = self.children(parent)[idx - 1];
        if !self.node(prev).is_some_and(|n| n.is_block() && !n.is_void()) {
            return;
        }

        let moved = self.children(block).to_vec();
        let base = self.children(prev).len();
        self.remap(move |_, p| {
            if p.node == block {
                Point::new(prev, base + p.offset)
            } else {
                p
            }
        });
        if let Some(b) = self.node_mut(block) {
            b.children.clear();
        }
        for &child in &moved {
            if let Some(c) = self.node_mut(child) {
                c.parent = Some(prev);
            }
        }
        if let Some(p) = self.node_mut(prev) {
            p.children.extend(moved);
        }
        self.detach(block);
    }

    /// Move the caret, collapsing any selection
    pub fn move_caret(&mut self, target: MoveTarget) {
        let head = self.normalize(self.selection.head);
        let point = match target {
            MoveTarget::DocumentStart => self.start_point(),
            MoveTarget::DocumentEnd => self.end_point(),
            MoveTarget::Left => self.step_left(head),
            MoveTarget::Right => self.step_right(head),
        };
        self.selection = Selection::collapsed(point);
    }

    fn step_left(&self, p: Point) -> Point {
        if self.text_len(p.node).is_some() && p.offset > 0 {
            return Point::new(p.node, p.offset - 1);
        }
        let key = self.point_key(p);
        self.text_leaves()
            .into_iter()
            .rev()
            .find_map(|leaf| {
                let len = self.text_len(leaf)?;
                (self.point_key(Point::new(leaf, len)) < key)
                    .then(|| Point::new(leaf, len.saturating_sub(1)))
            })
            .unwrap_or(p)
    }

    fn step_right(&self, p: Point) -> Point {
        if let Some(len) = self.text_len(p.node) {
            if p.offset < len {
                return Point::new(p.node, p.offset + 1);
            }
        }
        let key = self.point_key(p);
        self.text_leaves()
            .into_iter()
            .find_map(|leaf| {
                let len = self.text_len(leaf)?;
                (self.point_key(Point::new(leaf, 0)) > key).then(|| Point::new(leaf, len.min(1)))
            })
            .unwrap_or(p)
    }

    // =========================================================================
    // Primitives
    // =========================================================================

    fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId::from_raw(self.nodes.len());
        self.nodes.push(Some(Node::new(kind)));
        id
    }

    /// Allocate a detached subtree for a markup node
    fn build(&mut self, fragment: &MarkupNode) -> NodeId {
        match fragment {
            MarkupNode::Text(text) => self.alloc(NodeKind::Text(text.clone())),
            MarkupNode::Element {
                tag,
                attrs,
                children,
            } => {
                let id = self.alloc(NodeKind::Element {
                    tag: tag.clone(),
                    attrs: attrs.clone(),
                });
                for child in children {
                    let child_id = self.build(child);
                    if let Some(c) = self.node_mut(child_id) {
                        c.parent = Some(id);
                    }
                    if let Some(n) = self.node_mut(id) {
                        n.children.push(child_id);
                    }
                }
                id
            }
        }
    }

    fn attach(&mut self, parent: NodeId, index: usize, id: NodeId) {
        let Some(p) = self.node_mut(parent) else {
            return;
        };
        let index = index.min(p.children.len());
        p.children.insert(index, id);
        if let Some(n) = self.node_mut(id) {
            n.parent = Some(parent);
        }
        self.remap(move |_, p| {
            if p.node == parent && p.offset > index {
                Point::new(parent, p.offset + 1)
            } else {
                p
            }
        });
    }

    /// Remove a node (and its subtree); points inside it move to where it was
    fn detach(&mut self, id: NodeId) -> Option<Point> {
        let parent = self.parent(id)?;
        let idx = self.index_in_parent(id)?;

        self.remap(move |s, p| {
            if s.is_within(p.node, id) {
                Point::new(parent, idx)
            } else if p.node == parent && p.offset > idx {
                Point::new(parent, p.offset - 1)
            } else {
                p
            }
        });

        if let Some(p) = self.node_mut(parent) {
            p.children.remove(idx);
        }
        self.free_subtree(id);
        Some(Point::new(parent, idx))
    }

    /// Remove a node together with inline ancestors it would leave empty
    fn remove_pruning(&mut self, id: NodeId) -> Option<Point> {
        let mut target = id;
        loop {
            let parent = self.parent(target)?;
            let node = self.node(parent)?;
            let prunable = matches!(node.kind, NodeKind::Element { .. })
                && !node.is_block()
                && node.children.len() == 1;
            if !prunable {
                break;
            }
            target = parent;
        }
        self.detach(target)
    }

    fn free_subtree(&mut self, id: NodeId) {
        let children = self.children(id).to_vec();
        for child in children {
            self.free_subtree(child);
        }
        if let Some(slot) = self.nodes.get_mut(id.index()) {
            *slot = None;
        }
    }

    /// Replace a character range of a text node
    fn splice_text(&mut self, id: NodeId, range: Range<usize>, insert: &str) -> Result<(), EditorError> {
        let node = self.node_mut(id).ok_or(EditorError::InvalidCursorState)?;
        let NodeKind::Text(text) = &mut node.kind else {
            return Err(EditorError::InvalidCursorState);
        };
        let len = text.chars().count();
        let start = range.start.min(len);
        let end = range.end.min(len).max(start);
        let (bs, be) = (char_to_byte(text, start), char_to_byte(text, end));
        text.replace_range(bs..be, insert);

        let removed = end - start;
        let inserted = insert.chars().count();
        self.remap(move |_, p| {
            if p.node != id {
                p
            } else if p.offset >= end && p.offset > start {
                Point::new(id, p.offset - removed + inserted)
            } else if p.offset > start {
                Point::new(id, start)
            } else {
                p
            }
        });
        Ok(())
    }

    /// Split a text node at a character offset; the tail becomes a new sibling
    fn split_text(&mut self, id: NodeId, at: usize) -> Result<NodeId, EditorError> {
        let parent = self.parent(id).ok_or(EditorError::InvalidCursorState)?;
        let idx = self
            .index_in_parent(id)
            .ok_or(EditorError::InvalidCursorState)?;
        let node = self.node_mut(id).ok_or(EditorError::InvalidCursorState)?;
        let NodeKind::Text(text) = &mut node.kind else {
            return Err(EditorError::InvalidCursorState);
        };
        let byte = char_to_byte(text, at);
        let tail = text.split_off(byte);

        let tail_id = self.alloc(NodeKind::Text(tail));
        if let Some(p) = self.node_mut(parent) {
            p.children.insert(idx + 1, tail_id);
        }
        if let Some(t) = self.node_mut(tail_id) {
            t.parent = Some(parent);
        }
        self.remap(move |_, p| {
            if p.node == id && p.offset > at {
                Point::new(tail_id, p.offset - at)
            } else if p.node == parent && p.offset > idx {
                Point::new(parent, p.offset + 1)
            } else {
                p
            }
        });
        Ok(tail_id)
    }

    fn remap(&mut self, f: impl Fn(&Surface, Point) -> Point) {
        let anchor = f(self, self.selection.anchor);
        let head = f(self, self.selection.head);
        self.selection = Selection::new(anchor, head);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Before,
    After,
}

/// Convert char offset to byte offset
fn char_to_byte(text: &str, char_offset: usize) -> usize {
    text.char_indices()
        .nth(char_offset)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}
