//! Document nodes stored in the surface arena.

/// Stable identifier of a node in the arena. Identifiers are never reused,
/// so a stale id simply resolves to nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub const fn from_raw(raw: usize) -> Self {
        Self(raw)
    }

    pub const fn index(self) -> usize {
        self.0
    }
}

/// Kind of a document node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// The document container
    Root,
    /// A markup element such as `<span>`, `<u>` or `<br>`
    Element {
        tag: String,
        attrs: Vec<(String, String)>,
    },
    /// A run of text
    Text(String),
}

/// A node in the arena
#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self.kind, NodeKind::Text(_))
    }

    pub fn text(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn tag(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Element { tag, .. } => Some(tag),
            _ => None,
        }
    }

    /// Block-level containers start a new line and bound word scans
    pub fn is_block(&self) -> bool {
        self.tag().is_some_and(is_block_tag)
    }

    /// Void elements never have children (`<br>`, `<img>`, `<hr>`)
    pub fn is_void(&self) -> bool {
        self.tag().is_some_and(is_void_tag)
    }
}

pub fn is_block_tag(tag: &str) -> bool {
    matches!(
        tag,
        "div"
            | "p"
            | "li"
            | "ul"
            | "ol"
            | "blockquote"
            | "pre"
            | "h1"
            | "h2"
            | "h3"
            | "h4"
            | "h5"
            | "h6"
    )
}

pub fn is_void_tag(tag: &str) -> bool {
    matches!(tag, "br" | "img" | "hr")
}
