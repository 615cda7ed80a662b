//! Caret points inside the document arena.

use super::node::NodeId;

/// A position in the document tree.
///
/// For a text node, `offset` is a character offset into its text. For an
/// element (or the root), `offset` is a child index, with `children.len()`
/// meaning "after the last child".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point {
    pub node: NodeId,
    pub offset: usize,
}

impl Point {
    pub const fn new(node: NodeId, offset: usize) -> Self {
        Self { node, offset }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_equality() {
        let a = Point::new(NodeId::from_raw(3), 2);
        let b = Point::new(NodeId::from_raw(3), 2);
        let c = Point::new(NodeId::from_raw(3), 4);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
